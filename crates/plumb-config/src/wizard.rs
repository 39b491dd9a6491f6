//! Wizard flow configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_min_year() -> i32 {
    1900
}

const fn default_max_year() -> i32 {
    2025
}

const fn default_year() -> i32 {
    1995
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WizardConfig {
    /// Resolve the property address during intake.
    #[serde(default)]
    pub property_lookup: bool,

    /// Ask the service for follow-up questions before diagnosing.
    #[serde(default)]
    pub interview: bool,

    #[serde(default = "default_min_year")]
    pub min_year: i32,

    #[serde(default = "default_max_year")]
    pub max_year: i32,

    /// Year offered when the user has not entered one.
    #[serde(default = "default_year")]
    pub default_year: i32,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            property_lookup: false,
            interview: false,
            min_year: default_min_year(),
            max_year: default_max_year(),
            default_year: default_year(),
        }
    }
}

impl WizardConfig {
    /// Check the year bounds are ordered and contain the default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_year > self.max_year {
            return Err(ConfigError::InvalidValue {
                field: "wizard.min_year".into(),
                reason: format!("{} is after max_year {}", self.min_year, self.max_year),
            });
        }
        if !self.accepts_year(self.default_year) {
            return Err(ConfigError::InvalidValue {
                field: "wizard.default_year".into(),
                reason: format!(
                    "{} is outside {}..={}",
                    self.default_year, self.min_year, self.max_year
                ),
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn accepts_year(&self, year: i32) -> bool {
        year >= self.min_year && year <= self.max_year
    }
}
