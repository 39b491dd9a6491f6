//! Chat-completion service configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    String::from("https://api.openai.com/v1")
}

fn default_model() -> String {
    String::from("gpt-4o")
}

const fn default_max_tokens() -> u32 {
    1000
}

const fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    /// Bearer credential. Empty means "not configured".
    #[serde(default)]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OpenAiConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Copy safe to print: the key is reduced to its last four characters.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let api_key = if self.is_configured() {
            let tail: String = self
                .api_key
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("****{tail}")
        } else {
            String::new()
        };
        Self {
            api_key,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = OpenAiConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 1000);
    }

    #[test]
    fn whitespace_key_is_not_configured() {
        let config = OpenAiConfig {
            api_key: "   ".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn redaction_keeps_tail_only() {
        let config = OpenAiConfig {
            api_key: "sk-test-abcd1234".into(),
            ..Default::default()
        };
        assert_eq!(config.redacted().api_key, "****1234");
        assert_eq!(OpenAiConfig::default().redacted().api_key, "");
    }
}
