//! # plumb-property
//!
//! Resolves a free-text address to a property record (year built, square
//! footage, candidate floor plans).
//!
//! [`PropertyLookup`] is the seam: callers depend on the trait so the bundled
//! [`MockPropertyTable`] can be replaced by a live records service without
//! changing them.

mod error;

pub use error::PropertyError;

use std::future::Future;

use serde::Serialize;

// ── Types ──────────────────────────────────────────────────────────

/// Reference data for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRecord {
    pub year_built: i32,
    pub square_feet: u32,
    /// Candidate floor plans, most likely first.
    pub floor_plans: Vec<String>,
}

impl PropertyRecord {
    /// Record returned when no known address matches.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            year_built: 1990,
            square_feet: 2000,
            floor_plans: vec!["Standard Layout".to_string()],
        }
    }
}

/// Outcome of a lookup. A miss still carries the fallback record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyMatch {
    /// Table key (or service identifier) that matched, if any.
    pub key: Option<String>,
    pub record: PropertyRecord,
}

impl PropertyMatch {
    #[must_use]
    pub const fn found(&self) -> bool {
        self.key.is_some()
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            key: None,
            record: PropertyRecord::fallback(),
        }
    }
}

// ── Lookup ─────────────────────────────────────────────────────────

/// Address → property record resolution.
pub trait PropertyLookup {
    /// Resolve `address`. Misses return [`PropertyMatch::not_found`], not an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError`] when the address is blank or the backend
    /// fails.
    fn lookup(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<PropertyMatch, PropertyError>> + Send;
}

/// One row of the fixed table.
#[derive(Debug, Clone, Copy)]
pub struct TableEntry {
    pub key: &'static str,
    pub year_built: i32,
    pub square_feet: u32,
    pub floor_plans: &'static [&'static str],
}

impl TableEntry {
    fn to_record(self) -> PropertyRecord {
        PropertyRecord {
            year_built: self.year_built,
            square_feet: self.square_feet,
            floor_plans: self.floor_plans.iter().map(ToString::to_string).collect(),
        }
    }
}

const STANDARD_TABLE: &[TableEntry] = &[
    TableEntry {
        key: "123 Main St",
        year_built: 1954,
        square_feet: 1200,
        floor_plans: &["Ranch Style (Crawlspace)", "Ranch Style (Slab)"],
    },
    TableEntry {
        key: "456 Oak Ave",
        year_built: 1978,
        square_feet: 1850,
        floor_plans: &["Split Level (Basement)", "Two Story (Slab)"],
    },
    TableEntry {
        key: "789 Pine Rd",
        year_built: 2006,
        square_feet: 2600,
        floor_plans: &["Two Story (Slab)", "Open Concept (Slab)"],
    },
    TableEntry {
        key: "12 Harbor View",
        year_built: 1925,
        square_feet: 1400,
        floor_plans: &["Bungalow (Pier & Beam)"],
    },
];

/// Fixed in-process table standing in for a property records service.
///
/// Matching is a case-insensitive substring test of each key against the
/// address. When several keys match, the longest key wins; equal lengths
/// are broken by key order so results never depend on table layout.
#[derive(Debug, Clone)]
pub struct MockPropertyTable {
    entries: Vec<TableEntry>,
}

impl Default for MockPropertyTable {
    fn default() -> Self {
        Self::new(STANDARD_TABLE.to_vec())
    }
}

impl MockPropertyTable {
    #[must_use]
    pub const fn new(entries: Vec<TableEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Synchronous core of [`PropertyLookup::lookup`].
    #[must_use]
    pub fn resolve(&self, address: &str) -> PropertyMatch {
        let haystack = address.to_lowercase();
        let best = self
            .entries
            .iter()
            .filter(|entry| haystack.contains(&entry.key.to_lowercase()))
            .max_by(|a, b| {
                a.key
                    .len()
                    .cmp(&b.key.len())
                    .then_with(|| b.key.cmp(a.key))
            });

        match best {
            Some(entry) => {
                tracing::debug!(address, key = entry.key, "property table hit");
                PropertyMatch {
                    key: Some(entry.key.to_string()),
                    record: entry.to_record(),
                }
            }
            None => {
                tracing::debug!(address, "property table miss; using fallback record");
                PropertyMatch::not_found()
            }
        }
    }
}

impl PropertyLookup for MockPropertyTable {
    async fn lookup(&self, address: &str) -> Result<PropertyMatch, PropertyError> {
        if address.trim().is_empty() {
            return Err(PropertyError::EmptyAddress);
        }
        Ok(self.resolve(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[tokio::test]
    async fn main_street_resolves_to_ranch() {
        let table = MockPropertyTable::default();
        let hit = table.lookup("123 Main St").await.unwrap();
        assert!(hit.found());
        assert_eq!(hit.record.year_built, 1954);
        assert!(
            hit.record
                .floor_plans
                .contains(&"Ranch Style (Crawlspace)".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_address_falls_back() {
        let table = MockPropertyTable::default();
        let miss = table.lookup("999 Nowhere Ln").await.unwrap();
        assert!(!miss.found());
        assert_eq!(miss.record.year_built, 1990);
        assert_eq!(miss.record.floor_plans, vec!["Standard Layout".to_string()]);
    }

    #[tokio::test]
    async fn blank_address_is_rejected() {
        let table = MockPropertyTable::default();
        let err = table.lookup("   ").await.unwrap_err();
        assert!(matches!(err, PropertyError::EmptyAddress));
    }

    #[rstest]
    #[case("123 main st", "123 Main St")]
    #[case("123 MAIN ST, Springfield IL", "123 Main St")]
    #[case("Unit 4, 456 Oak Ave", "456 Oak Ave")]
    #[case("12 harbor view apt 2", "12 Harbor View")]
    fn substring_match_is_case_insensitive(#[case] address: &str, #[case] key: &str) {
        let table = MockPropertyTable::default();
        assert_eq!(table.resolve(address).key.as_deref(), Some(key));
    }

    #[test]
    fn longest_key_wins_on_overlap() {
        let table = MockPropertyTable::new(vec![
            TableEntry {
                key: "Main St",
                year_built: 1900,
                square_feet: 900,
                floor_plans: &["Short"],
            },
            TableEntry {
                key: "123 Main St",
                year_built: 1954,
                square_feet: 1200,
                floor_plans: &["Long"],
            },
        ]);
        let hit = table.resolve("123 Main St");
        assert_eq!(hit.key.as_deref(), Some("123 Main St"));
        assert_eq!(hit.record.floor_plans, vec!["Long".to_string()]);
    }

    #[test]
    fn equal_length_tie_breaks_on_key_order() {
        let table = MockPropertyTable::new(vec![
            TableEntry {
                key: "Oak B",
                year_built: 2000,
                square_feet: 1,
                floor_plans: &["B"],
            },
            TableEntry {
                key: "Oak A",
                year_built: 1999,
                square_feet: 1,
                floor_plans: &["A"],
            },
        ]);
        let hit = table.resolve("corner of Oak A and Oak B");
        assert_eq!(hit.key.as_deref(), Some("Oak A"));
    }
}
