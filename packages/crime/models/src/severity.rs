//! Category-to-severity lookup table.
//!
//! Keys are normalized category names (trimmed, upper-cased). The built-in
//! table covers the Chicago-style primary offense types; a config file may
//! replace it wholesale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CrimeSeverity;

/// Built-in severity assignments, grouped by level.
const DEFAULT_SEVERITIES: &[(&str, CrimeSeverity)] = &[
    // ── Level 5 ─────────────────────────────────────────
    ("HOMICIDE", CrimeSeverity::VeryHigh),
    ("CRIMINAL SEXUAL ASSAULT", CrimeSeverity::VeryHigh),
    ("CRIM SEXUAL ASSAULT", CrimeSeverity::VeryHigh),
    ("HUMAN TRAFFICKING", CrimeSeverity::VeryHigh),
    ("KIDNAPPING", CrimeSeverity::VeryHigh),
    // ── Level 4 ─────────────────────────────────────────
    ("ROBBERY", CrimeSeverity::High),
    ("WEAPONS VIOLATION", CrimeSeverity::High),
    ("ARSON", CrimeSeverity::High),
    ("BATTERY", CrimeSeverity::High),
    ("ASSAULT", CrimeSeverity::High),
    ("OFFENSE INVOLVING CHILDREN", CrimeSeverity::High),
    // ── Level 3 ─────────────────────────────────────────
    ("BURGLARY", CrimeSeverity::Medium),
    ("MOTOR VEHICLE THEFT", CrimeSeverity::Medium),
    ("CRIMINAL DAMAGE", CrimeSeverity::Medium),
    ("NARCOTICS", CrimeSeverity::Medium),
    ("PUBLIC PEACE VIOLATION", CrimeSeverity::Medium),
    // ── Level 2 ─────────────────────────────────────────
    ("THEFT", CrimeSeverity::Low),
    ("DECEPTIVE PRACTICE", CrimeSeverity::Low),
    ("CONCEALED CARRY LICENSE VIOLATION", CrimeSeverity::Low),
    ("SEX OFFENSE", CrimeSeverity::Low),
    ("CRIMINAL TRESPASS", CrimeSeverity::Low),
    ("INTERFERENCE WITH PUBLIC OFFICER", CrimeSeverity::Low),
    // ── Level 1 ─────────────────────────────────────────
    ("LIQUOR LAW VIOLATION", CrimeSeverity::VeryLow),
    ("INTIMIDATION", CrimeSeverity::VeryLow),
    ("STALKING", CrimeSeverity::VeryLow),
    ("GAMBLING", CrimeSeverity::VeryLow),
    ("PUBLIC INDECENCY", CrimeSeverity::VeryLow),
    ("OTHER OFFENSE", CrimeSeverity::VeryLow),
    ("OTHER NARCOTIC VIOLATION", CrimeSeverity::VeryLow),
    ("OBSCENITY", CrimeSeverity::VeryLow),
    ("PROSTITUTION", CrimeSeverity::VeryLow),
    // ── Level 0 ─────────────────────────────────────────
    ("NON-CRIMINAL", CrimeSeverity::NonCriminal),
];

/// Normalizes a raw category name into a table key: trimmed and
/// upper-cased.
#[must_use]
pub fn normalize_category(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Immutable mapping from normalized category name to [`CrimeSeverity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, CrimeSeverity>", into = "BTreeMap<String, CrimeSeverity>")]
pub struct SeverityTable {
    entries: BTreeMap<String, CrimeSeverity>,
}

impl SeverityTable {
    /// Builds a table from arbitrary entries, normalizing every key.
    #[must_use]
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, CrimeSeverity)>,
        K: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (normalize_category(k.as_ref()), v))
                .collect(),
        }
    }

    /// Looks up an already-normalized category name.
    #[must_use]
    pub fn get(&self, normalized: &str) -> Option<CrimeSeverity> {
        self.entries.get(normalized).copied()
    }

    /// Number of categories in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CrimeSeverity)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for SeverityTable {
    fn default() -> Self {
        Self::from_entries(DEFAULT_SEVERITIES.iter().copied())
    }
}

impl From<BTreeMap<String, CrimeSeverity>> for SeverityTable {
    fn from(entries: BTreeMap<String, CrimeSeverity>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<SeverityTable> for BTreeMap<String, CrimeSeverity> {
    fn from(table: SeverityTable) -> Self {
        table.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_every_entry() {
        let table = SeverityTable::default();
        assert_eq!(table.len(), DEFAULT_SEVERITIES.len());
        assert_eq!(table.get("HOMICIDE"), Some(CrimeSeverity::VeryHigh));
        assert_eq!(table.get("THEFT"), Some(CrimeSeverity::Low));
        assert_eq!(table.get("NON-CRIMINAL"), Some(CrimeSeverity::NonCriminal));
    }

    #[test]
    fn only_non_criminal_maps_to_zero() {
        let table = SeverityTable::default();
        let zeros: Vec<&str> = table
            .iter()
            .filter(|(_, s)| *s == CrimeSeverity::NonCriminal)
            .map(|(k, _)| k)
            .collect();
        assert_eq!(zeros, vec!["NON-CRIMINAL"]);
    }

    #[test]
    fn from_entries_normalizes_keys() {
        let table = SeverityTable::from_entries([("  robbery ", CrimeSeverity::High)]);
        assert_eq!(table.get("ROBBERY"), Some(CrimeSeverity::High));
        assert_eq!(table.get("robbery"), None);
    }

    #[test]
    fn deserializes_from_toml_table() {
        #[derive(Deserialize)]
        struct Wrapper {
            severity: SeverityTable,
        }

        let parsed: Wrapper = toml::from_str(
            r#"
            [severity]
            "theft" = 3
            "HOMICIDE" = 5
            "#,
        )
        .unwrap();
        assert_eq!(parsed.severity.get("THEFT"), Some(CrimeSeverity::Medium));
        assert_eq!(parsed.severity.len(), 2);
    }
}
