//! Category to severity classification.

use city_safety_crime_models::CrimeSeverity;
use city_safety_crime_models::severity::{SeverityTable, normalize_category};

/// Result of looking a category up in a [`SeverityTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityLookup {
    /// The category was in the table.
    Matched(CrimeSeverity),
    /// The category was unknown or empty; [`CrimeSeverity::DEFAULT`] applies.
    Defaulted,
}

impl SeverityLookup {
    /// The effective severity.
    #[must_use]
    pub const fn severity(self) -> CrimeSeverity {
        match self {
            Self::Matched(severity) => severity,
            Self::Defaulted => CrimeSeverity::DEFAULT,
        }
    }

    /// Returns `true` if the category was not in the table.
    #[must_use]
    pub const fn is_defaulted(self) -> bool {
        matches!(self, Self::Defaulted)
    }
}

/// Looks up `category` after trimming and upper-casing it.
#[must_use]
pub fn classify(category: &str, table: &SeverityTable) -> SeverityLookup {
    table
        .get(&normalize_category(category))
        .map_or(SeverityLookup::Defaulted, SeverityLookup::Matched)
}
