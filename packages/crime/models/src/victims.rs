//! Per-category victim impact profiles.
//!
//! A profile bounds how many victims an incident of that category involves
//! and how likely each victim is to suffer each kind of harm. The values are
//! a modelling assumption, not observed data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::severity::normalize_category;

/// Probability that a single victim suffers each kind of harm. The three
/// draws are independent, so the values do not need to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactProbabilities {
    /// Bodily harm.
    pub physical: f64,
    /// Fear, trauma, distress.
    pub psychological: f64,
    /// Loss of or damage to property.
    pub property: f64,
}

/// Victim count bounds and harm probabilities for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VictimProfile {
    /// Minimum number of victims (clamped to at least 1 when used).
    pub min_count: u32,
    /// Maximum number of victims (clamped to at least `min_count` when used).
    pub max_count: u32,
    /// Per-victim harm probabilities.
    pub probabilities: ImpactProbabilities,
}

impl VictimProfile {
    /// Profile used for categories absent from the table.
    pub const FALLBACK: Self = Self::new(1, 2, 0.1, 0.5, 0.4);

    /// Creates a profile.
    #[must_use]
    pub const fn new(
        min_count: u32,
        max_count: u32,
        physical: f64,
        psychological: f64,
        property: f64,
    ) -> Self {
        Self {
            min_count,
            max_count,
            probabilities: ImpactProbabilities {
                physical,
                psychological,
                property,
            },
        }
    }

    /// Returns `(min, max)` with `min >= 1` and `max >= min`.
    #[must_use]
    pub fn count_bounds(&self) -> (u32, u32) {
        let min = self.min_count.max(1);
        (min, self.max_count.max(min))
    }
}

const DEFAULT_PROFILES: &[(&str, VictimProfile)] = &[
    ("HOMICIDE", VictimProfile::new(1, 2, 0.95, 0.95, 0.1)),
    ("CRIMINAL SEXUAL ASSAULT", VictimProfile::new(1, 3, 0.8, 0.95, 0.05)),
    ("CRIM SEXUAL ASSAULT", VictimProfile::new(1, 3, 0.8, 0.95, 0.05)),
    ("HUMAN TRAFFICKING", VictimProfile::new(1, 4, 0.6, 0.95, 0.1)),
    ("KIDNAPPING", VictimProfile::new(1, 2, 0.4, 0.9, 0.05)),
    ("ROBBERY", VictimProfile::new(1, 2, 0.35, 0.6, 0.8)),
    ("WEAPONS VIOLATION", VictimProfile::new(1, 1, 0.25, 0.5, 0.05)),
    ("BATTERY", VictimProfile::new(1, 2, 0.8, 0.6, 0.1)),
    ("ASSAULT", VictimProfile::new(1, 2, 0.75, 0.6, 0.05)),
    ("OFFENSE INVOLVING CHILDREN", VictimProfile::new(1, 2, 0.5, 0.9, 0.05)),
    ("BURGLARY", VictimProfile::new(1, 2, 0.05, 0.4, 0.95)),
    ("MOTOR VEHICLE THEFT", VictimProfile::new(1, 1, 0.02, 0.1, 0.98)),
    ("CRIMINAL DAMAGE", VictimProfile::new(1, 1, 0.02, 0.3, 0.95)),
    ("NARCOTICS", VictimProfile::new(1, 1, 0.03, 0.2, 0.1)),
    ("PUBLIC PEACE VIOLATION", VictimProfile::new(1, 2, 0.05, 0.2, 0.1)),
    ("THEFT", VictimProfile::new(1, 1, 0.05, 0.2, 0.95)),
    ("DECEPTIVE PRACTICE", VictimProfile::new(1, 1, 0.0, 0.4, 0.8)),
    (
        "CONCEALED CARRY LICENSE VIOLATION",
        VictimProfile::new(1, 1, 0.1, 0.3, 0.05),
    ),
    ("CRIMINAL TRESPASS", VictimProfile::new(1, 1, 0.05, 0.3, 0.05)),
    (
        "INTERFERENCE WITH PUBLIC OFFICER",
        VictimProfile::new(1, 1, 0.2, 0.4, 0.05),
    ),
    ("SEX OFFENSE", VictimProfile::new(1, 2, 0.6, 0.9, 0.05)),
    ("LIQUOR LAW VIOLATION", VictimProfile::new(1, 1, 0.02, 0.2, 0.05)),
    ("ARSON", VictimProfile::new(1, 3, 0.25, 0.5, 0.9)),
    ("PROSTITUTION", VictimProfile::new(1, 1, 0.05, 0.2, 0.05)),
    ("INTIMIDATION", VictimProfile::new(1, 1, 0.02, 0.8, 0.01)),
    ("STALKING", VictimProfile::new(1, 1, 0.05, 0.85, 0.05)),
    ("GAMBLING", VictimProfile::new(1, 1, 0.0, 0.05, 0.05)),
    ("PUBLIC INDECENCY", VictimProfile::new(1, 1, 0.02, 0.3, 0.02)),
    ("OTHER NARCOTIC VIOLATION", VictimProfile::new(1, 1, 0.02, 0.2, 0.05)),
    ("OBSCENITY", VictimProfile::new(1, 1, 0.0, 0.4, 0.05)),
    ("NON-CRIMINAL", VictimProfile::new(1, 1, 0.0, 0.1, 0.0)),
    ("OTHER OFFENSE", VictimProfile::new(1, 1, 0.05, 0.4, 0.2)),
];

/// Immutable mapping from normalized category name to [`VictimProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, VictimProfile>", into = "BTreeMap<String, VictimProfile>")]
pub struct VictimProfileTable {
    entries: BTreeMap<String, VictimProfile>,
}

impl VictimProfileTable {
    /// Builds a table from arbitrary entries, normalizing every key.
    #[must_use]
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, VictimProfile)>,
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
    pub fn get(&self, normalized: &str) -> Option<&VictimProfile> {
        self.entries.get(normalized)
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
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VictimProfile)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for VictimProfileTable {
    fn default() -> Self {
        Self::from_entries(DEFAULT_PROFILES.iter().copied())
    }
}

impl From<BTreeMap<String, VictimProfile>> for VictimProfileTable {
    fn from(entries: BTreeMap<String, VictimProfile>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<VictimProfileTable> for BTreeMap<String, VictimProfile> {
    fn from(table: VictimProfileTable) -> Self {
        table.entries
    }
}
