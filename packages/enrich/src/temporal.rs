//! Hour and period-of-day extraction.

use chrono::{NaiveDateTime, Timelike as _};
use city_safety_crime_models::TimePeriod;

/// Hour of day and its period bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalClass {
    /// Hour 0-23, absent when the record has no timestamp.
    pub hour: Option<u32>,
    /// Period bucket; `Unknown` exactly when `hour` is absent.
    pub period: TimePeriod,
}

/// Classifies an optional timestamp.
#[must_use]
pub fn classify(occurred_at: Option<&NaiveDateTime>) -> TemporalClass {
    occurred_at.map_or(
        TemporalClass {
            hour: None,
            period: TimePeriod::Unknown,
        },
        |ts| {
            let hour = ts.hour();
            TemporalClass {
                hour: Some(hour),
                period: TimePeriod::from_hour(hour),
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn classifies_band_edges() {
        let cases = [
            (0, TimePeriod::Night),
            (4, TimePeriod::Night),
            (5, TimePeriod::Morning),
            (11, TimePeriod::Morning),
            (12, TimePeriod::Afternoon),
            (16, TimePeriod::Afternoon),
            (17, TimePeriod::Evening),
            (21, TimePeriod::Evening),
            (22, TimePeriod::Night),
            (23, TimePeriod::Night),
        ];
        for (hour, expected) in cases {
            let class = classify(Some(&at(hour, 30)));
            assert_eq!(class.hour, Some(hour));
            assert_eq!(class.period, expected, "hour {hour}");
        }
    }

    #[test]
    fn missing_timestamp_is_unknown() {
        let class = classify(None);
        assert_eq!(class.hour, None);
        assert_eq!(class.period, TimePeriod::Unknown);
    }
}
