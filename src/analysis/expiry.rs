//! Calendar expiry to year-fraction conversion

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{DAYS_PER_YEAR, MIN_TIME_TO_EXPIRY};

const SECONDS_PER_DAY: i64 = 86_400;

/// Time to expiry derived from a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpiryNormalization {
    /// Whole days between now and the start of the expiry date
    pub days_to_expiry: i64,
    /// Year fraction, never below one day
    pub time_to_expiry: f64,
    /// True when the expiry is today or in the past and the floor was used
    pub clamped: bool,
}

/// Convert an expiry date into a strictly positive year fraction.
///
/// The expiry counts from 00:00 on its date. Days are floored, so a partial
/// day left counts as zero and a partial day past counts as a whole day.
pub fn normalize(expiry: NaiveDate, now: NaiveDateTime) -> ExpiryNormalization {
    let expiry_start = expiry.and_time(NaiveTime::MIN);
    let days_to_expiry = (expiry_start - now).num_seconds().div_euclid(SECONDS_PER_DAY);

    if days_to_expiry <= 0 {
        tracing::warn!(
            %expiry,
            days_to_expiry,
            "option is expiring today or has expired, using minimum time value"
        );
        return ExpiryNormalization {
            days_to_expiry,
            time_to_expiry: MIN_TIME_TO_EXPIRY,
            clamped: true,
        };
    }

    ExpiryNormalization {
        days_to_expiry,
        time_to_expiry: days_to_expiry as f64 / DAYS_PER_YEAR,
        clamped: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_ten_days() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        let n = normalize(expiry, at(today, 0, 0));
        assert_eq!(n.days_to_expiry, 10);
        assert_eq!(n.time_to_expiry, 10.0 / 365.0);
        assert!(!n.clamped);
    }

    #[test]
    fn test_partial_day_truncates() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();

        // 9 days and 9 hours left
        let n = normalize(expiry, at(today, 15, 0));
        assert_eq!(n.days_to_expiry, 9);
        assert_eq!(n.time_to_expiry, 9.0 / 365.0);
    }

    #[test]
    fn test_expiring_today_is_clamped() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let n = normalize(today, at(today, 10, 30));
        assert_eq!(n.days_to_expiry, 0);
        assert_eq!(n.time_to_expiry, MIN_TIME_TO_EXPIRY);
        assert!(n.clamped);

        // Tomorrow, but less than a full day away
        let tomorrow = today.succ_opt().unwrap();
        let n = normalize(tomorrow, at(today, 16, 0));
        assert_eq!(n.days_to_expiry, 0);
        assert!(n.clamped);
    }

    #[test]
    fn test_expired_is_clamped() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        // 9 days and 12 hours past, floored
        let n = normalize(expiry, at(today, 12, 0));
        assert_eq!(n.days_to_expiry, -10);
        assert_eq!(n.time_to_expiry, 1.0 / 365.0);
        assert!(n.clamped);
    }

    #[test]
    fn test_past_partial_day_floors() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        let n = normalize(yesterday, at(today, 9, 30));
        assert_eq!(n.days_to_expiry, -2);
        assert!(n.clamped);

        // Exactly one day past stays at -1
        let n = normalize(yesterday, at(today, 0, 0));
        assert_eq!(n.days_to_expiry, -1);
    }
}
