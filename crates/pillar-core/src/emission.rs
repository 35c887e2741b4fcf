//! Emission schedule: daily ZNN issuance per 30-day period since genesis.
//!
//! Periods:
//! - Period 0 (days 0–29): 14,400 ZNN per day
//! - Period 1 (days 30–59): 8,640 ZNN per day
//! - …
//! - Period 11 (days 330–359): 4,320 ZNN per day
//! - Day 360 onward: undefined, lookups fail with
//!   [`EmissionError::OutOfRange`]
//!
//! The horizon is extended by loading a longer table (see
//! [`TableSchedule::from_json_file`]), never by clamping to the last rate.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::constants::{DAILY_EMISSION_PER_PERIOD, DAYS_PER_PERIOD, GENESIS_TIMESTAMP};
use crate::error::EmissionError;
use crate::traits::EmissionSchedule;

/// Which emission period a day since genesis falls in.
///
/// Period 0 spans days `[0, DAYS_PER_PERIOD)`, period 1 spans
/// `[DAYS_PER_PERIOD, 2 * DAYS_PER_PERIOD)`, etc.
pub fn period_index(elapsed_days: u64) -> u64 {
    elapsed_days / DAYS_PER_PERIOD
}

/// The first day of a given period.
pub fn period_start_day(period: u64) -> u64 {
    period.saturating_mul(DAYS_PER_PERIOD)
}

/// Whole days between genesis and `now`, truncated.
pub fn elapsed_days_between(
    genesis: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<u64, EmissionError> {
    if now < genesis {
        return Err(EmissionError::BeforeGenesis(now.timestamp()));
    }
    Ok((now - genesis).num_days() as u64)
}

/// Days since the network genesis as of `now`.
pub fn elapsed_days_since_genesis(now: DateTime<Utc>) -> Result<u64, EmissionError> {
    elapsed_days_between(genesis(), now)
}

/// The genesis instant.
pub fn genesis() -> DateTime<Utc> {
    DateTime::from_timestamp(GENESIS_TIMESTAMP, 0).unwrap_or_default()
}

/// Table-backed schedule: one daily amount per 30-day period.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchedule {
    daily_per_period: Vec<f64>,
}

impl Default for TableSchedule {
    fn default() -> Self {
        Self { daily_per_period: DAILY_EMISSION_PER_PERIOD.to_vec() }
    }
}

impl TableSchedule {
    /// Build a schedule from per-period daily amounts.
    ///
    /// Rejects an empty table and non-positive or non-finite entries.
    pub fn new(daily_per_period: Vec<f64>) -> Result<Self, EmissionError> {
        if daily_per_period.is_empty() {
            return Err(EmissionError::InvalidSchedule("table is empty".into()));
        }
        if let Some((i, v)) = daily_per_period
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v <= 0.0)
        {
            return Err(EmissionError::InvalidSchedule(format!(
                "period {i} has non-positive emission {v}"
            )));
        }
        Ok(Self { daily_per_period })
    }

    /// Load a JSON array of per-period daily amounts.
    pub fn from_json_file(path: &Path) -> Result<Self, EmissionError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EmissionError::InvalidSchedule(format!("{}: {e}", path.display())))?;
        let table: Vec<f64> = serde_json::from_str(&text)
            .map_err(|e| EmissionError::InvalidSchedule(format!("{}: {e}", path.display())))?;
        let schedule = Self::new(table)?;
        debug!(
            path = %path.display(),
            periods = schedule.periods(),
            last_day = schedule.last_defined_day(),
            "loaded emission schedule"
        );
        Ok(schedule)
    }

    /// Number of configured periods.
    pub fn periods(&self) -> usize {
        self.daily_per_period.len()
    }

    /// Last day covered by the table.
    pub fn last_defined_day(&self) -> u64 {
        period_start_day(self.periods() as u64) - 1
    }

    /// Days from `elapsed_days` until the next period begins.
    ///
    /// Returns `None` when the next period is beyond the table.
    pub fn days_until_next_period(&self, elapsed_days: u64) -> Option<u64> {
        let next = period_index(elapsed_days) + 1;
        if next >= self.periods() as u64 {
            return None;
        }
        Some(period_start_day(next) - elapsed_days)
    }
}

impl EmissionSchedule for TableSchedule {
    fn daily_emission(&self, elapsed_days: u64) -> Result<f64, EmissionError> {
        let period = period_index(elapsed_days);
        usize::try_from(period)
            .ok()
            .and_then(|i| self.daily_per_period.get(i))
            .copied()
            .ok_or(EmissionError::OutOfRange {
                elapsed_days,
                period,
                last_period: self.periods() as u64 - 1,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use std::io::Write;

    fn schedule() -> TableSchedule {
        TableSchedule::default()
    }

    // --- period_index ---

    #[test]
    fn last_day_of_first_period() {
        assert_eq!(period_index(29), 0);
    }

    #[test]
    fn first_day_of_second_period() {
        assert_eq!(period_index(30), 1);
    }

    #[test]
    fn one_year_is_period_twelve() {
        assert_eq!(period_index(365), 12);
    }

    // --- daily_emission ---

    #[test]
    fn emission_first_period() {
        assert_eq!(schedule().daily_emission(0).unwrap(), 14_400.0);
        assert_eq!(schedule().daily_emission(29).unwrap(), 14_400.0);
    }

    #[test]
    fn emission_second_period() {
        assert_eq!(schedule().daily_emission(30).unwrap(), 8_640.0);
    }

    #[test]
    fn emission_last_period() {
        let s = schedule();
        assert_eq!(s.daily_emission(s.last_defined_day()).unwrap(), 4_320.0);
        assert_eq!(s.last_defined_day(), 359);
    }

    #[test]
    fn emission_past_horizon_fails() {
        let err = schedule().daily_emission(365).unwrap_err();
        assert_eq!(
            err,
            EmissionError::OutOfRange { elapsed_days: 365, period: 12, last_period: 11 }
        );
    }

    #[test]
    fn emission_day_after_horizon_fails() {
        assert!(schedule().daily_emission(360).is_err());
    }

    #[test]
    fn emission_huge_day_fails() {
        assert!(schedule().daily_emission(u64::MAX).is_err());
    }

    // --- construction ---

    #[test]
    fn empty_table_rejected() {
        assert!(matches!(TableSchedule::new(vec![]), Err(EmissionError::InvalidSchedule(_))));
    }

    #[test]
    fn non_positive_entry_rejected() {
        assert!(TableSchedule::new(vec![10.0, 0.0]).is_err());
        assert!(TableSchedule::new(vec![10.0, -1.0]).is_err());
        assert!(TableSchedule::new(vec![f64::NAN]).is_err());
    }

    #[test]
    fn extended_table_covers_more_days() {
        let mut table = DAILY_EMISSION_PER_PERIOD.to_vec();
        table.push(2_000.0);
        let s = TableSchedule::new(table).unwrap();
        assert_eq!(s.daily_emission(365).unwrap(), 2_000.0);
    }

    #[test]
    fn load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[100, 50.5]").unwrap();
        let s = TableSchedule::from_json_file(file.path()).unwrap();
        assert_eq!(s.periods(), 2);
        assert_eq!(s.daily_emission(45).unwrap(), 50.5);
    }

    #[test]
    fn load_rejects_non_positive_period() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[100, 0]").unwrap();
        assert!(matches!(
            TableSchedule::from_json_file(file.path()),
            Err(EmissionError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn load_from_malformed_json_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"a table\"}}").unwrap();
        assert!(TableSchedule::from_json_file(file.path()).is_err());
    }

    // --- days_until_next_period ---

    #[test]
    fn days_until_next_period_mid_period() {
        assert_eq!(schedule().days_until_next_period(10), Some(20));
        assert_eq!(schedule().days_until_next_period(30), Some(30));
    }

    #[test]
    fn days_until_next_period_none_in_last_period() {
        assert_eq!(schedule().days_until_next_period(340), None);
    }

    // --- elapsed days ---

    #[test]
    fn elapsed_days_truncates() {
        let g = genesis();
        let now = g + chrono::Duration::hours(47);
        assert_eq!(elapsed_days_between(g, now).unwrap(), 1);
    }

    #[test]
    fn elapsed_days_at_genesis_is_zero() {
        assert_eq!(elapsed_days_since_genesis(genesis()).unwrap(), 0);
    }

    #[test]
    fn elapsed_days_before_genesis_fails() {
        let before = Utc.with_ymd_and_hms(2021, 11, 20, 0, 0, 0).unwrap();
        assert!(matches!(elapsed_days_since_genesis(before), Err(EmissionError::BeforeGenesis(_))));
    }

    #[test]
    fn elapsed_days_one_month() {
        let now = Utc.with_ymd_and_hms(2021, 12, 21, 12, 0, 0).unwrap();
        assert_eq!(elapsed_days_since_genesis(now).unwrap(), 30);
    }

    proptest! {
        #[test]
        fn emission_defined_iff_within_table(day in 0u64..1_000) {
            let s = schedule();
            prop_assert_eq!(s.daily_emission(day).is_ok(), day <= s.last_defined_day());
        }

        #[test]
        fn period_start_not_after_day(day in 0u64..1_000_000) {
            prop_assert!(period_start_day(period_index(day)) <= day);
        }
    }
}
