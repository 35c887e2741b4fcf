//! Trait interfaces between the estimator and its collaborators.
//!
//! - [`EmissionSchedule`] — daily emission lookup (`emission::TableSchedule` implements)
//! - [`MomentumSimulator`] — tier win-rate estimation (pillar-sim implements)
//! - [`ProducerDirectory`] — pillar snapshot source (pillar-rpc implements)
//! - [`ReportSink`] — consumer of the ranked table (pillar-rpc implements)
//!
//! With the `mocks` feature, mockall doubles are generated for each trait.

use async_trait::async_trait;

use crate::error::{DirectoryError, EmissionError, ReportError, SimulationError};
use crate::types::{ProducerRecord, RewardTable, SimulationResult};

/// Network-wide daily emission as a function of days since genesis.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait EmissionSchedule: Send + Sync {
    /// Total ZNN emitted per day during the period containing `elapsed_days`.
    ///
    /// Fails with [`EmissionError::OutOfRange`] past the configured horizon.
    fn daily_emission(&self, elapsed_days: u64) -> Result<f64, EmissionError>;
}

/// Estimates expected momentum wins per day for each weight tier.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait MomentumSimulator: Send + Sync {
    /// `active_producers` counts pillars with a non-zero produced rate; the
    /// first [`TOP_TIER_SIZE`](crate::constants::TOP_TIER_SIZE) of them by
    /// weight form the top tier.
    fn simulate(&self, active_producers: usize) -> Result<SimulationResult, SimulationError>;
}

/// Source of the current pillar list.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProducerDirectory: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<ProducerRecord>, DirectoryError>;
}

/// Consumer of a finished reward table.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait ReportSink {
    fn write(&mut self, table: &RewardTable) -> Result<(), ReportError>;
}
