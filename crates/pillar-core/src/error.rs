//! Error types for pillar reward estimation.
use thiserror::Error;

/// Invalid simulator input. Not retried: the caller must supply a valid
/// producer set or horizon.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("need {required} active producers for the top tier, got {got}")]
    TooFewProducers { got: usize, required: usize },
    #[error("tier pool of {pool} producers cannot fill a panel of {panel}")]
    PoolTooSmall { pool: usize, panel: usize },
    #[error("simulation horizon must be a positive number of days, got {0}")]
    InvalidHorizon(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmissionError {
    #[error("day {elapsed_days} is in period {period}, schedule ends at period {last_period}")]
    OutOfRange { elapsed_days: u64, period: u64, last_period: u64 },
    #[error("invalid emission schedule: {0}")]
    InvalidSchedule(String),
    #[error("timestamp {0} is before genesis")]
    BeforeGenesis(i64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("holder balance must be a non-negative finite number, got {0}")]
    InvalidBalance(f64),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Emission(#[from] EmissionError),
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("rpc transport: {0}")]
    Transport(String),
    #[error("malformed pillar payload: {0}")]
    Malformed(String),
    #[error("snapshot: {0}")]
    Snapshot(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PillarError {
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Emission(#[from] EmissionError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
