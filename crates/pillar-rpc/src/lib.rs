//! # pillar-rpc — Collaborator adapters for the reward estimator.
//!
//! # Modules
//!
//! - [`directory`] — JSON-RPC and snapshot `ProducerDirectory` implementations
//! - [`report`] — CSV, JSON and console `ReportSink` implementations
//! - [`config`] — layered `CalculatorConfig`

pub mod config;
pub mod directory;
pub mod report;

pub use config::CalculatorConfig;
pub use directory::{JsonRpcDirectory, StaticDirectory};
pub use report::{ConsoleReport, CsvReportSink, JsonReportSink};
