//! # pillar-sim — Momentum allocation simulator.
//!
//! Estimates how many momentums a pillar in each weight tier produces per
//! day under the network's pseudo-random committee selection:
//! - **Committee draw**: each allocation slot picks 15 pillars from the top 30
//!   by weight and 15 more from the rest, with no overlap.
//! - **Monte-Carlo horizon**: slots are replayed over several days and the
//!   tier means normalised to a single day.
//! - **Closed form**: the analytic expectation the estimate is checked against.

pub mod analytic;
pub mod committee;
pub mod engine;

pub use analytic::{expected_daily_wins, TierExpectation};
pub use committee::{draw_committee, CommitteeSampler, SelectionRule};
pub use engine::{MomentumAllocationSimulator, SlotTally};
