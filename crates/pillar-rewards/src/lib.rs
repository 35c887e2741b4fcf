//! # pillar-rewards — Expected delegation rewards per pillar.
//!
//! Wires the [`MomentumSimulator`](pillar_core::traits::MomentumSimulator)
//! and [`EmissionSchedule`](pillar_core::traits::EmissionSchedule) traits
//! into a ranked per-holder reward table.
//!
//! # Modules
//!
//! - [`weight`] — holder-adjusted effective weights and ranking
//! - [`allocator`] — `RewardAllocator` and the reward formula

pub mod allocator;
pub mod weight;

pub use allocator::RewardAllocator;
pub use weight::{effective_weight, rank_by_weight, RankedProducer};
