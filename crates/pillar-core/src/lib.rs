//! # pillar-core
//! Foundation types, constants, emission schedule and collaborator traits for
//! estimating pillar delegation rewards.

pub mod constants;
pub mod emission;
pub mod error;
pub mod traits;
pub mod types;
