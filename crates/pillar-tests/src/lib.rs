//! End-to-end test suite for the pillar reward estimator.
//!
//! Integration tests live under `tests/`; they drive snapshots through the
//! directory, simulator, allocator and report sinks together.

pub mod helpers;
