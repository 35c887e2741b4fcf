//! Closed-form expected wins per tier, used to cross-check the simulator.

use pillar_core::constants::{ALLOCATIONS_PER_DAY, PANEL_SIZE, TOP_TIER_SIZE};
use pillar_core::error::SimulationError;

use crate::committee::SelectionRule;

/// Expected momentum wins per day for one pillar of each tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierExpectation {
    pub top: f64,
    pub other: f64,
}

/// Per-slot win probability for a top-tier and an other-tier pillar.
///
/// With disjoint tiers these are `15/30` and `15/(active - 30)`. Under
/// spillover a top-tier pillar missed by panel one may still land in panel
/// two, drawn from `active - 15` candidates.
pub fn slot_win_probability(
    rule: SelectionRule,
    active: usize,
) -> Result<(f64, f64), SimulationError> {
    rule.validate(active)?;
    let panel = PANEL_SIZE as f64;
    let first = panel / TOP_TIER_SIZE as f64;
    let second = panel / rule.second_pool_size(active) as f64;
    Ok(match rule {
        SelectionRule::DisjointTiers => (first, second),
        SelectionRule::Spillover => (first + (1.0 - first) * second, second),
    })
}

/// Closed-form daily expectation for each tier.
pub fn expected_daily_wins(
    rule: SelectionRule,
    active: usize,
) -> Result<TierExpectation, SimulationError> {
    let (top, other) = slot_win_probability(rule, active)?;
    let slots = ALLOCATIONS_PER_DAY as f64;
    Ok(TierExpectation { top: top * slots, other: other * slots })
}
