//! Simulator implementing the [`MomentumSimulator`] trait.
//!
//! Replays committee selection slot by slot over a multi-day horizon and
//! reports the mean daily wins of each tier. Longer horizons reduce the
//! sampling variance; results are always normalised to one day.

use pillar_core::constants::{
    DEFAULT_SIMULATION_DAYS, MOMENTUMS_PER_ALLOCATION, MOMENTUMS_PER_DAY, PANEL_SIZE, TOP_TIER_SIZE,
};
use pillar_core::error::SimulationError;
use pillar_core::traits::MomentumSimulator;
use pillar_core::types::SimulationResult;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::committee::{CommitteeSampler, SelectionRule};

/// Win counts accumulated over one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTally {
    /// Wins per active pillar, indexed in descending weight order.
    pub wins: Vec<u64>,
    /// Allocation slots simulated.
    pub slots: u64,
}

impl SlotTally {
    fn tier_total(&self, top: bool) -> (u64, usize) {
        let split = TOP_TIER_SIZE.min(self.wins.len());
        let tier = if top { &self.wins[..split] } else { &self.wins[split..] };
        (tier.iter().sum(), tier.len())
    }

    /// Mean daily wins of `(top, other)` tiers, untruncated.
    ///
    /// An empty tier reports 0.
    pub fn daily_means(&self, days: f64) -> (f64, f64) {
        let mean = |(total, len): (u64, usize)| {
            if len == 0 { 0.0 } else { total as f64 / len as f64 / days }
        };
        (mean(self.tier_total(true)), mean(self.tier_total(false)))
    }

    /// Truncate the daily means into a [`SimulationResult`].
    pub fn summarize(&self, days: f64) -> SimulationResult {
        let (top, other) = self.daily_means(days);
        SimulationResult {
            top_tier_daily_momentums: top as u64,
            other_tier_daily_momentums: other as u64,
            ..SimulationResult::default()
        }
    }
}

/// Monte-Carlo estimator of tier win rates.
///
/// - Horizon in days (fractional allowed)
/// - Optional seed; without one each call draws fresh entropy
/// - Pluggable [`SelectionRule`]
#[derive(Debug, Clone)]
pub struct MomentumAllocationSimulator {
    days: f64,
    seed: Option<u64>,
    rule: SelectionRule,
}

impl Default for MomentumAllocationSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATION_DAYS)
    }
}

impl MomentumAllocationSimulator {
    pub fn new(days: f64) -> Self {
        Self { days, seed: None, rule: SelectionRule::default() }
    }

    /// Fix the PRNG seed so every `simulate` call is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_rule(mut self, rule: SelectionRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn days(&self) -> f64 {
        self.days
    }

    pub fn rule(&self) -> SelectionRule {
        self.rule
    }

    /// Allocation slots covered by the horizon.
    pub fn slots(&self) -> Result<u64, SimulationError> {
        if !self.days.is_finite() || self.days <= 0.0 {
            return Err(SimulationError::InvalidHorizon(self.days));
        }
        let slots = (MOMENTUMS_PER_DAY as f64 * self.days / MOMENTUMS_PER_ALLOCATION as f64) as u64;
        if slots == 0 {
            return Err(SimulationError::InvalidHorizon(self.days));
        }
        Ok(slots)
    }

    /// Run the slot loop and return raw per-pillar win counts.
    pub fn run<R: Rng + ?Sized>(
        &self,
        active: usize,
        rng: &mut R,
    ) -> Result<SlotTally, SimulationError> {
        let slots = self.slots()?;
        let mut sampler = CommitteeSampler::new(self.rule, active)?;
        let mut wins = vec![0u64; active];
        let mut committee = Vec::with_capacity(2 * PANEL_SIZE);

        debug!(
            active,
            slots,
            days = self.days,
            rule = %self.rule,
            "simulating momentum allocation"
        );

        for _ in 0..slots {
            sampler.draw(rng, &mut committee);
            for &pillar in &committee {
                wins[pillar] += 1;
            }
        }

        Ok(SlotTally { wins, slots })
    }

    /// Simulate with a caller-supplied generator.
    pub fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        active: usize,
        rng: &mut R,
    ) -> Result<SimulationResult, SimulationError> {
        let tally = self.run(active, rng)?;
        let result = SimulationResult { rule: self.rule, ..tally.summarize(self.days) };
        debug!(
            top = result.top_tier_daily_momentums,
            other = result.other_tier_daily_momentums,
            "simulation finished"
        );
        Ok(result)
    }

    /// Simulate over the pillars flagged as having produced at least once.
    pub fn simulate_mask(
        &self,
        produced_mask: &[bool],
    ) -> Result<SimulationResult, SimulationError> {
        let active = produced_mask.iter().filter(|&&m| m).count();
        self.simulate(active)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl MomentumSimulator for MomentumAllocationSimulator {
    fn simulate(&self, active_producers: usize) -> Result<SimulationResult, SimulationError> {
        let mut rng = self.rng();
        self.simulate_with_rng(active_producers, &mut rng)
    }
}
