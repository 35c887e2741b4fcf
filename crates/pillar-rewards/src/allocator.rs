//! Reward allocation: what a holder can expect per day from each pillar.
//!
//! Two reward streams are estimated per pillar:
//! - **Momentum rewards**: half of the daily emission is paid per produced
//!   momentum. A pillar's share follows its tier's expected wins, scaled by
//!   its produced rate and the cut it passes on, split pro rata by weight.
//! - **Delegation rewards**: 24% of the daily emission is split by weight
//!   across all delegations, scaled by the pillar's delegate share.

use pillar_core::constants::{DELEGATION_REWARD_FRACTION, MOMENTUMS_PER_DAY, PILLAR_REWARD_FRACTION};
use pillar_core::error::AllocationError;
use pillar_core::traits::{EmissionSchedule, MomentumSimulator};
use pillar_core::types::{ProducerRecord, RewardRow, RewardTable, SimulationResult};
use tracing::{debug, info, warn};

use crate::weight::rank_by_weight;

/// Combines a pillar snapshot with a simulator and an emission schedule.
///
/// Pure apart from the two collaborator calls; inputs are never mutated and
/// the same allocator can be reused for many balances.
#[derive(Debug, Clone)]
pub struct RewardAllocator<S, E> {
    simulator: S,
    schedule: E,
    elapsed_days: u64,
}

impl<S: MomentumSimulator, E: EmissionSchedule> RewardAllocator<S, E> {
    /// `elapsed_days` is the number of whole days since genesis used for the
    /// emission lookup.
    pub fn new(simulator: S, schedule: E, elapsed_days: u64) -> Self {
        Self { simulator, schedule, elapsed_days }
    }

    pub fn elapsed_days(&self) -> u64 {
        self.elapsed_days
    }

    /// Ranked reward rows, highest total first.
    pub fn allocate(
        &self,
        producers: &[ProducerRecord],
        holder_balance: f64,
        currently_delegated_to: &str,
    ) -> Result<Vec<RewardRow>, AllocationError> {
        Ok(self.allocate_table(producers, holder_balance, currently_delegated_to)?.rows)
    }

    /// Ranked reward rows together with the run summary.
    pub fn allocate_table(
        &self,
        producers: &[ProducerRecord],
        holder_balance: f64,
        currently_delegated_to: &str,
    ) -> Result<RewardTable, AllocationError> {
        if !holder_balance.is_finite() || holder_balance < 0.0 {
            return Err(AllocationError::InvalidBalance(holder_balance));
        }
        if producers.is_empty() {
            return Ok(RewardTable {
                holder_balance,
                elapsed_days: self.elapsed_days,
                daily_emission: 0.0,
                active_producers: 0,
                total_effective_weight: 0.0,
                simulation: SimulationResult::default(),
                rows: Vec::new(),
            });
        }
        if !currently_delegated_to.is_empty()
            && !producers.iter().any(|p| p.name == currently_delegated_to)
        {
            warn!(
                pillar = currently_delegated_to,
                "current pillar not found; balance added to every pillar"
            );
        }

        let ranked = rank_by_weight(producers, holder_balance, currently_delegated_to);
        let total_effective_weight: f64 = ranked.iter().map(|r| r.effective_weight).sum();
        let active_producers = producers.iter().filter(|p| p.is_active()).count();

        let simulation = self.simulator.simulate(active_producers)?;
        let daily_emission = self.schedule.daily_emission(self.elapsed_days)?;
        let per_momentum_reward =
            daily_emission * PILLAR_REWARD_FRACTION / MOMENTUMS_PER_DAY as f64;
        let delegation_pool = daily_emission * DELEGATION_REWARD_FRACTION;

        info!(
            producers = producers.len(),
            active_producers,
            total_effective_weight,
            daily_emission,
            "allocating rewards"
        );
        debug!(?simulation, per_momentum_reward, "tier win rates");

        let mut rows: Vec<RewardRow> = ranked
            .iter()
            .map(|r| {
                let p = r.record;
                let tier = r.tier();
                let produced_rate = p.produced_rate();
                let tier_expected_momentums = simulation.for_tier(tier);

                let holder_fraction = share(holder_balance, r.effective_weight);
                let momentum_reward = tier_expected_momentums as f64
                    * produced_rate
                    * per_momentum_reward
                    * p.momentum_reward_share
                    * holder_fraction;
                let delegation_reward = delegation_pool
                    * share(holder_balance, total_effective_weight)
                    * p.delegate_reward_share;

                RewardRow {
                    name: p.name.clone(),
                    momentum_reward_share: p.momentum_reward_share,
                    delegate_reward_share: p.delegate_reward_share,
                    produced_momentums: p.produced_momentums,
                    expected_momentums: p.expected_momentums,
                    raw_weight: p.raw_weight,
                    effective_weight: r.effective_weight,
                    rank: r.rank,
                    tier,
                    produced_rate,
                    tier_expected_momentums,
                    momentum_reward,
                    delegation_reward,
                    total_reward: momentum_reward + delegation_reward,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.total_reward.total_cmp(&a.total_reward));

        Ok(RewardTable {
            holder_balance,
            elapsed_days: self.elapsed_days,
            daily_emission,
            active_producers,
            total_effective_weight,
            simulation,
            rows,
        })
    }
}

/// `part / whole`, or 0 when `whole` is 0.
fn share(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { part / whole } else { 0.0 }
}
