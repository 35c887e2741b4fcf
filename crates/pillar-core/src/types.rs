//! Data model: producer snapshots, simulator output, and the reward table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{PANEL_SIZE, TOP_TIER_SIZE, WEIGHT_DIVISOR};
use crate::error::SimulationError;

/// A pillar as reported by the producer directory at one point in time.
///
/// Reward shares are fractions in `[0, 1]`; conversion from the directory's
/// percentage scale is the directory adapter's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerRecord {
    pub name: String,
    /// Fraction of momentum rewards the pillar passes on to delegators.
    pub momentum_reward_share: f64,
    /// Fraction of delegation rewards the pillar passes on to delegators.
    pub delegate_reward_share: f64,
    pub produced_momentums: u64,
    pub expected_momentums: u64,
    /// Total weight in base units (own stake plus delegations).
    pub raw_weight: u64,
}

impl ProducerRecord {
    /// Weight in whole ZNN, rounded half-to-even.
    ///
    /// # Examples
    ///
    /// ```
    /// use pillar_core::types::ProducerRecord;
    /// let p = ProducerRecord::new("A", 1.0, 1.0, 0, 0, 250_000_000);
    /// assert_eq!(p.scaled_weight(), 2);
    /// ```
    pub fn scaled_weight(&self) -> u64 {
        let q = self.raw_weight / WEIGHT_DIVISOR;
        let r = self.raw_weight % WEIGHT_DIVISOR;
        let twice = 2 * r;
        if twice > WEIGHT_DIVISOR || (twice == WEIGHT_DIVISOR && q % 2 == 1) {
            q + 1
        } else {
            q
        }
    }

    /// Share of expected momentums actually produced.
    ///
    /// A pillar that was never asked to produce has a rate of 0.
    pub fn produced_rate(&self) -> f64 {
        if self.expected_momentums == 0 {
            return 0.0;
        }
        self.produced_momentums as f64 / self.expected_momentums as f64
    }

    /// Whether the pillar takes part in momentum allocation.
    pub fn is_active(&self) -> bool {
        self.produced_rate() > 0.0
    }

    /// Convenience constructor used heavily by tests and snapshot loaders.
    pub fn new(
        name: impl Into<String>,
        momentum_reward_share: f64,
        delegate_reward_share: f64,
        produced_momentums: u64,
        expected_momentums: u64,
        raw_weight: u64,
    ) -> Self {
        Self {
            name: name.into(),
            momentum_reward_share,
            delegate_reward_share,
            produced_momentums,
            expected_momentums,
            raw_weight,
        }
    }
}

/// Selection tier, a pure function of weight rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Top,
    Other,
}

impl Tier {
    /// Tier of a 1-based rank.
    ///
    /// # Examples
    ///
    /// ```
    /// use pillar_core::types::Tier;
    /// assert_eq!(Tier::from_rank(30), Tier::Top);
    /// assert_eq!(Tier::from_rank(31), Tier::Other);
    /// ```
    pub fn from_rank(rank: usize) -> Self {
        if rank <= TOP_TIER_SIZE {
            Tier::Top
        } else {
            Tier::Other
        }
    }
}

/// Where the second committee panel is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionRule {
    /// Panel one from the top tier, panel two from the other tier only.
    #[default]
    DisjointTiers,
    /// Panel two from every active pillar not already in panel one, so the
    /// unselected half of the top tier competes with the other tier.
    Spillover,
}

impl SelectionRule {
    /// Size of the pool the second panel is drawn from.
    pub fn second_pool_size(&self, active: usize) -> usize {
        match self {
            Self::DisjointTiers => active.saturating_sub(TOP_TIER_SIZE),
            Self::Spillover => active.saturating_sub(PANEL_SIZE),
        }
    }

    /// Check that both panels can be filled from `active` pillars.
    pub fn validate(&self, active: usize) -> Result<(), SimulationError> {
        if active < TOP_TIER_SIZE {
            return Err(SimulationError::TooFewProducers { got: active, required: TOP_TIER_SIZE });
        }
        let pool = self.second_pool_size(active);
        if pool < PANEL_SIZE {
            return Err(SimulationError::PoolTooSmall { pool, panel: PANEL_SIZE });
        }
        Ok(())
    }
}

impl fmt::Display for SelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisjointTiers => f.write_str("disjoint-tiers"),
            Self::Spillover => f.write_str("spillover"),
        }
    }
}

impl FromStr for SelectionRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disjoint-tiers" | "disjoint" => Ok(Self::DisjointTiers),
            "spillover" => Ok(Self::Spillover),
            other => Err(format!("unknown selection rule: {other}")),
        }
    }
}

/// Expected momentum wins per day for a pillar in each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    pub top_tier_daily_momentums: u64,
    pub other_tier_daily_momentums: u64,
    /// Committee rule the estimate was drawn under.
    #[serde(default)]
    pub rule: SelectionRule,
}

impl SimulationResult {
    pub fn for_tier(&self, tier: Tier) -> u64 {
        match tier {
            Tier::Top => self.top_tier_daily_momentums,
            Tier::Other => self.other_tier_daily_momentums,
        }
    }
}

/// One line of the reward table: a pillar and what delegating to it pays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRow {
    pub name: String,
    pub momentum_reward_share: f64,
    pub delegate_reward_share: f64,
    pub produced_momentums: u64,
    pub expected_momentums: u64,
    pub raw_weight: u64,
    /// Scaled weight plus the holder's balance (unless already delegated here).
    pub effective_weight: f64,
    pub rank: usize,
    pub tier: Tier,
    pub produced_rate: f64,
    /// Daily momentum wins expected for this pillar's tier.
    pub tier_expected_momentums: u64,
    pub momentum_reward: f64,
    pub delegation_reward: f64,
    pub total_reward: f64,
}

impl RewardRow {
    /// Daily reward as a percentage of the delegated balance.
    pub fn daily_yield_percent(&self, holder_balance: f64) -> f64 {
        if holder_balance <= 0.0 {
            return 0.0;
        }
        self.total_reward / holder_balance * 100.0
    }

    /// Daily yield extended linearly over a year.
    pub fn annual_yield_percent(&self, holder_balance: f64) -> f64 {
        self.daily_yield_percent(holder_balance) * 365.0
    }
}

/// Ranked reward rows together with the inputs that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    pub holder_balance: f64,
    pub elapsed_days: u64,
    pub daily_emission: f64,
    pub active_producers: usize,
    pub total_effective_weight: f64,
    pub simulation: SimulationResult,
    /// Sorted by `total_reward`, highest first.
    pub rows: Vec<RewardRow>,
}

impl RewardTable {
    pub fn best(&self) -> Option<&RewardRow> {
        self.rows.first()
    }

    pub fn find(&self, name: &str) -> Option<&RewardRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}
