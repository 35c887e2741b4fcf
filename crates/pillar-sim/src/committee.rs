//! Committee selection for a single allocation slot.
//!
//! Active pillars are indexed `0..active` in descending weight order, so
//! indices `0..TOP_TIER_SIZE` are the top tier. Each slot draws two panels of
//! [`PANEL_SIZE`] pillars, uniformly and without replacement, and the two
//! panels never share a member.

use pillar_core::constants::{PANEL_SIZE, TOP_TIER_SIZE};
use pillar_core::error::SimulationError;
use rand::seq::index;
use rand::Rng;

pub use pillar_core::types::SelectionRule;

/// Reusable per-slot committee sampler.
///
/// Holds scratch buffers so repeated draws over a long horizon do not
/// allocate.
#[derive(Debug, Clone)]
pub struct CommitteeSampler {
    rule: SelectionRule,
    active: usize,
    pool: Vec<usize>,
    chosen: Vec<bool>,
}

impl CommitteeSampler {
    pub fn new(rule: SelectionRule, active: usize) -> Result<Self, SimulationError> {
        rule.validate(active)?;
        Ok(Self {
            rule,
            active,
            pool: Vec::with_capacity(active),
            chosen: vec![false; active],
        })
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Draw one slot's committee into `committee` (cleared first).
    ///
    /// Panel one occupies `committee[..PANEL_SIZE]`, panel two the rest.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R, committee: &mut Vec<usize>) {
        committee.clear();
        committee.extend(index::sample(rng, TOP_TIER_SIZE, PANEL_SIZE).iter());

        match self.rule {
            SelectionRule::DisjointTiers => {
                let others = self.active - TOP_TIER_SIZE;
                committee.extend(
                    index::sample(rng, others, PANEL_SIZE)
                        .iter()
                        .map(|i| i + TOP_TIER_SIZE),
                );
            }
            SelectionRule::Spillover => {
                self.chosen.fill(false);
                for &i in committee.iter() {
                    self.chosen[i] = true;
                }
                self.pool.clear();
                self.pool.extend((0..self.active).filter(|&i| !self.chosen[i]));
                let picks = index::sample(rng, self.pool.len(), PANEL_SIZE);
                committee.extend(picks.iter().map(|i| self.pool[i]));
            }
        }
    }
}

/// Draw a single committee of `2 * PANEL_SIZE` distinct pillar indices.
pub fn draw_committee<R: Rng + ?Sized>(
    rng: &mut R,
    active: usize,
    rule: SelectionRule,
) -> Result<Vec<usize>, SimulationError> {
    let mut sampler = CommitteeSampler::new(rule, active)?;
    let mut committee = Vec::with_capacity(2 * PANEL_SIZE);
    sampler.draw(rng, &mut committee);
    Ok(committee)
}
