//! Shared fixtures for the integration tests.

use pillar_core::constants::WEIGHT_DIVISOR;
use pillar_core::types::ProducerRecord;
use pillar_rpc::directory::{PillarInfo, PillarPage, PillarStats, WireWeight};

/// A pillar holding `whole` ZNN, giving away half of both reward streams.
pub fn pillar(name: &str, whole: u64, produced: u64, expected: u64) -> ProducerRecord {
    ProducerRecord::new(name, 0.5, 0.5, produced, expected, whole * WEIGHT_DIVISOR)
}

/// `n` fully productive pillars with strictly descending weights.
///
/// `p000` is the heaviest at `n * 1000` ZNN; each next pillar holds 1000 less.
pub fn network(n: usize) -> Vec<ProducerRecord> {
    (0..n)
        .map(|i| pillar(&format!("p{i:03}"), (n - i) as u64 * 1_000, 10, 10))
        .collect()
}

/// Wire form of a record, as `embedded.pillar.getAll` reports it.
pub fn pillar_info(record: &ProducerRecord) -> PillarInfo {
    PillarInfo {
        name: record.name.clone(),
        give_momentum_reward_percentage: record.momentum_reward_share * 100.0,
        give_delegate_reward_percentage: record.delegate_reward_share * 100.0,
        current_stats: Some(PillarStats {
            produced_momentums: record.produced_momentums,
            expected_momentums: record.expected_momentums,
        }),
        weight: WireWeight::Text(record.raw_weight.to_string()),
    }
}

/// A saved `{count, list}` response holding `records`.
pub fn snapshot_json(records: &[ProducerRecord]) -> String {
    let page = PillarPage {
        count: records.len() as u64,
        list: records.iter().map(pillar_info).collect(),
    };
    serde_json::to_string_pretty(&page).unwrap_or_default()
}
