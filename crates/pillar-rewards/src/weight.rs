//! Effective weights and weight ranking.
//!
//! The holder's balance is added to every pillar except the one they already
//! delegate to, whose reported weight already contains it.

use pillar_core::types::{ProducerRecord, Tier};

/// A producer with its holder-adjusted weight and 1-based rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedProducer<'a> {
    pub record: &'a ProducerRecord,
    pub effective_weight: f64,
    pub rank: usize,
}

impl RankedProducer<'_> {
    pub fn tier(&self) -> Tier {
        Tier::from_rank(self.rank)
    }
}

/// Scaled weight plus the holder's balance, unless the holder already
/// delegates to `record`.
pub fn effective_weight(
    record: &ProducerRecord,
    holder_balance: f64,
    currently_delegated_to: &str,
) -> f64 {
    let scaled = record.scaled_weight() as f64;
    if !currently_delegated_to.is_empty() && record.name == currently_delegated_to {
        scaled
    } else {
        scaled + holder_balance
    }
}

/// Sort producers by effective weight, highest first, and assign ranks.
///
/// The sort is stable: equal weights keep their input order.
pub fn rank_by_weight<'a>(
    producers: &'a [ProducerRecord],
    holder_balance: f64,
    currently_delegated_to: &str,
) -> Vec<RankedProducer<'a>> {
    let mut ranked: Vec<RankedProducer<'a>> = producers
        .iter()
        .map(|record| RankedProducer {
            record,
            effective_weight: effective_weight(record, holder_balance, currently_delegated_to),
            rank: 0,
        })
        .collect();

    ranked.sort_by(|a, b| b.effective_weight.total_cmp(&a.effective_weight));
    for (i, r) in ranked.iter_mut().enumerate() {
        r.rank = i + 1;
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillar_core::constants::WEIGHT_DIVISOR;
    use proptest::prelude::*;

    fn p(name: &str, whole: u64) -> ProducerRecord {
        ProducerRecord::new(name, 0.5, 0.5, 10, 10, whole * WEIGHT_DIVISOR)
    }

    #[test]
    fn balance_added_when_not_delegated() {
        assert_eq!(effective_weight(&p("A", 1000), 100.0, ""), 1100.0);
        assert_eq!(effective_weight(&p("A", 1000), 100.0, "B"), 1100.0);
    }

    #[test]
    fn balance_not_added_to_current_pillar() {
        assert_eq!(effective_weight(&p("A", 1000), 100.0, "A"), 1000.0);
    }

    #[test]
    fn empty_name_never_matches() {
        assert_eq!(effective_weight(&p("", 10), 5.0, ""), 15.0);
    }

    #[test]
    fn ranks_descending() {
        let producers = vec![p("C", 100), p("A", 1000), p("B", 500)];
        let ranked = rank_by_weight(&producers, 100.0, "");
        let names: Vec<_> = ranked.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(ranked.iter().map(|r| r.rank).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(ranked[0].effective_weight, 1100.0);
    }

    #[test]
    fn ties_keep_input_order() {
        let producers = vec![p("first", 10), p("second", 10), p("third", 10)];
        let ranked = rank_by_weight(&producers, 0.0, "");
        let names: Vec<_> = ranked.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn current_pillar_can_lose_rank() {
        // Holder's balance lifts B above A, which already counts it.
        let producers = vec![p("A", 1000), p("B", 950)];
        let ranked = rank_by_weight(&producers, 100.0, "A");
        assert_eq!(ranked[0].record.name, "B");
        assert_eq!(ranked[0].effective_weight, 1050.0);
        assert_eq!(ranked[1].effective_weight, 1000.0);
    }

    #[test]
    fn tier_follows_rank() {
        let producers: Vec<_> = (0..35).map(|i| p(&format!("p{i}"), 1000 - i)).collect();
        let ranked = rank_by_weight(&producers, 0.0, "");
        assert_eq!(ranked[29].tier(), Tier::Top);
        assert_eq!(ranked[30].tier(), Tier::Other);
    }

    proptest! {
        #[test]
        fn ranks_are_a_permutation(
            weights in proptest::collection::vec(0u64..1_000_000, 0..80),
            balance in 0.0f64..10_000.0,
        ) {
            let producers: Vec<_> =
                weights.iter().enumerate().map(|(i, &w)| p(&format!("p{i}"), w)).collect();
            let ranked = rank_by_weight(&producers, balance, "p0");
            let mut ranks: Vec<_> = ranked.iter().map(|r| r.rank).collect();
            ranks.sort_unstable();
            prop_assert_eq!(ranks, (1..=producers.len()).collect::<Vec<_>>());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].effective_weight >= pair[1].effective_weight);
            }
        }

        #[test]
        fn effective_weight_at_least_scaled(
            whole in 0u64..1_000_000,
            balance in 0.0f64..1e6,
            delegated in any::<bool>(),
        ) {
            let rec = p("X", whole);
            let current = if delegated { "X" } else { "" };
            prop_assert!(effective_weight(&rec, balance, current) >= rec.scaled_weight() as f64);
        }
    }
}
