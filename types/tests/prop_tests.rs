use proptest::prelude::*;

use rebase_types::{AmountSpec, ChainSelector, Timestamp};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// elapsed_since never underflows and matches plain subtraction when ordered.
    #[test]
    fn elapsed_since_matches_subtraction(a in 0u64..1_000_000_000, d in 0u64..1_000_000_000) {
        let start = Timestamp::new(a);
        let end = Timestamp::new(a + d);
        prop_assert_eq!(start.elapsed_since(end), d);
        prop_assert_eq!(end.elapsed_since(start), 0);
    }

    /// Exact amounts resolve to themselves regardless of balance.
    #[test]
    fn exact_amount_resolves_to_itself(amount in any::<u128>(), balance in any::<u128>()) {
        prop_assert_eq!(AmountSpec::Exact(amount).resolve(balance), amount);
        prop_assert_eq!(AmountSpec::Full.resolve(balance), balance);
    }

    /// AmountSpec survives bincode encoding without collapsing Full into a number.
    #[test]
    fn amount_spec_bincode_roundtrip(amount in any::<u128>()) {
        for spec in [AmountSpec::Exact(amount), AmountSpec::Full] {
            let encoded = bincode::serialize(&spec).unwrap();
            let decoded: AmountSpec = bincode::deserialize(&encoded).unwrap();
            prop_assert_eq!(decoded, spec);
        }
    }

    /// ChainSelector ordering follows the raw selector.
    #[test]
    fn chain_selector_ordering(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(ChainSelector::new(a) < ChainSelector::new(b), a < b);
    }
}
