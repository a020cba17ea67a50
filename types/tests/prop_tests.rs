use proptest::prelude::*;

use agora_types::{bps_of, percent_of, BlockHeight, SettingKey};

proptest! {
    /// A basis-point share never exceeds the whole for bps <= 10_000.
    #[test]
    fn bps_share_bounded_by_total(amount in 0u128..u64::MAX as u128, bps in 0u128..=10_000) {
        let share = bps_of(amount, bps).unwrap();
        prop_assert!(share <= amount);
    }

    /// percent_of(x, 100) is the identity.
    #[test]
    fn full_percentage_is_identity(amount in 0u128..u64::MAX as u128) {
        prop_assert_eq!(percent_of(amount, 100), Some(amount));
    }

    /// Setting acceptance agrees with the declared inclusive range.
    #[test]
    fn setting_accepts_matches_range(idx in 0usize..12, value in 0u128..2_000_000_000) {
        let key = SettingKey::ALL[idx];
        let range = key.valid_range();
        prop_assert_eq!(key.accepts(value), *range.start() <= value && value <= *range.end());
    }

    /// has_elapsed agrees with manual arithmetic.
    #[test]
    fn height_has_elapsed(base in 0u64..1_000_000, period in 0u64..1_000_000, now in 0u64..3_000_000) {
        let h = BlockHeight::new(base);
        prop_assert_eq!(h.has_elapsed(period, BlockHeight::new(now)), now >= base + period);
    }
}
