//! Governable settings and their validity ranges.
//!
//! Setting values live in the asset ledger; governance only decides which
//! value is written. A `SettingUpdate` proposal is rejected at creation time
//! unless its value lies inside the range below.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Every setting that can be changed by a `SettingUpdate` proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    // Fees (basis points)
    LiquidityFee,
    BurnFee,

    // Thresholds (whole token units)
    SwapLimit,
    RewardThreshold,
    LiquidityThreshold,

    // Limits (basis points)
    TransferLimit,
    VotingPowerCap,
    ProposalCost,

    // Taxes (basis points)
    CommunityTax,
    DeveloperTax,

    // Periods (blocks)
    CooldownMinBlock,
    VotingPeriod,
}

impl SettingKey {
    pub const ALL: [SettingKey; 12] = [
        Self::LiquidityFee,
        Self::BurnFee,
        Self::SwapLimit,
        Self::RewardThreshold,
        Self::LiquidityThreshold,
        Self::TransferLimit,
        Self::VotingPowerCap,
        Self::ProposalCost,
        Self::CommunityTax,
        Self::DeveloperTax,
        Self::CooldownMinBlock,
        Self::VotingPeriod,
    ];

    /// Human-readable name of this setting.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LiquidityFee => "liquidity_fee",
            Self::BurnFee => "burn_fee",
            Self::SwapLimit => "swap_limit",
            Self::RewardThreshold => "reward_threshold",
            Self::LiquidityThreshold => "liquidity_threshold",
            Self::TransferLimit => "transfer_limit",
            Self::VotingPowerCap => "voting_power_cap",
            Self::ProposalCost => "proposal_cost",
            Self::CommunityTax => "community_tax",
            Self::DeveloperTax => "developer_tax",
            Self::CooldownMinBlock => "cooldown_min_block",
            Self::VotingPeriod => "voting_period",
        }
    }

    /// Inclusive range of values a proposal may set.
    pub fn valid_range(&self) -> RangeInclusive<u128> {
        match self {
            Self::LiquidityFee => 10..=500,
            Self::BurnFee => 10..=300,
            Self::SwapLimit | Self::RewardThreshold | Self::LiquidityThreshold => {
                1_000_000..=1_000_000_000
            }
            Self::TransferLimit => 1..=1_000,
            Self::VotingPowerCap => 1..=4_000,
            Self::ProposalCost => 1..=100,
            Self::CommunityTax => 50..=500,
            Self::DeveloperTax => 1..=500,
            Self::CooldownMinBlock => 10..=100_000,
            Self::VotingPeriod => 10..=100_000_000,
        }
    }

    /// Whether `value` is an acceptable new value for this setting.
    pub fn accepts(&self, value: u128) -> bool {
        self.valid_range().contains(&value)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(SettingKey::LiquidityFee.accepts(10));
        assert!(SettingKey::LiquidityFee.accepts(500));
        assert!(!SettingKey::LiquidityFee.accepts(9));
        assert!(!SettingKey::LiquidityFee.accepts(501));
    }

    #[test]
    fn threshold_settings_share_a_range() {
        for key in [
            SettingKey::SwapLimit,
            SettingKey::RewardThreshold,
            SettingKey::LiquidityThreshold,
        ] {
            assert!(key.accepts(1_000_000));
            assert!(key.accepts(1_000_000_000));
            assert!(!key.accepts(999_999));
        }
    }

    #[test]
    fn voting_power_cap_tops_out_at_forty_percent() {
        assert!(SettingKey::VotingPowerCap.accepts(4_000));
        assert!(!SettingKey::VotingPowerCap.accepts(4_001));
        assert!(!SettingKey::VotingPowerCap.accepts(0));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = SettingKey::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SettingKey::ALL.len());
    }
}
