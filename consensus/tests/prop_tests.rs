use proptest::prelude::*;

use agora_consensus::{ConsensusAuthority, ConsensusConfig, VoteHistory};
use agora_types::{Address, Capabilities, Role};

fn member(n: u8) -> Address {
    Address::new(format!("agr_member_{n}"))
}

#[derive(Clone, Debug)]
enum RegistryOp {
    Grant(u8),
    Revoke(u8),
    RevokeFounder,
    RevokeAll,
}

fn registry_op() -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        4 => (0u8..8).prop_map(RegistryOp::Grant),
        3 => (0u8..8).prop_map(RegistryOp::Revoke),
        1 => Just(RegistryOp::RevokeFounder),
        1 => Just(RegistryOp::RevokeAll),
    ]
}

proptest! {
    /// The founder stays seated and the count never drops below one,
    /// whatever sequence of grants and revokes is applied.
    #[test]
    fn founder_always_seated(ops in prop::collection::vec(registry_op(), 0..40)) {
        let founder = Address::new("agr_founder");
        let gov: Capabilities = Role::GovernanceAuthority.into();
        let mut authority = ConsensusAuthority::new(founder.clone(), ConsensusConfig::default());

        for op in ops {
            let _ = match op {
                RegistryOp::Grant(n) => authority.grant(gov, member(n)),
                RegistryOp::Revoke(n) => authority.revoke(gov, &member(n)),
                RegistryOp::RevokeFounder => {
                    prop_assert!(authority.revoke(gov, &founder).is_err());
                    Ok(())
                }
                RegistryOp::RevokeAll => authority.revoke_all(gov).map(|_| ()),
            };
            prop_assert!(authority.is_member(&founder));
            prop_assert!(authority.member_count() >= 1);
            prop_assert_eq!(authority.member_count(), authority.registry().members().len());
        }
    }

    /// After a purge every history is within bound and holds exactly the most
    /// recent entries in their original order.
    #[test]
    fn purge_keeps_most_recent_in_order(
        votes in prop::collection::vec((0u8..4, 0u64..1_000), 0..200),
        keep in 0usize..15,
    ) {
        let mut history = VoteHistory::new();
        let mut expected: Vec<Vec<u64>> = vec![Vec::new(); 4];
        for (who, id) in &votes {
            history.record(&member(*who), *id);
            expected[*who as usize].push(*id);
        }

        history.purge(keep);
        for (who, full) in expected.iter().enumerate() {
            let kept = history.history(&member(who as u8));
            prop_assert!(kept.len() <= keep);
            let start = full.len().saturating_sub(keep);
            prop_assert_eq!(&kept[..], &full[start..]);
        }

        // second pass is a no-op
        prop_assert_eq!(history.purge(keep), 0);
    }
}
