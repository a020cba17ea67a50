//! Thresholds over the live member count.
//!
//! None of these are snapshotted: callers pass the registry count at the
//! moment of the vote.

/// Strict majority needed to mark a proposal reviewed: `ceil((n + 1) / 2)`.
pub fn review_quorum(member_count: usize) -> usize {
    member_count / 2 + 1
}

/// Two-thirds supermajority for approval and execution votes.
///
/// A single-member body needs its one vote; larger bodies need
/// `floor(2n / 3)`.
pub fn supermajority(member_count: usize) -> usize {
    if member_count <= 1 {
        1
    } else {
        member_count * 2 / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_quorum_is_strict_majority() {
        assert_eq!(review_quorum(1), 1);
        assert_eq!(review_quorum(2), 2);
        assert_eq!(review_quorum(3), 2);
        assert_eq!(review_quorum(4), 3);
        assert_eq!(review_quorum(5), 3);
    }

    #[test]
    fn supermajority_has_single_member_fast_path() {
        assert_eq!(supermajority(0), 1);
        assert_eq!(supermajority(1), 1);
        assert_eq!(supermajority(2), 1);
        assert_eq!(supermajority(3), 2);
        assert_eq!(supermajority(6), 4);
        assert_eq!(supermajority(7), 4);
    }
}
