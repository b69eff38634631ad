//! Decision vocabulary and quorum arithmetic for bid voting.
//!
//! A single rejection cancels a bid outright; approvals close the parent
//! tender once they exceed the quorum. The tally logic is pure so it can be
//! exercised without a database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Wire literal for an approving vote.
pub const DECISION_APPROVED: &str = "Approved";

/// Wire literal for a rejecting vote.
pub const DECISION_REJECTED: &str = "Rejected";

/// All valid decision literals.
pub const VALID_DECISIONS: &[&str] = &[DECISION_APPROVED, DECISION_REJECTED];

/// System-wide ceiling on the approval quorum. The effective quorum for a
/// vote is `min(responsible_count, DECISION_QUORUM_CAP)`, and a tender
/// closes only when the approval count strictly exceeds it. Fixed by
/// product decision; not configurable.
pub const DECISION_QUORUM_CAP: i64 = 3;

/// A single voter's decision on a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionValue {
    Approved,
    Rejected,
}

impl DecisionValue {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionValue::Approved => DECISION_APPROVED,
            DecisionValue::Rejected => DECISION_REJECTED,
        }
    }
}

impl fmt::Display for DecisionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionValue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DECISION_APPROVED => Ok(DecisionValue::Approved),
            DECISION_REJECTED => Ok(DecisionValue::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid decision '{other}'. Must be one of: {}",
                VALID_DECISIONS.join(", ")
            ))),
        }
    }
}

/// Vote counts for one bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub approve_count: i64,
    pub reject_count: i64,
}

/// Outcome of evaluating a tally against the quorum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyOutcome {
    /// At least one rejection: the bid is canceled regardless of approvals.
    CancelBid,
    /// Approvals strictly exceed the quorum: the parent tender closes.
    CloseTender,
    /// Neither threshold reached; statuses stay as they are.
    NoChange,
}

/// Effective quorum for a voter whose responsibility peer set has
/// `responsible_count` members.
pub fn quorum(responsible_count: i64) -> i64 {
    responsible_count.min(DECISION_QUORUM_CAP)
}

/// Evaluate a tally. Rejection dominates: any rejection cancels the bid
/// even when the approvals would otherwise close the tender.
pub fn resolve_tally(tally: Tally, quorum: i64) -> TallyOutcome {
    if tally.reject_count > 0 {
        TallyOutcome::CancelBid
    } else if tally.approve_count > quorum {
        TallyOutcome::CloseTender
    } else {
        TallyOutcome::NoChange
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(approve_count: i64, reject_count: i64) -> Tally {
        Tally {
            approve_count,
            reject_count,
        }
    }

    // -- literals ------------------------------------------------------------

    #[test]
    fn valid_literals_parse() {
        assert_eq!(
            "Approved".parse::<DecisionValue>().unwrap(),
            DecisionValue::Approved
        );
        assert_eq!(
            "Rejected".parse::<DecisionValue>().unwrap(),
            DecisionValue::Rejected
        );
    }

    #[test]
    fn unknown_literal_rejected() {
        assert!("approve".parse::<DecisionValue>().is_err());
        assert!("APPROVED".parse::<DecisionValue>().is_err());
        assert!("".parse::<DecisionValue>().is_err());
    }

    #[test]
    fn literal_round_trip() {
        for value in [DecisionValue::Approved, DecisionValue::Rejected] {
            assert_eq!(value.as_str().parse::<DecisionValue>().unwrap(), value);
        }
    }

    // -- quorum --------------------------------------------------------------

    #[test]
    fn quorum_is_capped_at_three() {
        assert_eq!(quorum(1), 1);
        assert_eq!(quorum(2), 2);
        assert_eq!(quorum(3), 3);
        assert_eq!(quorum(50), 3);
    }

    // -- tally ---------------------------------------------------------------

    #[test]
    fn rejection_dominates_any_approval_count() {
        assert_eq!(resolve_tally(tally(0, 1), 3), TallyOutcome::CancelBid);
        assert_eq!(resolve_tally(tally(10, 1), 3), TallyOutcome::CancelBid);
    }

    #[test]
    fn closure_requires_strictly_more_than_quorum() {
        // quorum = 2: the 2nd approval does not close, the 3rd does.
        assert_eq!(resolve_tally(tally(2, 0), 2), TallyOutcome::NoChange);
        assert_eq!(resolve_tally(tally(3, 0), 2), TallyOutcome::CloseTender);
    }

    #[test]
    fn no_votes_changes_nothing() {
        assert_eq!(resolve_tally(tally(0, 0), 3), TallyOutcome::NoChange);
    }

    #[test]
    fn capped_quorum_boundary() {
        // Large peer set: cap keeps the quorum at 3, so 4 approvals close.
        let q = quorum(100);
        assert_eq!(resolve_tally(tally(3, 0), q), TallyOutcome::NoChange);
        assert_eq!(resolve_tally(tally(4, 0), q), TallyOutcome::CloseTender);
    }
}
