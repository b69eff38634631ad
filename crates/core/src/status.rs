//! Entity status machines for tenders and bids.
//!
//! Both machines share the same shape: a `Created` draft state, a
//! `Published` public state, and a single terminal state (`Closed` for
//! tenders, `Canceled` for bids). Content edits are refused once the
//! terminal state is reached.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Tender
// ---------------------------------------------------------------------------

/// Lifecycle status of a tender: `Created -> Published -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenderStatus {
    Created,
    Published,
    Closed,
}

impl TenderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            TenderStatus::Created => "Created",
            TenderStatus::Published => "Published",
            TenderStatus::Closed => "Closed",
        }
    }

    /// `Closed` tenders accept no further edits or status changes.
    pub const fn is_terminal(self) -> bool {
        matches!(self, TenderStatus::Closed)
    }

    /// Whether `self -> target` is a legal transition.
    pub const fn can_transition(self, target: TenderStatus) -> bool {
        matches!(
            (self, target),
            (TenderStatus::Created, TenderStatus::Published)
                | (TenderStatus::Published, TenderStatus::Closed)
        )
    }
}

impl fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TenderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(TenderStatus::Created),
            "Published" => Ok(TenderStatus::Published),
            "Closed" => Ok(TenderStatus::Closed),
            other => Err(CoreError::Validation(format!(
                "Invalid tender status '{other}'. Must be one of: Created, Published, Closed"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Bid
// ---------------------------------------------------------------------------

/// Lifecycle status of a bid: `Created -> Published -> Canceled`.
///
/// A bid may stay `Published` indefinitely; only a rejection vote or an
/// explicit status update cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatus {
    Created,
    Published,
    Canceled,
}

impl BidStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            BidStatus::Created => "Created",
            BidStatus::Published => "Published",
            BidStatus::Canceled => "Canceled",
        }
    }

    /// `Canceled` bids accept no further edits or status changes.
    pub const fn is_terminal(self) -> bool {
        matches!(self, BidStatus::Canceled)
    }

    /// Whether `self -> target` is a legal transition.
    pub const fn can_transition(self, target: BidStatus) -> bool {
        matches!(
            (self, target),
            (BidStatus::Created, BidStatus::Published)
                | (BidStatus::Published, BidStatus::Canceled)
        )
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BidStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(BidStatus::Created),
            "Published" => Ok(BidStatus::Published),
            "Canceled" => Ok(BidStatus::Canceled),
            other => Err(CoreError::Validation(format!(
                "Invalid bid status '{other}'. Must be one of: Created, Published, Canceled"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
