//! Bid decision models.

use procura_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bid_decisions` table: one voter's current decision on a
/// bid. At most one row exists per (bid, voter); a repeat vote overwrites.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BidDecision {
    pub id: DbId,
    pub bid_id: DbId,
    pub voter_id: DbId,
    pub decision: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Approve/reject counts for one bid.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct DecisionTally {
    pub approve_count: i64,
    pub reject_count: i64,
}
