//! Bid models.
//!
//! Mirrors the tender layout: an identity row (`bids`: parent tender,
//! author, status) plus the `bid_versions` content chain.

use procura_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bid with its current content: identity columns joined with the
/// max-version row of `bid_versions`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bid {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub status: String,
    pub tender_id: DbId,
    pub author_type: String,
    pub author_id: DbId,
    pub version: VersionNumber,
    pub created_at: Timestamp,
}

/// A row from the `bid_versions` table: one immutable content snapshot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BidVersion {
    pub id: DbId,
    pub bid_id: DbId,
    pub version: VersionNumber,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new bid (identity row + version 1).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBid {
    pub tender_id: DbId,
    pub author_type: String,
    pub author_id: DbId,
    pub name: String,
    pub description: String,
}

/// Partial content update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BidPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}
