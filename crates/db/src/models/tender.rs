//! Tender models.
//!
//! A tender is an identity row (`tenders`: id, owner organization, status)
//! plus an append-only chain of content snapshots (`tender_versions`). The
//! API-facing [`Tender`] struct is the identity row joined with its current
//! (max-version) content.

use procura_core::types::{DbId, Timestamp, VersionNumber};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tender with its current content: identity columns joined with the
/// max-version row of `tender_versions`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tender {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: String,
    pub organization_id: DbId,
    pub version: VersionNumber,
    pub created_at: Timestamp,
}

/// A row from the `tender_versions` table: one immutable content snapshot.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TenderVersion {
    pub id: DbId,
    pub tender_id: DbId,
    pub version: VersionNumber,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new tender (identity row + version 1).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTender {
    pub organization_id: DbId,
    pub name: String,
    pub description: String,
    pub service_type: String,
}

/// Partial content update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenderPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub service_type: Option<String>,
}
