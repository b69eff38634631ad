//! Organization models, including the responsibility mapping consumed by
//! the quorum engine.

use procura_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new organization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub description: Option<String>,
}

/// A row from the `organization_responsibles` table: one employee
/// authorized to act on behalf of one organization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizationResponsible {
    pub id: DbId,
    pub organization_id: DbId,
    pub employee_id: DbId,
    pub created_at: Timestamp,
}
