//! Repository for the `organizations` table.

use procura_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{CreateOrganization, Organization};

/// Column list for `organizations` queries.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides persistence operations for organizations.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Create a new organization.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let query = format!(
            "INSERT INTO organizations (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find an organization by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
