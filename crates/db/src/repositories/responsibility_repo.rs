//! Repository for the `organization_responsibles` table, the backing
//! store of the Responsibility Resolver.
//!
//! The quorum engine asks two questions here: "is this employee responsible
//! for that organization" and "how many employees sit in this employee's
//! responsibility peer set".

use procura_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::OrganizationResponsible;

/// Provides persistence operations for responsibility assignments.
pub struct ResponsibilityRepo;

impl ResponsibilityRepo {
    /// Make an employee responsible for an organization.
    pub async fn assign(
        pool: &PgPool,
        organization_id: DbId,
        employee_id: DbId,
    ) -> Result<OrganizationResponsible, sqlx::Error> {
        sqlx::query_as::<_, OrganizationResponsible>(
            "INSERT INTO organization_responsibles (organization_id, employee_id)
             VALUES ($1, $2)
             RETURNING id, organization_id, employee_id, created_at",
        )
        .bind(organization_id)
        .bind(employee_id)
        .fetch_one(pool)
        .await
    }

    /// Whether the employee is responsible for the given organization.
    pub async fn is_responsible(
        pool: &PgPool,
        employee_id: DbId,
        organization_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM organization_responsibles
                 WHERE employee_id = $1 AND organization_id = $2
             )",
        )
        .bind(employee_id)
        .bind(organization_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Whether the employee is responsible for at least one organization.
    pub async fn is_responsible_for_any(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM organization_responsibles WHERE employee_id = $1
             )",
        )
        .bind(employee_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Size of the employee's responsibility peer set: the number of
    /// distinct employees (the given one included) responsible for at least
    /// one organization this employee is also responsible for.
    ///
    /// Runs inside the voting transaction so the quorum is computed against
    /// the same snapshot as the decision tally.
    pub async fn responsible_count_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        employee_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(DISTINCT employee_id)
             FROM organization_responsibles
             WHERE organization_id IN (
                 SELECT organization_id
                 FROM organization_responsibles
                 WHERE employee_id = $1
             )",
        )
        .bind(employee_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }
}
