//! Repository for the `tenders` identity table and its `tender_versions`
//! content chain.
//!
//! Version writers are single `INSERT ... SELECT` statements whose computed
//! `version` is guarded by `uq_tender_versions_tender_version`; a concurrent
//! writer loses with a unique violation and the service layer retries.

use procura_core::types::{DbId, Timestamp, VersionNumber};
use sqlx::PgPool;

use crate::models::tender::{CreateTender, Tender, TenderPatch, TenderVersion};

/// Column list for the identity-joined-with-current-content view.
const COLUMNS: &str = "t.id, v.name, v.description, v.service_type, t.status, \
    t.organization_id, v.version, t.created_at";

/// Column list for `tender_versions` queries.
const VERSION_COLUMNS: &str =
    "id, tender_id, version, name, description, service_type, created_at";

/// Provides persistence operations for tenders and their version chain.
pub struct TenderRepo;

impl TenderRepo {
    /// Create a tender: identity row plus content version 1, in one
    /// transaction.
    pub async fn create(pool: &PgPool, input: &CreateTender) -> Result<Tender, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id, status, created_at): (DbId, String, Timestamp) = sqlx::query_as(
            "INSERT INTO tenders (organization_id) VALUES ($1) \
             RETURNING id, status, created_at",
        )
        .bind(input.organization_id)
        .fetch_one(&mut *tx)
        .await?;

        let (version,): (VersionNumber,) = sqlx::query_as(
            "INSERT INTO tender_versions (tender_id, version, name, description, service_type) \
             VALUES ($1, 1, $2, $3, $4) \
             RETURNING version",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.service_type)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Tender {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            service_type: input.service_type.clone(),
            status,
            organization_id: input.organization_id,
            version,
            created_at,
        })
    }

    /// Fetch a tender joined with its current (max-version) content.
    pub async fn find_latest(pool: &PgPool, tender_id: DbId) -> Result<Option<Tender>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM tenders t
             JOIN tender_versions v ON v.tender_id = t.id
             WHERE t.id = $1
             ORDER BY v.version DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Tender>(&query)
            .bind(tender_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a specific content version of a tender.
    pub async fn find_version(
        pool: &PgPool,
        tender_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<TenderVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM tender_versions
             WHERE tender_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, TenderVersion>(&query)
            .bind(tender_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// List all content versions of a tender, newest first.
    pub async fn list_versions(
        pool: &PgPool,
        tender_id: DbId,
    ) -> Result<Vec<TenderVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM tender_versions
             WHERE tender_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, TenderVersion>(&query)
            .bind(tender_id)
            .fetch_all(pool)
            .await
    }

    /// Append version N+1 overlaying the present patch fields onto the
    /// current content. Returns `None` when the tender has no versions.
    pub async fn patch(
        pool: &PgPool,
        tender_id: DbId,
        patch: &TenderPatch,
    ) -> Result<Option<Tender>, sqlx::Error> {
        let query = format!(
            "WITH current AS (
                 SELECT tender_id, version, name, description, service_type
                 FROM tender_versions
                 WHERE tender_id = $1
                 ORDER BY version DESC
                 LIMIT 1
             )
             INSERT INTO tender_versions (tender_id, version, name, description, service_type)
             SELECT
                 tender_id,
                 version + 1,
                 COALESCE($2, name),
                 COALESCE($3, description),
                 COALESCE($4, service_type)
             FROM current
             RETURNING {VERSION_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, TenderVersion>(&query)
            .bind(tender_id)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(&patch.service_type)
            .fetch_optional(pool)
            .await?;

        match inserted {
            None => Ok(None),
            Some(_) => Self::find_latest(pool, tender_id).await,
        }
    }

    /// Append version N+1 whose content fields are copied verbatim from
    /// `target_version`. The version counter always advances; history never
    /// shrinks. Returns `None` when `target_version` does not exist.
    pub async fn rollback(
        pool: &PgPool,
        tender_id: DbId,
        target_version: VersionNumber,
    ) -> Result<Option<Tender>, sqlx::Error> {
        let query = format!(
            "WITH target AS (
                 SELECT tender_id, name, description, service_type
                 FROM tender_versions
                 WHERE tender_id = $1 AND version = $2
             ),
             current_max AS (
                 SELECT MAX(version) AS version
                 FROM tender_versions
                 WHERE tender_id = $1
             )
             INSERT INTO tender_versions (tender_id, version, name, description, service_type)
             SELECT t.tender_id, m.version + 1, t.name, t.description, t.service_type
             FROM target t, current_max m
             RETURNING {VERSION_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, TenderVersion>(&query)
            .bind(tender_id)
            .bind(target_version)
            .fetch_optional(pool)
            .await?;

        match inserted {
            None => Ok(None),
            Some(_) => Self::find_latest(pool, tender_id).await,
        }
    }

    /// Compare-and-set status update. Returns `true` when the row was in
    /// `expected` and is now `target`; `false` when the identity row is
    /// absent or its status changed underneath the caller.
    pub async fn transition_status(
        pool: &PgPool,
        tender_id: DbId,
        expected: &str,
        target: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tenders SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(tender_id)
        .bind(expected)
        .bind(target)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// [`Self::transition_status`] within an existing transaction. Used by
    /// the quorum engine to close a tender atomically with the vote.
    pub async fn transition_status_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        tender_id: DbId,
        expected: &str,
        target: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tenders SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(tender_id)
        .bind(expected)
        .bind(target)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
