//! Repository for the `bids` identity table and its `bid_versions` content
//! chain. Same discipline as the tender repository: single-statement
//! version writers guarded by `uq_bid_versions_bid_version`.

use procura_core::types::{DbId, Timestamp, VersionNumber};
use sqlx::PgPool;

use crate::models::bid::{Bid, BidPatch, BidVersion, CreateBid};

/// Column list for the identity-joined-with-current-content view.
const COLUMNS: &str = "b.id, v.name, v.description, b.status, b.tender_id, \
    b.author_type, b.author_id, v.version, b.created_at";

/// Column list for `bid_versions` queries.
const VERSION_COLUMNS: &str = "id, bid_id, version, name, description, created_at";

/// Provides persistence operations for bids and their version chain.
pub struct BidRepo;

impl BidRepo {
    /// Create a bid: identity row plus content version 1, in one
    /// transaction.
    pub async fn create(pool: &PgPool, input: &CreateBid) -> Result<Bid, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (id, status, created_at): (DbId, String, Timestamp) = sqlx::query_as(
            "INSERT INTO bids (tender_id, author_type, author_id) VALUES ($1, $2, $3) \
             RETURNING id, status, created_at",
        )
        .bind(input.tender_id)
        .bind(&input.author_type)
        .bind(input.author_id)
        .fetch_one(&mut *tx)
        .await?;

        let (version,): (VersionNumber,) = sqlx::query_as(
            "INSERT INTO bid_versions (bid_id, version, name, description) \
             VALUES ($1, 1, $2, $3) \
             RETURNING version",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Bid {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            status,
            tender_id: input.tender_id,
            author_type: input.author_type.clone(),
            author_id: input.author_id,
            version,
            created_at,
        })
    }

    /// Fetch a bid joined with its current (max-version) content.
    pub async fn find_latest(pool: &PgPool, bid_id: DbId) -> Result<Option<Bid>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}
             FROM bids b
             JOIN bid_versions v ON v.bid_id = b.id
             WHERE b.id = $1
             ORDER BY v.version DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Bid>(&query)
            .bind(bid_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a specific content version of a bid.
    pub async fn find_version(
        pool: &PgPool,
        bid_id: DbId,
        version: VersionNumber,
    ) -> Result<Option<BidVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM bid_versions
             WHERE bid_id = $1 AND version = $2"
        );
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// List all content versions of a bid, newest first.
    pub async fn list_versions(pool: &PgPool, bid_id: DbId) -> Result<Vec<BidVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {VERSION_COLUMNS} FROM bid_versions
             WHERE bid_id = $1
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .fetch_all(pool)
            .await
    }

    /// Append version N+1 overlaying the present patch fields onto the
    /// current content. Returns `None` when the bid has no versions.
    pub async fn patch(
        pool: &PgPool,
        bid_id: DbId,
        patch: &BidPatch,
    ) -> Result<Option<Bid>, sqlx::Error> {
        let query = format!(
            "WITH current AS (
                 SELECT bid_id, version, name, description
                 FROM bid_versions
                 WHERE bid_id = $1
                 ORDER BY version DESC
                 LIMIT 1
             )
             INSERT INTO bid_versions (bid_id, version, name, description)
             SELECT
                 bid_id,
                 version + 1,
                 COALESCE($2, name),
                 COALESCE($3, description)
             FROM current
             RETURNING {VERSION_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .bind(&patch.name)
            .bind(&patch.description)
            .fetch_optional(pool)
            .await?;

        match inserted {
            None => Ok(None),
            Some(_) => Self::find_latest(pool, bid_id).await,
        }
    }

    /// Append version N+1 whose content fields are copied verbatim from
    /// `target_version`. Returns `None` when `target_version` does not
    /// exist.
    pub async fn rollback(
        pool: &PgPool,
        bid_id: DbId,
        target_version: VersionNumber,
    ) -> Result<Option<Bid>, sqlx::Error> {
        let query = format!(
            "WITH target AS (
                 SELECT bid_id, name, description
                 FROM bid_versions
                 WHERE bid_id = $1 AND version = $2
             ),
             current_max AS (
                 SELECT MAX(version) AS version
                 FROM bid_versions
                 WHERE bid_id = $1
             )
             INSERT INTO bid_versions (bid_id, version, name, description)
             SELECT t.bid_id, m.version + 1, t.name, t.description
             FROM target t, current_max m
             RETURNING {VERSION_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, BidVersion>(&query)
            .bind(bid_id)
            .bind(target_version)
            .fetch_optional(pool)
            .await?;

        match inserted {
            None => Ok(None),
            Some(_) => Self::find_latest(pool, bid_id).await,
        }
    }

    /// Compare-and-set status update. Returns `true` when the row was in
    /// `expected` and is now `target`.
    pub async fn transition_status(
        pool: &PgPool,
        bid_id: DbId,
        expected: &str,
        target: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bids SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(bid_id)
        .bind(expected)
        .bind(target)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// [`Self::transition_status`] within an existing transaction. Used by
    /// the quorum engine to cancel a bid atomically with the vote.
    pub async fn transition_status_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        bid_id: DbId,
        expected: &str,
        target: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bids SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(bid_id)
        .bind(expected)
        .bind(target)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
