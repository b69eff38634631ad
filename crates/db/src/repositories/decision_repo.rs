//! Repository for the `bid_decisions` table.
//!
//! Votes are recorded with an upsert so a voter's repeat decision
//! overwrites the previous one instead of creating a second row. The
//! quorum engine runs the upsert and the tally inside one transaction so a
//! failure anywhere rolls back the vote itself.

use procura_core::types::DbId;
use sqlx::PgPool;

use crate::models::decision::{BidDecision, DecisionTally};

/// Column list for `bid_decisions` queries.
const COLUMNS: &str = "id, bid_id, voter_id, decision, created_at, updated_at";

/// Provides persistence operations for per-voter bid decisions.
pub struct DecisionRepo;

impl DecisionRepo {
    /// Record a voter's decision, overwriting any previous vote by the same
    /// voter on the same bid ("last vote wins").
    pub async fn upsert_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        bid_id: DbId,
        voter_id: DbId,
        decision: &str,
    ) -> Result<BidDecision, sqlx::Error> {
        let query = format!(
            "INSERT INTO bid_decisions (bid_id, voter_id, decision)
             VALUES ($1, $2, $3)
             ON CONFLICT (bid_id, voter_id)
             DO UPDATE SET decision = EXCLUDED.decision, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BidDecision>(&query)
            .bind(bid_id)
            .bind(voter_id)
            .bind(decision)
            .fetch_one(&mut **tx)
            .await
    }

    /// Count approvals and rejections for a bid, within the voting
    /// transaction so the tally cannot go stale against the upsert.
    pub async fn tally_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        bid_id: DbId,
    ) -> Result<DecisionTally, sqlx::Error> {
        sqlx::query_as::<_, DecisionTally>(
            "SELECT
                 COUNT(*) FILTER (WHERE decision = 'Approved') AS approve_count,
                 COUNT(*) FILTER (WHERE decision = 'Rejected') AS reject_count
             FROM bid_decisions
             WHERE bid_id = $1",
        )
        .bind(bid_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// List all decisions recorded for a bid, oldest first.
    pub async fn list_for_bid(pool: &PgPool, bid_id: DbId) -> Result<Vec<BidDecision>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bid_decisions
             WHERE bid_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, BidDecision>(&query)
            .bind(bid_id)
            .fetch_all(pool)
            .await
    }
}
