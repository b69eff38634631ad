//! The decision-quorum protocol: serialize concurrent voting on a bid and
//! resolve each vote into a status transition.
//!
//! One rejection, from any eligible voter, cancels the bid outright.
//! Approvals close the parent tender once their count strictly exceeds
//! `min(responsible_count, DECISION_QUORUM_CAP)`, where `responsible_count`
//! is the size of the voter's responsibility peer set as reported by the
//! injected [`ResponsibilityResolver`].
//!
//! The whole read-count-decide-write sequence runs under the bid's
//! exclusive lock and inside a single database transaction, so a failure
//! anywhere rolls back the vote itself and no interleaving of two voters'
//! tallies is possible.

use std::sync::Arc;

use procura_core::decision::{quorum, resolve_tally, DecisionValue, Tally, TallyOutcome};
use procura_core::error::CoreError;
use procura_core::status::{BidStatus, TenderStatus};
use procura_core::types::DbId;
use procura_db::models::bid::Bid;
use procura_db::models::decision::BidDecision;
use procura_db::repositories::{BidRepo, DecisionRepo, TenderRepo};
use sqlx::PgPool;

use crate::errors::storage;
use crate::locks::BidLocks;
use crate::resolver::{PgResponsibilityResolver, ResponsibilityResolver};
use crate::tender::resolve_employee;

/// Service resolving per-voter decisions on bids.
#[derive(Clone)]
pub struct DecisionService {
    pool: PgPool,
    resolver: Arc<dyn ResponsibilityResolver>,
    locks: Arc<BidLocks>,
}

impl DecisionService {
    /// Build a service backed by the database resolver.
    pub fn new(pool: PgPool) -> Self {
        let resolver = Arc::new(PgResponsibilityResolver::new(pool.clone()));
        Self::with_resolver(pool, resolver)
    }

    /// Build a service with an explicit resolver implementation.
    pub fn with_resolver(pool: PgPool, resolver: Arc<dyn ResponsibilityResolver>) -> Self {
        Self {
            pool,
            resolver,
            locks: Arc::new(BidLocks::new()),
        }
    }

    /// Record `username`'s decision on a bid and resolve the tally.
    ///
    /// `decision` must be exactly `"Approved"` or `"Rejected"`. The bid
    /// must be `Published` and the voter responsible for the parent
    /// tender's organization. Returns the bid in its (possibly new) state.
    ///
    /// A repeat vote by the same voter overwrites the previous one. Votes
    /// arriving after the parent tender closed are still recorded; the
    /// close step is then a no-op, never a reversal.
    pub async fn submit_decision(
        &self,
        bid_id: DbId,
        username: &str,
        decision: &str,
    ) -> Result<Bid, CoreError> {
        let decision: DecisionValue = decision.parse()?;

        // Exclusive per-bid section, held through commit. Released on drop
        // on every exit path, error or not.
        let _guard = self.locks.acquire(bid_id).await;

        let voter = resolve_employee(&self.pool, username).await?;

        let bid = BidRepo::find_latest(&self.pool, bid_id)
            .await
            .map_err(storage)?
            .ok_or(CoreError::not_found("Bid", bid_id))?;
        if bid.status != BidStatus::Published.as_str() {
            // Unpublished bids are invisible to voters, canceled ones
            // included.
            return Err(CoreError::not_found("Bid", bid_id));
        }

        let tender = TenderRepo::find_latest(&self.pool, bid.tender_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Bid {bid_id} references missing tender {}",
                    bid.tender_id
                ))
            })?;
        if !self
            .resolver
            .is_responsible(voter.id, tender.organization_id)
            .await?
        {
            return Err(CoreError::Forbidden(format!(
                "Employee '{}' is not responsible for organization {}",
                voter.username, tender.organization_id
            )));
        }

        let mut tx = self.pool.begin().await.map_err(storage)?;

        DecisionRepo::upsert_tx(&mut tx, bid_id, voter.id, decision.as_str())
            .await
            .map_err(storage)?;
        let counts = DecisionRepo::tally_tx(&mut tx, bid_id)
            .await
            .map_err(storage)?;
        let peers = self.resolver.responsible_count(&mut tx, voter.id).await?;

        let tally = Tally {
            approve_count: counts.approve_count,
            reject_count: counts.reject_count,
        };
        let effective_quorum = quorum(peers);
        let outcome = resolve_tally(tally, effective_quorum);

        match outcome {
            TallyOutcome::CancelBid => {
                BidRepo::transition_status_tx(
                    &mut tx,
                    bid_id,
                    BidStatus::Published.as_str(),
                    BidStatus::Canceled.as_str(),
                )
                .await
                .map_err(storage)?;
            }
            TallyOutcome::CloseTender => {
                // No-op when the tender already closed on an earlier vote;
                // a closed tender is never reopened.
                TenderRepo::transition_status_tx(
                    &mut tx,
                    bid.tender_id,
                    TenderStatus::Published.as_str(),
                    TenderStatus::Closed.as_str(),
                )
                .await
                .map_err(storage)?;
            }
            TallyOutcome::NoChange => {}
        }

        tx.commit().await.map_err(storage)?;

        match outcome {
            TallyOutcome::CancelBid => tracing::info!(
                bid_id,
                voter_id = voter.id,
                reject_count = tally.reject_count,
                "Bid canceled by rejection"
            ),
            TallyOutcome::CloseTender => tracing::info!(
                bid_id,
                tender_id = bid.tender_id,
                voter_id = voter.id,
                approve_count = tally.approve_count,
                quorum = effective_quorum,
                "Tender closed by approval quorum"
            ),
            TallyOutcome::NoChange => tracing::info!(
                bid_id,
                voter_id = voter.id,
                approve_count = tally.approve_count,
                quorum = effective_quorum,
                "Decision recorded"
            ),
        }

        BidRepo::find_latest(&self.pool, bid_id)
            .await
            .map_err(storage)?
            .ok_or(CoreError::not_found("Bid", bid_id))
    }

    /// All decisions currently recorded for a bid, oldest first. The actor
    /// must be responsible for the parent tender's organization.
    pub async fn list_decisions(
        &self,
        bid_id: DbId,
        username: &str,
    ) -> Result<Vec<BidDecision>, CoreError> {
        let actor = resolve_employee(&self.pool, username).await?;

        let bid = BidRepo::find_latest(&self.pool, bid_id)
            .await
            .map_err(storage)?
            .ok_or(CoreError::not_found("Bid", bid_id))?;
        let tender = TenderRepo::find_latest(&self.pool, bid.tender_id)
            .await
            .map_err(storage)?
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Bid {bid_id} references missing tender {}",
                    bid.tender_id
                ))
            })?;
        if !self
            .resolver
            .is_responsible(actor.id, tender.organization_id)
            .await?
        {
            return Err(CoreError::Forbidden(format!(
                "Employee '{}' is not responsible for organization {}",
                actor.username, tender.organization_id
            )));
        }

        DecisionRepo::list_for_bid(&self.pool, bid_id)
            .await
            .map_err(storage)
    }
}
