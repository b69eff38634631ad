//! Bid service: creation, reads, content versioning, and status
//! transitions.
//!
//! Authorization differs from tenders: a bid belongs to its author, which
//! is an individual employee or an organization, so edit rights go to the
//! author (for `User` bids) or to any employee responsible for the
//! authoring organization (for `Organization` bids).

use procura_core::author::BidAuthorType;
use procura_core::content::{validate_description, validate_name};
use procura_core::error::CoreError;
use procura_core::status::BidStatus;
use procura_core::types::{DbId, VersionNumber};
use procura_db::models::bid::{Bid, BidPatch, BidVersion, CreateBid};
use procura_db::models::employee::Employee;
use procura_db::repositories::{
    BidRepo, EmployeeRepo, OrganizationRepo, ResponsibilityRepo, TenderRepo,
};
use sqlx::PgPool;

use crate::errors::{is_unique_violation, storage};
use crate::tender::{resolve_employee, VERSION_WRITE_ATTEMPTS};

/// Service for bid lifecycle and content versioning.
#[derive(Clone)]
pub struct BidService {
    pool: PgPool,
}

impl BidService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a bid against an existing tender.
    ///
    /// A `User` author must be a known employee responsible for at least
    /// one organization; an `Organization` author must exist.
    pub async fn create(&self, input: &CreateBid) -> Result<Bid, CoreError> {
        validate_name(&input.name)?;
        validate_description(&input.description)?;
        let author_type: BidAuthorType = input.author_type.parse()?;

        match author_type {
            BidAuthorType::User => {
                let employee = EmployeeRepo::find_by_id(&self.pool, input.author_id)
                    .await
                    .map_err(storage)?;
                if employee.is_none() {
                    return Err(CoreError::Unauthorized(format!(
                        "Unknown employee {} as bid author",
                        input.author_id
                    )));
                }
                let responsible =
                    ResponsibilityRepo::is_responsible_for_any(&self.pool, input.author_id)
                        .await
                        .map_err(storage)?;
                if !responsible {
                    return Err(CoreError::Forbidden(format!(
                        "Employee {} is not responsible for any organization",
                        input.author_id
                    )));
                }
            }
            BidAuthorType::Organization => {
                let organization = OrganizationRepo::find_by_id(&self.pool, input.author_id)
                    .await
                    .map_err(storage)?;
                if organization.is_none() {
                    return Err(CoreError::Unauthorized(format!(
                        "Unknown organization {} as bid author",
                        input.author_id
                    )));
                }
            }
        }

        TenderRepo::find_latest(&self.pool, input.tender_id)
            .await
            .map_err(storage)?
            .ok_or(CoreError::not_found("Tender", input.tender_id))?;

        let bid = BidRepo::create(&self.pool, input).await.map_err(storage)?;

        tracing::info!(
            bid_id = bid.id,
            tender_id = bid.tender_id,
            author_type = %bid.author_type,
            author_id = bid.author_id,
            "Bid created"
        );
        Ok(bid)
    }

    /// Current state of a bid: identity plus max-version content.
    pub async fn get_latest(&self, bid_id: DbId) -> Result<Bid, CoreError> {
        BidRepo::find_latest(&self.pool, bid_id)
            .await
            .map_err(storage)?
            .ok_or(CoreError::not_found("Bid", bid_id))
    }

    /// Status of a bid. Published bids are public; any other status is
    /// visible only to the author side.
    pub async fn get_status(&self, bid_id: DbId, username: &str) -> Result<String, CoreError> {
        let bid = self.get_latest(bid_id).await?;
        if bid.status == BidStatus::Published.as_str() {
            return Ok(bid.status);
        }
        let actor = resolve_employee(&self.pool, username).await?;
        authorize_bid_author(&self.pool, &actor, &bid).await?;
        Ok(bid.status)
    }

    /// Full version history of a bid, newest first.
    pub async fn list_versions(&self, bid_id: DbId) -> Result<Vec<BidVersion>, CoreError> {
        let versions = BidRepo::list_versions(&self.pool, bid_id)
            .await
            .map_err(storage)?;
        if versions.is_empty() {
            return Err(CoreError::not_found("Bid", bid_id));
        }
        Ok(versions)
    }

    /// Append a new content version overlaying the present patch fields.
    /// Fails `Forbidden` once the bid is canceled.
    pub async fn patch(
        &self,
        bid_id: DbId,
        username: &str,
        patch: &BidPatch,
    ) -> Result<Bid, CoreError> {
        if let Some(ref name) = patch.name {
            validate_name(name)?;
        }
        if let Some(ref description) = patch.description {
            validate_description(description)?;
        }

        let bid = self.get_latest(bid_id).await?;
        let actor = resolve_employee(&self.pool, username).await?;
        authorize_bid_author(&self.pool, &actor, &bid).await?;
        ensure_bid_editable(&bid)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match BidRepo::patch(&self.pool, bid_id, patch).await {
                Ok(Some(updated)) => {
                    tracing::info!(
                        bid_id,
                        version = updated.version,
                        actor = %actor.username,
                        "Bid content patched"
                    );
                    return Ok(updated);
                }
                Ok(None) => return Err(CoreError::not_found("Bid", bid_id)),
                Err(err) if is_unique_violation(&err) && attempt < VERSION_WRITE_ATTEMPTS => {
                    tracing::debug!(bid_id, attempt, "Version write lost a race; retrying");
                }
                Err(err) => return Err(storage(err)),
            }
        }
    }

    /// Append a new content version copied verbatim from `target_version`.
    /// Fails `Forbidden` once the bid is canceled.
    pub async fn rollback(
        &self,
        bid_id: DbId,
        username: &str,
        target_version: VersionNumber,
    ) -> Result<Bid, CoreError> {
        let bid = self.get_latest(bid_id).await?;
        let actor = resolve_employee(&self.pool, username).await?;
        authorize_bid_author(&self.pool, &actor, &bid).await?;
        ensure_bid_editable(&bid)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match BidRepo::rollback(&self.pool, bid_id, target_version).await {
                Ok(Some(updated)) => {
                    tracing::info!(
                        bid_id,
                        version = updated.version,
                        restored_from = target_version,
                        actor = %actor.username,
                        "Bid content rolled back"
                    );
                    return Ok(updated);
                }
                Ok(None) => {
                    return Err(CoreError::not_found(
                        "BidVersion",
                        DbId::from(target_version),
                    ))
                }
                Err(err) if is_unique_violation(&err) && attempt < VERSION_WRITE_ATTEMPTS => {
                    tracing::debug!(bid_id, attempt, "Version write lost a race; retrying");
                }
                Err(err) => return Err(storage(err)),
            }
        }
    }

    /// Apply an explicit status transition.
    ///
    /// Transitions out of a terminal state fail `Forbidden`; other illegal
    /// edges fail `Conflict`.
    pub async fn update_status(
        &self,
        bid_id: DbId,
        username: &str,
        target: BidStatus,
    ) -> Result<Bid, CoreError> {
        let bid = self.get_latest(bid_id).await?;
        let actor = resolve_employee(&self.pool, username).await?;
        authorize_bid_author(&self.pool, &actor, &bid).await?;

        let current: BidStatus = bid.status.parse()?;
        if !current.can_transition(target) {
            return Err(if current.is_terminal() {
                CoreError::Forbidden(format!(
                    "Bid {bid_id} is {current} and can no longer change status"
                ))
            } else {
                CoreError::Conflict(format!(
                    "Bid {bid_id} cannot move from {current} to {target}"
                ))
            });
        }

        let changed =
            BidRepo::transition_status(&self.pool, bid_id, current.as_str(), target.as_str())
                .await
                .map_err(storage)?;
        if !changed {
            return Err(CoreError::Conflict(format!(
                "Bid {bid_id} status changed concurrently"
            )));
        }

        tracing::info!(
            bid_id,
            from = %current,
            to = %target,
            actor = %actor.username,
            "Bid status updated"
        );
        self.get_latest(bid_id).await
    }
}

/// Refuse edits once a bid has reached its terminal state.
fn ensure_bid_editable(bid: &Bid) -> Result<(), CoreError> {
    let status: BidStatus = bid.status.parse()?;
    if status.is_terminal() {
        return Err(CoreError::Forbidden(format!(
            "Bid {} is canceled and can't be changed",
            bid.id
        )));
    }
    Ok(())
}

/// Require the actor to be on the bid's author side: the authoring
/// employee for `User` bids, or any employee responsible for the authoring
/// organization for `Organization` bids.
pub(crate) async fn authorize_bid_author(
    pool: &PgPool,
    actor: &Employee,
    bid: &Bid,
) -> Result<(), CoreError> {
    let author_type: BidAuthorType = bid.author_type.parse()?;
    let authorized = match author_type {
        BidAuthorType::User => bid.author_id == actor.id,
        BidAuthorType::Organization => {
            ResponsibilityRepo::is_responsible(pool, actor.id, bid.author_id)
                .await
                .map_err(storage)?
        }
    };
    if !authorized {
        return Err(CoreError::Forbidden(format!(
            "Employee '{}' may not act on bid {}",
            actor.username, bid.id
        )));
    }
    Ok(())
}
