//! Tender service: creation, reads, content versioning, and status
//! transitions, guarded by organization-responsibility authorization.

use procura_core::content::{validate_description, validate_name, validate_service_type};
use procura_core::error::CoreError;
use procura_core::status::TenderStatus;
use procura_core::types::{DbId, VersionNumber};
use procura_db::models::employee::Employee;
use procura_db::models::tender::{CreateTender, Tender, TenderPatch, TenderVersion};
use procura_db::repositories::{EmployeeRepo, ResponsibilityRepo, TenderRepo};
use sqlx::PgPool;

use crate::errors::{is_unique_violation, storage};

/// Attempts granted to a version-chain write that keeps losing the
/// unique-constraint race before it surfaces as `Conflict`.
pub(crate) const VERSION_WRITE_ATTEMPTS: u32 = 3;

/// Service for tender lifecycle and content versioning.
#[derive(Clone)]
pub struct TenderService {
    pool: PgPool,
}

impl TenderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a tender owned by `input.organization_id`. The actor must be
    /// a responsible employee of that organization.
    pub async fn create(&self, input: &CreateTender, username: &str) -> Result<Tender, CoreError> {
        validate_name(&input.name)?;
        validate_description(&input.description)?;
        validate_service_type(&input.service_type)?;

        let actor = resolve_employee(&self.pool, username).await?;
        ensure_responsible(&self.pool, &actor, input.organization_id).await?;

        let tender = TenderRepo::create(&self.pool, input).await.map_err(storage)?;

        tracing::info!(
            tender_id = tender.id,
            organization_id = tender.organization_id,
            actor = %actor.username,
            "Tender created"
        );
        Ok(tender)
    }

    /// Current state of a tender: identity plus max-version content.
    pub async fn get_latest(&self, tender_id: DbId) -> Result<Tender, CoreError> {
        TenderRepo::find_latest(&self.pool, tender_id)
            .await
            .map_err(storage)?
            .ok_or(CoreError::not_found("Tender", tender_id))
    }

    /// Status of a tender. Published tenders are public; any other status
    /// is visible only to employees responsible for the owning
    /// organization.
    pub async fn get_status(
        &self,
        tender_id: DbId,
        username: Option<&str>,
    ) -> Result<String, CoreError> {
        let tender = self.get_latest(tender_id).await?;
        if tender.status == TenderStatus::Published.as_str() {
            return Ok(tender.status);
        }

        let username = username.ok_or_else(|| {
            CoreError::Forbidden(format!("Tender {tender_id} is not public"))
        })?;
        let actor = resolve_employee(&self.pool, username).await?;
        ensure_responsible(&self.pool, &actor, tender.organization_id).await?;
        Ok(tender.status)
    }

    /// Full version history of a tender, newest first.
    pub async fn list_versions(&self, tender_id: DbId) -> Result<Vec<TenderVersion>, CoreError> {
        let versions = TenderRepo::list_versions(&self.pool, tender_id)
            .await
            .map_err(storage)?;
        if versions.is_empty() {
            return Err(CoreError::not_found("Tender", tender_id));
        }
        Ok(versions)
    }

    /// Append a new content version overlaying the present patch fields.
    /// Fails `Forbidden` once the tender is closed.
    pub async fn patch(
        &self,
        tender_id: DbId,
        username: &str,
        patch: &TenderPatch,
    ) -> Result<Tender, CoreError> {
        if let Some(ref name) = patch.name {
            validate_name(name)?;
        }
        if let Some(ref description) = patch.description {
            validate_description(description)?;
        }
        if let Some(ref service_type) = patch.service_type {
            validate_service_type(service_type)?;
        }

        let tender = self.get_latest(tender_id).await?;
        let actor = resolve_employee(&self.pool, username).await?;
        ensure_responsible(&self.pool, &actor, tender.organization_id).await?;
        ensure_tender_editable(&tender)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match TenderRepo::patch(&self.pool, tender_id, patch).await {
                Ok(Some(updated)) => {
                    tracing::info!(
                        tender_id,
                        version = updated.version,
                        actor = %actor.username,
                        "Tender content patched"
                    );
                    return Ok(updated);
                }
                Ok(None) => return Err(CoreError::not_found("Tender", tender_id)),
                Err(err) if is_unique_violation(&err) && attempt < VERSION_WRITE_ATTEMPTS => {
                    tracing::debug!(tender_id, attempt, "Version write lost a race; retrying");
                }
                Err(err) => return Err(storage(err)),
            }
        }
    }

    /// Append a new content version copied verbatim from `target_version`.
    /// The version counter still advances; history never shrinks. Fails
    /// `Forbidden` once the tender is closed.
    pub async fn rollback(
        &self,
        tender_id: DbId,
        username: &str,
        target_version: VersionNumber,
    ) -> Result<Tender, CoreError> {
        let tender = self.get_latest(tender_id).await?;
        let actor = resolve_employee(&self.pool, username).await?;
        ensure_responsible(&self.pool, &actor, tender.organization_id).await?;
        ensure_tender_editable(&tender)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match TenderRepo::rollback(&self.pool, tender_id, target_version).await {
                Ok(Some(updated)) => {
                    tracing::info!(
                        tender_id,
                        version = updated.version,
                        restored_from = target_version,
                        actor = %actor.username,
                        "Tender content rolled back"
                    );
                    return Ok(updated);
                }
                Ok(None) => {
                    return Err(CoreError::not_found(
                        "TenderVersion",
                        DbId::from(target_version),
                    ))
                }
                Err(err) if is_unique_violation(&err) && attempt < VERSION_WRITE_ATTEMPTS => {
                    tracing::debug!(tender_id, attempt, "Version write lost a race; retrying");
                }
                Err(err) => return Err(storage(err)),
            }
        }
    }

    /// Apply an explicit status transition.
    ///
    /// Transitions out of a terminal state fail `Forbidden`; other illegal
    /// edges fail `Conflict`; a concurrent status change also surfaces as
    /// `Conflict` (the update is compare-and-set).
    pub async fn update_status(
        &self,
        tender_id: DbId,
        username: &str,
        target: TenderStatus,
    ) -> Result<Tender, CoreError> {
        let tender = self.get_latest(tender_id).await?;
        let actor = resolve_employee(&self.pool, username).await?;
        ensure_responsible(&self.pool, &actor, tender.organization_id).await?;

        let current: TenderStatus = tender.status.parse()?;
        if !current.can_transition(target) {
            return Err(if current.is_terminal() {
                CoreError::Forbidden(format!(
                    "Tender {tender_id} is {current} and can no longer change status"
                ))
            } else {
                CoreError::Conflict(format!(
                    "Tender {tender_id} cannot move from {current} to {target}"
                ))
            });
        }

        let changed = TenderRepo::transition_status(
            &self.pool,
            tender_id,
            current.as_str(),
            target.as_str(),
        )
        .await
        .map_err(storage)?;
        if !changed {
            return Err(CoreError::Conflict(format!(
                "Tender {tender_id} status changed concurrently"
            )));
        }

        tracing::info!(
            tender_id,
            from = %current,
            to = %target,
            actor = %actor.username,
            "Tender status updated"
        );
        self.get_latest(tender_id).await
    }
}

/// Refuse edits once a tender has reached its terminal state.
fn ensure_tender_editable(tender: &Tender) -> Result<(), CoreError> {
    let status: TenderStatus = tender.status.parse()?;
    if status.is_terminal() {
        return Err(CoreError::Forbidden(format!(
            "Tender {} is closed and can't be changed",
            tender.id
        )));
    }
    Ok(())
}

/// Resolve a username to an employee, or fail `Unauthorized`.
pub(crate) async fn resolve_employee(
    pool: &PgPool,
    username: &str,
) -> Result<Employee, CoreError> {
    EmployeeRepo::find_by_username(pool, username)
        .await
        .map_err(storage)?
        .ok_or_else(|| CoreError::Unauthorized(format!("Unknown username '{username}'")))
}

/// Require the actor to be responsible for the given organization.
pub(crate) async fn ensure_responsible(
    pool: &PgPool,
    actor: &Employee,
    organization_id: DbId,
) -> Result<(), CoreError> {
    let responsible = ResponsibilityRepo::is_responsible(pool, actor.id, organization_id)
        .await
        .map_err(storage)?;
    if !responsible {
        return Err(CoreError::Forbidden(format!(
            "Employee '{}' is not responsible for organization {organization_id}",
            actor.username
        )));
    }
    Ok(())
}
