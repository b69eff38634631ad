//! The Responsibility Resolver: the external collaborator answering "is
//! this employee responsible for that organization" and "how large is this
//! employee's responsibility peer set".
//!
//! Modeled as a capability trait injected into the quorum engine at
//! construction rather than reached through ambient storage state. The
//! default implementation reads the `organization_responsibles` table.

use async_trait::async_trait;
use procura_core::error::CoreError;
use procura_core::types::DbId;
use procura_db::repositories::ResponsibilityRepo;
use sqlx::{PgPool, Postgres, Transaction};

use crate::errors::storage;

/// Read-only responsibility queries consumed by the decision protocol.
#[async_trait]
pub trait ResponsibilityResolver: Send + Sync {
    /// Whether the employee is responsible for the given organization.
    async fn is_responsible(
        &self,
        employee_id: DbId,
        organization_id: DbId,
    ) -> Result<bool, CoreError>;

    /// Size of the employee's responsibility peer set: the number of
    /// employees (the given one included) responsible for at least one
    /// organization this employee is also responsible for.
    ///
    /// Takes the caller's transaction so the count is read from the same
    /// snapshot as the decision tally.
    async fn responsible_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        employee_id: DbId,
    ) -> Result<i64, CoreError>;
}

/// Database-backed resolver over `organization_responsibles`.
pub struct PgResponsibilityResolver {
    pool: PgPool,
}

impl PgResponsibilityResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResponsibilityResolver for PgResponsibilityResolver {
    async fn is_responsible(
        &self,
        employee_id: DbId,
        organization_id: DbId,
    ) -> Result<bool, CoreError> {
        ResponsibilityRepo::is_responsible(&self.pool, employee_id, organization_id)
            .await
            .map_err(storage)
    }

    async fn responsible_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        employee_id: DbId,
    ) -> Result<i64, CoreError> {
        ResponsibilityRepo::responsible_count_tx(tx, employee_id)
            .await
            .map_err(storage)
    }
}
