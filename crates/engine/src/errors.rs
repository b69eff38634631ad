//! Translation of storage errors into the domain taxonomy.

use procura_core::error::CoreError;

/// Prefix shared by every unique constraint in the schema.
const UNIQUE_CONSTRAINT_PREFIX: &str = "uq_";

/// Whether the error is a PostgreSQL unique violation (error code 23505)
/// on one of our `uq_*` constraints. Version-chain writers treat this as a
/// lost race and retry.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err
                    .constraint()
                    .is_some_and(|c| c.starts_with(UNIQUE_CONSTRAINT_PREFIX))
        }
        _ => false,
    }
}

/// Map a storage error onto the domain taxonomy.
///
/// Unique violations surface as `Conflict` (a version-chain race that
/// exhausted its retries, or a duplicate row); everything else is logged
/// and surfaced as `Internal`.
pub(crate) fn storage(err: sqlx::Error) -> CoreError {
    if is_unique_violation(&err) {
        return CoreError::Conflict(format!("Concurrent write conflict: {err}"));
    }
    tracing::error!(error = %err, "Storage error");
    CoreError::Internal(err.to_string())
}
