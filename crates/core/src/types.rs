/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Content version numbers: a contiguous `1..N` sequence per entity.
pub type VersionNumber = i32;
