//! Database model structs.
//!
//! Row models derive `sqlx::FromRow` + `Serialize`; input DTOs derive
//! `Deserialize` and hold `Option` fields where the column has a database
//! default or the operation is a partial update.

pub mod bid;
pub mod decision;
pub mod employee;
pub mod organization;
pub mod tender;
