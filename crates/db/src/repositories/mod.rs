//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must run inside a
//! caller-owned transaction take `&mut sqlx::Transaction` instead and carry
//! a `_tx` suffix.

pub mod bid_repo;
pub mod decision_repo;
pub mod employee_repo;
pub mod organization_repo;
pub mod responsibility_repo;
pub mod tender_repo;

pub use bid_repo::BidRepo;
pub use decision_repo::DecisionRepo;
pub use employee_repo::EmployeeRepo;
pub use organization_repo::OrganizationRepo;
pub use responsibility_repo::ResponsibilityRepo;
pub use tender_repo::TenderRepo;
