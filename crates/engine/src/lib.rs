//! Service layer for the procurement core: the operations the (external)
//! transport layer calls with already-validated identifiers and
//! already-authenticated usernames.
//!
//! Three services, each owning a [`sqlx::PgPool`] handle injected at
//! construction:
//!
//! - [`TenderService`]: tender lifecycle and content versioning.
//! - [`BidService`]: bid lifecycle and content versioning.
//! - [`DecisionService`]: the decision-quorum protocol that cancels bids
//!   and closes tenders.
//!
//! All methods return [`procura_core::error::CoreError`] values; storage
//! failures are mapped to the domain taxonomy in the crate-private
//! `errors` module.

mod errors;

pub mod bid;
pub mod decision;
pub mod locks;
pub mod resolver;
pub mod tender;

pub use bid::BidService;
pub use decision::DecisionService;
pub use locks::BidLocks;
pub use resolver::{PgResponsibilityResolver, ResponsibilityResolver};
pub use tender::TenderService;
