//! Domain layer for the procurement service: error taxonomy, id and
//! timestamp types, entity status machines, the decision vocabulary with its
//! quorum arithmetic, and content validation.
//!
//! This crate has no I/O dependencies so it can be used by the repository
//! layer, the service layer, and any future CLI or worker tooling.

pub mod author;
pub mod content;
pub mod decision;
pub mod error;
pub mod status;
pub mod types;
