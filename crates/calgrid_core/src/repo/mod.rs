//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the snapshot key-value contract used by the calendar service.
//! - Isolate SQLite details from service orchestration.
//!
//! # Invariants
//! - Implementations store values verbatim; interpretation of the snapshot
//!   text belongs to the service layer.
//! - Repository APIs return semantic readiness errors in addition to DB
//!   transport errors.

pub mod snapshot_repo;
