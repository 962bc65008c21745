//! Core engine for the calgrid month-grid task calendar.
//! This crate is the single source of truth for grid and task invariants.

pub mod builder;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use builder::{build_month, build_month_with};
pub use logging::{default_log_level, init_logging};
pub use model::calendar::{
    CalendarState, CalendarValidationError, CellId, DayCell, Task, TaskId,
};
pub use repo::snapshot_repo::{
    MemorySnapshotRepository, RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository,
};
pub use service::calendar_service::{
    CalendarService, ServiceError, ServiceResult, SNAPSHOT_KEY,
};
