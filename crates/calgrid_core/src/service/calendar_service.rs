//! Calendar state service.
//!
//! # Responsibility
//! - Own the authoritative in-memory month grid.
//! - Apply task mutations with validation and re-persist after each one.
//! - Adopt or create the persisted snapshot at startup.
//!
//! # Invariants
//! - The grid is replaced wholesale on every mutation; previously returned
//!   states stay valid values.
//! - The snapshot write is the last step of a mutation: at most one write
//!   per successful mutation, none on validation failure.
//! - A loaded snapshot is adopted verbatim; the month is never re-derived
//!   from the current date once a snapshot exists.

use crate::builder::build_month;
use crate::model::calendar::{CalendarState, CellId, Task, TaskId};
use crate::repo::snapshot_repo::{RepoError, SnapshotRepository};
use chrono::{Datelike, Local, NaiveDate};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key naming the calendar snapshot in the persistent store.
pub const SNAPSHOT_KEY: &str = "calgrid-calendar";

/// Date shapes accepted for task placement, tried in order.
const TASK_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by calendar use-cases.
///
/// Missing cell or task ids during mutations are deliberately NOT an error:
/// those mutations no-op silently so the UI stays resilient to stale
/// references.
#[derive(Debug)]
pub enum ServiceError {
    /// Task date text does not parse to a real calendar date.
    InvalidTaskDate(String),
    /// Task description is empty after trimming.
    EmptyTaskDescription,
    /// Persisted snapshot exists but cannot be decoded. Fatal at startup;
    /// the store is never silently rebuilt over it.
    CorruptSnapshot(serde_json::Error),
    /// In-memory state could not be encoded for persistence.
    SnapshotEncode(serde_json::Error),
    /// Transport error from the persistence stack.
    Repo(RepoError),
}

impl ServiceError {
    /// Whether this is a user-input rejection the UI should notify about,
    /// as opposed to an internal failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidTaskDate(_) | Self::EmptyTaskDescription)
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTaskDate(text) => {
                write!(f, "`{text}` is not a valid calendar date")
            }
            Self::EmptyTaskDescription => write!(f, "task description cannot be empty"),
            Self::CorruptSnapshot(err) => {
                write!(f, "stored calendar snapshot is corrupt: {err}")
            }
            Self::SnapshotEncode(err) => {
                write!(f, "calendar state could not be encoded: {err}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTaskDate(_) | Self::EmptyTaskDescription => None,
            Self::CorruptSnapshot(err) | Self::SnapshotEncode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service owning the month grid and its persisted snapshot.
///
/// Construction is initialization: a service value only exists once the
/// snapshot has been adopted or freshly built, so mutations cannot run
/// against an uninitialized store.
#[derive(Debug)]
pub struct CalendarService<R: SnapshotRepository> {
    repo: R,
    state: CalendarState,
}

impl<R: SnapshotRepository> CalendarService<R> {
    /// Initializes from the stored snapshot, building this month's grid on
    /// first run.
    pub fn initialize(repo: R) -> ServiceResult<Self> {
        Self::initialize_at(repo, Local::now().date_naive())
    }

    /// Initializes with an explicit reference date for the first-run build.
    ///
    /// The reference only matters when no snapshot exists yet; an existing
    /// snapshot is adopted verbatim regardless of the date.
    pub fn initialize_at(repo: R, reference: NaiveDate) -> ServiceResult<Self> {
        match repo.get_snapshot(SNAPSHOT_KEY)? {
            Some(raw) => {
                let state: CalendarState =
                    serde_json::from_str(&raw).map_err(ServiceError::CorruptSnapshot)?;
                info!(
                    "event=calendar_load module=service status=ok cells={}",
                    state.cells().len()
                );
                Ok(Self { repo, state })
            }
            None => {
                let mut service = Self {
                    repo,
                    state: CalendarState::default(),
                };
                service.adopt(build_month(reference))?;
                info!(
                    "event=calendar_build module=service status=ok month={} cells={}",
                    reference.format("%Y-%m"),
                    service.state.cells().len()
                );
                Ok(service)
            }
        }
    }

    /// Read-only view of the current grid.
    pub fn state(&self) -> &CalendarState {
        &self.state
    }

    /// Attaches a task to the day named by the user-supplied date text.
    ///
    /// Validation, in order: the date text must parse to a real calendar
    /// date, and the trimmed description must be non-empty. Rejections leave
    /// state and store untouched.
    ///
    /// Placement matches on day-of-month only; the date's month and year
    /// are ignored. A day number with no cell in the loaded grid drops the
    /// task silently, but the snapshot is still re-written after the map
    /// step.
    pub fn add_task(
        &mut self,
        raw_date: &str,
        raw_description: &str,
    ) -> ServiceResult<CalendarState> {
        let date = parse_task_date(raw_date)
            .ok_or_else(|| ServiceError::InvalidTaskDate(raw_date.trim().to_string()))?;
        let description = raw_description.trim();
        if description.is_empty() {
            return Err(ServiceError::EmptyTaskDescription);
        }

        let target_day = date.day() as u8;
        let task = Task::new(description);
        let mut matched = false;
        let cells = self
            .state
            .cells()
            .iter()
            .map(|cell| {
                if cell.blank || cell.day_number != Some(target_day) {
                    return cell.clone();
                }
                matched = true;
                let mut updated = cell.clone();
                if let Some(tasks) = updated.tasks.as_mut() {
                    tasks.push(task.clone());
                }
                updated
            })
            .collect();

        self.adopt(CalendarState::new(cells))?;
        if matched {
            info!("event=task_add module=service status=ok day={target_day}");
        } else {
            warn!("event=task_add module=service status=no_target day={target_day}");
        }
        Ok(self.state.clone())
    }

    /// Rewrites one task's description, located by cell and task id.
    ///
    /// A whitespace-only description is ignored without a snapshot write;
    /// the caller's prompt flow is expected to have screened it already.
    /// Missing ids leave the grid value-unchanged, but the snapshot is
    /// still re-written after the map step.
    pub fn edit_task(
        &mut self,
        cell_id: CellId,
        task_id: TaskId,
        new_description: &str,
    ) -> ServiceResult<CalendarState> {
        let description = new_description.trim();
        if description.is_empty() {
            warn!("event=task_edit module=service status=skipped_empty");
            return Ok(self.state.clone());
        }

        let cells = self
            .state
            .cells()
            .iter()
            .map(|cell| {
                if cell.id != cell_id {
                    return cell.clone();
                }
                let mut updated = cell.clone();
                if let Some(tasks) = updated.tasks.as_mut() {
                    for task in tasks.iter_mut() {
                        if task.id == task_id {
                            task.description = description.to_string();
                        }
                    }
                }
                updated
            })
            .collect();

        self.adopt(CalendarState::new(cells))?;
        info!("event=task_edit module=service status=ok task={task_id}");
        Ok(self.state.clone())
    }

    /// Removes one task, located by cell and task id.
    ///
    /// The caller has already resolved the user's deletion confirmation.
    /// Missing ids leave the grid value-unchanged, but the snapshot is
    /// still re-written after the map step.
    pub fn delete_task(&mut self, cell_id: CellId, task_id: TaskId) -> ServiceResult<CalendarState> {
        let cells = self
            .state
            .cells()
            .iter()
            .map(|cell| {
                if cell.id != cell_id {
                    return cell.clone();
                }
                let mut updated = cell.clone();
                if let Some(tasks) = updated.tasks.as_mut() {
                    tasks.retain(|task| task.id != task_id);
                }
                updated
            })
            .collect();

        self.adopt(CalendarState::new(cells))?;
        info!("event=task_delete module=service status=ok task={task_id}");
        Ok(self.state.clone())
    }

    /// Persists `next` and makes it the authoritative grid.
    ///
    /// The in-memory swap only happens after the write succeeds, so a
    /// failed write leaves the previous state intact.
    fn adopt(&mut self, next: CalendarState) -> ServiceResult<()> {
        let raw = serde_json::to_string(&next).map_err(ServiceError::SnapshotEncode)?;
        self.repo.put_snapshot(SNAPSHOT_KEY, &raw)?;
        self.state = next;
        Ok(())
    }
}

/// Parses user-supplied date text into a calendar date.
///
/// Accepts ISO `YYYY-MM-DD` (the shape produced by date inputs) and the
/// `MM/DD/YYYY` fallback. Returns `None` for anything else, including
/// impossible dates such as February 30th.
fn parse_task_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    TASK_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
