//! Calendar grid domain model.
//!
//! # Responsibility
//! - Define `Task`, `DayCell` and `CalendarState` with their snapshot shape.
//! - Provide constructors for fresh and caller-provided ids.
//!
//! # Invariants
//! - `id` values are stable for the lifetime of a cell or task.
//! - A blank cell carries neither `day_number` nor `tasks`.
//! - A day cell always carries `day_number` (1..=31) and a task list.
//! - Task order inside a cell is insertion order; edits never reorder.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one grid cell.
pub type CellId = Uuid;

/// Stable identifier of one task.
pub type TaskId = Uuid;

/// One user-authored note attached to a day cell.
///
/// The service trims descriptions before construction; `validate` exists for
/// tests and for guarding hand-built values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global id, assigned at creation.
    pub id: TaskId,
    /// Non-empty trimmed text.
    pub description: String,
}

impl Task {
    /// Creates a task with a generated id.
    pub fn new(description: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), description)
    }

    /// Creates a task with a caller-provided id.
    ///
    /// Used by tests that need deterministic ids.
    pub fn with_id(id: TaskId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    /// Checks the description invariant.
    pub fn validate(&self) -> Result<(), CalendarValidationError> {
        if self.description.trim().is_empty() {
            return Err(CalendarValidationError::EmptyTaskDescription { task: self.id });
        }
        Ok(())
    }
}

/// One grid entry: either a padding slot before the month's first day or a
/// real calendar day with its tasks.
///
/// Snapshot shape matches the persisted wire form: `blank`, the day number
/// under the key `text`, and `tasks`; the latter two are omitted entirely
/// for padding cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    /// Stable id, assigned at creation.
    pub id: CellId,
    /// `true` for padding cells preceding the month's first day.
    pub blank: bool,
    /// Day of month, 1..=31. `None` on padding cells.
    #[serde(rename = "text", default, skip_serializing_if = "Option::is_none")]
    pub day_number: Option<u8>,
    /// Ordered task list. `None` on padding cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

impl DayCell {
    /// Creates a padding cell with a generated id.
    pub fn blank() -> Self {
        Self::blank_with_id(Uuid::new_v4())
    }

    /// Creates a padding cell with a caller-provided id.
    pub fn blank_with_id(id: CellId) -> Self {
        Self {
            id,
            blank: true,
            day_number: None,
            tasks: None,
        }
    }

    /// Creates a day cell with a generated id and an empty task list.
    pub fn day(number: u8) -> Self {
        Self::day_with_id(Uuid::new_v4(), number)
    }

    /// Creates a day cell with a caller-provided id and an empty task list.
    pub fn day_with_id(id: CellId, number: u8) -> Self {
        Self {
            id,
            blank: false,
            day_number: Some(number),
            tasks: Some(Vec::new()),
        }
    }

    /// Returns the task list, empty for padding cells.
    pub fn tasks(&self) -> &[Task] {
        self.tasks.as_deref().unwrap_or_default()
    }

    /// Checks the blank/day field pairing invariant.
    pub fn validate(&self) -> Result<(), CalendarValidationError> {
        if self.blank {
            if self.day_number.is_some() || self.tasks.is_some() {
                return Err(CalendarValidationError::BlankCellWithDayData { cell: self.id });
            }
            return Ok(());
        }

        match self.day_number {
            None => return Err(CalendarValidationError::MissingDayNumber { cell: self.id }),
            Some(day) if !(1..=31).contains(&day) => {
                return Err(CalendarValidationError::DayNumberOutOfRange { cell: self.id, day });
            }
            Some(_) => {}
        }

        match &self.tasks {
            None => Err(CalendarValidationError::MissingTaskList { cell: self.id }),
            Some(tasks) => {
                for task in tasks {
                    task.validate()?;
                }
                Ok(())
            }
        }
    }
}

/// The whole month grid: an ordered sequence of cells, leading padding first.
///
/// Serializes transparently as the JSON array of cell objects, which is the
/// exact snapshot form held by the persistent store. Mutations replace the
/// sequence wholesale, so a previously returned state stays valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarState {
    cells: Vec<DayCell>,
}

impl CalendarState {
    /// Wraps an ordered cell sequence.
    pub fn new(cells: Vec<DayCell>) -> Self {
        Self { cells }
    }

    /// The ordered cell sequence, leading padding first.
    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    /// Finds the day cell with the given day number, ignoring padding.
    pub fn day_cell(&self, number: u8) -> Option<&DayCell> {
        self.cells
            .iter()
            .find(|cell| !cell.blank && cell.day_number == Some(number))
    }

    /// Finds a cell by stable id.
    pub fn cell_by_id(&self, id: CellId) -> Option<&DayCell> {
        self.cells.iter().find(|cell| cell.id == id)
    }

    /// Finds a task anywhere in the grid, returning its owning cell too.
    pub fn find_task(&self, task_id: TaskId) -> Option<(&DayCell, &Task)> {
        self.cells.iter().find_map(|cell| {
            cell.tasks()
                .iter()
                .find(|task| task.id == task_id)
                .map(|task| (cell, task))
        })
    }

    /// Checks every cell's invariants.
    pub fn validate(&self) -> Result<(), CalendarValidationError> {
        for cell in &self.cells {
            cell.validate()?;
        }
        Ok(())
    }
}

/// Invariant violations in hand-built or mutated grid values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarValidationError {
    BlankCellWithDayData { cell: CellId },
    MissingDayNumber { cell: CellId },
    DayNumberOutOfRange { cell: CellId, day: u8 },
    MissingTaskList { cell: CellId },
    EmptyTaskDescription { task: TaskId },
}

impl Display for CalendarValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCellWithDayData { cell } => {
                write!(f, "blank cell {cell} must not carry day data")
            }
            Self::MissingDayNumber { cell } => {
                write!(f, "day cell {cell} is missing its day number")
            }
            Self::DayNumberOutOfRange { cell, day } => {
                write!(f, "day cell {cell} has day number {day} outside 1..=31")
            }
            Self::MissingTaskList { cell } => {
                write!(f, "day cell {cell} is missing its task list")
            }
            Self::EmptyTaskDescription { task } => {
                write!(f, "task {task} has an empty description")
            }
        }
    }
}

impl Error for CalendarValidationError {}

#[cfg(test)]
mod tests {
    use super::{CalendarState, CalendarValidationError, DayCell, Task};
    use uuid::Uuid;

    fn fixed_id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn day_cell_constructor_sets_empty_task_list() {
        let cell = DayCell::day(7);
        assert!(!cell.blank);
        assert_eq!(cell.day_number, Some(7));
        assert!(cell.tasks().is_empty());
        cell.validate().unwrap();
    }

    #[test]
    fn blank_cell_carries_no_day_data() {
        let cell = DayCell::blank();
        assert!(cell.blank);
        assert_eq!(cell.day_number, None);
        assert!(cell.tasks.is_none());
        cell.validate().unwrap();
    }

    #[test]
    fn validate_rejects_blank_cell_with_day_data() {
        let mut cell = DayCell::blank_with_id(fixed_id(1));
        cell.day_number = Some(3);

        let err = cell.validate().unwrap_err();
        assert_eq!(
            err,
            CalendarValidationError::BlankCellWithDayData { cell: fixed_id(1) }
        );
    }

    #[test]
    fn validate_rejects_day_number_out_of_range() {
        let mut cell = DayCell::day_with_id(fixed_id(2), 1);
        cell.day_number = Some(32);

        let err = cell.validate().unwrap_err();
        assert_eq!(
            err,
            CalendarValidationError::DayNumberOutOfRange {
                cell: fixed_id(2),
                day: 32
            }
        );
    }

    #[test]
    fn validate_rejects_whitespace_task_description() {
        let task = Task::with_id(fixed_id(3), "   ");
        let err = task.validate().unwrap_err();
        assert_eq!(
            err,
            CalendarValidationError::EmptyTaskDescription { task: fixed_id(3) }
        );
    }

    #[test]
    fn snapshot_shape_uses_expected_wire_fields() {
        let mut day = DayCell::day_with_id(fixed_id(0x20), 5);
        day.tasks
            .as_mut()
            .unwrap()
            .push(Task::with_id(fixed_id(0x21), "water plants"));
        let state = CalendarState::new(vec![DayCell::blank_with_id(fixed_id(0x10)), day]);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json[0]["blank"], true);
        assert!(json[0].get("text").is_none());
        assert!(json[0].get("tasks").is_none());
        assert_eq!(json[1]["blank"], false);
        assert_eq!(json[1]["text"], 5);
        assert_eq!(json[1]["tasks"][0]["description"], "water plants");

        let decoded: CalendarState = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn lookup_helpers_ignore_padding_cells() {
        let state = CalendarState::new(vec![
            DayCell::blank_with_id(fixed_id(0x30)),
            DayCell::day_with_id(fixed_id(0x31), 1),
            DayCell::day_with_id(fixed_id(0x32), 2),
        ]);

        assert_eq!(state.day_cell(2).map(|cell| cell.id), Some(fixed_id(0x32)));
        assert_eq!(state.day_cell(9), None);
        assert_eq!(
            state.cell_by_id(fixed_id(0x30)).map(|cell| cell.blank),
            Some(true)
        );
    }
}
