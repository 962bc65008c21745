//! Command execution over the calendar service.
//!
//! # Responsibility
//! - Resolve user dialogs before invoking mutations, per the core contract.
//! - Render the grid as text and translate errors for the terminal.
//!
//! # Invariants
//! - Validation rejections are surfaced through the alert dialog, never as
//!   process failures.
//! - Edit is only invoked with a non-empty, non-cancelled prompt reply.
//! - Delete is only invoked after an affirmative confirmation.

use crate::dialog::Dialog;
use calgrid_core::db::DbError;
use calgrid_core::{
    CalendarService, CellId, RepoError, ServiceError, SnapshotRepository, TaskId,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};

/// Failures surfaced by the calgrid binary.
#[derive(Debug)]
pub enum AppError {
    Service(ServiceError),
    Repo(RepoError),
    Db(DbError),
    Io(io::Error),
    Logging(String),
    NoDataDir,
    UnknownTask(String),
    AmbiguousTask(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Logging(message) => write!(f, "{message}"),
            Self::NoDataDir => write!(f, "no platform data directory available; pass --db"),
            Self::UnknownTask(reference) => write!(f, "no task matches `{reference}`"),
            Self::AmbiguousTask(reference) => {
                write!(f, "`{reference}` matches more than one task; use a longer id")
            }
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Logging(_) | Self::NoDataDir => None,
            Self::UnknownTask(_) | Self::AmbiguousTask(_) => None,
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for AppError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<io::Error> for AppError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// The command layer: a calendar service plus resolved user dialogs.
pub struct App<R: SnapshotRepository, D: Dialog> {
    service: CalendarService<R>,
    dialog: D,
}

impl<R: SnapshotRepository, D: Dialog> App<R, D> {
    pub fn new(service: CalendarService<R>, dialog: D) -> Self {
        Self { service, dialog }
    }

    /// Renders the weekday header, the day grid and the task list.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        let state = self.service.state();

        writeln!(out, " Sun  Mon  Tue  Wed  Thu  Fri  Sat")?;
        for (index, cell) in state.cells().iter().enumerate() {
            match cell.day_number {
                Some(day) => write!(out, "{day:>4}")?,
                None => write!(out, "    ")?,
            }
            if index % 7 == 6 {
                writeln!(out)?;
            }
        }
        if state.cells().len() % 7 != 0 {
            writeln!(out)?;
        }

        let mut wrote_heading = false;
        for cell in state.cells() {
            for task in cell.tasks() {
                if !wrote_heading {
                    writeln!(out)?;
                    wrote_heading = true;
                }
                writeln!(
                    out,
                    "{:>4}  {}  [{}]",
                    cell.day_number.unwrap_or_default(),
                    task.description,
                    short_id(task.id)
                )?;
            }
        }
        Ok(())
    }

    /// Adds a task; validation rejections go to the alert dialog.
    pub fn add_task(&mut self, date: &str, description: &str) -> Result<(), AppError> {
        match self.service.add_task(date, description) {
            Ok(_) => Ok(()),
            Err(err) if err.is_validation() => {
                self.dialog.alert(&format!("{err}"));
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Edits a task after prompting for the new description.
    ///
    /// A cancelled prompt or a whitespace-only reply skips the mutation.
    pub fn edit_task(&mut self, task_reference: &str) -> Result<(), AppError> {
        let (cell_id, task_id, current) = self.resolve_task(task_reference)?;
        let Some(reply) = self.dialog.prompt_text("Edit your task:", &current)? else {
            return Ok(());
        };
        if reply.trim().is_empty() {
            return Ok(());
        }
        self.service.edit_task(cell_id, task_id, &reply)?;
        Ok(())
    }

    /// Deletes a task after an affirmative confirmation.
    pub fn delete_task(&mut self, task_reference: &str) -> Result<(), AppError> {
        let (cell_id, task_id, _) = self.resolve_task(task_reference)?;
        if !self
            .dialog
            .confirm("Are you sure you want to delete this task?")?
        {
            return Ok(());
        }
        self.service.delete_task(cell_id, task_id)?;
        Ok(())
    }

    /// Resolves a task id or unique id prefix against the current grid.
    fn resolve_task(&self, reference: &str) -> Result<(CellId, TaskId, String), AppError> {
        let needle = reference.trim().to_ascii_lowercase();
        let mut found: Option<(CellId, TaskId, String)> = None;
        for cell in self.service.state().cells() {
            for task in cell.tasks() {
                if !task.id.to_string().starts_with(&needle) {
                    continue;
                }
                if found.is_some() {
                    return Err(AppError::AmbiguousTask(reference.to_string()));
                }
                found = Some((cell.id, task.id, task.description.clone()));
            }
        }
        found.ok_or_else(|| AppError::UnknownTask(reference.to_string()))
    }
}

fn short_id(id: TaskId) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::{App, AppError};
    use crate::dialog::Dialog;
    use calgrid_core::{CalendarService, MemorySnapshotRepository};
    use chrono::NaiveDate;
    use std::collections::VecDeque;
    use std::io;

    /// Canned dialog answers, recording every alert.
    #[derive(Default)]
    struct ScriptedDialog {
        confirms: VecDeque<bool>,
        prompts: VecDeque<Option<String>>,
        alerts: Vec<String>,
        prompt_defaults: Vec<String>,
    }

    impl Dialog for ScriptedDialog {
        fn confirm(&mut self, _message: &str) -> io::Result<bool> {
            Ok(self.confirms.pop_front().unwrap_or(false))
        }

        fn prompt_text(&mut self, _message: &str, default: &str) -> io::Result<Option<String>> {
            self.prompt_defaults.push(default.to_string());
            Ok(self.prompts.pop_front().unwrap_or(None))
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
    }

    fn may_app() -> App<MemorySnapshotRepository, ScriptedDialog> {
        let reference = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let service =
            CalendarService::initialize_at(MemorySnapshotRepository::new(), reference).unwrap();
        App::new(service, ScriptedDialog::default())
    }

    fn task_reference(app: &App<MemorySnapshotRepository, ScriptedDialog>, day: u8) -> String {
        app.service.state().day_cell(day).unwrap().tasks()[0]
            .id
            .to_string()
    }

    #[test]
    fn add_surfaces_validation_failures_as_alerts() {
        let mut app = may_app();

        app.add_task("not a date", "Meeting").unwrap();
        app.add_task("2024-05-03", "   ").unwrap();

        assert_eq!(app.dialog.alerts.len(), 2);
        assert!(app.dialog.alerts[0].contains("not a valid calendar date"));
        assert!(app.dialog.alerts[1].contains("cannot be empty"));
        assert!(app.service.state().day_cell(3).unwrap().tasks().is_empty());
    }

    #[test]
    fn edit_prompts_with_the_current_description_and_applies_the_reply() {
        let mut app = may_app();
        app.add_task("2024-05-03", "Dentist").unwrap();
        app.dialog.prompts.push_back(Some("Dentist 3pm".to_string()));
        let reference = task_reference(&app, 3);

        app.edit_task(&reference).unwrap();

        assert_eq!(app.dialog.prompt_defaults, vec!["Dentist".to_string()]);
        assert_eq!(
            app.service.state().day_cell(3).unwrap().tasks()[0].description,
            "Dentist 3pm"
        );
    }

    #[test]
    fn cancelled_or_blank_edit_prompt_leaves_the_task_alone() {
        let mut app = may_app();
        app.add_task("2024-05-03", "Dentist").unwrap();
        let reference = task_reference(&app, 3);

        app.dialog.prompts.push_back(None);
        app.edit_task(&reference).unwrap();

        app.dialog.prompts.push_back(Some("   ".to_string()));
        app.edit_task(&reference).unwrap();

        assert_eq!(
            app.service.state().day_cell(3).unwrap().tasks()[0].description,
            "Dentist"
        );
    }

    #[test]
    fn delete_only_proceeds_on_an_affirmative_confirmation() {
        let mut app = may_app();
        app.add_task("2024-05-03", "Dentist").unwrap();
        let reference = task_reference(&app, 3);

        app.dialog.confirms.push_back(false);
        app.delete_task(&reference).unwrap();
        assert_eq!(app.service.state().day_cell(3).unwrap().tasks().len(), 1);

        app.dialog.confirms.push_back(true);
        app.delete_task(&reference).unwrap();
        assert!(app.service.state().day_cell(3).unwrap().tasks().is_empty());
    }

    #[test]
    fn task_references_resolve_by_unique_prefix() {
        let mut app = may_app();
        app.add_task("2024-05-03", "Dentist").unwrap();
        let full = task_reference(&app, 3);
        app.dialog.confirms.push_back(true);

        app.delete_task(&full[..8]).unwrap();

        assert!(app.service.state().day_cell(3).unwrap().tasks().is_empty());
    }

    #[test]
    fn unknown_and_ambiguous_task_references_are_rejected() {
        let mut app = may_app();
        app.add_task("2024-05-03", "Dentist").unwrap();
        app.add_task("2024-05-04", "Groceries").unwrap();

        assert!(matches!(
            app.edit_task("zzzzzzzz"),
            Err(AppError::UnknownTask(_))
        ));
        // The empty prefix matches every task.
        assert!(matches!(
            app.edit_task(""),
            Err(AppError::AmbiguousTask(_))
        ));
    }

    #[test]
    fn render_shows_the_header_grid_and_tasks() {
        let mut app = may_app();
        app.add_task("2024-05-03", "Dentist").unwrap();

        let mut out = Vec::new();
        app.render(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with(" Sun  Mon  Tue  Wed  Thu  Fri  Sat"));
        // May 2024 starts on a Wednesday: three leading pads on row one.
        assert!(text.contains("   1"));
        assert!(text.contains("  31"));
        assert!(text.contains("Dentist"));
    }
}
