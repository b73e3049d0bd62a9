//! Listing todos by due date and verifying that every todo has one.
use chrono::{Local, NaiveDate};
use std::{collections::BTreeMap, path::Path};

use crate::{
    config::ScanConfig,
    parser::{scan_directory, todo::UNASSIGNED},
    Result, TodoRecord,
};

/// Somewhere to put report lines. Each line comes with the todo it is about,
/// so that a terminal can, say, color the assignee.
pub trait OutputSink {
    fn append_line(&mut self, todo: &TodoRecord, line: &str);
}

impl OutputSink for Vec<String> {
    fn append_line(&mut self, _: &TodoRecord, line: &str) {
        self.push(line.to_string());
    }
}

/// How a report ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure {
        reason: String,
        /// The todos that caused the failure.
        records: Vec<TodoRecord>,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Lists todos that have a due date, ordered by that date.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListMode {
    /// Only list todos assigned to this name.
    pub assignee: Option<String>,
    pub sort: SortDirection,
    /// Only list todos due before `today`, and fail if there are any.
    pub overdue_only: bool,
    pub today: NaiveDate,
}

impl Default for ListMode {
    fn default() -> Self {
        ListMode {
            assignee: None,
            sort: SortDirection::default(),
            overdue_only: false,
            today: Local::now().date_naive(),
        }
    }
}

impl ListMode {
    pub fn accepts(&self, todo: &TodoRecord) -> bool {
        todo.due_date.is_some()
            && self
                .assignee
                .as_ref()
                .map_or(true, |assignee| &todo.assignee == assignee)
    }

    pub fn format(&self, todo: &TodoRecord) -> String {
        let due_date = todo
            .due_date
            .map(|date| date.to_string())
            .unwrap_or_default();
        format!(
            "Found {} TODO in {} with a due date of {due_date}.",
            todo.assignee,
            todo.location()
        )
    }

    /// Todos are keyed by their due date, so of two todos due on the same day
    /// only the one found last is listed.
    pub fn report(&self, todos: Vec<TodoRecord>, sink: &mut dyn OutputSink) -> Outcome {
        let mut by_due_date = BTreeMap::new();
        for todo in todos.into_iter() {
            if let Some(date) = todo.due_date {
                by_due_date.insert(date.to_string(), todo);
            }
        }

        let mut sorted = by_due_date.into_values().collect::<Vec<_>>();
        if self.sort == SortDirection::Descending {
            sorted.reverse();
        }
        if self.overdue_only {
            sorted.retain(|todo| todo.due_date.is_some_and(|date| date < self.today));
        }

        for todo in sorted.iter() {
            sink.append_line(todo, &self.format(todo));
        }

        if self.overdue_only && !sorted.is_empty() {
            Outcome::Failure {
                reason: format!(
                    "Found {} with due dates in the past. TIME TO SOLVE IT!",
                    count_todos(sorted.len())
                ),
                records: sorted,
            }
        } else {
            Outcome::Success
        }
    }
}

/// Fails when any todo has no due date, or one that can't be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerifyMode;

impl VerifyMode {
    pub fn accepts(&self, todo: &TodoRecord) -> bool {
        todo.due_date.is_none()
    }

    pub fn format(&self, todo: &TodoRecord) -> String {
        format!(
            "Found {} TODO in {} without a valid due date.",
            todo.assignee,
            todo.location()
        )
    }

    pub fn report(&self, todos: Vec<TodoRecord>, sink: &mut dyn OutputSink) -> Outcome {
        if todos.is_empty() {
            return Outcome::Success;
        }

        for todo in todos.iter() {
            sink.append_line(todo, &self.format(todo));
        }
        let locations = todos
            .iter()
            .map(|todo| {
                if todo.assignee == UNASSIGNED {
                    todo.location()
                } else {
                    format!("{} at {}", todo.assignee, todo.location())
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        Outcome::Failure {
            reason: format!(
                "Found {} without a due date ({locations}). Please check the log for more details.",
                count_todos(todos.len())
            ),
            records: todos,
        }
    }
}

fn count_todos(n: usize) -> String {
    if n == 1 {
        "1 TODO".to_string()
    } else {
        format!("{n} TODOs")
    }
}

/// What to do with the todos found by a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportMode {
    List(ListMode),
    Verify(VerifyMode),
}

impl ReportMode {
    pub fn accepts(&self, todo: &TodoRecord) -> bool {
        match self {
            ReportMode::List(mode) => mode.accepts(todo),
            ReportMode::Verify(mode) => mode.accepts(todo),
        }
    }

    pub fn format(&self, todo: &TodoRecord) -> String {
        match self {
            ReportMode::List(mode) => mode.format(todo),
            ReportMode::Verify(mode) => mode.format(todo),
        }
    }

    /// Report on todos that were already filtered with [`ReportMode::accepts`].
    pub fn report(&self, todos: Vec<TodoRecord>, sink: &mut dyn OutputSink) -> Outcome {
        match self {
            ReportMode::List(mode) => mode.report(todos, sink),
            ReportMode::Verify(mode) => mode.report(todos, sink),
        }
    }

    /// Keep the todos this mode is interested in.
    pub fn filter(&self, todos: Vec<TodoRecord>) -> Vec<TodoRecord> {
        todos.into_iter().filter(|todo| self.accepts(todo)).collect()
    }

    /// Scan `root`, filter and report. Errors are reserved for scans that
    /// couldn't finish; a failed check is an [`Outcome::Failure`].
    pub fn run(
        &self,
        root: &Path,
        config: &ScanConfig,
        sink: &mut dyn OutputSink,
    ) -> Result<Outcome> {
        let todos = scan_directory(root, config)?;
        Ok(self.report(self.filter(todos), sink))
    }
}
