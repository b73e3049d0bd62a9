use chrono::NaiveDate;
use serde::Serialize;
use snafu::ResultExt;
use std::path::Path;

use crate::{config::ScanConfig, finder::FileSearcher, ReadFileSnafu, Result};

pub mod date;
pub mod langs;
pub mod source;
pub mod todo;

use todo::TodoExtractor;

/// A todo comment found in a source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    /// Who the todo is assigned to, or `"unassigned"`.
    pub assignee: String,
    pub due_date: Option<NaiveDate>,
    /// The path of the file, as found while walking the source tree.
    pub file_path: String,
    /// 1-based line of the start of the comment.
    pub line: usize,
    /// 1-based column of the start of the comment.
    pub column: usize,
}

impl TodoRecord {
    /// `path:line:column`.
    ///
    /// ```rust
    /// use todome_lib::TodoRecord;
    ///
    /// let todo = TodoRecord {
    ///     assignee: "unassigned".into(),
    ///     due_date: None,
    ///     file_path: "src/Test.java".into(),
    ///     line: 3,
    ///     column: 5,
    /// };
    /// assert_eq!(todo.location(), "src/Test.java:3:5");
    /// ```
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file_path, self.line, self.column)
    }
}

/// Find all todos in the text of one file.
pub fn scan_contents(extractor: &TodoExtractor, contents: &str, file_path: &str) -> Vec<TodoRecord> {
    source::todo_comments(contents)
        .iter()
        .map(|todo| extractor.extract(todo, contents, file_path))
        .collect()
}

/// Read one file and find its todos. A file that can't be read, or isn't
/// UTF-8, is an error.
pub fn scan_file(extractor: &TodoExtractor, path: &Path) -> Result<Vec<TodoRecord>> {
    log::trace!("Reading {path:?}");
    let contents = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
    let file_path = path.display().to_string();
    Ok(scan_contents(extractor, &contents, &file_path))
}

/// Find all todos in the files below `root`, file by file and in order of
/// appearance within each file. Stops at the first file that can't be read.
pub fn scan_directory(root: &Path, config: &ScanConfig) -> Result<Vec<TodoRecord>> {
    let extractor = TodoExtractor::new(&config.extraction)?;
    let files = FileSearcher::find(root, &config.extensions)?;
    log::debug!("Scanning {} files below {root:?}", files.len());

    let mut todos = vec![];
    for path in files.iter() {
        todos.extend(scan_file(&extractor, path)?);
    }
    log::debug!("Found {} TODOs", todos.len());
    Ok(todos)
}
