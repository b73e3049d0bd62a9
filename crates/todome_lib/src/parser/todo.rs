//! # Reading assignees, due dates and positions out of todo comments.
use chrono::NaiveDate;
use nom::{bytes::complete as bytes, sequence, IResult, Parser};

use crate::{config::ExtractionConfig, Result};

use super::{date::DateFormat, source::TodoComment, TodoRecord};

/// The assignee of a todo that doesn't mention anyone.
pub const UNASSIGNED: &str = "unassigned";

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Eat a mention, eg. `@yahor`, returning the name without the symbol.
///
/// ```rust
/// use todome_lib::parser::todo::*;
///
/// assert_eq!(mention("@")("@yahor due to"), Ok((" due to", "yahor")));
/// assert!(mention("@")("@ yahor").is_err());
/// ```
pub fn mention(symbol: &str) -> impl Fn(&str) -> IResult<&str, &str> + '_ {
    move |i| sequence::preceded(bytes::tag(symbol), bytes::take_while1(is_word_char)).parse(i)
}

/// Find the first mention in a comment. Occurrences of the symbol may
/// overlap, so `@@@yahor` mentions `yahor` when the symbol is `@@`.
///
/// ```rust
/// use todome_lib::parser::todo::*;
///
/// assert_eq!(find_assignee("// TODO: ask @ someone, then @damna_2!", "@"), Some("damna_2"));
/// assert_eq!(find_assignee("// TODO: ask someone", "@"), None);
/// ```
pub fn find_assignee<'a>(comment: &'a str, symbol: &str) -> Option<&'a str> {
    let first = symbol.chars().next()?;
    let parse_mention = mention(symbol);
    comment
        .match_indices(first)
        .find_map(|(at, _)| parse_mention(&comment[at..]).ok().map(|(_, name)| name))
}

/// What was found where a due date should be.
#[derive(Clone, Debug, PartialEq)]
pub enum DueDate<'a> {
    /// None of the due date prefixes appear in the comment.
    Missing,
    /// A prefix appears but the text after it is not a date.
    Unparseable { prefix: &'a str, text: &'a str },
    Date(NaiveDate),
}

impl DueDate<'_> {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DueDate::Date(date) => Some(*date),
            _ => None,
        }
    }
}

/// Look for a due date after the first of `prefixes` that occurs in the
/// comment. Later prefixes are never tried once one has matched, even if the
/// text after it doesn't parse.
///
/// ```rust
/// use chrono::NaiveDate;
/// use todome_lib::parser::{date::DateFormat, todo::*};
///
/// let format = DateFormat::new("dd.MM.yyyy").unwrap();
/// let prefixes = vec!["due to".to_string()];
/// assert_eq!(
///     find_due_date("// TODO: due to 10.10.2023", &prefixes, &format),
///     DueDate::Date(NaiveDate::from_ymd_opt(2023, 10, 10).unwrap())
/// );
/// ```
pub fn find_due_date<'a>(
    comment: &'a str,
    prefixes: &'a [String],
    format: &DateFormat,
) -> DueDate<'a> {
    let found = prefixes
        .iter()
        .find_map(|prefix| comment.find(prefix.as_str()).map(|at| (prefix.as_str(), at)));
    let Some((prefix, at)) = found else {
        return DueDate::Missing;
    };

    let after = &comment[at + prefix.len()..];
    let end = after
        .char_indices()
        .nth(format.window())
        .map(|(end, _)| end)
        .unwrap_or(after.len());
    let text = after[..end].trim();

    match format.parse(text) {
        Some(date) => DueDate::Date(date),
        None => DueDate::Unparseable { prefix, text },
    }
}

/// The 1-based line and column of a byte offset. Lines are split on `\n` and
/// columns count characters.
///
/// ```rust
/// use todome_lib::parser::todo::*;
///
/// assert_eq!(line_and_column("// TODO", 0), (1, 1));
/// assert_eq!(line_and_column("class A {\n    // TODO", 14), (2, 5));
/// ```
pub fn line_and_column(contents: &str, offset: usize) -> (usize, usize) {
    let before = &contents[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|nl| nl + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Turns located todo comments into records.
#[derive(Clone, Debug)]
pub struct TodoExtractor {
    prefixes: Vec<String>,
    format: DateFormat,
    mention_symbol: String,
}

impl TodoExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(TodoExtractor {
            prefixes: config.due_date_prefixes.clone(),
            format: DateFormat::new(&config.date_format)?,
            mention_symbol: config.mention_symbol.clone(),
        })
    }

    pub fn assignee<'a>(&self, comment: &'a str) -> &'a str {
        find_assignee(comment, &self.mention_symbol).unwrap_or(UNASSIGNED)
    }

    pub fn due_date<'a>(&'a self, comment: &'a str) -> DueDate<'a> {
        find_due_date(comment, &self.prefixes, &self.format)
    }

    /// Build the record for one todo comment found in `contents`.
    pub fn extract(&self, todo: &TodoComment<'_>, contents: &str, file_path: &str) -> TodoRecord {
        let (line, column) = line_and_column(contents, todo.offset);
        let due_date = match self.due_date(todo.text) {
            DueDate::Unparseable { prefix, text } => {
                log::debug!(
                    "{file_path}:{line}:{column}: '{text}' after '{prefix}' is not a date like '{}'",
                    self.format.pattern()
                );
                None
            }
            due => due.date(),
        };

        TodoRecord {
            assignee: self.assignee(todo.text).to_string(),
            due_date,
            file_path: file_path.to_string(),
            line,
            column,
        }
    }
}
