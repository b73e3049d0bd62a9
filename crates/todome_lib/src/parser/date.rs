//! # Date patterns.
//!
//! Due dates are described with the letter patterns used by Java's
//! `DateTimeFormatter`, eg. `dd.MM.yyyy` or `d MMM yyyy`. A pattern is
//! compiled once, before any files are read, and parsed as strictly as Java
//! does: `dd` wants exactly two digits, `yy` is a year in 2000..=2099 and
//! month and weekday names are case-sensitive.
use chrono::{format::Parsed, NaiveDate, Weekday};
use nom::{
    branch, bytes::complete as bytes, character::complete as character, combinator, multi,
    sequence, IResult, Parser,
};
use snafu::OptionExt;

use crate::{DateFormatSnafu, Result};

/// One piece of a date pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternItem<'a> {
    /// A run of the same pattern letter, eg. `dd` or `yyyy`.
    Field(&'a str),
    /// Text that must appear as-is.
    Literal(&'a str),
    /// A doubled single quote, which stands for one quote.
    Quote,
}

/// Eat a run of one repeated ASCII letter.
///
/// ```rust
/// use todome_lib::parser::date::*;
///
/// assert_eq!(field("yyyy.MM"), Ok((".MM", PatternItem::Field("yyyy"))));
/// ```
pub fn field(i: &str) -> IResult<&str, PatternItem<'_>> {
    let (_, first) = character::satisfy(|c: char| c.is_ascii_alphabetic()).parse(i)?;
    let (i, run) = bytes::take_while1(move |c: char| c == first).parse(i)?;
    Ok((i, PatternItem::Field(run)))
}

/// Eat quoted text, eg. `'at'`. Two quotes in a row are a literal quote.
///
/// ```rust
/// use todome_lib::parser::date::*;
///
/// assert_eq!(quoted("'of' yyyy"), Ok((" yyyy", PatternItem::Literal("of"))));
/// assert_eq!(quoted("''yyyy"), Ok(("yyyy", PatternItem::Quote)));
/// ```
pub fn quoted(i: &str) -> IResult<&str, PatternItem<'_>> {
    let (i, text) = sequence::delimited(
        character::char('\''),
        bytes::take_while(|c: char| c != '\''),
        character::char('\''),
    )
    .parse(i)?;
    if text.is_empty() {
        Ok((i, PatternItem::Quote))
    } else {
        Ok((i, PatternItem::Literal(text)))
    }
}

/// Eat punctuation and spaces between fields.
pub fn literal(i: &str) -> IResult<&str, PatternItem<'_>> {
    combinator::map(
        bytes::take_while1(|c: char| !c.is_ascii_alphabetic() && c != '\''),
        PatternItem::Literal,
    )
    .parse(i)
}

/// Split a whole pattern into its items.
///
/// ```rust
/// use todome_lib::parser::date::*;
///
/// assert_eq!(
///     pattern_items("dd.MM.yyyy"),
///     Ok((
///         "",
///         vec![
///             PatternItem::Field("dd"),
///             PatternItem::Literal("."),
///             PatternItem::Field("MM"),
///             PatternItem::Literal("."),
///             PatternItem::Field("yyyy"),
///         ]
///     ))
/// );
/// ```
pub fn pattern_items(i: &str) -> IResult<&str, Vec<PatternItem<'_>>> {
    combinator::all_consuming(multi::many0(branch::alt((field, quoted, literal)))).parse(i)
}

const MONTHS: [(&str, i64); 12] = [
    ("January", 1),
    ("February", 2),
    ("March", 3),
    ("April", 4),
    ("May", 5),
    ("June", 6),
    ("July", 7),
    ("August", 8),
    ("September", 9),
    ("October", 10),
    ("November", 11),
    ("December", 12),
];

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("Monday", Weekday::Mon),
    ("Tuesday", Weekday::Tue),
    ("Wednesday", Weekday::Wed),
    ("Thursday", Weekday::Thu),
    ("Friday", Weekday::Fri),
    ("Saturday", Weekday::Sat),
    ("Sunday", Weekday::Sun),
];

/// A compiled pattern field. Numeric fields carry how many digits they take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DateField {
    Year { min: usize },
    /// `yy`: exactly two digits, read as 2000 plus the value.
    ReducedYear,
    Month { min: usize },
    MonthName { full: bool },
    Day { min: usize },
    DayOfYear { min: usize },
    DayOfWeek { full: bool },
}

impl DateField {
    fn compile(run: &str) -> Option<Self> {
        let letter = run.chars().next()?;
        let width = run.len();
        let field = match (letter, width) {
            ('y' | 'u', 2) => DateField::ReducedYear,
            ('y' | 'u', 1..=9) => DateField::Year { min: width },
            ('M' | 'L', 1 | 2) => DateField::Month { min: width },
            ('M' | 'L', 3) => DateField::MonthName { full: false },
            ('M' | 'L', 4) => DateField::MonthName { full: true },
            ('d', 1 | 2) => DateField::Day { min: width },
            ('D', 1..=3) => DateField::DayOfYear { min: width },
            ('E', 1..=3) => DateField::DayOfWeek { full: false },
            ('E', 4) => DateField::DayOfWeek { full: true },
            _ => return None,
        };
        Some(field)
    }

    /// Eat this field's text and record its value.
    fn parse<'a>(&self, i: &'a str, parsed: &mut Parsed) -> Option<&'a str> {
        let (i, set) = match *self {
            DateField::Year { min } => {
                let (i, year) = number(min, 9)(i).ok()?;
                (i, parsed.set_year(year))
            }
            DateField::ReducedYear => {
                let (i, year) = number(2, 2)(i).ok()?;
                (i, parsed.set_year(2000 + year))
            }
            DateField::Month { min } => {
                let (i, month) = number(min, 2)(i).ok()?;
                (i, parsed.set_month(month))
            }
            DateField::MonthName { full } => {
                let (i, month) = name(&MONTHS, full)(i).ok()?;
                (i, parsed.set_month(month))
            }
            DateField::Day { min } => {
                let (i, day) = number(min, 2)(i).ok()?;
                (i, parsed.set_day(day))
            }
            DateField::DayOfYear { min } => {
                let (i, ordinal) = number(min, 3)(i).ok()?;
                (i, parsed.set_ordinal(ordinal))
            }
            DateField::DayOfWeek { full } => {
                let (i, weekday) = name(&WEEKDAYS, full)(i).ok()?;
                (i, parsed.set_weekday(weekday))
            }
        };
        set.ok()?;
        Some(i)
    }
}

/// Eat between `min` and `max` ASCII digits.
fn number(min: usize, max: usize) -> impl Fn(&str) -> IResult<&str, i64> {
    move |i| {
        combinator::map_res(
            bytes::take_while_m_n(min, max, |c: char| c.is_ascii_digit()),
            |digits: &str| digits.parse::<i64>(),
        )
        .parse(i)
    }
}

/// Eat a month or weekday name, or its three letter short form.
fn name<T: Copy>(
    names: &'static [(&'static str, T)],
    full: bool,
) -> impl Fn(&str) -> IResult<&str, T> {
    move |i| {
        names
            .iter()
            .find_map(|(name, value)| {
                let name: &str = if full { name } else { &name[..3] };
                i.strip_prefix(name).map(|rest| (rest, *value))
            })
            .ok_or(nom::Err::Error(nom::error::Error::new(
                i,
                nom::error::ErrorKind::Tag,
            )))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Field(DateField),
    Text(String),
}

/// A compiled due date pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct DateFormat {
    pattern: String,
    pieces: Vec<Piece>,
}

impl DateFormat {
    /// Compile a Java-style date pattern. The pattern must name a year and
    /// either a month and day, or a day of the year.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use todome_lib::parser::date::DateFormat;
    ///
    /// let format = DateFormat::new("d MMM yyyy").unwrap();
    /// assert_eq!(format.parse("3 Dec 2011"), NaiveDate::from_ymd_opt(2011, 12, 3));
    /// assert!(DateFormat::new("HH:mm").is_err());
    /// assert!(DateFormat::new("dd.MM").is_err());
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        snafu::ensure!(
            !pattern.trim().is_empty(),
            DateFormatSnafu {
                format: pattern,
                reason: "the pattern is empty",
            }
        );
        let (_, items) = pattern_items(pattern).map_err(|e| {
            DateFormatSnafu {
                format: pattern,
                reason: e.to_string(),
            }
            .build()
        })?;

        let mut pieces = vec![];
        for item in items.into_iter() {
            let piece = match item {
                PatternItem::Field(run) => {
                    Piece::Field(DateField::compile(run).context(DateFormatSnafu {
                        format: pattern,
                        reason: format!("unsupported pattern letters '{run}'"),
                    })?)
                }
                PatternItem::Literal(text) => Piece::Text(text.to_string()),
                PatternItem::Quote => Piece::Text("'".to_string()),
            };
            pieces.push(piece);
        }

        let has = |wanted: fn(&DateField) -> bool| {
            pieces
                .iter()
                .any(|piece| matches!(piece, Piece::Field(field) if wanted(field)))
        };
        let has_year = has(|f| matches!(f, DateField::Year { .. } | DateField::ReducedYear));
        let has_month = has(|f| matches!(f, DateField::Month { .. } | DateField::MonthName { .. }));
        let has_day = has(|f| matches!(f, DateField::Day { .. }));
        let has_day_of_year = has(|f| matches!(f, DateField::DayOfYear { .. }));
        snafu::ensure!(
            has_year && ((has_month && has_day) || has_day_of_year),
            DateFormatSnafu {
                format: pattern,
                reason: "the pattern does not describe a whole date",
            }
        );

        Ok(DateFormat {
            pattern: pattern.to_string(),
            pieces,
        })
    }

    /// The pattern as it was configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// How many characters after a due date prefix are looked at. This is
    /// one more than the pattern's length, which leaves room for the space
    /// that usually follows the prefix.
    pub fn window(&self) -> usize {
        self.pattern.chars().count() + 1
    }

    /// Parse a date, returning `None` if it doesn't fit the pattern exactly
    /// or isn't a real date.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        let mut parsed = Parsed::new();
        let mut i = text;
        for piece in self.pieces.iter() {
            i = match piece {
                Piece::Text(literal) => i.strip_prefix(literal.as_str())?,
                Piece::Field(field) => field.parse(i, &mut parsed)?,
            };
        }
        if !i.is_empty() {
            return None;
        }
        parsed.to_naive_date().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn default_pattern() {
        let format = DateFormat::new("dd.MM.yyyy").unwrap();
        assert_eq!(format.window(), 11);
        assert_eq!(format.parse("10.10.2023"), ymd(2023, 10, 10));
        assert_eq!(format.parse("01.02.2024"), ymd(2024, 2, 1));
    }

    #[test]
    fn two_letter_fields_want_two_digits() {
        let format = DateFormat::new("dd.MM.yyyy").unwrap();
        assert_eq!(format.parse("1.10.2023"), None);
        assert_eq!(format.parse("10.1.2023"), None);
        assert_eq!(format.parse("010.10.2023"), None);
        assert_eq!(format.parse("10.10.23"), None);
    }

    #[test]
    fn one_letter_fields_take_one_or_two_digits() {
        let format = DateFormat::new("d.M.yyyy").unwrap();
        assert_eq!(format.parse("1.2.2023"), ymd(2023, 2, 1));
        assert_eq!(format.parse("01.12.2023"), ymd(2023, 12, 1));
        assert_eq!(format.parse("123.1.2023"), None);
    }

    #[test]
    fn two_digit_years_are_in_this_century() {
        let format = DateFormat::new("dd.MM.yy").unwrap();
        assert_eq!(format.parse("10.10.70"), ymd(2070, 10, 10));
        assert_eq!(format.parse("10.10.23"), ymd(2023, 10, 10));
        assert_eq!(format.parse("10.10.2023"), None);
    }

    #[test]
    fn month_names() {
        let format = DateFormat::new("d MMM yyyy").unwrap();
        assert_eq!(format.parse("3 Dec 2011"), ymd(2011, 12, 3));
        assert_eq!(format.parse("3 dec 2011"), None);
        assert_eq!(format.parse("3 DEC 2011"), None);
        assert_eq!(format.parse("3 December 2011"), None);

        let format = DateFormat::new("MMMM d, yyyy").unwrap();
        assert_eq!(format.parse("March 9, 2024"), ymd(2024, 3, 9));
        assert_eq!(format.parse("march 9, 2024"), None);
    }

    #[test]
    fn weekdays_must_agree_with_the_date() {
        let format = DateFormat::new("EEE dd.MM.yyyy").unwrap();
        assert_eq!(format.parse("Tue 10.10.2023"), ymd(2023, 10, 10));
        assert_eq!(format.parse("Mon 10.10.2023"), None);
        assert_eq!(format.parse("tue 10.10.2023"), None);
    }

    #[test]
    fn day_of_year() {
        let format = DateFormat::new("yyyy-DDD").unwrap();
        assert_eq!(format.parse("2024-060"), ymd(2024, 2, 29));
        assert_eq!(format.parse("2024-60"), None);
    }

    #[test]
    fn quoted_text_and_percent() {
        let format = DateFormat::new("yyyy-MM-dd'T'").unwrap();
        assert_eq!(format.parse("2025-02-01T"), ymd(2025, 2, 1));

        let format = DateFormat::new("dd%MM%yyyy").unwrap();
        assert_eq!(format.parse("01%02%2025"), ymd(2025, 2, 1));

        let format = DateFormat::new("dd''MM''yyyy").unwrap();
        assert_eq!(format.parse("01'02'2025"), ymd(2025, 2, 1));
    }

    #[test]
    fn rejects_bad_dates() {
        let format = DateFormat::new("dd.MM.yyyy").unwrap();
        assert_eq!(format.parse("32.10.2023"), None);
        assert_eq!(format.parse("10.13.2023"), None);
        assert_eq!(format.parse("29.02.2023"), None);
        assert_eq!(format.parse("10.10.2023 "), None);
        assert_eq!(format.parse("tomorrow"), None);
        assert_eq!(format.parse(""), None);
    }

    #[test]
    fn rejects_bad_patterns() {
        assert!(DateFormat::new("").is_err());
        assert!(DateFormat::new("dd.MM.yyyy HH:mm").is_err());
        assert!(DateFormat::new("'unclosed").is_err());
        assert!(DateFormat::new("dddd.MM.yyyy").is_err());
        assert!(DateFormat::new("MM.yyyy").is_err());
        assert!(DateFormat::new("dd.MM").is_err());
    }
}
