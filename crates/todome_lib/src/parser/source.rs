//! # Finding todo comments in source code.
//!
//! Comments are found with a couple of small parsers run over the raw text of
//! a file. There is no lexer, so a string literal like `"http://x"` is seen as
//! the start of a line comment.
use nom::{branch, bytes::complete as bytes, combinator, sequence, IResult, Parser};

/// The token that makes a comment a todo comment.
pub const TODO_TAG: &str = "TODO";

/// Eat a block comment, returning all of it including the delimiters.
/// The comment ends at the first `*/`.
///
/// ```rust
/// use todome_lib::parser::source::*;
///
/// assert_eq!(
///     block_comment("/* TODO: one */ /* two */"),
///     Ok((" /* two */", "/* TODO: one */"))
/// );
/// assert!(block_comment("/* never closed").is_err());
/// ```
pub fn block_comment(i: &str) -> IResult<&str, &str> {
    combinator::recognize(sequence::delimited(
        bytes::tag("/*"),
        bytes::take_until("*/"),
        bytes::tag("*/"),
    ))
    .parse(i)
}

/// Eat a line comment up to (but not including) the end of the line or the
/// end of the input.
///
/// ```rust
/// use todome_lib::parser::source::*;
///
/// assert_eq!(
///     line_comment("// TODO: fix\nlet x = 1;"),
///     Ok(("\nlet x = 1;", "// TODO: fix"))
/// );
/// assert_eq!(line_comment("// TODO: fix"), Ok(("", "// TODO: fix")));
/// ```
pub fn line_comment(i: &str) -> IResult<&str, &str> {
    combinator::recognize((bytes::tag("//"), bytes::take_till(|c: char| c == '\n'))).parse(i)
}

/// Eat any comment. Block comments are tried first.
pub fn comment(i: &str) -> IResult<&str, &str> {
    branch::alt((block_comment, line_comment)).parse(i)
}

/// A todo comment and the byte offset where it starts in its file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TodoComment<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// Find every comment containing [`TODO_TAG`], left to right.
///
/// Comments never overlap: once a comment has been eaten, searching resumes
/// after its end, whether or not it was a todo.
///
/// ```rust
/// use todome_lib::parser::source::*;
///
/// let src = "/* license */\nclass A { // TODO: split\n  /* TODO: rename\n  */ }";
/// let todos = todo_comments(src);
/// assert_eq!(
///     todos,
///     vec![
///         TodoComment { text: "// TODO: split", offset: 24 },
///         TodoComment { text: "/* TODO: rename\n  */", offset: 41 },
///     ]
/// );
/// ```
pub fn todo_comments(contents: &str) -> Vec<TodoComment<'_>> {
    let mut todos = vec![];
    let mut offset = 0;

    while let Some(slash) = contents[offset..].find('/') {
        let start = offset + slash;
        let i = &contents[start..];
        match comment(i) {
            Ok((rest, text)) => {
                if text.contains(TODO_TAG) {
                    log::trace!("  found a todo comment at byte {start}");
                    todos.push(TodoComment {
                        text,
                        offset: start,
                    });
                }
                offset = contents.len() - rest.len();
            }
            Err(_) => {
                offset = start + 1;
            }
        }
    }

    todos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(contents: &str) -> Vec<&str> {
        todo_comments(contents)
            .into_iter()
            .map(|todo| todo.text)
            .collect()
    }

    #[test]
    fn finds_line_and_block_todos() {
        // Single line TODO comment with newline
        assert_eq!(texts("// TODO: fix this\n"), vec!["// TODO: fix this"]);
        // Single line TODO comment without newline
        assert_eq!(texts("// TODO: fix this"), vec!["// TODO: fix this"]);
        // Multi line TODO comment with newline
        assert_eq!(texts("/* TODO: fix this */\n"), vec!["/* TODO: fix this */"]);
        // Multi line TODO comment without newline
        assert_eq!(texts("/* TODO: fix this */"), vec!["/* TODO: fix this */"]);
    }

    #[test]
    fn block_todos_span_lines() {
        let src = "/**\n * TODO: explain\n * @since 1.0\n */\nclass A {}\n";
        assert_eq!(
            texts(src),
            vec!["/**\n * TODO: explain\n * @since 1.0\n */"]
        );
    }

    #[test]
    fn the_tag_is_case_sensitive() {
        assert!(texts("// todo: lower case\n/* Todo */\n").is_empty());
    }

    #[test]
    fn plain_comments_and_code_are_skipped() {
        let src = "int a = 4 / 2; // just math\n/* nothing here */ int b; // TODO: b\n";
        assert_eq!(texts(src), vec!["// TODO: b"]);
    }

    #[test]
    fn comments_do_not_overlap() {
        // The line comment markers inside the block are part of the block.
        let src = "/* TODO: one // TODO: two */ // TODO: three";
        assert_eq!(
            texts(src),
            vec!["/* TODO: one // TODO: two */", "// TODO: three"]
        );

        // A block opener inside a line comment does not start a block.
        let src = "// see /* TODO\nx(); */";
        assert_eq!(texts(src), vec!["// see /* TODO"]);
    }

    #[test]
    fn unclosed_block_is_not_a_todo() {
        assert!(texts("/* TODO: never closed").is_empty());
        // ...but a line comment inside it still is.
        assert_eq!(
            texts("/* never closed\n// TODO: later"),
            vec!["// TODO: later"]
        );
    }

    #[test]
    fn string_literals_are_not_understood() {
        let src = "String url = \"http://example.com\"; // TODO: config\n";
        assert_eq!(
            texts(src),
            vec!["//example.com\"; // TODO: config"]
        );
    }

    #[test]
    fn offsets_are_byte_offsets() {
        let src = "é // TODO";
        assert_eq!(
            todo_comments(src),
            vec![TodoComment {
                text: "// TODO",
                offset: 3
            }]
        );
    }
}
