//! Top-level statement scanner for the component source dialect.
//!
//! Splits a source body into top-level statements without building a full
//! expression grammar: the scanner only tracks nesting depth, string and
//! template literals, and comments. A statement ends at a `;` at depth zero,
//! or when a brace block closes back to depth zero (optionally consuming a
//! trailing `;`).

use thiserror::Error;

/// Errors produced while scanning source text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    /// A string literal was still open at end of input.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A template literal was still open at end of input.
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    /// A block comment was still open at end of input.
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// A closing delimiter did not match the innermost open one.
    #[error("unbalanced delimiter '{0}'")]
    UnbalancedDelimiter(char),
}

/// Split a source body into trimmed top-level statements.
///
/// The input must not contain a metadata preamble; callers slice that off
/// first. Empty statements are dropped.
///
/// # Errors
///
/// Returns [`ScanError`] when the text ends inside a string, template, or
/// comment, or when delimiters do not balance.
pub fn split_statements(code: &str) -> Result<Vec<String>, ScanError> {
    let chars: Vec<(usize, char)> = code.char_indices().collect();
    let mut statements: Vec<String> = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut start: usize = 0;
    let mut i: usize = 0;

    // Push the slice [start, end) as a statement if it is non-empty.
    let mut flush = |start: usize, end: usize, statements: &mut Vec<String>| {
        let text = code[start..end].trim();
        if !text.is_empty() {
            statements.push(text.to_owned());
        }
    };

    while i < chars.len() {
        let (_, c) = chars[i];

        // Inside a template literal: only escapes, the closing backtick,
        // and `${` interpolation openings matter.
        if stack.last() == Some(&'`') {
            match c {
                '\\' => i = i.saturating_add(1),
                '`' => {
                    stack.pop();
                }
                '$' if next_char(&chars, i) == Some('{') => {
                    stack.push('{');
                    i = i.saturating_add(1);
                }
                _ => {}
            }
            i = i.saturating_add(1);
            continue;
        }

        match c {
            '/' if next_char(&chars, i) == Some('/') => {
                i = skip_line_comment(&chars, i);
                continue;
            }
            '/' if next_char(&chars, i) == Some('*') => {
                i = skip_block_comment(&chars, i).ok_or(ScanError::UnterminatedComment)?;
                continue;
            }
            '\'' | '"' if string_position(&chars, i) => {
                // A quote with no closing mate on the same line is markup
                // text (e.g. an apostrophe inside element children), not a
                // string literal: JS string literals cannot span raw
                // newlines.
                match skip_string(&chars, i, c) {
                    StringEnd::Closed(next) => {
                        i = next;
                        continue;
                    }
                    StringEnd::Newline => {}
                    StringEnd::Eof => return Err(ScanError::UnterminatedString),
                }
            }
            '`' => stack.push('`'),
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' => {
                let expected = if c == ')' { '(' } else { '[' };
                if stack.pop() != Some(expected) {
                    return Err(ScanError::UnbalancedDelimiter(c));
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return Err(ScanError::UnbalancedDelimiter(c));
                }
                if stack.is_empty() {
                    // A block closing at top level ends the statement only
                    // when `;`, a line break, or end of input follows; a
                    // depth-zero `}` with trailing text is an expression
                    // brace inside markup and the statement continues.
                    let mut j = i.saturating_add(1);
                    while matches!(chars.get(j), Some((_, ' ' | '\t'))) {
                        j = j.saturating_add(1);
                    }
                    match chars.get(j) {
                        Some((_, ';')) => {
                            i = j;
                            let end = byte_end(&chars, j, code);
                            flush(start, end, &mut statements);
                            start = end;
                        }
                        Some((_, '\n' | '\r')) | None => {
                            let end = byte_end(&chars, i, code);
                            flush(start, end, &mut statements);
                            start = end;
                        }
                        Some(_) => {}
                    }
                }
            }
            ';' if stack.is_empty() => {
                let end = byte_end(&chars, i, code);
                flush(start, end, &mut statements);
                start = end;
            }
            _ => {}
        }
        i = i.saturating_add(1);
    }

    match stack.last() {
        Some('`') => return Err(ScanError::UnterminatedTemplate),
        Some(open) => return Err(ScanError::UnbalancedDelimiter(*open)),
        None => {}
    }

    flush(start, code.len(), &mut statements);
    Ok(statements)
}

/// Byte offset just past the character at index `i`.
fn byte_end(chars: &[(usize, char)], i: usize, code: &str) -> usize {
    chars
        .get(i)
        .map(|(pos, c)| pos.saturating_add(c.len_utf8()))
        .unwrap_or(code.len())
}

fn next_char(chars: &[(usize, char)], i: usize) -> Option<char> {
    chars.get(i.saturating_add(1)).map(|(_, c)| *c)
}

/// A quote directly after an identifier or text character is prose (the
/// apostrophe in `it's`), not a string opener. Same adjacency rule the tag
/// scanner applies to `<`.
fn string_position(chars: &[(usize, char)], i: usize) -> bool {
    if i == 0 {
        return true;
    }
    !chars
        .get(i.saturating_sub(1))
        .is_some_and(|(_, c)| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
}

/// Advance past a `//` comment. Returns the index of the newline (or EOF).
fn skip_line_comment(chars: &[(usize, char)], mut i: usize) -> usize {
    while let Some((_, c)) = chars.get(i) {
        if *c == '\n' {
            break;
        }
        i = i.saturating_add(1);
    }
    i
}

/// Advance past a `/* ... */` comment. Returns the index after the closing
/// `*/`, or `None` at EOF.
fn skip_block_comment(chars: &[(usize, char)], mut i: usize) -> Option<usize> {
    i = i.saturating_add(2);
    while let Some((_, c)) = chars.get(i) {
        if *c == '*' && next_char(chars, i) == Some('/') {
            return Some(i.saturating_add(2));
        }
        i = i.saturating_add(1);
    }
    None
}

/// Outcome of scanning for a string literal's closing quote.
enum StringEnd {
    /// Closed normally; holds the index after the closing quote.
    Closed(usize),
    /// A raw newline appeared first: the opening quote was not a string.
    Newline,
    /// End of input reached while still open.
    Eof,
}

/// Advance past a quoted string starting at the opening quote.
fn skip_string(chars: &[(usize, char)], mut i: usize, quote: char) -> StringEnd {
    i = i.saturating_add(1);
    while let Some((_, c)) = chars.get(i) {
        match *c {
            '\\' => i = i.saturating_add(2),
            '\n' => return StringEnd::Newline,
            c if c == quote => return StringEnd::Closed(i.saturating_add(1)),
            _ => i = i.saturating_add(1),
        }
    }
    StringEnd::Eof
}
