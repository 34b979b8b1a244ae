//! Lightweight scanning of command text.
//!
//! This is not a SQL parser: a small state machine skips string literals, quoted
//! identifiers and comments so that placeholder markers can be counted without a
//! backend round trip.

mod parsers;
mod scanner;

use std::collections::HashMap;

use parsers::{is_block_comment_end, is_block_comment_start, is_line_comment_start, scan_name};
use scanner::{State, scan_digits};

/// Number of arguments a command expects, using SQLite's numbering rules.
///
/// - `?` takes the next index after the largest one seen so far
/// - `?NNN` takes index `NNN`
/// - `:name`, `@name` and `$name` take the next index on first use and reuse it after
///
/// The count is the largest index, which is what the backend reports once prepared.
///
/// ```rust
/// use sql_uow::command::placeholder_count;
///
/// assert_eq!(placeholder_count("insert into lineitem values (?,?,?)"), 3);
/// assert_eq!(placeholder_count("select '?' from t where a = ?1 or b = ?1"), 1);
/// ```
#[must_use]
pub fn placeholder_count(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut state = State::Normal;
    let mut max_index = 0usize;
    let mut named: HashMap<&[u8], usize> = HashMap::new();
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'[' => state = State::Bracketed,
                b'`' => state = State::Backticked,
                _ if is_line_comment_start(bytes, idx) => {
                    state = State::LineComment;
                    idx += 1;
                }
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment;
                    idx += 1;
                }
                b'?' => {
                    if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        let n = digits.parse::<usize>().unwrap_or(usize::MAX);
                        max_index = max_index.max(n);
                        idx = digits_end - 1;
                    } else {
                        max_index += 1;
                    }
                }
                b':' | b'@' | b'$' => {
                    if let Some((name_end, name)) = scan_name(bytes, idx + 1) {
                        if !named.contains_key(name) {
                            max_index += 1;
                            named.insert(name, max_index);
                        }
                        idx = name_end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Bracketed => {
                if b == b']' {
                    state = State::Normal;
                }
            }
            State::Backticked => {
                if b == b'`' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            // SQLite block comments do not nest.
            State::BlockComment => {
                if is_block_comment_end(bytes, idx) {
                    state = State::Normal;
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    max_index
}

/// Whether `name` is a plain (optionally schema-qualified) identifier that can be spliced
/// into command text without quoting.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut parts = 0;
    for part in name.split('.') {
        parts += 1;
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first.is_ascii_alphabetic() || first == '_') {
            return false;
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
    }
    parts <= 2
}
