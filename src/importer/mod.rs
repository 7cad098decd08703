//! Decoding of uploaded todo files.
//!
//! The expected header row is `todo_name,note`. Columns are matched by
//! header name, so a file with unrelated headers still decodes, just into
//! empty rows. Rows may be shorter or longer than the header. Only broken
//! quoting is rejected.

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

use crate::models::TodoCsv;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const TODO_NAME_COLUMN: &str = "todo_name";
const NOTE_COLUMN: &str = "note";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("parse error on line {line}: quoted field is never closed")]
    UnterminatedQuote { line: u64 },

    #[error("parse error on line {line}: extraneous or missing \" in quoted-field")]
    ExtraneousQuote { line: u64 },

    #[error("parse error on line {line}: bare \" in non-quoted-field")]
    BareQuote { line: u64 },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Decodes every data row of `input` into a [`TodoCsv`].
///
/// Zero-byte and header-only input yield an empty vector.
pub fn decode_todos(input: &[u8]) -> Result<Vec<TodoCsv>, DecodeError> {
    check_quoting(input)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let todo_name_at = column(&headers, TODO_NAME_COLUMN);
    let note_at = column(&headers, NOTE_COLUMN);

    let mut todos = Vec::new();
    for record in reader.records() {
        let record = record?;
        todos.push(TodoCsv {
            todo_name: field(&record, todo_name_at),
            note: field(&record, note_at),
        });
    }

    Ok(todos)
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

fn field(record: &StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| record.get(i))
        .unwrap_or_default()
        .to_string()
}

#[derive(Clone, Copy)]
enum Scan {
    FieldStart,
    Unquoted,
    Quoted { opened_on: u64 },
    QuoteClosed,
}

/// Strict RFC 4180 quoting: a quote may only open a field, a quoted field
/// must be closed, and a closing quote must be followed by a delimiter or a
/// line end.
///
/// The csv reader is lenient about all three and would otherwise merge or
/// swallow rows silently.
fn check_quoting(input: &[u8]) -> Result<(), DecodeError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);

    let mut line: u64 = 1;
    let mut state = Scan::FieldStart;

    let mut bytes = input.iter().peekable();
    while let Some(&b) = bytes.next() {
        state = match (state, b) {
            (Scan::Quoted { opened_on }, b'"') => {
                if bytes.peek() == Some(&&b'"') {
                    bytes.next();
                    Scan::Quoted { opened_on }
                } else {
                    Scan::QuoteClosed
                }
            }
            (Scan::Quoted { opened_on }, b'\n') => {
                line += 1;
                Scan::Quoted { opened_on }
            }
            (quoted @ Scan::Quoted { .. }, _) => quoted,

            (Scan::FieldStart, b'"') => Scan::Quoted { opened_on: line },
            (Scan::Unquoted, b'"') => return Err(DecodeError::BareQuote { line }),

            (_, b',') => Scan::FieldStart,
            (_, b'\n') => {
                line += 1;
                Scan::FieldStart
            }
            (current, b'\r') => current,

            (Scan::QuoteClosed, _) => return Err(DecodeError::ExtraneousQuote { line }),
            (Scan::FieldStart | Scan::Unquoted, _) => Scan::Unquoted,
        };
    }

    if let Scan::Quoted { opened_on } = state {
        return Err(DecodeError::UnterminatedQuote { line: opened_on });
    }

    Ok(())
}
