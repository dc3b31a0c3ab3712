//! Source positions attached to tokens, syntax nodes and generic values.

use serde::Serialize;
use std::fmt;

/// A location in literal text.
///
/// `offset` is the byte offset from the start of the input; `line` and
/// `column` are 1-based, with columns counted in characters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub filename: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(filename: impl Into<String>, offset: usize, line: usize, column: usize) -> Self {
        Position {
            filename: filename.into(),
            offset,
            line,
            column,
        }
    }

    /// Returns `true` for a position that never pointed into any text.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.filename.is_empty() {
            write!(f, "{}", self.filename)?;
            if self.is_valid() {
                f.write_str(":")?;
            }
        }
        if self.is_valid() {
            write!(f, "{}:{}", self.line, self.column)?;
        } else if self.filename.is_empty() {
            f.write_str("-")?;
        }
        Ok(())
    }
}
