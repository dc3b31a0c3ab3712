//! Error types for goon encoding and decoding.
//!
//! Only two things are fatal in this crate: text that does not follow the
//! literal grammar (decode), and values the literal grammar has no spelling
//! for (encode). Everything that goes wrong while binding parsed values to
//! typed destinations is a soft failure and is reported through
//! [`Diagnostics`](crate::Diagnostics) instead.
//!
//! ## Examples
//!
//! ```rust
//! use goon::{decode, Error};
//!
//! let result = decode("broken.goon", "package demo\n\nvar x = []int{1, 2");
//! assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
//!
//! if let Err(err) = result {
//!     // Messages carry file, line and column.
//!     assert!(err.to_string().starts_with("broken.goon:3:"));
//! }
//! ```

use crate::Position;
use std::fmt;
use thiserror::Error;

/// Represents all fatal errors that can occur during goon encoding/decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Input bytes are not UTF-8
    #[error("invalid UTF-8 input: {0}")]
    InvalidUtf8(String),

    /// Text does not follow the literal grammar
    #[error("{position}: {msg}")]
    Syntax { position: Position, msg: String },

    /// Input ended in the middle of a declaration or literal
    #[error("{position}: unexpected end of input, expected {expected}")]
    UnexpectedEof { position: Position, expected: String },

    /// Value has no spelling in the literal grammar
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error at the given position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use goon::{Error, Position};
    ///
    /// let err = Error::syntax(Position::new("data.goon", 12, 2, 5), "expected '}'");
    /// assert_eq!(err.to_string(), "data.goon:2:5: expected '}'");
    /// ```
    pub fn syntax(position: Position, msg: impl Into<String>) -> Self {
        Error::Syntax {
            position,
            msg: msg.into(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(position: Position, expected: impl Into<String>) -> Self {
        Error::UnexpectedEof {
            position,
            expected: expected.into(),
        }
    }

    /// Creates an error for values the encoder cannot spell.
    pub fn unsupported_value(msg: impl Into<String>) -> Self {
        Error::UnsupportedValue(msg.into())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use goon::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Position the error refers to, when it has one.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        match self {
            Error::Syntax { position, .. } | Error::UnexpectedEof { position, .. } => {
                Some(position)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_display_cites_position() {
        let err = Error::syntax(Position::new("a.goon", 0, 3, 7), "expected expression");
        assert_eq!(err.to_string(), "a.goon:3:7: expected expression");
        assert_eq!(err.position().map(|p| p.line), Some(3));
    }

    #[test]
    fn test_eof_display() {
        let err = Error::unexpected_eof(Position::new("", 10, 1, 11), "'}'");
        assert_eq!(err.to_string(), "1:11: unexpected end of input, expected '}'");
    }

    #[test]
    fn test_positionless_errors() {
        assert!(Error::io("disk full").position().is_none());
        assert!(Error::unsupported_value("NaN").to_string().contains("NaN"));
    }
}
