//! Error types for netstring decoding.
//!
//! Building and rendering messages never fails; only reading rendered
//! netstring output back can.

use thiserror::Error;

/// Result type for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for decoding operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A segment claims more bytes than remain in the input.
    #[error("unexpected end of input: needed {needed} bytes, only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Length prefix is missing, not decimal, or has a leading zero.
    #[error("invalid netstring length at byte {position}")]
    InvalidLength { position: usize },

    /// Length prefix does not fit in a `usize`.
    #[error("netstring length overflow at byte {position}")]
    LengthOverflow { position: usize },

    /// A framing byte (`:` or `,`) was not where it should be.
    #[error("expected {expected:?} at byte {position}, found {found:?}")]
    UnexpectedByte {
        expected: char,
        found: char,
        position: usize,
    },

    /// Rendered output must end with exactly one newline.
    #[error("missing trailing newline")]
    MissingNewline,

    /// A `1:=,` marker with no value after it.
    #[error("field marker without value at byte {position}")]
    DanglingField { position: usize },
}

impl Error {
    /// Creates an unexpected end of input error.
    pub fn unexpected_eof(needed: usize, available: usize) -> Self {
        Self::UnexpectedEof { needed, available }
    }

    /// Creates an unexpected byte error.
    pub fn unexpected_byte(expected: u8, found: u8, position: usize) -> Self {
        Self::UnexpectedByte {
            expected: expected as char,
            found: found as char,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unexpected_eof(5, 2);
        assert_eq!(
            err.to_string(),
            "unexpected end of input: needed 5 bytes, only 2 available"
        );

        let err = Error::unexpected_byte(b':', b'x', 3);
        assert_eq!(err.to_string(), "expected ':' at byte 3, found 'x'");
    }
}
