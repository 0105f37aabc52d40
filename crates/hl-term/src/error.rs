//! Error types for term data.

use thiserror::Error;

/// Errors that can occur when parsing colors.
#[derive(Debug, Error)]
pub enum ColorError {
    /// The input is not a `#rgb` or `#rrggbb` hex color.
    #[error("invalid color {input:?}: expected #rgb or #rrggbb")]
    InvalidFormat {
        /// The rejected input.
        input: String,
    },

    /// A character in the input is not a hexadecimal digit.
    #[error("invalid hex digit {digit:?} in color {input:?}")]
    InvalidDigit {
        /// The color being parsed.
        input: String,
        /// The offending character.
        digit: char,
    },
}
