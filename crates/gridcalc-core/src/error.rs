use std::fmt;
use thiserror::Error;

/// Evaluation failures surfaced in a cell's display value.
///
/// These are not Rust errors: the recompute engine recovers locally and the
/// marker string becomes the cell value. Division by zero is deliberately
/// absent; it yields infinity or NaN, which display as ordinary numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellError {
    /// Formula could not be parsed, names a bad cell, or reads a
    /// non-numeric operand
    InvalidReference,
    /// Accepting the formula would close a reference cycle
    CircularReference,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellError::InvalidReference => write!(f, "#REF!"),
            CellError::CircularReference => write!(f, "#CIRCULAR!"),
        }
    }
}

/// Cell-name parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("malformed cell name: {0:?}")]
    Malformed(String),
}
