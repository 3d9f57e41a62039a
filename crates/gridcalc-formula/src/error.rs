use thiserror::Error;

/// Errors raised while turning an infix expression into a tree.
///
/// All of these are recovered locally by the recompute engine and surfaced
/// to the user as a display marker, never as a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("mismatched parentheses")]
    MismatchedParens,

    #[error("invalid token: {0:?}")]
    InvalidLiteral(String),

    #[error("malformed expression")]
    Malformed,

    #[error("expression is empty")]
    Empty,

    #[error("variable name must start with an alphabetic character: {0:?}")]
    InvalidVariableName(String),
}
