//! Error types for units parsing.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Units parsing errors.
///
/// Each variant carries the offending units specification verbatim. A
/// failed parse yields no partial result: callers treat an error as
/// scale zero and an empty exponent vector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid numeric multiplier in '{0}'")]
    InvalidMultiplier(String),

    #[error("dangling binary operator in '{0}'")]
    DanglingOperator(String),

    #[error("consecutive binary operators in '{0}'")]
    ConsecutiveOperators(String),

    #[error("invalid symbol in unit context in '{0}'")]
    InvalidSymbol(String),

    #[error("invalid symbol in exponent context in '{0}'")]
    InvalidExponent(String),

    #[error("function in invalid context in '{0}'")]
    FunctionContext(String),

    #[error("unbalanced parentheses in '{0}'")]
    UnbalancedParen(String),

    #[error("unbalanced bracket in '{0}'")]
    UnbalancedBracket(String),

    #[error("internal parser error in '{0}'")]
    Internal(String),
}
