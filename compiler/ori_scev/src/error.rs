//! Recoverable errors.
//!
//! Building expressions never fails: malformed requests are contract
//! violations and panic at the offending builder. The types here cover the
//! surfaces that read outside input (configuration, layout strings) and the
//! pre-flight check the expander runs before emitting code.

use thiserror::Error;

use crate::ScevId;

/// A configuration override could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The environment variable is set but does not hold a number.
    #[error("{var}: expected a non-negative integer, found `{value}`")]
    InvalidValue { var: &'static str, value: String },
}

/// A data layout string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A numeric field is not a number.
    #[error("invalid number `{text}` in data layout component `{component}`")]
    InvalidNumber { component: String, text: String },
    /// A pointer width outside the supported range.
    #[error("pointer width {bits} in `{component}` is outside 1..=128")]
    InvalidPointerWidth { component: String, bits: u32 },
}

/// An expression cannot be turned back into code safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    /// The expression contains the could-not-compute sentinel.
    #[error("{expr} has no closed form")]
    CouldNotCompute { expr: ScevId },
    /// A sum mixes non-standard pointers that do not share a base, so no
    /// address computation can express it.
    #[error("{sum} combines non-standard pointers with unrelated bases {first} and {second}")]
    UnrelatedPointerBases {
        sum: ScevId,
        first: ScevId,
        second: ScevId,
    },
}
