//! Unified error types for the maturity engine.
//!
//! Only construction can fail. Once an [`Engine`](crate::engine::Engine)
//! exists, every inference call returns a valid assessment, so nothing on
//! the inference path produces these errors.

use core::fmt;

use crate::fuzzy::inference::Maturity;
use crate::fuzzy::variable::InputVariable;

// ---------------------------------------------------------------------------
// Crate-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The rule table is malformed or failed validation.
    Config(ConfigError),
    /// A rule-table source could not produce a document.
    Source(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Source(msg) => write!(f, "source: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Shape errors
// ---------------------------------------------------------------------------

/// Why a membership-function parameterisation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// A breakpoint is NaN or infinite.
    NonFinite,
    /// Breakpoints are not in non-decreasing order.
    NonMonotonic,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "breakpoint is not finite"),
            Self::NonMonotonic => write!(f, "breakpoints are not non-decreasing"),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Rule-table rejection reasons. Reported for the first violation found.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The document could not be decoded (JSON syntax, missing field,
    /// unknown maturity category, wrong shape arity).
    Decode(String),
    /// The document could not be encoded.
    Encode(String),
    /// An input variable declares no terms.
    EmptyVariable(InputVariable),
    /// An input variable declares more terms than the engine supports.
    TooManyTerms { variable: InputVariable, count: usize },
    /// A term name is empty or longer than the supported maximum.
    BadTermName { variable: InputVariable, term: String },
    /// The same term name appears twice in one variable.
    DuplicateTerm { variable: InputVariable, term: String },
    /// A membership shape has invalid breakpoints.
    InvalidShape { owner: String, reason: ShapeError },
    /// A maturity category has no output membership shape.
    MissingConsequentShape(Maturity),
    /// A rule names a term its variable does not declare.
    UndeclaredTerm {
        rule: usize,
        variable: InputVariable,
        term: String,
    },
    /// The rule table contains no rules.
    NoRules,
    /// Classification thresholds are out of order or out of range.
    Thresholds(&'static str),
    /// Defuzzification settings are unusable.
    Defuzzification(&'static str),
    /// Odor category codes, hazard sets or the putrid ceiling are invalid.
    Odor(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(msg) => write!(f, "decode failed: {msg}"),
            Self::Encode(msg) => write!(f, "encode failed: {msg}"),
            Self::EmptyVariable(v) => write!(f, "{v} declares no terms"),
            Self::TooManyTerms { variable, count } => {
                write!(f, "{variable} declares {count} terms (max {})", crate::fuzzy::MAX_TERMS)
            }
            Self::BadTermName { variable, term } => {
                write!(f, "{variable} term name {term:?} is empty or too long")
            }
            Self::DuplicateTerm { variable, term } => {
                write!(f, "{variable} declares term {term:?} twice")
            }
            Self::InvalidShape { owner, reason } => write!(f, "{owner}: {reason}"),
            Self::MissingConsequentShape(m) => write!(f, "no output shape for {m}"),
            Self::UndeclaredTerm {
                rule,
                variable,
                term,
            } => write!(f, "rule #{rule} references undeclared {variable} term {term:?}"),
            Self::NoRules => write!(f, "rule table has no rules"),
            Self::Thresholds(msg) => write!(f, "thresholds: {msg}"),
            Self::Defuzzification(msg) => write!(f, "defuzzification: {msg}"),
            Self::Odor(msg) => write!(f, "odor: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
