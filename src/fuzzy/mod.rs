//! Fuzzy inference pipeline.
//!
//! ```text
//!  Reading ──▶ Fuzzifier ──▶ RuleBase / infer ──▶ Defuzzifier ──▶ score
//!              (degrees)      (min / max)          (centroid)
//! ```
//!
//! Every stage is a pure function of its inputs and an immutable,
//! pre-validated configuration object.

pub mod defuzz;
pub mod inference;
pub mod membership;
pub mod rules;
pub mod variable;

/// Maximum number of terms per input variable.
pub const MAX_TERMS: usize = 8;

/// Maximum term-name length in bytes.
pub const MAX_TERM_NAME: usize = 32;

/// Maximum number of odor hazard sets.
pub const MAX_HAZARDS: usize = 4;

/// Fixed-capacity term name.
pub type TermName = heapless::String<MAX_TERM_NAME>;
