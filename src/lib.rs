//! Compost maturity grading by Mamdani fuzzy inference.
//!
//! A [`Reading`] of pile temperature, moisture, pH and odor is fuzzified
//! against a declarative rule table, run through min/max inference,
//! defuzzified to a score on `[0, 100]` and classified into a
//! [`MaturityLabel`]. A putrid odor overrides the score.
//!
//! ```text
//!   RuleTableSource ──▶ EngineConfig ──▶ Engine::new (validate once)
//!                                            │
//!   Reading ─────────────────────────────────┴──▶ Engine::assess ──▶ Assessment
//! ```
//!
//! The engine is immutable after construction and holds no I/O, so it can
//! be shared across threads and embedded anywhere.

#![deny(unused_must_use)]

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod ports;

pub use classify::{Assessment, MaturityLabel, Thresholds};
pub use config::EngineConfig;
pub use engine::{Engine, Evaluation};
pub use error::{ConfigError, Error, Result};
pub use fuzzy::inference::Maturity;
pub use fuzzy::variable::{OdorCategory, OdorInput, Reading};
