//! Port traits: the boundary between the engine and its collaborators.
//!
//! ```text
//!   RuleTableSource ──▶ Engine ──▶ MaturityAssessor ──▶ caller
//! ```
//!
//! Where a rule table comes from (bundled, a file, a network fetch) is an
//! adapter concern behind [`RuleTableSource`]. Callers that only need a
//! verdict depend on [`MaturityAssessor`] rather than the concrete engine,
//! so they can be tested against a stub.

use crate::classify::Assessment;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::Result;
use crate::fuzzy::variable::Reading;

// ───────────────────────────────────────────────────────────────
// Rule-table source (driven adapter: storage → engine)
// ───────────────────────────────────────────────────────────────

/// Produces a decoded rule table. Implementations report unreachable
/// storage as [`Error::Source`](crate::error::Error::Source) and bad
/// documents as [`Error::Config`](crate::error::Error::Config).
pub trait RuleTableSource {
    fn load(&self) -> Result<EngineConfig>;
}

/// One of the tables compiled into the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BundledTable {
    /// Categorical odor on a 0–10 axis.
    #[default]
    Default,
    /// Continuous ammonia ppm.
    AmmoniaPpm,
}

impl RuleTableSource for BundledTable {
    fn load(&self) -> Result<EngineConfig> {
        Ok(match self {
            Self::Default => EngineConfig::builtin()?,
            Self::AmmoniaPpm => EngineConfig::ammonia_ppm()?,
        })
    }
}

/// A JSON document already held in memory.
#[derive(Debug, Clone, Copy)]
pub struct JsonTable<'a>(pub &'a str);

impl RuleTableSource for JsonTable<'_> {
    fn load(&self) -> Result<EngineConfig> {
        Ok(EngineConfig::from_json_str(self.0)?)
    }
}

// ───────────────────────────────────────────────────────────────
// Assessor (driving port: caller → engine)
// ───────────────────────────────────────────────────────────────

/// Anything that turns a reading into a verdict.
pub trait MaturityAssessor {
    fn assess(&self, reading: &Reading) -> Assessment;
}

impl MaturityAssessor for Engine {
    fn assess(&self, reading: &Reading) -> Assessment {
        Engine::assess(self, reading)
    }
}
