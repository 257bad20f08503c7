//! Mamdani inference: min for AND, max for aggregation.
//!
//! ## Evaluation order
//!
//! 1. The odor hazard degree seeds `poor`. It raises the floor of `poor`
//!    only and never lowers another category.
//! 2. Each rule fires at the minimum of its four antecedent degrees.
//! 3. Each category keeps the maximum over its seed and every rule that
//!    concludes it. Max is idempotent and commutative, so rule order and
//!    ties do not matter.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::rules::RuleBase;
use super::variable::FuzzifiedInput;

/// Output categories of the maturity variable, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Maturity {
    Poor = 0,
    Fair = 1,
    Good = 2,
    Excellent = 3,
}

impl Maturity {
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::Poor, Self::Fair, Self::Good, Self::Excellent];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for Maturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregated firing degree per output category, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedOutput {
    degrees: [f32; Maturity::COUNT],
}

impl AggregatedOutput {
    pub fn get(&self, category: Maturity) -> f32 {
        self.degrees[category.index()]
    }

    /// Fuzzy OR: keep the larger of the current and offered degree.
    pub fn raise(&mut self, category: Maturity, degree: f32) {
        let slot = &mut self.degrees[category.index()];
        *slot = slot.max(degree.clamp(0.0, 1.0));
    }

    pub fn iter(&self) -> impl Iterator<Item = (Maturity, f32)> + '_ {
        Maturity::ALL.iter().map(|m| (*m, self.degrees[m.index()]))
    }

    /// Nothing fired: no rule and no hazard contributed.
    pub fn is_empty(&self) -> bool {
        self.degrees.iter().all(|d| *d == 0.0)
    }

    /// Category with the highest degree; ties resolve to the worse one.
    pub fn dominant(&self) -> Option<Maturity> {
        if self.is_empty() {
            return None;
        }
        let mut best = Maturity::Poor;
        for m in Maturity::ALL {
            if self.get(m) > self.get(best) {
                best = m;
            }
        }
        Some(best)
    }
}

/// Evaluate every rule against `input` and aggregate per category.
pub fn infer(rules: &RuleBase, input: &FuzzifiedInput) -> AggregatedOutput {
    let mut out = AggregatedOutput::default();
    out.raise(Maturity::Poor, input.hazard);
    for rule in rules.rules() {
        out.raise(rule.consequent(), rule.firing_strength(input));
    }
    out
}
