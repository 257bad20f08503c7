//! The assessment pipeline.
//!
//! ```text
//!  Reading ─▶ fuzzify ─▶ infer ─▶ defuzzify ─▶ classify ─▶ Assessment
//! ```
//!
//! An [`Engine`] owns every stage, each immutable after construction, so
//! it is `Send + Sync` and can be shared by reference across threads.
//! Each call builds its own intermediate values; there is no mutable
//! state and no error path during inference.

use log::{debug, info, trace};
use serde::Serialize;

use crate::classify::{Assessment, Classifier};
use crate::config::{EngineConfig, fingerprint_hex};
use crate::error::Result;
use crate::fuzzy::defuzz::Defuzzifier;
use crate::fuzzy::inference::{AggregatedOutput, infer};
use crate::fuzzy::rules::RuleBase;
use crate::fuzzy::variable::{FuzzifiedInput, Fuzzifier, InputVariable, OdorCategory, Reading};
use crate::ports::RuleTableSource;

/// Degrees for one input variable, keyed by term name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableTrace {
    pub variable: InputVariable,
    pub terms: Vec<(String, f32)>,
}

/// Full trace of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub inputs: Vec<VariableTrace>,
    /// Crisp value used on the odor axis.
    pub odor_level: f32,
    pub odor_category: Option<OdorCategory>,
    /// Hazard membership that seeded `poor`.
    pub hazard: f32,
    /// `(rule id, firing strength)` for every rule that fired.
    pub fired: Vec<(u32, f32)>,
    pub aggregated: AggregatedOutput,
    /// No rule or hazard fired; the score is the fallback.
    pub used_fallback: bool,
    pub assessment: Assessment,
}

/// A validated, ready-to-use maturity engine.
#[derive(Debug, Clone)]
pub struct Engine {
    name: String,
    fingerprint: [u8; 32],
    fuzzifier: Fuzzifier,
    rules: RuleBase,
    defuzzifier: Defuzzifier,
    classifier: Classifier,
}

impl Engine {
    /// Validate `config` and build every stage. Nothing is partially built.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let fuzzifier = config.build_fuzzifier()?;
        let rules = config.build_rule_base(&fuzzifier)?;
        let defuzzifier = config.build_defuzzifier()?;
        let classifier = config.build_classifier()?;
        let fingerprint = config.fingerprint()?;
        info!(
            "engine ready: table={} rules={} odor={:?} fingerprint={}",
            config.name,
            rules.len(),
            fuzzifier.mode(),
            fingerprint_hex(&fingerprint)
        );
        Ok(Self {
            name: config.name.clone(),
            fingerprint,
            fuzzifier,
            rules,
            defuzzifier,
            classifier,
        })
    }

    /// Load a table through `source` and build from it.
    pub fn from_source(source: &impl RuleTableSource) -> Result<Self> {
        Self::new(&source.load()?)
    }

    /// Engine over the bundled default table.
    pub fn builtin() -> Result<Self> {
        Self::new(&EngineConfig::builtin()?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// SHA-256 of the rule table this engine was built from.
    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn fuzzifier(&self) -> &Fuzzifier {
        &self.fuzzifier
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    fn run(&self, reading: &Reading) -> Pass {
        let input = self.fuzzifier.fuzzify(reading);
        let aggregated = infer(&self.rules, &input);
        let crisp = self.defuzzifier.defuzzify(&aggregated);
        if crisp.fallback {
            debug!("no rule fired; using fallback score {}", crisp.score);
        }
        let assessment = self.classifier.classify(crisp.score, input.odor_category);
        trace!("assess {reading:?} -> {aggregated:?} -> {assessment:?}");
        Pass {
            input,
            aggregated,
            used_fallback: crisp.fallback,
            assessment,
        }
    }

    /// Score and label one reading.
    pub fn assess(&self, reading: &Reading) -> Assessment {
        self.run(reading).assessment
    }

    /// Like [`assess`](Self::assess) but keeps every intermediate value.
    pub fn evaluate(&self, reading: &Reading) -> Evaluation {
        let Pass {
            input,
            aggregated,
            used_fallback,
            assessment,
        } = self.run(reading);

        let inputs = InputVariable::ALL
            .iter()
            .map(|v| VariableTrace {
                variable: *v,
                terms: self
                    .fuzzifier
                    .variable(*v)
                    .terms()
                    .iter()
                    .zip(input.degrees(*v).as_slice())
                    .map(|(t, d)| (t.name().to_owned(), *d))
                    .collect(),
            })
            .collect();
        let fired = self
            .rules
            .rules()
            .iter()
            .map(|r| (r.id(), r.firing_strength(&input)))
            .filter(|(_, strength)| *strength > 0.0)
            .collect();

        Evaluation {
            inputs,
            odor_level: input.odor_level,
            odor_category: input.odor_category,
            hazard: input.hazard,
            fired,
            aggregated,
            used_fallback,
            assessment,
        }
    }
}

/// Intermediate values of one pass through the pipeline.
struct Pass {
    input: FuzzifiedInput,
    aggregated: AggregatedOutput,
    used_fallback: bool,
    assessment: Assessment,
}
