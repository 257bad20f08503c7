//! Declarative rule-table configuration.
//!
//! A rule table is one serde document: term sets for the four inputs, the
//! output shapes, odor handling, the rules themselves, thresholds and
//! defuzzification settings. It is decoded from JSON (or postcard for
//! compact storage) and turned into the immutable pipeline stages by
//! [`Engine::new`](crate::engine::Engine::new). All validation happens in
//! the `build_*` methods; a table that builds never fails at inference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, Thresholds};
use crate::error::ConfigError;
use crate::fuzzy::defuzz::Defuzzifier;
use crate::fuzzy::inference::Maturity;
use crate::fuzzy::membership::MembershipFn;
use crate::fuzzy::rules::{RuleBase, RuleSpec};
use crate::fuzzy::variable::{
    Fuzzifier, HazardSet, InputVariable, LinguisticVariable, OdorCodes, OdorMode,
};

const DEFAULT_TABLE: &str = include_str!("../rules/default.json");
const AMMONIA_PPM_TABLE: &str = include_str!("../rules/ammonia_ppm.json");

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// A named membership shape (input term or hazard set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    pub name: String,
    pub shape: MembershipFn,
}

impl TermSpec {
    fn as_pair(&self) -> (&str, MembershipFn) {
        (self.name.as_str(), self.shape)
    }
}

/// Ordered term sets, one list per input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputsConfig {
    pub temperature: Vec<TermSpec>,
    pub moisture: Vec<TermSpec>,
    pub acidity: Vec<TermSpec>,
    pub odor: Vec<TermSpec>,
}

impl InputsConfig {
    pub fn terms(&self, variable: InputVariable) -> &[TermSpec] {
        match variable {
            InputVariable::Temperature => &self.temperature,
            InputVariable::Moisture => &self.moisture,
            InputVariable::Acidity => &self.acidity,
            InputVariable::Odor => &self.odor,
        }
    }
}

/// Odor interpretation and the two odor overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OdorConfig {
    #[serde(default)]
    pub mode: OdorMode,
    #[serde(default)]
    pub categories: OdorCodes,
    /// Hazard sets seeding `poor`; empty disables the membership override.
    #[serde(default)]
    pub hazards: Vec<TermSpec>,
    #[serde(default = "default_ceiling")]
    pub putrid_score_ceiling: f32,
}

fn default_ceiling() -> f32 {
    40.0
}

impl Default for OdorConfig {
    fn default() -> Self {
        Self {
            mode: OdorMode::default(),
            categories: OdorCodes::default(),
            hazards: Vec::new(),
            putrid_score_ceiling: default_ceiling(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzMethod {
    #[default]
    Centroid,
    WeightedAverage,
}

/// Representative points for weighted-average defuzzification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroids {
    pub poor: f32,
    pub fair: f32,
    pub good: f32,
    pub excellent: f32,
}

impl Centroids {
    fn to_array(self) -> [f32; Maturity::COUNT] {
        [self.poor, self.fair, self.good, self.excellent]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefuzzConfig {
    #[serde(default)]
    pub method: DefuzzMethod,
    /// Sampling step for the centroid method.
    #[serde(default = "default_step")]
    pub step: f32,
    /// Required by the weighted-average method.
    #[serde(default)]
    pub centroids: Option<Centroids>,
    #[serde(default = "default_fallback")]
    pub fallback_score: f32,
}

fn default_step() -> f32 {
    2.0
}

fn default_fallback() -> f32 {
    50.0
}

impl Default for DefuzzConfig {
    fn default() -> Self {
        Self {
            method: DefuzzMethod::Centroid,
            step: default_step(),
            centroids: None,
            fallback_score: default_fallback(),
        }
    }
}

/// A complete rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub name: String,
    pub inputs: InputsConfig,
    pub maturity: BTreeMap<Maturity, MembershipFn>,
    #[serde(default)]
    pub odor: OdorConfig,
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub defuzzification: DefuzzConfig,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl EngineConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Decode(e.to_string()))
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(bytes).map_err(|e| ConfigError::Decode(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Encode(e.to_string()))
    }

    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|e| ConfigError::Decode(e.to_string()))
    }

    pub fn to_postcard(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|e| ConfigError::Encode(e.to_string()))
    }

    /// The bundled 16-rule table with categorical odor on a 0–10 axis.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(DEFAULT_TABLE)
    }

    /// The bundled table reading odor as continuous ammonia ppm.
    pub fn ammonia_ppm() -> Result<Self, ConfigError> {
        Self::from_json_str(AMMONIA_PPM_TABLE)
    }

    /// SHA-256 of the postcard encoding. Identical tables hash identically
    /// regardless of JSON whitespace or key order.
    pub fn fingerprint(&self) -> Result<[u8; 32], ConfigError> {
        Ok(hmac_sha256::Hash::hash(&self.to_postcard()?))
    }
}

/// Lower-case hex rendering of a fingerprint.
pub fn fingerprint_hex(fingerprint: &[u8; 32]) -> String {
    use core::fmt::Write;
    let mut out = String::with_capacity(64);
    for byte in fingerprint {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

// ---------------------------------------------------------------------------
// Building pipeline stages
// ---------------------------------------------------------------------------

impl EngineConfig {
    pub fn build_fuzzifier(&self) -> Result<Fuzzifier, ConfigError> {
        let [t, m, a, o] = InputVariable::ALL
            .map(|v| LinguisticVariable::new(v, self.inputs.terms(v).iter().map(TermSpec::as_pair)));
        let hazards = self
            .odor
            .hazards
            .iter()
            .map(|h| HazardSet::new(&h.name, h.shape))
            .collect::<Result<Vec<_>, _>>()?;
        Fuzzifier::new([t?, m?, a?, o?], self.odor.mode, self.odor.categories, hazards)
    }

    pub fn build_rule_base(&self, fuzzifier: &Fuzzifier) -> Result<RuleBase, ConfigError> {
        RuleBase::compile(&self.rules, fuzzifier)
    }

    /// Output shapes in [`Maturity::ALL`] order.
    pub fn output_shapes(&self) -> Result<[MembershipFn; Maturity::COUNT], ConfigError> {
        let mut shapes = [MembershipFn::Triangle([0.0; 3]); Maturity::COUNT];
        for m in Maturity::ALL {
            let shape = *self
                .maturity
                .get(&m)
                .ok_or(ConfigError::MissingConsequentShape(m))?;
            shape.validate().map_err(|reason| ConfigError::InvalidShape {
                owner: format!("maturity.{m}"),
                reason,
            })?;
            shapes[m.index()] = shape;
        }
        Ok(shapes)
    }

    pub fn build_defuzzifier(&self) -> Result<Defuzzifier, ConfigError> {
        let d = &self.defuzzification;
        match d.method {
            DefuzzMethod::Centroid => {
                Defuzzifier::centroid(&self.output_shapes()?, d.step, d.fallback_score)
            }
            DefuzzMethod::WeightedAverage => {
                // Shapes are still required so every category is declared.
                self.output_shapes()?;
                let centroids = d.centroids.ok_or(ConfigError::Defuzzification(
                    "weighted_average requires centroids",
                ))?;
                Defuzzifier::weighted_average(centroids.to_array(), d.fallback_score)
            }
        }
    }

    pub fn build_classifier(&self) -> Result<Classifier, ConfigError> {
        Classifier::new(self.thresholds, self.odor.putrid_score_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_decode() {
        let c = EngineConfig::builtin().unwrap();
        assert_eq!(c.name, "default");
        assert_eq!(c.rules.len(), 16);
        assert_eq!(c.odor.mode, OdorMode::Categorical);
        assert_eq!(c.maturity.len(), Maturity::COUNT);

        let ppm = EngineConfig::ammonia_ppm().unwrap();
        assert_eq!(ppm.odor.mode, OdorMode::Continuous);
        assert_eq!(ppm.rules.len(), 16);
    }

    #[test]
    fn default_config_is_sane() {
        let c = EngineConfig::builtin().unwrap();
        assert!(c.thresholds.validate().is_ok());
        assert!(c.odor.categories.none < c.odor.categories.putrid);
        assert_eq!(c.defuzzification.method, DefuzzMethod::Centroid);
        assert_eq!(c.defuzzification.fallback_score, 50.0);
        assert_eq!(c.odor.putrid_score_ceiling, 40.0);
        for v in InputVariable::ALL {
            assert_eq!(c.inputs.terms(v).len(), 3, "{v}");
        }
    }

    #[test]
    fn every_stage_builds_from_builtins() {
        for c in [EngineConfig::builtin().unwrap(), EngineConfig::ammonia_ppm().unwrap()] {
            let f = c.build_fuzzifier().unwrap();
            assert_eq!(c.build_rule_base(&f).unwrap().len(), 16);
            assert_eq!(c.build_defuzzifier().unwrap().sample_count(), 51);
            assert!(c.build_classifier().is_ok());
        }
    }

    #[test]
    fn serde_roundtrip() {
        let c = EngineConfig::builtin().unwrap();
        let json = c.to_json_pretty().unwrap();
        let c2 = EngineConfig::from_json_str(&json).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn postcard_roundtrip() {
        let c = EngineConfig::ammonia_ppm().unwrap();
        let bytes = c.to_postcard().unwrap();
        let c2 = EngineConfig::from_postcard(&bytes).unwrap();
        assert_eq!(c, c2);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let c = EngineConfig::builtin().unwrap();
        let same = EngineConfig::from_json_str(&c.to_json_pretty().unwrap()).unwrap();
        assert_eq!(c.fingerprint().unwrap(), same.fingerprint().unwrap());

        let mut changed = c.clone();
        changed.thresholds.good = 91.0;
        assert_ne!(c.fingerprint().unwrap(), changed.fingerprint().unwrap());

        let hex = fingerprint_hex(&c.fingerprint().unwrap());
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn optional_sections_take_defaults() {
        let mut c = EngineConfig::builtin().unwrap();
        c.odor = OdorConfig::default();
        c.thresholds = Thresholds::default();
        c.defuzzification = DefuzzConfig::default();
        let mut value = serde_json::to_value(&c).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("odor");
        obj.remove("thresholds");
        obj.remove("defuzzification");
        let decoded: EngineConfig = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, c);
    }

    #[test]
    fn weighted_average_needs_centroids() {
        let mut c = EngineConfig::builtin().unwrap();
        c.defuzzification.method = DefuzzMethod::WeightedAverage;
        assert_eq!(
            c.build_defuzzifier(),
            Err(ConfigError::Defuzzification("weighted_average requires centroids"))
        );
        c.defuzzification.centroids = Some(Centroids {
            poor: 20.0,
            fair: 60.0,
            good: 85.0,
            excellent: 96.0,
        });
        assert_eq!(c.build_defuzzifier().unwrap().sample_count(), 0);
    }

    #[test]
    fn missing_output_shape_is_reported() {
        let mut c = EngineConfig::builtin().unwrap();
        c.maturity.remove(&Maturity::Good);
        assert_eq!(
            c.build_defuzzifier(),
            Err(ConfigError::MissingConsequentShape(Maturity::Good))
        );
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Decode(_))
        ));
        assert!(matches!(
            EngineConfig::from_postcard(&[0xff, 0x00, 0x13]),
            Err(ConfigError::Decode(_))
        ));
    }
}
