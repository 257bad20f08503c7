//! Linguistic input variables and the fuzzifier.
//!
//! Each of the four sensed quantities owns an ordered term set. Fuzzifying
//! a reading evaluates **every** term, so terms that do not match are
//! present with degree 0 rather than missing. Readings are never clamped
//! or rejected: a value outside every term's support simply yields an
//! all-zero [`Degrees`].
//!
//! The odor axis also carries the safety signals:
//! - the continuous hazard degree (max over the configured hazard sets)
//! - the discrete [`OdorCategory`], resolved once here so downstream stages
//!   branch on an enum instead of inspecting label text.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::membership::MembershipFn;
use super::{MAX_HAZARDS, MAX_TERM_NAME, MAX_TERMS, TermName};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Variable identity
// ---------------------------------------------------------------------------

/// The four sensed inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum InputVariable {
    /// Pile temperature (°C).
    Temperature = 0,
    /// Moisture content (%).
    Moisture = 1,
    /// Acidity (pH).
    Acidity = 2,
    /// Odor / ammonia indicator (unit depends on the rule table).
    Odor = 3,
}

impl InputVariable {
    pub const COUNT: usize = 4;

    /// All inputs in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Temperature,
        Self::Moisture,
        Self::Acidity,
        Self::Odor,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Moisture => "moisture",
            Self::Acidity => "acidity",
            Self::Odor => "odor",
        }
    }
}

impl fmt::Display for InputVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Odor encoding
// ---------------------------------------------------------------------------

/// Discrete odor selector offered to manual-entry callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdorCategory {
    /// No noticeable odor.
    None,
    /// Noticeable but tolerable odor.
    Moderate,
    /// Putrid / pungent odor. Forces the odor override label.
    Putrid,
}

impl OdorCategory {
    pub const ALL: [Self; 3] = [Self::None, Self::Moderate, Self::Putrid];
}

impl fmt::Display for OdorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Moderate => write!(f, "moderate"),
            Self::Putrid => write!(f, "putrid"),
        }
    }
}

/// How raw odor levels are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdorMode {
    /// Levels are category codes; each level resolves to an [`OdorCategory`].
    #[default]
    Categorical,
    /// Levels are a continuous measurement (e.g. NH3 ppm) with no category.
    Continuous,
}

/// Crisp odor-axis value standing in for each category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OdorCodes {
    pub none: f32,
    pub moderate: f32,
    pub putrid: f32,
}

impl Default for OdorCodes {
    fn default() -> Self {
        Self {
            none: 1.5,
            moderate: 5.0,
            putrid: 9.0,
        }
    }
}

impl OdorCodes {
    pub fn code(&self, category: OdorCategory) -> f32 {
        match category {
            OdorCategory::None => self.none,
            OdorCategory::Moderate => self.moderate,
            OdorCategory::Putrid => self.putrid,
        }
    }

    /// Highest category whose code does not exceed `level`.
    /// Levels below every code (and NaN) resolve to [`OdorCategory::None`].
    pub fn classify(&self, level: f32) -> OdorCategory {
        if level >= self.putrid {
            OdorCategory::Putrid
        } else if level >= self.moderate {
            OdorCategory::Moderate
        } else {
            OdorCategory::None
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let codes = [self.none, self.moderate, self.putrid];
        if codes.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Odor("category code is not finite"));
        }
        if !(self.none < self.moderate && self.moderate < self.putrid) {
            return Err(ConfigError::Odor("category codes must be strictly ascending"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

/// Odor as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdorInput {
    /// Raw value on the odor axis.
    Level(f32),
    /// Discrete selector; converted to its configured code.
    Category(OdorCategory),
}

/// One set of sensed values. No validation: any `f32` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature_c: f32,
    pub moisture_pct: f32,
    pub ph: f32,
    pub odor: OdorInput,
}

impl Reading {
    /// Four plain numbers, odor given as a level on the odor axis.
    pub fn new(temperature_c: f32, moisture_pct: f32, ph: f32, odor_level: f32) -> Self {
        Self {
            temperature_c,
            moisture_pct,
            ph,
            odor: OdorInput::Level(odor_level),
        }
    }

    /// Odor given as a discrete category.
    pub fn with_category(temperature_c: f32, moisture_pct: f32, ph: f32, odor: OdorCategory) -> Self {
        Self {
            temperature_c,
            moisture_pct,
            ph,
            odor: OdorInput::Category(odor),
        }
    }
}

// ---------------------------------------------------------------------------
// Terms and variables
// ---------------------------------------------------------------------------

/// A named fuzzy set over one input axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    name: TermName,
    shape: MembershipFn,
}

impl Term {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &MembershipFn {
        &self.shape
    }
}

fn term_name(variable: InputVariable, name: &str) -> Result<TermName, ConfigError> {
    let bad = || ConfigError::BadTermName {
        variable,
        term: name.to_owned(),
    };
    if name.is_empty() || name.len() > MAX_TERM_NAME {
        return Err(bad());
    }
    let mut out = TermName::new();
    out.push_str(name).map_err(|()| bad())?;
    Ok(out)
}

/// Membership degrees for one variable, indexed like its term list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Degrees {
    values: heapless::Vec<f32, MAX_TERMS>,
}

impl Degrees {
    /// Degree of the term at `index`; 0 for an index the variable lacks.
    pub fn get(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when no term has a positive degree.
    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|d| *d == 0.0)
    }
}

/// An input variable together with its ordered term set.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    variable: InputVariable,
    terms: heapless::Vec<Term, MAX_TERMS>,
}

impl LinguisticVariable {
    /// Build and validate a term set. Rejects empty or oversize sets,
    /// bad or duplicate names and malformed shapes.
    pub fn new<'a>(
        variable: InputVariable,
        terms: impl IntoIterator<Item = (&'a str, MembershipFn)>,
    ) -> Result<Self, ConfigError> {
        let mut out: heapless::Vec<Term, MAX_TERMS> = heapless::Vec::new();
        let mut overflow = 0usize;
        for (name, shape) in terms {
            let name = term_name(variable, name)?;
            if out.iter().any(|t| t.name == name) {
                return Err(ConfigError::DuplicateTerm {
                    variable,
                    term: name.as_str().to_owned(),
                });
            }
            shape.validate().map_err(|reason| ConfigError::InvalidShape {
                owner: format!("{variable}.{name}"),
                reason,
            })?;
            if out.push(Term { name, shape }).is_err() {
                overflow += 1;
            }
        }
        if overflow > 0 {
            return Err(ConfigError::TooManyTerms {
                variable,
                count: out.len() + overflow,
            });
        }
        if out.is_empty() {
            return Err(ConfigError::EmptyVariable(variable));
        }
        Ok(Self {
            variable,
            terms: out,
        })
    }

    pub fn variable(&self) -> InputVariable {
        self.variable
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Position of the term called `name`.
    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Evaluate every term at `x`.
    pub fn fuzzify(&self, x: f32) -> Degrees {
        Degrees {
            values: self.terms.iter().map(|t| t.shape.degree(x)).collect(),
        }
    }
}

/// A hazard membership set over the odor axis.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardSet {
    name: TermName,
    shape: MembershipFn,
}

impl HazardSet {
    pub fn new(name: &str, shape: MembershipFn) -> Result<Self, ConfigError> {
        let name = term_name(InputVariable::Odor, name)?;
        shape.validate().map_err(|reason| ConfigError::InvalidShape {
            owner: format!("hazard.{name}"),
            reason,
        })?;
        Ok(Self { name, shape })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn degree(&self, x: f32) -> f32 {
        self.shape.degree(x)
    }
}

// ---------------------------------------------------------------------------
// Fuzzified input
// ---------------------------------------------------------------------------

/// Result of fuzzifying one [`Reading`]. Built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzifiedInput {
    degrees: [Degrees; InputVariable::COUNT],
    /// Crisp value used on the odor axis (the level, or the category code).
    pub odor_level: f32,
    /// Max over the hazard sets at `odor_level`; 0 when none are configured.
    pub hazard: f32,
    /// Resolved odor category, if the input or mode provides one.
    pub odor_category: Option<OdorCategory>,
}

impl FuzzifiedInput {
    pub fn degrees(&self, variable: InputVariable) -> &Degrees {
        &self.degrees[variable.index()]
    }

    /// Degree of term `index` of `variable`; 0 if the term is absent.
    pub fn degree(&self, variable: InputVariable, index: usize) -> f32 {
        self.degrees[variable.index()].get(index)
    }

    /// The categorical odor override applies.
    pub fn is_putrid(&self) -> bool {
        self.odor_category == Some(OdorCategory::Putrid)
    }
}

// ---------------------------------------------------------------------------
// Fuzzifier
// ---------------------------------------------------------------------------

/// Maps raw readings to membership degrees. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Fuzzifier {
    variables: [LinguisticVariable; InputVariable::COUNT],
    mode: OdorMode,
    codes: OdorCodes,
    hazards: heapless::Vec<HazardSet, MAX_HAZARDS>,
}

impl Fuzzifier {
    /// `variables` must be in [`InputVariable::ALL`] order.
    pub fn new(
        variables: [LinguisticVariable; InputVariable::COUNT],
        mode: OdorMode,
        codes: OdorCodes,
        hazards: impl IntoIterator<Item = HazardSet>,
    ) -> Result<Self, ConfigError> {
        for (expected, var) in InputVariable::ALL.iter().zip(&variables) {
            if var.variable != *expected {
                return Err(ConfigError::Decode(format!(
                    "variable {} supplied in the {expected} slot",
                    var.variable
                )));
            }
        }
        codes.validate()?;
        let mut list = heapless::Vec::new();
        for hazard in hazards {
            list.push(hazard)
                .map_err(|_| ConfigError::Odor("too many hazard sets"))?;
        }
        Ok(Self {
            variables,
            mode,
            codes,
            hazards: list,
        })
    }

    pub fn variable(&self, variable: InputVariable) -> &LinguisticVariable {
        &self.variables[variable.index()]
    }

    pub fn mode(&self) -> OdorMode {
        self.mode
    }

    pub fn codes(&self) -> &OdorCodes {
        &self.codes
    }

    pub fn hazards(&self) -> &[HazardSet] {
        &self.hazards
    }

    /// Resolve the odor input to a crisp axis value and optional category.
    pub fn resolve_odor(&self, odor: OdorInput) -> (f32, Option<OdorCategory>) {
        match odor {
            OdorInput::Category(c) => (self.codes.code(c), Some(c)),
            OdorInput::Level(level) => match self.mode {
                OdorMode::Categorical => (level, Some(self.codes.classify(level))),
                OdorMode::Continuous => (level, None),
            },
        }
    }

    /// Fuzzify all four inputs.
    pub fn fuzzify(&self, reading: &Reading) -> FuzzifiedInput {
        let (odor_level, odor_category) = self.resolve_odor(reading.odor);
        let crisp = [reading.temperature_c, reading.moisture_pct, reading.ph, odor_level];
        let degrees = core::array::from_fn(|i| self.variables[i].fuzzify(crisp[i]));
        let hazard = self
            .hazards
            .iter()
            .map(|h| h.degree(odor_level))
            .fold(0.0f32, f32::max);
        FuzzifiedInput {
            degrees,
            odor_level,
            hazard,
            odor_category,
        }
    }
}
