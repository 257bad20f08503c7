//! Rule base: declarative rule specs and their compiled form.
//!
//! Rules are written against term *names* and compiled once against the
//! fuzzifier's term sets into index form. A name that a variable does not
//! declare fails compilation, so evaluation never meets an unknown term.

use serde::{Deserialize, Serialize};

use super::inference::Maturity;
use super::variable::{Fuzzifier, FuzzifiedInput, InputVariable};
use crate::error::ConfigError;

/// Term names for each input, as written in the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Antecedent {
    pub temperature: String,
    pub moisture: String,
    pub acidity: String,
    pub odor: String,
}

impl Antecedent {
    pub fn term(&self, variable: InputVariable) -> &str {
        match variable {
            InputVariable::Temperature => &self.temperature,
            InputVariable::Moisture => &self.moisture,
            InputVariable::Acidity => &self.acidity,
            InputVariable::Odor => &self.odor,
        }
    }
}

/// One `when … then …` row of the rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// Optional human-facing id; defaults to the 1-based position.
    #[serde(default)]
    pub id: Option<u32>,
    pub when: Antecedent,
    pub then: Maturity,
}

/// A compiled rule: one term index per input plus the consequent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    id: u32,
    antecedent: [usize; InputVariable::COUNT],
    consequent: Maturity,
}

impl Rule {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn consequent(&self) -> Maturity {
        self.consequent
    }

    /// Term index this rule requires for `variable`.
    pub fn term_index(&self, variable: InputVariable) -> usize {
        self.antecedent[variable.index()]
    }

    /// Fuzzy AND (minimum) over the four antecedent degrees.
    /// A term missing from `input` contributes 0.
    pub fn firing_strength(&self, input: &FuzzifiedInput) -> f32 {
        InputVariable::ALL
            .iter()
            .map(|v| input.degree(*v, self.antecedent[v.index()]))
            .fold(1.0f32, f32::min)
    }
}

/// Ordered, read-only collection of compiled rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Compile every spec against the fuzzifier's term sets.
    /// Fails on the first undeclared term; never returns a partial base.
    pub fn compile(specs: &[RuleSpec], fuzzifier: &Fuzzifier) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::NoRules);
        }
        let mut rules = Vec::with_capacity(specs.len());
        for (pos, spec) in specs.iter().enumerate() {
            let id = spec.id.unwrap_or(pos as u32 + 1);
            let mut antecedent = [0usize; InputVariable::COUNT];
            for variable in InputVariable::ALL {
                let term = spec.when.term(variable);
                antecedent[variable.index()] = fuzzifier
                    .variable(variable)
                    .term_index(term)
                    .ok_or_else(|| ConfigError::UndeclaredTerm {
                        rule: id as usize,
                        variable,
                        term: term.to_owned(),
                    })?;
            }
            rules.push(Rule {
                id,
                antecedent,
                consequent: spec.then,
            });
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules concluding `category`, in table order.
    pub fn concluding(&self, category: Maturity) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.consequent == category)
    }
}
