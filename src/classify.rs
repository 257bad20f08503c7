//! Score → label classification with the putrid-odor override.
//!
//! Thresholds are inclusive upper bounds, checked in ascending order:
//!
//! ```text
//!   score <= poor  → poor
//!   score <= fair  → fair
//!   score <= good  → good
//!   otherwise      → excellent
//! ```
//!
//! A putrid odor category dominates the score: the label becomes
//! [`MaturityLabel::PoorOdor`] and the score is capped at the configured
//! ceiling. The check is on the [`OdorCategory`] enum resolved during
//! fuzzification, never on label text.

use core::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fuzzy::defuzz::{DOMAIN_MAX, DOMAIN_MIN};
use crate::fuzzy::inference::Maturity;
use crate::fuzzy::variable::OdorCategory;

/// Inclusive upper score bounds for the three lower categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub poor: f32,
    pub fair: f32,
    pub good: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            poor: 45.0,
            fair: 75.0,
            good: 92.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = [self.poor, self.fair, self.good];
        if all.iter().any(|t| !(DOMAIN_MIN..=DOMAIN_MAX).contains(t)) {
            return Err(ConfigError::Thresholds("thresholds must lie in [0, 100]"));
        }
        if !(self.poor < self.fair && self.fair < self.good) {
            return Err(ConfigError::Thresholds("thresholds must be strictly ascending"));
        }
        Ok(())
    }

    pub fn category(&self, score: f32) -> Maturity {
        if score <= self.poor {
            Maturity::Poor
        } else if score <= self.fair {
            Maturity::Fair
        } else if score <= self.good {
            Maturity::Good
        } else {
            Maturity::Excellent
        }
    }
}

/// Final maturity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLabel {
    Poor,
    Fair,
    Good,
    Excellent,
    /// Poor because the odor was putrid, whatever the score said.
    PoorOdor,
}

impl MaturityLabel {
    /// Underlying maturity category; the odor variant is `poor`.
    pub fn category(self) -> Maturity {
        match self {
            Self::Poor | Self::PoorOdor => Maturity::Poor,
            Self::Fair => Maturity::Fair,
            Self::Good => Maturity::Good,
            Self::Excellent => Maturity::Excellent,
        }
    }

    pub fn is_odor_override(self) -> bool {
        self == Self::PoorOdor
    }
}

impl From<Maturity> for MaturityLabel {
    fn from(m: Maturity) -> Self {
        match m {
            Maturity::Poor => Self::Poor,
            Maturity::Fair => Self::Fair,
            Maturity::Good => Self::Good,
            Maturity::Excellent => Self::Excellent,
        }
    }
}

impl fmt::Display for MaturityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoorOdor => write!(f, "poor (odor)"),
            other => write!(f, "{}", other.category()),
        }
    }
}

/// Immutable result of one assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Crisp maturity score in `[0, 100]`.
    pub score: f32,
    pub label: MaturityLabel,
}

/// Threshold classifier with the putrid override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classifier {
    thresholds: Thresholds,
    putrid_ceiling: f32,
}

impl Classifier {
    pub fn new(thresholds: Thresholds, putrid_ceiling: f32) -> Result<Self, ConfigError> {
        thresholds.validate()?;
        if !(DOMAIN_MIN..=DOMAIN_MAX).contains(&putrid_ceiling) {
            return Err(ConfigError::Odor("putrid score ceiling must lie in [0, 100]"));
        }
        Ok(Self {
            thresholds,
            putrid_ceiling,
        })
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn putrid_ceiling(&self) -> f32 {
        self.putrid_ceiling
    }

    pub fn classify(&self, score: f32, odor: Option<OdorCategory>) -> Assessment {
        if odor == Some(OdorCategory::Putrid) {
            let capped = score.min(self.putrid_ceiling);
            warn!(
                "odor override: putrid odor forces {} (score {:.2} -> {:.2})",
                MaturityLabel::PoorOdor,
                score,
                capped
            );
            return Assessment {
                score: capped,
                label: MaturityLabel::PoorOdor,
            };
        }
        Assessment {
            score,
            label: self.thresholds.category(score).into(),
        }
    }
}
