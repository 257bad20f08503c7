//! Defuzzification: aggregated degrees → crisp score on `[0, 100]`.
//!
//! The default method is a discretised centroid. The output domain is
//! sampled at a fixed step; at each sample every category's output shape is
//! clipped by that category's aggregated degree, the clipped curves are
//! combined with max, and the score is the weighted mean of the samples.
//! Output memberships are sampled once at construction, so a call costs
//! `samples × 4` min/max operations regardless of the reading.
//!
//! When nothing contributes any area (no rule fired, no hazard) the score
//! is the configured fallback. That value means "no evidence", which is
//! why it is not 0.

use super::inference::{AggregatedOutput, Maturity};
use super::membership::MembershipFn;
use crate::error::ConfigError;

/// Lower bound of the output domain.
pub const DOMAIN_MIN: f32 = 0.0;
/// Upper bound of the output domain.
pub const DOMAIN_MAX: f32 = 100.0;
/// Upper bound on the sampling grid size.
pub const MAX_SAMPLES: usize = 10_001;

/// One grid point with every category's output membership at it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    x: f32,
    mu: [f32; Maturity::COUNT],
}

#[derive(Debug, Clone, PartialEq)]
enum Method {
    Centroid { samples: Vec<Sample> },
    WeightedAverage { centroids: [f32; Maturity::COUNT] },
}

/// Crisp output plus whether the fallback was used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defuzzified {
    pub score: f32,
    pub fallback: bool,
}

/// Immutable defuzzifier built from validated output settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Defuzzifier {
    method: Method,
    fallback_score: f32,
}

fn check_fallback(fallback_score: f32) -> Result<(), ConfigError> {
    if !(DOMAIN_MIN..=DOMAIN_MAX).contains(&fallback_score) {
        return Err(ConfigError::Defuzzification("fallback score must lie in [0, 100]"));
    }
    Ok(())
}

impl Defuzzifier {
    /// Discretised centroid over `[0, 100]` sampled every `step`.
    pub fn centroid(
        shapes: &[MembershipFn; Maturity::COUNT],
        step: f32,
        fallback_score: f32,
    ) -> Result<Self, ConfigError> {
        check_fallback(fallback_score)?;
        if !step.is_finite() || step <= 0.0 || step > DOMAIN_MAX - DOMAIN_MIN {
            return Err(ConfigError::Defuzzification("step must lie in (0, 100]"));
        }
        // Sized in f32 first; a tiny step saturates the usize cast.
        let intervals = ((DOMAIN_MAX - DOMAIN_MIN) / step + 1e-4).floor();
        if intervals + 1.0 > MAX_SAMPLES as f32 {
            return Err(ConfigError::Defuzzification("step yields too many samples"));
        }
        let intervals = intervals as usize;
        let samples: Vec<Sample> = (0..=intervals)
            .map(|i| {
                let x = (DOMAIN_MIN + i as f32 * step).min(DOMAIN_MAX);
                Sample {
                    x,
                    mu: core::array::from_fn(|m| shapes[m].degree(x)),
                }
            })
            .collect();
        for m in Maturity::ALL {
            if samples.iter().all(|s| s.mu[m.index()] == 0.0) {
                return Err(ConfigError::Defuzzification(
                    "an output shape has no area on the sampling grid",
                ));
            }
        }
        Ok(Self {
            method: Method::Centroid { samples },
            fallback_score,
        })
    }

    /// Degree-weighted mean of fixed per-category representative points.
    pub fn weighted_average(
        centroids: [f32; Maturity::COUNT],
        fallback_score: f32,
    ) -> Result<Self, ConfigError> {
        check_fallback(fallback_score)?;
        if centroids.iter().any(|c| !(DOMAIN_MIN..=DOMAIN_MAX).contains(c)) {
            return Err(ConfigError::Defuzzification("centroids must lie in [0, 100]"));
        }
        Ok(Self {
            method: Method::WeightedAverage { centroids },
            fallback_score,
        })
    }

    pub fn fallback_score(&self) -> f32 {
        self.fallback_score
    }

    /// Number of grid points (0 for the weighted-average method).
    pub fn sample_count(&self) -> usize {
        match &self.method {
            Method::Centroid { samples } => samples.len(),
            Method::WeightedAverage { .. } => 0,
        }
    }

    pub fn defuzzify(&self, aggregated: &AggregatedOutput) -> Defuzzified {
        let (num, den) = match &self.method {
            Method::Centroid { samples } => {
                let mut num = 0.0f64;
                let mut den = 0.0f64;
                for s in samples {
                    let combined = Maturity::ALL
                        .iter()
                        .map(|m| s.mu[m.index()].min(aggregated.get(*m)))
                        .fold(0.0f32, f32::max);
                    num += f64::from(s.x) * f64::from(combined);
                    den += f64::from(combined);
                }
                (num, den)
            }
            Method::WeightedAverage { centroids } => aggregated.iter().fold(
                (0.0f64, 0.0f64),
                |(num, den), (m, degree)| {
                    (
                        num + f64::from(degree) * f64::from(centroids[m.index()]),
                        den + f64::from(degree),
                    )
                },
            ),
        };
        if den <= 0.0 {
            return Defuzzified {
                score: self.fallback_score,
                fallback: true,
            };
        }
        Defuzzified {
            score: ((num / den) as f32).clamp(DOMAIN_MIN, DOMAIN_MAX),
            fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: [MembershipFn; 4] = [
        MembershipFn::Trapezoid([0.0, 0.0, 30.0, 50.0]),
        MembershipFn::Triangle([40.0, 60.0, 80.0]),
        MembershipFn::Triangle([70.0, 85.0, 95.0]),
        MembershipFn::Trapezoid([90.0, 95.0, 100.0, 100.0]),
    ];

    fn only(category: Maturity, degree: f32) -> AggregatedOutput {
        let mut agg = AggregatedOutput::default();
        agg.raise(category, degree);
        agg
    }

    #[test]
    fn step_two_gives_fifty_one_samples() {
        let d = Defuzzifier::centroid(&SHAPES, 2.0, 50.0).unwrap();
        assert_eq!(d.sample_count(), 51);
    }

    #[test]
    fn full_excellent_centroid() {
        let d = Defuzzifier::centroid(&SHAPES, 2.0, 50.0).unwrap();
        let out = d.defuzzify(&only(Maturity::Excellent, 1.0));
        // samples 92:.4 94:.8 96..100:1 → 406 / 4.2
        assert!((out.score - 96.666_67).abs() < 1e-3);
        assert!(!out.fallback);
    }

    #[test]
    fn full_poor_centroid_is_low() {
        let d = Defuzzifier::centroid(&SHAPES, 2.0, 50.0).unwrap();
        let out = d.defuzzify(&only(Maturity::Poor, 1.0));
        assert!(out.score < 25.0, "poor centroid {}", out.score);
    }

    #[test]
    fn clipping_lowers_the_excellent_peak() {
        let d = Defuzzifier::centroid(&SHAPES, 2.0, 50.0).unwrap();
        let full = d.defuzzify(&only(Maturity::Excellent, 1.0)).score;
        let half = d.defuzzify(&only(Maturity::Excellent, 0.5)).score;
        assert!(half < full);
        // 92:.4 94..100:.5 → 230.8 / 2.4
        assert!((half - 96.166_67).abs() < 1e-3);
    }

    #[test]
    fn zero_evidence_uses_fallback() {
        let d = Defuzzifier::centroid(&SHAPES, 2.0, 50.0).unwrap();
        let out = d.defuzzify(&AggregatedOutput::default());
        assert_eq!(out.score, 50.0);
        assert!(out.fallback);
        let w = Defuzzifier::weighted_average([20.0, 60.0, 85.0, 96.0], 42.0).unwrap();
        assert_eq!(w.defuzzify(&AggregatedOutput::default()).score, 42.0);
    }

    #[test]
    fn weighted_average_matches_hand_calculation() {
        let w = Defuzzifier::weighted_average([20.0, 60.0, 85.0, 96.0], 50.0).unwrap();
        let mut agg = only(Maturity::Good, 0.5);
        agg.raise(Maturity::Excellent, 0.5);
        let out = w.defuzzify(&agg);
        assert!((out.score - 90.5).abs() < 1e-4);
        assert_eq!(w.sample_count(), 0);
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(Defuzzifier::centroid(&SHAPES, 0.0, 50.0).is_err());
        assert!(Defuzzifier::centroid(&SHAPES, f32::NAN, 50.0).is_err());
        assert!(Defuzzifier::centroid(&SHAPES, 0.001, 50.0).is_err());
        assert!(Defuzzifier::centroid(&SHAPES, 2.0, 150.0).is_err());
        assert!(Defuzzifier::weighted_average([20.0, 60.0, 85.0, 120.0], 50.0).is_err());
        let mut off_grid = SHAPES;
        off_grid[1] = MembershipFn::Triangle([200.0, 210.0, 220.0]);
        assert!(Defuzzifier::centroid(&off_grid, 2.0, 50.0).is_err());
    }

    #[test]
    fn vanishing_step_is_an_error_not_an_overflow() {
        for step in [1e-30, f32::MIN_POSITIVE, 1e-45] {
            assert_eq!(
                Defuzzifier::centroid(&SHAPES, step, 50.0).err(),
                Some(ConfigError::Defuzzification("step yields too many samples")),
                "step {step}"
            );
        }
        assert!(Defuzzifier::centroid(&SHAPES, 0.02, 50.0).is_ok());
    }

    #[test]
    fn uneven_step_keeps_domain_end() {
        let d = Defuzzifier::centroid(&SHAPES, 3.0, 50.0).unwrap();
        // 0, 3, …, 99
        assert_eq!(d.sample_count(), 34);
        let out = d.defuzzify(&only(Maturity::Excellent, 1.0));
        assert!(out.score > 90.0 && out.score <= 100.0);
    }
}
