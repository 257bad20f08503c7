//! Property tests for the quantitative invariants of the pipeline.

use compost_fuzzy::fuzzy::membership::{trapezoid, triangle};
use compost_fuzzy::fuzzy::variable::InputVariable;
use compost_fuzzy::{Engine, Maturity, MaturityLabel, OdorCategory, Reading};
use proptest::prelude::*;

fn engine() -> Engine {
    Engine::builtin().unwrap()
}

fn ppm_engine() -> Engine {
    Engine::from_source(&compost_fuzzy::ports::BundledTable::AmmoniaPpm).unwrap()
}

fn odor_category() -> impl Strategy<Value = OdorCategory> {
    prop_oneof![
        Just(OdorCategory::None),
        Just(OdorCategory::Moderate),
        Just(OdorCategory::Putrid),
    ]
}

/// Readings spanning the physical ranges plus some out-of-range margin.
fn reading() -> impl Strategy<Value = Reading> {
    (-20.0f32..110.0, -10.0f32..110.0, -1.0f32..15.0, -1.0f32..12.0)
        .prop_map(|(t, m, ph, odor)| Reading::new(t, m, ph, odor))
}

// ── Membership ────────────────────────────────────────────────

proptest! {
    #[test]
    fn membership_in_unit_interval(
        x in any::<f32>(),
        mut p in proptest::array::uniform4(-100.0f32..100.0),
    ) {
        p.sort_by(f32::total_cmp);
        let t = trapezoid(x, p[0], p[1], p[2], p[3]);
        let r = triangle(x, p[0], p[1], p[2]);
        prop_assert!((0.0..=1.0).contains(&t), "trapezoid {}", t);
        prop_assert!((0.0..=1.0).contains(&r), "triangle {}", r);
    }
}

// ── Engine ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn score_stays_in_domain(r in reading()) {
        let a = engine().assess(&r);
        prop_assert!((0.0..=100.0).contains(&a.score), "score {}", a.score);
    }

    #[test]
    fn fuzzified_degrees_in_unit_interval(r in reading()) {
        let ev = engine().evaluate(&r);
        for var in &ev.inputs {
            for (_, d) in &var.terms {
                prop_assert!((0.0..=1.0).contains(d));
            }
        }
        for (_, d) in ev.aggregated.iter() {
            prop_assert!((0.0..=1.0).contains(&d));
        }
        prop_assert!((0.0..=1.0).contains(&ev.hazard));
    }

    #[test]
    fn assessment_is_deterministic(r in reading()) {
        let e = engine();
        let first = e.assess(&r);
        let second = e.assess(&r);
        prop_assert_eq!(first.score.to_bits(), second.score.to_bits());
        prop_assert_eq!(first.label, second.label);
    }

    #[test]
    fn putrid_category_always_overrides(
        t in -20.0f32..110.0,
        m in -10.0f32..110.0,
        ph in -1.0f32..15.0,
    ) {
        for e in [engine(), ppm_engine()] {
            let a = e.assess(&Reading::with_category(t, m, ph, OdorCategory::Putrid));
            prop_assert_eq!(a.label, MaturityLabel::PoorOdor);
            prop_assert!(a.score <= e.classifier().putrid_ceiling());
        }
    }

    #[test]
    fn full_hazard_saturates_poor(
        t in -20.0f32..110.0,
        m in -10.0f32..110.0,
        ph in -1.0f32..15.0,
        ppm in 30.0f32..5000.0,
    ) {
        let ev = ppm_engine().evaluate(&Reading::new(t, m, ph, ppm));
        prop_assert_eq!(ev.hazard, 1.0);
        prop_assert_eq!(ev.aggregated.get(Maturity::Poor), 1.0);
        prop_assert!(!ev.used_fallback);
    }

    #[test]
    fn more_ammonia_never_lowers_the_hazard(lo in 0.0f32..2000.0, extra in 0.0f32..2000.0) {
        let e = ppm_engine();
        let low = e.evaluate(&Reading::new(45.0, 46.0, 7.0, lo)).hazard;
        let high = e.evaluate(&Reading::new(45.0, 46.0, 7.0, lo + extra)).hazard;
        prop_assert!(high >= low, "{} ppm -> {}, {} ppm -> {}", lo, low, lo + extra, high);
    }

    #[test]
    fn evaluate_matches_assess(r in reading()) {
        for e in [engine(), ppm_engine()] {
            let a = e.assess(&r);
            let ev = e.evaluate(&r);
            prop_assert_eq!(a.score.to_bits(), ev.assessment.score.to_bits());
            prop_assert_eq!(a.label, ev.assessment.label);
        }
    }

    #[test]
    fn label_agrees_with_thresholds(r in reading()) {
        let e = engine();
        let ev = e.evaluate(&r);
        let a = ev.assessment;
        if a.label != MaturityLabel::PoorOdor {
            prop_assert_eq!(a.label.category(), e.classifier().thresholds().category(a.score));
        } else {
            prop_assert_eq!(ev.odor_category, Some(OdorCategory::Putrid));
        }
    }

    #[test]
    fn no_temperature_beats_the_optimum(t in -20.0f32..110.0, cat in odor_category()) {
        let e = engine();
        let optimum = e.assess(&Reading::with_category(45.0, 46.0, 7.0, OdorCategory::None)).score;
        let a = e.assess(&Reading::with_category(t, 46.0, 7.0, cat));
        prop_assert!(a.score <= optimum + 1e-4, "t={} score {} > optimum {}", t, a.score, optimum);
    }

    #[test]
    fn every_term_is_reported(r in reading()) {
        let e = engine();
        let ev = e.evaluate(&r);
        for (var, traced) in InputVariable::ALL.iter().zip(&ev.inputs) {
            prop_assert_eq!(traced.terms.len(), e.fuzzifier().variable(*var).terms().len());
        }
    }
}
