//! Trapezoidal and triangular membership functions.
//!
//! Both are total: any `x` (including values far outside the declared
//! universe) maps into `[0, 1]`. Degenerate shoulders (`a == b` or
//! `c == d`) are part of the plateau rather than a zero-width slope, so no
//! evaluation ever divides by zero.

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Rising or falling edge between `from` (degree 0) and `to` (degree 1).
/// A zero-width span collapses onto the plateau.
#[inline]
fn ramp(x: f32, from: f32, to: f32) -> f32 {
    let span = to - from;
    if span == 0.0 {
        return 1.0;
    }
    let t = (x - from) / span;
    // inf / inf with breakpoints near f32::MAX
    if t.is_nan() {
        return 0.0;
    }
    t.clamp(0.0, 1.0)
}

/// Trapezoid with support `[a, d]` and plateau `[b, c]`.
pub fn trapezoid(x: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    if x.is_nan() {
        return 0.0;
    }
    if x >= b && x <= c {
        return 1.0;
    }
    if x <= a || x >= d {
        return 0.0;
    }
    if x < b { ramp(x, a, b) } else { ramp(x, d, c) }
}

/// Triangle with support `[a, c]` and apex `b`.
pub fn triangle(x: f32, a: f32, b: f32, c: f32) -> f32 {
    if x.is_nan() {
        return 0.0;
    }
    if x == b {
        return 1.0;
    }
    if x <= a || x >= c {
        return 0.0;
    }
    if x < b { ramp(x, a, b) } else { ramp(x, c, b) }
}

/// A parameterised membership function.
///
/// Serialised as `{"trapezoid": [a, b, c, d]}` or `{"triangle": [a, b, c]}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipFn {
    Trapezoid([f32; 4]),
    Triangle([f32; 3]),
}

impl MembershipFn {
    /// Degree of membership of `x`, always in `[0, 1]`.
    pub fn degree(&self, x: f32) -> f32 {
        match *self {
            Self::Trapezoid([a, b, c, d]) => trapezoid(x, a, b, c, d),
            Self::Triangle([a, b, c]) => triangle(x, a, b, c),
        }
    }

    /// Breakpoints in declaration order.
    pub fn breakpoints(&self) -> &[f32] {
        match self {
            Self::Trapezoid(p) => p,
            Self::Triangle(p) => p,
        }
    }

    /// Closed support interval `[first, last]`.
    pub fn support(&self) -> (f32, f32) {
        let p = self.breakpoints();
        (p[0], p[p.len() - 1])
    }

    /// Reject non-finite or decreasing breakpoints.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let p = self.breakpoints();
        if p.iter().any(|v| !v.is_finite()) {
            return Err(ShapeError::NonFinite);
        }
        if p.windows(2).any(|w| w[0] > w[1]) {
            return Err(ShapeError::NonMonotonic);
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_trapezoid() -> impl Strategy<Value = [f32; 4]> {
        proptest::collection::vec(-100.0f32..100.0, 4).prop_map(|mut v| {
            v.sort_by(f32::total_cmp);
            [v[0], v[1], v[2], v[3]]
        })
    }

    proptest! {
        #[test]
        fn zero_outside_support(p in arb_trapezoid(), off in 0.001f32..1000.0) {
            let [a, b, c, d] = p;
            prop_assert_eq!(trapezoid(a - off, a, b, c, d), 0.0);
            prop_assert_eq!(trapezoid(d + off, a, b, c, d), 0.0);
        }

        #[test]
        fn one_on_plateau(p in arb_trapezoid(), t in 0.0f32..=1.0) {
            let [a, b, c, d] = p;
            let x = (b + (c - b) * t).clamp(b, c);
            prop_assert!(a <= x && x <= d);
            prop_assert_eq!(trapezoid(x, a, b, c, d), 1.0);
        }

        #[test]
        fn always_unit_interval(p in arb_trapezoid(), x in -500.0f32..500.0) {
            let [a, b, c, d] = p;
            let y = trapezoid(x, a, b, c, d);
            prop_assert!((0.0..=1.0).contains(&y));
            let z = triangle(x, a, b, d);
            prop_assert!((0.0..=1.0).contains(&z));
        }
    }
}
