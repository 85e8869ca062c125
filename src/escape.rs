// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.  Given z₀, compute z₁ = f(z₀),
//! z₂ = f(z₁), and so on, and report the first n for which |zₙ| > 2.
//! For the maps in our palette, once an orbit leaves the circle of
//! radius two it never comes back, so that n is how fast the point
//! runs off to infinity.
//!
//! Some of the maps have singularities (the logarithm at the origin,
//! for one).  An orbit that lands on one turns into NaN or infinity,
//! and NaN compares false against everything, so a naive test would
//! call such a point bounded forever.  We check for that explicitly
//! and treat an undefined value as having escaped.

use num::Complex;

use crate::functions::IterationFunction;

/// The squared escape radius.  Comparing squared magnitudes saves a
/// square root per step.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// How an orbit ended.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// |zₙ| exceeded two after `n` applications of the map.
    Escaped(u32),
    /// zₙ stopped being a finite number after `n` applications.
    Undefined(u32),
    /// The orbit was still inside the circle when we ran out of
    /// iterations.
    Bounded,
}

impl Escape {
    /// Collapses the classification to an escape count, with bounded
    /// orbits counting as the full iteration budget.
    pub fn count(self, max_iterations: u32) -> u32 {
        match self {
            Escape::Escaped(n) | Escape::Undefined(n) => n,
            Escape::Bounded => max_iterations,
        }
    }

    /// True when the orbit hit a singularity.
    pub fn is_undefined(self) -> bool {
        match self {
            Escape::Undefined(_) => true,
            _ => false,
        }
    }
}

/// Runs the orbit of `start` under `f` for at most `max_iterations`
/// steps.  The escape test happens before every application of the
/// map, including the first, so a point already outside the circle
/// escapes at zero.
pub fn classify(f: &IterationFunction, start: Complex<f64>, max_iterations: u32) -> Escape {
    let mut z = start;
    for n in 0..max_iterations {
        if !z.is_finite() {
            return Escape::Undefined(n);
        }
        if z.norm_sqr() > ESCAPE_RADIUS_SQR {
            return Escape::Escaped(n);
        }
        z = f.apply(z);
    }
    Escape::Bounded
}

/// The escape count of `start` under `f`: a number in
/// `0..=max_iterations`, where `max_iterations` means "presumed
/// inside the set."
#[inline]
pub fn iterate(f: &IterationFunction, start: Complex<f64>, max_iterations: u32) -> u32 {
    classify(f, start, max_iterations).count(max_iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::Palette;
    use rand::distributions::{Distribution, Uniform};
    use rand::prelude::*;

    #[test]
    fn golden_ratio_regression_point() {
        let palette = Palette::standard();
        let f = palette.get(0).unwrap();
        assert_eq!(iterate(f, Complex::new(-1.0, -1.0), 256), 1);
        assert_eq!(iterate(f, Complex::new(0.0, 0.0), 256), 256);
        assert_eq!(iterate(f, Complex::new(1.5, 0.0), 256), 2);
    }

    #[test]
    fn points_outside_radius_escape_immediately() {
        let palette = Palette::standard();
        let mut rng = thread_rng();
        let angle = Uniform::new(0.0_f64, 2.0 * std::f64::consts::PI);
        let radius = Uniform::new(2.000_001_f64, 50.0);
        for f in palette.iter() {
            for _ in 0..500 {
                let z = Complex::from_polar(&radius.sample(&mut rng), &angle.sample(&mut rng));
                assert_eq!(iterate(f, z, 256), 0, "{:?} at {}", f, z);
            }
        }
    }

    #[test]
    fn counts_never_exceed_the_budget() {
        let palette = Palette::standard();
        let mut rng = thread_rng();
        let coordinate = Uniform::new_inclusive(-2.0_f64, 2.0);
        for f in palette.iter() {
            for max in &[0_u32, 1, 17, 256] {
                for _ in 0..200 {
                    let z = Complex::new(coordinate.sample(&mut rng), coordinate.sample(&mut rng));
                    assert!(iterate(f, z, *max) <= *max);
                }
            }
        }
    }

    #[test]
    fn zero_budget_returns_zero() {
        let palette = Palette::standard();
        assert_eq!(iterate(palette.get(0).unwrap(), Complex::new(0.0, 0.0), 0), 0);
    }

    #[test]
    fn singularity_counts_as_escape() {
        let palette = Palette::standard();
        let f = palette.get(6).unwrap();
        assert_eq!(classify(f, Complex::new(0.0, 0.0), 256), Escape::Undefined(1));
        assert_eq!(iterate(f, Complex::new(0.0, 0.0), 256), 1);
    }

    #[test]
    fn non_finite_start_is_undefined_at_zero() {
        let palette = Palette::standard();
        let f = palette.get(0).unwrap();
        assert_eq!(classify(f, Complex::new(std::f64::NAN, 0.0), 10), Escape::Undefined(0));
    }

    #[test]
    fn bounded_orbit_reports_budget() {
        assert_eq!(Escape::Bounded.count(99), 99);
        assert_eq!(Escape::Escaped(3).count(99), 3);
        assert!(Escape::Undefined(2).is_undefined());
        assert!(!Escape::Bounded.is_undefined());
    }
}
