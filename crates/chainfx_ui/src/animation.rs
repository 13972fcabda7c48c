//! Easing curves for time-driven effects.
//!
//! Counters decelerate into their target: the default curve is a cubic
//! ease-out, `1 - (1 - t)^3`.

use serde::{Deserialize, Serialize};

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Cubic ease-out (decelerating into the target).
    #[default]
    CubicOut,
    /// Exponential ease-out (sharp snap toward the target).
    ExponentialOut,
}

impl Easing {
    /// Applies the easing function to a progress value.
    ///
    /// Input is clamped to `[0, 1]`; every curve maps 0 to 0 and 1 to 1.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self {
            Self::Linear => t,
            Self::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::ExponentialOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * t)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_out_midpoint() {
        let value = Easing::CubicOut.apply(0.5);
        assert!((value - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_endpoints_are_exact() {
        for easing in [Easing::Linear, Easing::CubicOut, Easing::ExponentialOut] {
            assert!(easing.apply(0.0).abs() < f64::EPSILON, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < f64::EPSILON, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert!((Easing::CubicOut.apply(3.0) - 1.0).abs() < f64::EPSILON);
        assert!(Easing::CubicOut.apply(-1.0).abs() < f64::EPSILON);
        assert!(Easing::Linear.apply(f64::NAN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cubic_out_is_monotone() {
        let mut previous = 0.0;
        for step in 0..=100 {
            let value = Easing::CubicOut.apply(f64::from(step) / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }
}
