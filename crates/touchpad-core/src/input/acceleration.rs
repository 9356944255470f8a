//! Velocity-dependent pointer acceleration.
//!
//! Slow, careful finger movement should move the remote pointer precisely;
//! fast flicks should cover more distance.  The curve is a list of
//! `(speed, multiplier)` breakpoints with speed in pixels per second.
//! Between breakpoints the multiplier is interpolated linearly; outside
//! the table it is clamped to the first or last multiplier.
//!
//! ```text
//! multiplier
//!   2 ┤                         ●────────
//!     │                      ╱
//!   1 ┤          ●─────●  ╱
//!     │       ╱
//!   0 ●────╱
//!     └────┬─────┬─────────────┬──── px/s
//!          87   173           553
//! ```

/// Piecewise-linear speed → multiplier mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct AccelerationCurve {
    points: Vec<(f64, f64)>,
}

/// Breakpoints used by the touchpad.
const DEFAULT_POINTS: [(f64, f64); 4] = [(0.0, 0.0), (87.0, 1.0), (173.0, 1.0), (553.0, 2.0)];

impl Default for AccelerationCurve {
    fn default() -> Self {
        Self::new(DEFAULT_POINTS.to_vec())
    }
}

impl AccelerationCurve {
    /// Builds a curve from breakpoints sorted by ascending speed.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Multiplier for a movement at `speed` pixels per second.
    ///
    /// An empty curve is the identity (multiplier 1).  A speed that is not
    /// a number maps to the first multiplier.
    pub fn multiplier(&self, speed: f64) -> f64 {
        for (i, &(s2, a2)) in self.points.iter().enumerate() {
            // NaN compares false here, so it stops at the first breakpoint.
            if s2 <= speed {
                continue;
            }
            if i == 0 {
                return a2;
            }
            let (s1, a1) = self.points[i - 1];
            return (speed - s1) / (s2 - s1) * (a2 - a1) + a1;
        }
        self.points.last().map_or(1.0, |&(_, a)| a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_zero_speed_has_zero_multiplier() {
        assert_eq!(AccelerationCurve::default().multiplier(0.0), 0.0);
    }

    #[test]
    fn test_plateau_between_87_and_173() {
        let curve = AccelerationCurve::default();
        for speed in [87.0, 100.0, 150.0, 173.0] {
            assert!(approx(curve.multiplier(speed), 1.0), "speed {speed}");
        }
    }

    #[test]
    fn test_interpolates_between_173_and_553() {
        let m = AccelerationCurve::default().multiplier(360.0);
        assert!(approx(m, 1.492), "got {m}");
    }

    #[test]
    fn test_ramp_below_first_plateau() {
        let m = AccelerationCurve::default().multiplier(43.5);
        assert!(approx(m, 0.5), "got {m}");
    }

    #[test]
    fn test_clamps_above_last_breakpoint() {
        let curve = AccelerationCurve::default();
        assert_eq!(curve.multiplier(553.0), 2.0);
        assert_eq!(curve.multiplier(10_000.0), 2.0);
        assert_eq!(curve.multiplier(f64::INFINITY), 2.0);
    }

    #[test]
    fn test_below_first_breakpoint_uses_first_multiplier() {
        let curve = AccelerationCurve::new(vec![(50.0, 0.25), (100.0, 1.0)]);
        assert_eq!(curve.multiplier(10.0), 0.25);
    }

    #[test]
    fn test_nan_speed_uses_first_multiplier() {
        assert_eq!(AccelerationCurve::default().multiplier(f64::NAN), 0.0);
    }

    #[test]
    fn test_empty_curve_is_identity() {
        assert_eq!(AccelerationCurve::new(Vec::new()).multiplier(300.0), 1.0);
    }
}
