//! Extended elastic ease-out.
//!
//! Unlike the normalized easing curves used for scrolling, this one works in
//! absolute terms: it takes the elapsed time, base value, value delta and
//! total duration, plus an amplitude and a period that shape the overshoot.

use std::f64::consts::PI;

/// Default period as a fraction of the duration when none is supplied
pub const DEFAULT_PERIOD_FRACTION: f64 = 0.3;

/// Inputs to a single evaluation of the elastic curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasingParameters {
    /// Time since the start of the animation
    pub elapsed: f64,
    /// Value at `elapsed == 0`
    pub start: f64,
    /// Total change applied over `duration`
    pub change: f64,
    /// Total duration, must be positive
    pub duration: f64,
    /// Overshoot amplitude; should be at least `|change|`
    pub amplitude: f64,
    /// Oscillation period; `None` means `duration * 0.3`
    pub period: Option<f64>,
}

impl EasingParameters {
    /// Evaluate the curve at `elapsed`
    #[inline]
    pub fn evaluate(&self) -> f64 {
        extended_elastic_ease_out(
            self.elapsed,
            self.start,
            self.change,
            self.duration,
            self.amplitude,
            self.period,
        )
    }
}

/// Elastic ease-out with explicit amplitude and period.
///
/// # Arguments
/// * `t` - Elapsed time
/// * `b` - Start value
/// * `c` - Change in value
/// * `d` - Duration
/// * `a` - Amplitude; values below `|c|` fall back to `c`
/// * `p` - Period; defaults to `d * 0.3`
///
/// # Returns
/// The eased value. `b` at `t == 0`, `b + c` at `t == d`, overshooting and
/// settling in between.
pub fn extended_elastic_ease_out(t: f64, b: f64, c: f64, d: f64, a: f64, p: Option<f64>) -> f64 {
    // No change requested: nothing to oscillate around
    if c == 0.0 {
        return b;
    }
    // No time to animate in: jump straight to the end value
    if !(d.is_finite() && d > 0.0) {
        return b + c;
    }
    if t == 0.0 {
        return b;
    }

    let t = t / d;
    if t == 1.0 {
        return b + c;
    }

    let p = p.unwrap_or(d * DEFAULT_PERIOD_FRACTION);
    let (a, s) = if a < c.abs() {
        (c, p / 4.0)
    } else {
        (a, p / (2.0 * PI) * (c / a).asin())
    };

    a * 2.0_f64.powf(-10.0 * t) * ((t * d - s) * (2.0 * PI) / p).sin() + c + b
}
