//! Keyframe generation for the selection scale animation.
//!
//! The elastic curve is sampled at a fixed frame rate over `[0, duration)`.
//! The terminal value is deliberately not sampled; the host snaps to the
//! model value when the animation ends.

use std::sync::Arc;

use serde::Serialize;

use crate::easing::extended_elastic_ease_out;

/// Sampling rate for generated keyframes
pub const FRAMES_PER_SECOND: f64 = 60.0;

/// Oscillation period handed to the elastic curve (about 2.4 oscillations)
pub const OSCILLATION_PERIOD: f64 = 0.39988;

/// Added to the value delta to form the amplitude, keeping `a >= |c|` stable
pub const AMPLITUDE_EPSILON: f64 = 0.001;

/// Longest animation accepted from user input, in seconds
pub const MAX_DURATION_SECS: f64 = 60.0;

/// Upper bound on generated keyframes
pub const MAX_FRAMES: usize = (MAX_DURATION_SECS * FRAMES_PER_SECOND) as usize;

/// Check a user-supplied duration against [`MAX_DURATION_SECS`]
pub fn validate_duration(duration: f64) -> crate::Result<f64> {
    if duration.is_nan() || duration > MAX_DURATION_SECS {
        return Err(crate::Error::InvalidDuration(format!(
            "{} (must be at most {}s)",
            duration, MAX_DURATION_SECS
        )));
    }
    Ok(duration)
}

/// An immutable, cheaply clonable sequence of keyframe values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TweenSequence {
    from: f64,
    to: f64,
    duration: f64,
    values: Arc<[f64]>,
}

impl TweenSequence {
    /// Sample the elastic curve from `from` to `to` over `duration` seconds
    pub fn generate(from: f64, to: f64, duration: f64) -> Self {
        let values = generate_tween_values(from, to, duration);
        tracing::debug!(from, to, duration, frames = values.len(), "Generated tween sequence");
        Self {
            from,
            to,
            duration,
            values: values.into(),
        }
    }

    pub fn from_value(&self) -> f64 {
        self.from
    }

    pub fn to_value(&self) -> f64 {
        self.to
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Shared handle to the values, for handing to a host without copying
    pub fn shared_values(&self) -> Arc<[f64]> {
        Arc::clone(&self.values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Time offset of the keyframe at `index`
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        index as f64 / FRAMES_PER_SECOND
    }

    /// Serialize as a JSON document
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sample `t = 0, 1/60, 2/60, ...` while `t < duration`.
///
/// Sample times derive from the frame index so the count does not drift with
/// accumulated rounding. Non-positive or non-finite durations yield nothing,
/// and output stops at [`MAX_FRAMES`] however long the duration.
pub fn generate_tween_values(from: f64, to: f64, duration: f64) -> Vec<f64> {
    if !(duration.is_finite() && duration > 0.0) {
        return Vec::new();
    }

    let c = to - from;
    let estimate = (duration * FRAMES_PER_SECOND).ceil().min(MAX_FRAMES as f64) as usize;
    let mut values = Vec::with_capacity(estimate);
    for frame in 0..MAX_FRAMES {
        let t = frame as f64 / FRAMES_PER_SECOND;
        if t >= duration {
            break;
        }
        values.push(extended_elastic_ease_out(
            t,
            from,
            c,
            duration,
            c + AMPLITUDE_EPSILON,
            Some(OSCILLATION_PERIOD),
        ));
    }
    values
}

/// Lazily generated keyframes, memoized per duration
#[derive(Debug, Clone, Default)]
pub struct TweenCache {
    cached: Option<TweenSequence>,
}

impl TweenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached 0 → 1 sequence for `duration`, generating it if the
    /// cache is empty or was built for a different duration
    pub fn get_or_generate(&mut self, duration: f64) -> &TweenSequence {
        let stale = self
            .cached
            .as_ref()
            .map_or(true, |seq| seq.duration() != duration);
        if stale {
            self.cached = None;
        }
        self.cached
            .get_or_insert_with(|| TweenSequence::generate(0.0, 1.0, duration))
    }

    pub fn cached(&self) -> Option<&TweenSequence> {
        self.cached.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_second_yields_thirty_frames() {
        let seq = TweenSequence::generate(0.0, 1.0, 0.5);
        assert_eq!(seq.len(), 30);
        assert_eq!(seq.values()[0], 0.0);
        assert!((seq.time_at(29) - 29.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_frame_counts() {
        for (duration, expected) in [
            (0.1, 6),
            (0.25, 15),
            (0.5, 30),
            (0.75, 45),
            (1.0, 60),
            (1.3, 78),
            (2.0, 120),
        ] {
            let seq = TweenSequence::generate(0.0, 1.0, duration);
            assert_eq!(seq.len(), expected, "duration {}", duration);
        }
    }

    #[test]
    fn test_terminal_sample_excluded() {
        let seq = TweenSequence::generate(0.0, 1.0, 0.5);
        let last_t = seq.time_at(seq.len() - 1);
        assert!(last_t < 0.5);
        // last sample is still within the decay envelope of the target
        let envelope = (1.0 + AMPLITUDE_EPSILON) * 2.0_f64.powf(-10.0 * last_t / 0.5);
        assert!((seq.values()[seq.len() - 1] - 1.0).abs() <= envelope);
    }

    #[test]
    fn test_zero_change_is_flat() {
        let values = generate_tween_values(0.4, 0.4, 0.5);
        assert_eq!(values.len(), 30);
        assert!(values.iter().all(|v| *v == 0.4));
    }

    #[test]
    fn test_generation_is_pure() {
        assert_eq!(
            generate_tween_values(0.0, 1.0, 0.5),
            generate_tween_values(0.0, 1.0, 0.5)
        );
    }

    #[test]
    fn test_non_positive_duration_is_empty() {
        assert!(generate_tween_values(0.0, 1.0, 0.0).is_empty());
        assert!(generate_tween_values(0.0, 1.0, -0.5).is_empty());
        assert!(generate_tween_values(0.0, 1.0, f64::NAN).is_empty());
    }

    #[test]
    fn test_huge_duration_is_bounded() {
        let values = generate_tween_values(0.0, 1.0, 1e15);
        assert_eq!(values.len(), MAX_FRAMES);
        assert_eq!(generate_tween_values(0.0, 1.0, MAX_DURATION_SECS).len(), MAX_FRAMES);
    }

    #[test]
    fn test_validate_duration() {
        assert_eq!(validate_duration(0.5).unwrap(), 0.5);
        assert_eq!(validate_duration(0.0).unwrap(), 0.0);
        assert_eq!(validate_duration(MAX_DURATION_SECS).unwrap(), MAX_DURATION_SECS);
        assert!(matches!(
            validate_duration(1e15),
            Err(crate::Error::InvalidDuration(_))
        ));
        assert!(validate_duration(f64::INFINITY).is_err());
        assert!(validate_duration(f64::NAN).is_err());
    }

    #[test]
    fn test_cache_memoizes_and_invalidates_on_duration_change() {
        let mut cache = TweenCache::new();
        assert!(cache.cached().is_none());

        let first = cache.get_or_generate(0.5).shared_values();
        let again = cache.get_or_generate(0.5).shared_values();
        assert!(Arc::ptr_eq(&first, &again));

        let longer = cache.get_or_generate(1.0);
        assert_eq!(longer.len(), 60);
        assert_eq!(longer.duration(), 1.0);

        cache.invalidate();
        assert!(cache.cached().is_none());
    }

    #[test]
    fn test_json_output() {
        let json = TweenSequence::generate(0.0, 1.0, 0.1).to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["values"].as_array().unwrap().len(), 6);
        assert_eq!(parsed["duration"], 0.1);
    }
}
