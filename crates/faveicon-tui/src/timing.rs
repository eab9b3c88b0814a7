//! Time calculation utilities for keyframe playback
//!
//! Pure functions over an explicit media clock (seconds), so playback can be
//! driven and tested without a wall clock.

use faveicon_core::KeyframeAnimation;

/// Calculate animation progress (0.0 to 1.0) at `now`
///
/// # Arguments
/// * `begin` - Animation start time
/// * `duration` - Total animation duration
/// * `now` - Current media time
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(begin: f64, duration: f64, now: f64) -> f64 {
    if duration <= 0.0 {
        return if now >= begin { 1.0 } else { 0.0 };
    }
    ((now - begin) / duration).clamp(0.0, 1.0)
}

/// Check if animation is complete
#[inline]
pub fn is_complete(begin: f64, duration: f64, now: f64) -> bool {
    now >= begin + duration.max(0.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Sample evenly spaced keyframes at progress `t`, interpolating linearly
/// between neighbours
///
/// # Returns
/// `None` when there are no keyframes
pub fn sample_keyframes(values: &[f64], t: f64) -> Option<f64> {
    match values {
        [] => None,
        [only] => Some(*only),
        _ => {
            let last = values.len() - 1;
            let position = t.clamp(0.0, 1.0) * last as f64;
            let index = (position.floor() as usize).min(last);
            if index == last {
                return Some(values[last]);
            }
            let frac = position - index as f64;
            Some(lerp(values[index], values[index + 1], frac))
        }
    }
}

/// Value of a keyframe animation at `now`, or `None` outside its active
/// window `[begin, begin + duration)`
pub fn keyframe_value(animation: &KeyframeAnimation, now: f64) -> Option<f64> {
    if now < animation.begin_time || !animation.is_running_at(now) {
        return None;
    }
    let t = progress(animation.begin_time, animation.duration, now);
    sample_keyframes(&animation.values, t)
}
