//! L4 Atomic Layer: numeric helpers shared by every position computation

use std::time::Duration;

/// Clamp `v` into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics: if `min > max` the upper bound wins.
#[inline]
pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v > max {
        max
    } else if v < min {
        min
    } else {
        v
    }
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Fraction of `total` covered by `elapsed`, `None` when `total` is zero
#[inline]
pub fn fraction(elapsed: Duration, total: Duration) -> Option<f64> {
    if total.is_zero() {
        None
    } else {
        Some(elapsed.as_secs_f64() / total.as_secs_f64())
    }
}

/// Elapsed time equivalent to `progress` of `total`
#[inline]
pub fn elapsed_at(progress: f64, total: Duration) -> Duration {
    total.mul_f64(clamp(progress, 0.0, 1.0))
}

#[inline]
pub fn as_millis_f64(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        // inverted bounds do not panic
        assert_eq!(clamp(5.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(10.0, -10.0, 1.0) + 10.0).abs() < 0.001);
    }

    #[test]
    fn test_fraction_zero_total() {
        assert_eq!(fraction(Duration::from_millis(5), Duration::ZERO), None);
        let f = fraction(Duration::from_millis(4000), Duration::from_millis(10_000)).unwrap();
        assert!((f - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_elapsed_at_clamps_progress() {
        let total = Duration::from_millis(10_000);
        assert_eq!(elapsed_at(0.4, total), Duration::from_millis(4000));
        assert_eq!(elapsed_at(1.5, total), total);
        assert_eq!(elapsed_at(-0.5, total), Duration::ZERO);
    }
}
