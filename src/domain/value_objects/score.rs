//! # Score Helpers
//!
//! Shared rounding and clipping for 0-100 scores.

/// Lower bound of the canonical score scale.
pub const SCORE_MIN: f64 = 0.0;
/// Upper bound of the canonical score scale.
pub const SCORE_MAX: f64 = 100.0;

/// Rounds to two decimals.
///
/// # Examples
///
/// ```
/// use sentinel_risk::domain::value_objects::score::round2;
///
/// assert_eq!(round2(56.004), 56.0);
/// assert_eq!(round2(12.345678), 12.35);
/// ```
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Clips to the canonical `[0, 100]` scale.
#[inline]
#[must_use]
pub fn clip_score(value: f64) -> f64 {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_bounds() {
        assert_eq!(clip_score(-3.0), 0.0);
        assert_eq!(clip_score(250.0), 100.0);
        assert_eq!(clip_score(42.5), 42.5);
    }

    #[test]
    fn round_negative() {
        assert_eq!(round2(-1.005_1), -1.01);
    }
}
