//! Damage rolls.

use crate::state::DamageRange;

/// Triangular roll over `[min, max]` with the mode at the midpoint.
///
/// `u` is a uniform sample in [0, 1); the result is rounded to the
/// nearest integer. A degenerate or inverted range yields `min`.
pub fn triangular(range: DamageRange, u: f64) -> i32 {
    if range.max <= range.min {
        return range.min;
    }
    let low = f64::from(range.min);
    let high = f64::from(range.max);
    let mode = (low + high) / 2.0;
    let span = high - low;
    let split = (mode - low) / span;
    let value = if u < split {
        low + (u * span * (mode - low)).sqrt()
    } else {
        high - ((1.0 - u) * span * (high - mode)).sqrt()
    };
    value.round() as i32
}

/// Damage never heals: negative totals become a zero-damage hit.
pub fn clamp_damage(raw: i32) -> i32 {
    raw.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_range() {
        let range = DamageRange::new(2, 8);
        for step in 0..100 {
            let u = f64::from(step) / 100.0;
            let roll = triangular(range, u);
            assert!((2..=8).contains(&roll), "roll {roll} for u={u}");
        }
    }

    #[test]
    fn midpoint_is_mode() {
        assert_eq!(triangular(DamageRange::new(0, 10), 0.5), 5);
    }

    #[test]
    fn extremes_map_to_bounds() {
        let range = DamageRange::new(1, 5);
        assert_eq!(triangular(range, 0.0), 1);
        assert_eq!(triangular(range, 0.999_999), 5);
    }

    #[test]
    fn fixed_range_is_constant() {
        assert_eq!(triangular(DamageRange::fixed(3), 0.7), 3);
        assert_eq!(clamp_damage(-4), 0);
    }
}
