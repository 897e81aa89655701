//! Hit chance calculations.

/// Chance to hit, as a percentage.
///
/// # Formula
///
/// ```text
/// hit_chance = accuracy * base ^ defense
/// ```
///
/// Each point of defense multiplies the chance by `base` (a constant in
/// (0, 1]), so defense has diminishing returns.
pub fn hit_probability(accuracy: i32, defense: i32, base: f64) -> f64 {
    f64::from(accuracy) * base.powi(defense)
}

/// Ranged variant: distance counts twice against the shooter.
///
/// ```text
/// hit_chance = accuracy * base ^ (defense + distance * 2)
/// ```
pub fn ranged_hit_probability(accuracy: i32, defense: i32, distance: f64, base: f64) -> f64 {
    f64::from(accuracy) * base.powf(f64::from(defense) + distance * 2.0)
}

/// A roll in [0, 100) hits when it falls below the percentage threshold.
pub fn check_hit(probability: f64, roll: f64) -> bool {
    roll < probability
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_defense_keeps_full_accuracy() {
        assert_eq!(hit_probability(100, 0, 0.987), 100.0);
        assert!(check_hit(100.0, 99.999));
    }

    #[test]
    fn defense_decays_hit_chance() {
        let low = hit_probability(100, 2, 0.9);
        let high = hit_probability(100, 5, 0.9);
        assert!((low - 81.0).abs() < 1e-9);
        assert!(high < low);
    }

    #[test]
    fn distance_penalises_ranged() {
        let near = ranged_hit_probability(100, 1, 1.0, 0.95);
        let far = ranged_hit_probability(100, 1, 6.0, 0.95);
        assert!(far < near);
        assert!((near - 100.0 * 0.95f64.powi(3)).abs() < 1e-9);
    }

    #[test]
    fn zero_probability_never_hits() {
        assert!(!check_hit(0.0, 0.0));
    }
}
