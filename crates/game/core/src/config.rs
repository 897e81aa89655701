/// Game configuration constants and tunable parameters.
///
/// Balance values (monster stats, item potency) live in content data; this
/// struct only carries the knobs the rules themselves read.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Base of the exponential hit-chance decay: `accuracy * base^defense`.
    /// Must lie in (0, 1).
    pub hit_chance_base: f64,

    /// Energy cost of an action that does not override it.
    pub default_action_cost: i32,

    /// Chance that a bleeding hit also stains one orthogonal neighbour.
    pub bleed_spread_chance: f64,

    /// Attempts made by area spawns before a spawn is silently skipped.
    pub spawn_attempts: u32,

    /// Sight radius used when refreshing the field of view.
    pub fov_radius: u32,

    /// Extra path cost for stepping through a tile held by a blocking actor.
    pub blocked_path_penalty: u32,

    /// Number of narration lines kept by the message log.
    pub message_capacity: usize,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_ON_HIT_EFFECTS: usize = 4;
    pub const MAX_INVENTORY: usize = 26;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HIT_CHANCE_BASE: f64 = 0.987;
    pub const DEFAULT_ACTION_COST: i32 = 100;
    pub const DEFAULT_BLEED_SPREAD_CHANCE: f64 = 0.2;
    pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 10;
    pub const DEFAULT_FOV_RADIUS: u32 = 8;
    pub const DEFAULT_BLOCKED_PATH_PENALTY: u32 = 10;
    pub const DEFAULT_MESSAGE_CAPACITY: usize = 256;

    /// Cost of summoning minions; slower than an ordinary action.
    pub const SUMMON_COST: i32 = 150;

    pub fn new() -> Self {
        Self {
            hit_chance_base: Self::DEFAULT_HIT_CHANCE_BASE,
            default_action_cost: Self::DEFAULT_ACTION_COST,
            bleed_spread_chance: Self::DEFAULT_BLEED_SPREAD_CHANCE,
            spawn_attempts: Self::DEFAULT_SPAWN_ATTEMPTS,
            fov_radius: Self::DEFAULT_FOV_RADIUS,
            blocked_path_penalty: Self::DEFAULT_BLOCKED_PATH_PENALTY,
            message_capacity: Self::DEFAULT_MESSAGE_CAPACITY,
        }
    }

    /// Overrides the hit-chance base, typically from tests that need a
    /// guaranteed hit (`1.0`).
    #[must_use]
    pub fn with_hit_chance_base(mut self, base: f64) -> Self {
        self.hit_chance_base = base;
        self
    }

    /// Checks the tunables a loader could have corrupted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hit_chance_base > 0.0 && self.hit_chance_base <= 1.0) {
            return Err(ConfigError::HitChanceBase(self.hit_chance_base));
        }
        if self.default_action_cost <= 0 {
            return Err(ConfigError::ActionCost(self.default_action_cost));
        }
        if !(0.0..=1.0).contains(&self.bleed_spread_chance) {
            return Err(ConfigError::BleedSpread(self.bleed_spread_chance));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("hit_chance_base must be in (0, 1], got {0}")]
    HitChanceBase(f64),

    #[error("default_action_cost must be positive, got {0}")]
    ActionCost(i32),

    #[error("bleed_spread_chance must be in [0, 1], got {0}")]
    BleedSpread(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_out_of_range_hit_base() {
        let config = GameConfig::default().with_hit_chance_base(1.5);
        assert_eq!(config.validate(), Err(ConfigError::HitChanceBase(1.5)));
    }
}
