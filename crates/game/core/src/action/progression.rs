use crate::action::{ActionContext, ActionTransition};
use crate::env::{Dice, GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::event::GameEvent;
use crate::lifecycle;
use crate::state::{EntityId, GameState};

/// Stat raised when the player levels up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelUpChoice {
    /// +20 max hp, healed by the same amount.
    #[strum(to_string = "Constitution (+20 HP)")]
    Constitution,
    #[strum(to_string = "Strength (+1 attack)")]
    Strength,
    #[strum(to_string = "Agility (+1 defense)")]
    Agility,
}

impl LevelUpChoice {
    pub const HP_GAIN: i32 = 20;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelUpError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("You are not ready to level up.")]
    NotEnoughExperience,
}

impl GameError for LevelUpError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotEnoughExperience => ErrorSeverity::Impossible,
            Self::ActorNotFound(_) => ErrorSeverity::Internal,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUpAction {
    pub choice: LevelUpChoice,
}

impl ActionTransition for LevelUpAction {
    type Error = LevelUpError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        let actor_state = state
            .actor(actor)
            .ok_or(LevelUpError::ActorNotFound(actor))?;
        if !actor_state.level.requires_level_up() {
            return Err(LevelUpError::NotEnoughExperience);
        }
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let actor = ctx.actor;
        let actor_state = ctx
            .actor_state_mut()
            .ok_or(LevelUpError::ActorNotFound(actor))?;
        actor_state.level.increase_level();
        match self.choice {
            LevelUpChoice::Constitution => {
                actor_state.fighter.increase_max_hp(LevelUpChoice::HP_GAIN);
            }
            LevelUpChoice::Strength => actor_state.fighter.base_power += 1,
            LevelUpChoice::Agility => actor_state.fighter.base_defense += 1,
        }
        let level = actor_state.level.current_level;
        ctx.emit(GameEvent::LeveledUp { actor, level });
        Ok(())
    }
}

/// Calls `count` copies of a catalog template around the summoner.
///
/// Placement retries are bounded by `GameConfig::spawn_attempts`; minions
/// that find no room are skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummonAction {
    pub template: String,
    pub radius: u32,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SummonError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for SummonError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }
}

impl ActionTransition for SummonAction {
    type Error = SummonError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        state
            .actor(actor)
            .ok_or(SummonError::ActorNotFound(actor))?;
        env.catalog()?
            .actor(&self.template)
            .ok_or_else(|| OracleError::ActorTemplateNotFound(self.template.clone()))?;
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let actor = ctx.actor;
        let summoner = ctx
            .actor_state()
            .ok_or(SummonError::ActorNotFound(actor))?;
        let center = summoner.position;
        let name = summoner.name.clone();
        let template = ctx
            .env
            .catalog()?
            .actor(&self.template)
            .ok_or_else(|| OracleError::ActorTemplateNotFound(self.template.clone()))?;
        let attempts = ctx.env.config().spawn_attempts;

        let mut spawned = 0;
        for minion in 0..self.count {
            let dice = Dice::new(
                ctx.env.rng(),
                ctx.state.game_seed,
                ctx.state.turn.nonce,
                EntityId(actor.0.wrapping_add(minion.wrapping_mul(0x9e37))),
            );
            if lifecycle::spawn_near(ctx.state, template, center, self.radius, &dice, attempts)
                .is_some()
            {
                spawned += 1;
            }
        }

        if spawned < self.count {
            tracing::debug!(summoner = %actor, spawned, wanted = self.count, "summon ran out of room");
        }
        ctx.emit(GameEvent::Summoned {
            summoner: actor,
            name,
            count: spawned,
        });
        Ok(())
    }
}
