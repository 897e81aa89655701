use crate::action::{ActionContext, ActionTransition};
use crate::combat::{apply_attack, resolve_melee_attack, resolve_ranged_attack};
use crate::env::{Dice, GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::event::GameEvent;
use crate::state::{
    ActorState, Direction, EntityId, Equippable, EquipmentSlot, GameState, Position,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("Nothing to attack.")]
    NothingToAttack,

    #[error("Nothing to target.")]
    NothingToTarget,

    #[error("You cannot attack yourself!")]
    TargetSelf,

    #[error("You have no clear shot!")]
    NoClearShot,

    #[error("You have no ranged weapon equipped.")]
    NoRangedWeapon,

    #[error("No ammo left.")]
    NoAmmo,

    #[error("Your ammunition does not fit your weapon.")]
    AmmoMismatch,

    #[error("That is too far away.")]
    TooFar,

    #[error("There is no room to land.")]
    LandingBlocked,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ActorNotFound(_) | Self::Oracle(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Impossible,
        }
    }
}

fn attacker(state: &GameState, actor: EntityId) -> Result<&ActorState, AttackError> {
    state
        .actor(actor)
        .filter(|actor| actor.alive)
        .ok_or(AttackError::ActorNotFound(actor))
}

fn melee(ctx: &mut ActionContext<'_, '_>, target: EntityId) -> Result<(), AttackError> {
    let state = &*ctx.state;
    let attacker_state = attacker(state, ctx.actor)?;
    let defender = state
        .actor(target)
        .filter(|target| target.alive)
        .ok_or(AttackError::NothingToAttack)?;
    let dice = Dice::for_actor(ctx.env.rng(), state, ctx.actor);
    let roll = resolve_melee_attack(attacker_state, defender, &dice, ctx.env.config());
    apply_attack(ctx.state, ctx.env, ctx.actor, target, roll, false, &mut ctx.events);
    Ok(())
}

/// Melee strike against whatever stands in a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeleeAction {
    pub direction: Direction,
}

impl MeleeAction {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    fn target(&self, actor: EntityId, state: &GameState) -> Result<EntityId, AttackError> {
        let destination = attacker(state, actor)?.position.step(self.direction);
        state
            .floor()
            .blocking_actor_at(destination)
            .filter(|target| target.alive)
            .map(|target| target.id)
            .ok_or(AttackError::NothingToAttack)
    }
}

impl ActionTransition for MeleeAction {
    type Error = AttackError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        self.target(actor, state).map(|_| ())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let target = self.target(ctx.actor, ctx.state)?;
        melee(ctx, target)
    }
}

/// Shot at the actor standing on `target`.
///
/// With a launcher equipped the shot needs matching ammunition and spends
/// one unit even on a miss. Monsters without a launcher shoot with their
/// natural power; the player needs one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangedAction {
    pub target: Position,
}

impl RangedAction {
    pub fn new(target: Position) -> Self {
        Self { target }
    }

    fn target_id(&self, actor: EntityId, state: &GameState) -> Result<EntityId, AttackError> {
        let shooter = attacker(state, actor)?;
        if shooter.position == self.target {
            return Err(AttackError::TargetSelf);
        }
        state
            .floor()
            .living_actor_at(self.target)
            .map(|target| target.id)
            .ok_or(AttackError::NothingToTarget)
    }
}

impl ActionTransition for RangedAction {
    type Error = AttackError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        self.target_id(actor, state)?;
        let shooter = attacker(state, actor)?;

        match shooter.ranged_weapon() {
            Some((_, launcher_ammo, _)) => match shooter.ammo() {
                None | Some((_, 0)) => return Err(AttackError::NoAmmo),
                Some((loaded, _)) if loaded != launcher_ammo => {
                    return Err(AttackError::AmmoMismatch);
                }
                Some(_) => {}
            },
            None if shooter.is_player() => return Err(AttackError::NoRangedWeapon),
            None => {}
        }

        let vision = env.vision()?;
        if !vision.line_of_sight_clear(state.floor(), shooter.position, self.target) {
            return Err(AttackError::NoClearShot);
        }
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let target = self.target_id(ctx.actor, ctx.state)?;
        let roll = {
            let state = &*ctx.state;
            let shooter = attacker(state, ctx.actor)?;
            let defender = attacker(state, target)?;
            let dice = Dice::for_actor(ctx.env.rng(), state, ctx.actor);
            resolve_ranged_attack(shooter, defender, &dice, ctx.env.config())
        };

        let actor = ctx.actor;
        let shooter = ctx
            .actor_state_mut()
            .ok_or(AttackError::ActorNotFound(actor))?;
        if shooter.ranged_weapon().is_some() {
            spend_ammo(shooter)?;
        }

        apply_attack(ctx.state, ctx.env, ctx.actor, target, roll, true, &mut ctx.events);
        Ok(())
    }
}

fn spend_ammo(shooter: &mut ActorState) -> Result<(), AttackError> {
    let ammo_id = shooter
        .equipment
        .get(EquipmentSlot::Ammo)
        .ok_or(AttackError::NoAmmo)?;
    let item = shooter
        .inventory
        .get_mut(ammo_id)
        .ok_or(AttackError::NoAmmo)?;
    match item.equippable_mut() {
        Some(Equippable::Ammo { amount, .. }) if *amount > 0 => {
            *amount -= 1;
            Ok(())
        }
        _ => Err(AttackError::NoAmmo),
    }
}

/// Leap onto the tile next to `target` and strike in the same turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PounceAction {
    pub target: Position,
    pub reach: u32,
}

impl PounceAction {
    pub fn new(target: Position, reach: u32) -> Self {
        Self { target, reach }
    }

    /// Landing tile: the neighbour of the target on the pouncer's side.
    fn landing(&self, origin: Position) -> Option<Position> {
        let direction = self.target.direction_to(origin)?;
        Some(self.target.step(direction))
    }

    fn plan(
        &self,
        actor: EntityId,
        state: &GameState,
    ) -> Result<(EntityId, Position), AttackError> {
        let pouncer = attacker(state, actor)?;
        if pouncer.position == self.target {
            return Err(AttackError::TargetSelf);
        }
        let target = state
            .floor()
            .living_actor_at(self.target)
            .ok_or(AttackError::NothingToTarget)?;
        if pouncer.position.chebyshev(self.target) > self.reach {
            return Err(AttackError::TooFar);
        }
        let landing = self
            .landing(pouncer.position)
            .ok_or(AttackError::LandingBlocked)?;
        if landing != pouncer.position && !state.floor().is_free(landing) {
            return Err(AttackError::LandingBlocked);
        }
        Ok((target.id, landing))
    }
}

impl ActionTransition for PounceAction {
    type Error = AttackError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        self.plan(actor, state)?;
        let origin = attacker(state, actor)?.position;
        if !env
            .vision()?
            .line_of_sight_clear(state.floor(), origin, self.target)
        {
            return Err(AttackError::NoClearShot);
        }
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let (target, landing) = self.plan(ctx.actor, ctx.state)?;
        let actor = ctx.actor;
        let pouncer = ctx
            .actor_state_mut()
            .ok_or(AttackError::ActorNotFound(actor))?;
        pouncer.position = landing;
        let name = pouncer.name.clone();
        ctx.emit(GameEvent::Pounced {
            actor,
            name,
            to: landing,
        });
        melee(ctx, target)
    }
}
