use crate::action::{ActionContext, ActionTransition};
use crate::effects;
use crate::env::{GameEnv, OracleError};
use crate::error::{ErrorSeverity, GameError};
use crate::event::GameEvent;
use crate::lifecycle;
use crate::state::{
    ActorState, BoostStat, Consumable, DelayedEffect, EntityId, Equippable, GameState,
    ItemState, Position, StatusEffect, StatusKind,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("You don't have that item.")]
    UnknownItem(EntityId),

    #[error("Your inventory is full.")]
    InventoryFull,

    #[error("There is nothing here to pick up.")]
    NothingToPickUp,

    #[error("The {0} cannot be equipped.")]
    NotEquippable(String),

    #[error("Your health is already full.")]
    HealthFull,

    #[error("You don't have any healing items.")]
    NoHealingItems,

    #[error("You must select a target.")]
    TargetRequired,

    #[error("You cannot target an area that you cannot see.")]
    TargetNotVisible,

    #[error("You must select an enemy to target.")]
    NoEnemyAtTarget,

    #[error("No enemy is close enough to strike.")]
    NoEnemyInRange,

    #[error("There are no targets in the radius.")]
    NoTargetsInRadius,

    #[error("You cannot confuse yourself!")]
    ConfuseSelf,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ActorNotFound(_) | Self::Oracle(_) => ErrorSeverity::Internal,
            Self::UnknownItem(_) | Self::TargetRequired => ErrorSeverity::InvalidInput,
            _ => ErrorSeverity::Impossible,
        }
    }
}

fn owner(state: &GameState, actor: EntityId) -> Result<&ActorState, InventoryError> {
    state
        .actor(actor)
        .filter(|actor| actor.alive)
        .ok_or(InventoryError::ActorNotFound(actor))
}

fn owner_mut<'c>(
    ctx: &'c mut ActionContext<'_, '_>,
) -> Result<&'c mut ActorState, InventoryError> {
    let actor = ctx.actor;
    ctx.actor_state_mut()
        .ok_or(InventoryError::ActorNotFound(actor))
}

fn carried(state: &GameState, actor: EntityId, item: EntityId) -> Result<&ItemState, InventoryError> {
    owner(state, actor)?
        .inventory
        .get(item)
        .ok_or(InventoryError::UnknownItem(item))
}

/// Picks up the first item lying under the actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickupAction;

impl ActionTransition for PickupAction {
    type Error = InventoryError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        let owner = owner(state, actor)?;
        if state.floor().items_at(owner.position).next().is_none() {
            return Err(InventoryError::NothingToPickUp);
        }
        if owner.inventory.is_full() {
            return Err(InventoryError::InventoryFull);
        }
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let position = owner(ctx.state, ctx.actor)?.position;
        let item = ctx
            .state
            .floor_mut()
            .take_item_at(position)
            .ok_or(InventoryError::NothingToPickUp)?;
        let name = item.name.clone();
        let rejected = owner_mut(ctx)?.inventory.insert(item);
        if let Err(item) = rejected {
            ctx.state.floor_mut().place_item(position, item);
            return Err(InventoryError::InventoryFull);
        }
        ctx.emit(GameEvent::PickedUp {
            actor: ctx.actor,
            item: name,
        });
        Ok(())
    }
}

/// Drops a carried item at the actor's feet, unequipping it first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropAction {
    pub item: EntityId,
}

impl ActionTransition for DropAction {
    type Error = InventoryError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        carried(state, actor, self.item).map(|_| ())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let actor = ctx.actor;
        let owner = owner_mut(ctx)?;
        let unequipped = owner
            .equipment
            .slot_of(self.item)
            .and_then(|slot| owner.equipment.unequip(slot).map(|_| slot));
        let item = owner
            .inventory
            .remove(self.item)
            .ok_or(InventoryError::UnknownItem(self.item))?;
        let position = owner.position;

        if let Some(slot) = unequipped {
            ctx.emit(GameEvent::Unequipped {
                actor,
                item: item.name.clone(),
                slot,
            });
        }
        ctx.emit(GameEvent::Dropped {
            actor,
            item: item.name.clone(),
        });
        ctx.state.floor_mut().place_item(position, item);
        Ok(())
    }
}

/// Toggles an equippable item: unequips it if worn, otherwise puts it in
/// its slot and takes off whatever was there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipAction {
    pub item: EntityId,
}

impl ActionTransition for EquipAction {
    type Error = InventoryError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        _env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        let item = carried(state, actor, self.item)?;
        if item.equippable().is_none() {
            return Err(InventoryError::NotEquippable(item.name.clone()));
        }
        Ok(())
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        toggle_equipment(ctx, self.item)
    }
}

fn toggle_equipment(ctx: &mut ActionContext<'_, '_>, item_id: EntityId) -> Result<(), InventoryError> {
    let actor = ctx.actor;
    let owner = owner_mut(ctx)?;
    let item = owner
        .inventory
        .get(item_id)
        .ok_or(InventoryError::UnknownItem(item_id))?;
    let name = item.name.clone();
    let slot = item
        .equippable()
        .map(Equippable::slot)
        .ok_or_else(|| InventoryError::NotEquippable(name.clone()))?;

    let mut events = Vec::with_capacity(2);
    if owner.equipment.is_equipped(item_id) {
        owner.equipment.unequip(slot);
        events.push(GameEvent::Unequipped {
            actor,
            item: name,
            slot,
        });
    } else {
        if let Some(previous) = owner.equipment.equip(slot, item_id) {
            let previous = owner
                .inventory
                .get(previous)
                .map(|item| item.name.clone())
                .unwrap_or_default();
            events.push(GameEvent::Unequipped {
                actor,
                item: previous,
                slot,
            });
        }
        events.push(GameEvent::Equipped {
            actor,
            item: name,
            slot,
        });
    }
    ctx.events.extend(events);
    Ok(())
}

/// Uses a carried item. Consumables resolve their effect and are used up;
/// equippables toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseItemAction {
    pub item: EntityId,
    /// Tile picked for targeted consumables.
    pub target: Option<Position>,
}

impl UseItemAction {
    pub fn new(item: EntityId) -> Self {
        Self { item, target: None }
    }

    pub fn at(item: EntityId, target: Position) -> Self {
        Self {
            item,
            target: Some(target),
        }
    }
}

/// Closest visible living actor other than `user` within `range`.
fn nearest_visible_enemy(
    state: &GameState,
    env: &GameEnv<'_>,
    user: &ActorState,
    range: u32,
) -> Result<Option<EntityId>, InventoryError> {
    let vision = env.vision()?;
    let mut best: Option<(f64, EntityId)> = None;
    for candidate in state.floor().living_actors() {
        if candidate.id == user.id || !vision.is_visible(candidate.position) {
            continue;
        }
        let distance = user.position.euclidean(candidate.position);
        if distance > f64::from(range) {
            continue;
        }
        if best.is_none_or(|(closest, _)| distance < closest) {
            best = Some((distance, candidate.id));
        }
    }
    Ok(best.map(|(_, id)| id))
}

fn actors_in_radius(
    state: &GameState,
    center: Position,
    radius: u32,
    exclude: Option<EntityId>,
) -> Vec<EntityId> {
    state
        .floor()
        .living_actors()
        .filter(|actor| Some(actor.id) != exclude)
        .filter(|actor| actor.position.euclidean(center) <= f64::from(radius))
        .map(|actor| actor.id)
        .collect()
}

fn validate_consumable(
    consumable: &Consumable,
    target: Option<Position>,
    user: &ActorState,
    state: &GameState,
    env: &GameEnv<'_>,
) -> Result<(), InventoryError> {
    match consumable {
        Consumable::Healing { .. } if user.fighter.is_full_health() => {
            Err(InventoryError::HealthFull)
        }
        Consumable::Lightning { range, .. } => nearest_visible_enemy(state, env, user, *range)?
            .map(|_| ())
            .ok_or(InventoryError::NoEnemyInRange),
        Consumable::AreaDamage {
            radius, hits_user, ..
        } => {
            let center = target.ok_or(InventoryError::TargetRequired)?;
            if !env.vision()?.is_visible(center) {
                return Err(InventoryError::TargetNotVisible);
            }
            let exclude = (!hits_user).then_some(user.id);
            if actors_in_radius(state, center, *radius, exclude).is_empty() {
                return Err(InventoryError::NoTargetsInRadius);
            }
            Ok(())
        }
        Consumable::Confusion { .. } => {
            let at = target.ok_or(InventoryError::TargetRequired)?;
            if !env.vision()?.is_visible(at) {
                return Err(InventoryError::TargetNotVisible);
            }
            let victim = state
                .floor()
                .living_actor_at(at)
                .ok_or(InventoryError::NoEnemyAtTarget)?;
            if victim.id == user.id {
                return Err(InventoryError::ConfuseSelf);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn consume(
    ctx: &mut ActionContext<'_, '_>,
    consumable: &Consumable,
    target: Option<Position>,
    source: &str,
) -> Result<(), InventoryError> {
    let actor = ctx.actor;
    let user = owner(ctx.state, actor)?;
    let position = user.position;

    match *consumable {
        Consumable::Healing { amount } => {
            lifecycle::heal(ctx.state, actor, amount, &mut ctx.events);
        }
        Consumable::PowerBoost { amount, duration } => {
            boost(ctx, BoostStat::Power, amount, duration, source)?;
        }
        Consumable::DefenseBoost { amount, duration } => {
            boost(ctx, BoostStat::Defense, amount, duration, source)?;
        }
        Consumable::Lightning { damage, range } => {
            let victim = nearest_visible_enemy(ctx.state, ctx.env, user, range)?
                .ok_or(InventoryError::NoEnemyInRange)?;
            let name = owner(ctx.state, victim)?.name.clone();
            ctx.emit(GameEvent::LightningStruck {
                target: victim,
                name,
                damage,
            });
            lifecycle::apply_damage(ctx.state, victim, damage, actor, &mut ctx.events);
        }
        Consumable::AreaDamage {
            damage,
            radius,
            hits_user,
        } => {
            let center = target.unwrap_or(position);
            let exclude = (!hits_user).then_some(actor);
            for victim in actors_in_radius(ctx.state, center, radius, exclude) {
                let name = owner(ctx.state, victim)?.name.clone();
                ctx.emit(GameEvent::Scorched {
                    target: victim,
                    name,
                    damage,
                });
                lifecycle::apply_damage(ctx.state, victim, damage, actor, &mut ctx.events);
            }
        }
        Consumable::Confusion { turns } => {
            let at = target.ok_or(InventoryError::TargetRequired)?;
            let victim = ctx
                .state
                .floor()
                .living_actor_at(at)
                .map(|victim| victim.id)
                .ok_or(InventoryError::NoEnemyAtTarget)?;
            effects::apply_status(
                ctx.state,
                victim,
                StatusEffect::new(StatusKind::Confused, turns),
                actor,
                &mut ctx.events,
            );
        }
        Consumable::MapReveal => {
            ctx.state.floor_mut().reveal_all();
            ctx.emit(GameEvent::MapRevealed);
        }
    }
    Ok(())
}

fn boost(
    ctx: &mut ActionContext<'_, '_>,
    stat: BoostStat,
    amount: i32,
    duration: u32,
    source: &str,
) -> Result<(), InventoryError> {
    let actor = ctx.actor;
    let fighter = &mut owner_mut(ctx)?.fighter;
    match stat {
        BoostStat::Power => fighter.power_boost += amount,
        BoostStat::Defense => fighter.defense_boost += amount,
    }
    ctx.state.turn.schedule(
        u64::from(duration),
        DelayedEffect::RevertBoost {
            target: actor,
            stat,
            amount,
            source: source.to_owned(),
        },
    );
    ctx.emit(GameEvent::BoostStarted {
        actor,
        stat,
        amount,
    });
    Ok(())
}

impl ActionTransition for UseItemAction {
    type Error = InventoryError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        let item = carried(state, actor, self.item)?;
        match item.consumable() {
            Some(consumable) => {
                validate_consumable(consumable, self.target, owner(state, actor)?, state, env)
            }
            None => Ok(()),
        }
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        let item = carried(ctx.state, ctx.actor, self.item)?;
        let name = item.name.clone();
        let Some(consumable) = item.consumable().cloned() else {
            return toggle_equipment(ctx, self.item);
        };

        consume(ctx, &consumable, self.target, &name)?;

        owner_mut(ctx)?.inventory.remove(self.item);
        ctx.emit(GameEvent::ItemConsumed {
            actor: ctx.actor,
            item: name,
        });
        Ok(())
    }
}

/// Drinks the first healing consumable in the pack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuickHealAction;

impl QuickHealAction {
    fn pick(actor: EntityId, state: &GameState) -> Result<UseItemAction, InventoryError> {
        let owner = owner(state, actor)?;
        if owner.fighter.is_full_health() {
            return Err(InventoryError::HealthFull);
        }
        owner
            .inventory
            .first_healing()
            .map(|item| UseItemAction::new(item.id))
            .ok_or(InventoryError::NoHealingItems)
    }
}

impl ActionTransition for QuickHealAction {
    type Error = InventoryError;

    fn pre_validate(
        &self,
        actor: EntityId,
        state: &GameState,
        env: &GameEnv<'_>,
    ) -> Result<(), Self::Error> {
        Self::pick(actor, state)?.pre_validate(actor, state, env)
    }

    fn apply(&self, ctx: &mut ActionContext<'_, '_>) -> Result<(), Self::Error> {
        Self::pick(ctx.actor, ctx.state)?.apply(ctx)
    }
}
