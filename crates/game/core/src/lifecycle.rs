//! Entity lifecycle: spawning, damage, healing and death.
//!
//! Every hp reduction flows through [`apply_damage`], which owns the death
//! transition. [`die`] is idempotent: a corpse stays a corpse.

use crate::env::{
    ActorTemplate, CatalogOracle, Dice, FloorBlueprint, ItemTemplate, OracleError, SpawnKind,
};
use crate::error::{ErrorSeverity, GameError};
use crate::event::GameEvent;
use crate::state::{
    ActorState, Controller, DeathTrigger, EntityId, FloorState, GameState, Position, WorldState,
};

const CORPSE_GLYPH: char = '%';

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("{0} lies outside the floor")]
    OutOfBounds(Position),

    #[error("{0} is not walkable")]
    NotWalkable(Position),

    #[error("{0} is already occupied")]
    Occupied(Position),
}

impl GameError for SpawnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Impossible
    }
}

/// Result of [`apply_damage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageReport {
    /// Hit points actually removed.
    pub dealt: i32,
    pub killed: bool,
}

fn check_tile(floor: &FloorState, position: Position) -> Result<(), SpawnError> {
    if !floor.in_bounds(position) {
        return Err(SpawnError::OutOfBounds(position));
    }
    if !floor.is_walkable(position) {
        return Err(SpawnError::NotWalkable(position));
    }
    if floor.blocking_actor_at(position).is_some() {
        return Err(SpawnError::Occupied(position));
    }
    Ok(())
}

fn build_actor(
    state: &mut GameState,
    id: EntityId,
    template: &ActorTemplate,
    position: Position,
) -> ActorState {
    ActorState::from_template(id, template, position, || state.allocate_entity_id())
}

/// Places a fresh instance of `template` on the current floor and queues it
/// in the scheduler with its current energy.
///
/// # Errors
///
/// Fails if the tile is outside the floor, not walkable or taken.
pub fn spawn_actor(
    state: &mut GameState,
    template: &ActorTemplate,
    position: Position,
) -> Result<EntityId, SpawnError> {
    check_tile(state.floor(), position)?;
    let id = state.allocate_entity_id();
    let actor = build_actor(state, id, template, position);
    let energy = actor.fighter.energy;
    state.floor_mut().actors.insert(id, actor);
    state.turn.scheduler.add(id, energy);
    tracing::trace!(actor = %id, name = %template.name, %position, "spawned actor");
    Ok(id)
}

/// Tries up to `attempts` random tiles within `radius` of `center`.
///
/// Returns `None` silently when no attempt lands on a free tile.
pub fn spawn_near(
    state: &mut GameState,
    template: &ActorTemplate,
    center: Position,
    radius: u32,
    dice: &Dice<'_>,
    attempts: u32,
) -> Option<EntityId> {
    let radius = radius as i32;
    for attempt in 0..attempts {
        let context = attempt * 2;
        let dx = dice.range(context, 0, (radius * 2) as u32) as i32 - radius;
        let dy = dice.range(context + 1, 0, (radius * 2) as u32) as i32 - radius;
        let position = Position::new(center.x + dx, center.y + dy);
        if position == center {
            continue;
        }
        if let Ok(id) = spawn_actor(state, template, position) {
            return Some(id);
        }
    }
    None
}

/// Drops a fresh instance of `template` on the current floor.
pub fn spawn_item(state: &mut GameState, template: &ItemTemplate, position: Position) -> EntityId {
    let id = state.allocate_entity_id();
    let item = template.instantiate(id);
    state.floor_mut().place_item(position, item);
    id
}

/// Lowers the target's hp. Negative amounts count as zero and the result
/// never drops below zero. Reaching zero runs [`die`].
pub fn apply_damage(
    state: &mut GameState,
    target: EntityId,
    amount: i32,
    source: EntityId,
    events: &mut Vec<GameEvent>,
) -> DamageReport {
    let Some(actor) = state.actor_mut(target).filter(|actor| actor.alive) else {
        return DamageReport::default();
    };
    let before = actor.fighter.hp();
    let after = actor.fighter.set_hp(before - amount.max(0));
    let report = DamageReport {
        dealt: before - after,
        killed: after == 0,
    };
    tracing::trace!(target = %target, source = %source, dealt = report.dealt, hp = after, "damage applied");
    if report.killed {
        die(state, target, events);
    }
    report
}

/// Restores up to `amount` hp, capped at max. Returns the amount recovered.
pub fn heal(
    state: &mut GameState,
    target: EntityId,
    amount: i32,
    events: &mut Vec<GameEvent>,
) -> i32 {
    let Some(actor) = state.actor_mut(target).filter(|actor| actor.alive) else {
        return 0;
    };
    let before = actor.fighter.hp();
    let recovered = actor.fighter.set_hp(before + amount.max(0)) - before;
    if recovered > 0 {
        events.push(GameEvent::Healed {
            actor: target,
            name: actor.name.clone(),
            amount: recovered,
        });
    }
    recovered
}

/// Turns the actor into a corpse and runs its death bookkeeping.
///
/// Returns false if the actor was already dead or does not exist; nothing
/// happens a second time.
pub fn die(state: &mut GameState, target: EntityId, events: &mut Vec<GameEvent>) -> bool {
    let Some(actor) = state.actor_mut(target).filter(|actor| actor.alive) else {
        return false;
    };

    let name = std::mem::take(&mut actor.name);
    actor.name = format!("remains of {name}");
    actor.alive = false;
    actor.glyph = CORPSE_GLYPH;
    actor.color = actor.remains_color;
    actor.blocks_movement = false;
    actor.controller = Controller::Inert;
    actor.status.clear();
    let position = actor.position;
    let xp = actor.level.xp_given;
    let trigger = actor.on_death;

    state.turn.scheduler.remove(target);
    state.turn.deferred.remove(&target);
    tracing::debug!(entity = %target, %name, %position, "actor died");
    events.push(GameEvent::Died {
        entity: target,
        name,
        position,
    });

    if !target.is_player() && xp > 0 {
        if let Some(player) = state.actor_mut(EntityId::PLAYER).filter(|p| p.alive) {
            let level_up_ready = player.level.add_xp(xp);
            events.push(GameEvent::XpGained {
                actor: EntityId::PLAYER,
                amount: xp,
                level_up_ready,
            });
        }
    }

    if trigger == Some(DeathTrigger::Victory) && !state.victory {
        state.victory = true;
        events.push(GameEvent::Victory);
    }
    true
}

/// Builds the floor described by `blueprint` and populates it from the
/// catalog. Entity ids are drawn from `state`; the floor is not inserted.
///
/// # Errors
///
/// Fails if a spawn names a template the catalog does not know.
pub fn materialize_floor(
    state: &mut GameState,
    depth: u32,
    blueprint: &FloorBlueprint,
    catalog: &dyn CatalogOracle,
) -> Result<FloorState, OracleError> {
    let mut floor = FloorState::new(
        depth,
        blueprint.name.clone(),
        blueprint.width,
        blueprint.height,
        blueprint.tiles.clone(),
    );
    floor.upstairs = blueprint.upstairs;
    floor.downstairs = blueprint.downstairs;

    for spawn in &blueprint.spawns {
        match &spawn.kind {
            SpawnKind::Actor(key) => {
                let template = catalog
                    .actor(key)
                    .ok_or_else(|| OracleError::ActorTemplateNotFound(key.clone()))?;
                if let Err(error) = check_tile(&floor, spawn.position) {
                    tracing::warn!(%key, %error, "skipping blueprint spawn");
                    continue;
                }
                let id = state.allocate_entity_id();
                let actor = build_actor(state, id, template, spawn.position);
                floor.actors.insert(id, actor);
            }
            SpawnKind::Item(key) => {
                let template = catalog
                    .item(key)
                    .ok_or_else(|| OracleError::ItemTemplateNotFound(key.clone()))?;
                let id = state.allocate_entity_id();
                floor.place_item(spawn.position, template.instantiate(id));
            }
        }
    }
    Ok(floor)
}

/// Starts a game on the floor described by `blueprint` with the player at
/// its start tile (or the first walkable tile).
///
/// # Errors
///
/// Fails if a spawn names an unknown template.
pub fn new_game(
    game_seed: u64,
    blueprint: &FloorBlueprint,
    player: &ActorTemplate,
    catalog: &dyn CatalogOracle,
) -> Result<GameState, OracleError> {
    let mut state = GameState::new(game_seed, FloorState::walled_room(0, 1, 1));
    let floor = materialize_floor(&mut state, 1, blueprint, catalog)?;
    let start = blueprint
        .player_start
        .or(floor.upstairs)
        .or_else(|| floor.first_walkable())
        .unwrap_or(Position::ORIGIN);

    state.world = WorldState::new(floor);
    let hero = build_actor(&mut state, EntityId::PLAYER, player, start);
    state.floor_mut().actors.insert(EntityId::PLAYER, hero);
    tracing::info!(seed = game_seed, floor = %blueprint.name, "new game");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::state::TileFlags;

    fn room() -> GameState {
        GameState::new(7, FloorState::walled_room(1, 8, 8))
    }

    fn orc() -> ActorTemplate {
        ActorTemplate::builder("orc").stats(10, 3, 0).xp_given(35).build()
    }

    fn spawn_player(state: &mut GameState) {
        let template = ActorTemplate::builder("player").player(26).build();
        let hero = build_actor(state, EntityId::PLAYER, &template, Position::new(1, 1));
        state.floor_mut().actors.insert(EntityId::PLAYER, hero);
    }

    #[test]
    fn spawn_rejects_walls_and_occupied_tiles() {
        let mut state = room();
        assert_eq!(
            spawn_actor(&mut state, &orc(), Position::new(0, 0)),
            Err(SpawnError::NotWalkable(Position::new(0, 0)))
        );
        assert_eq!(
            spawn_actor(&mut state, &orc(), Position::new(20, 0)),
            Err(SpawnError::OutOfBounds(Position::new(20, 0)))
        );
        let id = spawn_actor(&mut state, &orc(), Position::new(3, 3)).unwrap();
        assert_eq!(state.actor(id).unwrap().position, Position::new(3, 3));
        assert_eq!(
            spawn_actor(&mut state, &orc(), Position::new(3, 3)),
            Err(SpawnError::Occupied(Position::new(3, 3)))
        );
    }

    #[test]
    fn damage_clamps_and_ignores_negative_amounts() {
        let mut state = room();
        let id = spawn_actor(&mut state, &orc(), Position::new(3, 3)).unwrap();
        let mut events = Vec::new();

        let report = apply_damage(&mut state, id, -5, EntityId::PLAYER, &mut events);
        assert_eq!(report.dealt, 0);
        assert_eq!(state.actor(id).unwrap().fighter.hp(), 10);

        let report = apply_damage(&mut state, id, 25, EntityId::PLAYER, &mut events);
        assert_eq!(report, DamageReport { dealt: 10, killed: true });
        assert_eq!(state.actor(id).unwrap().fighter.hp(), 0);
    }

    #[test]
    fn death_happens_once_and_awards_xp_once() {
        let mut state = room();
        spawn_player(&mut state);
        let id = spawn_actor(&mut state, &orc(), Position::new(3, 3)).unwrap();
        let mut events = Vec::new();

        apply_damage(&mut state, id, 10, EntityId::PLAYER, &mut events);
        assert!(!die(&mut state, id, &mut events));
        apply_damage(&mut state, id, 10, EntityId::PLAYER, &mut events);

        let corpse = state.actor(id).unwrap();
        assert!(!corpse.alive);
        assert_eq!(corpse.glyph, CORPSE_GLYPH);
        assert_eq!(corpse.name, "remains of orc");
        assert!(!corpse.blocks_movement);
        assert_eq!(corpse.controller, Controller::Inert);
        assert!(!state.turn.scheduler.contains(id));

        let deaths = events
            .iter()
            .filter(|event| matches!(event, GameEvent::Died { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(state.player().unwrap().level.current_xp, 35);
    }

    #[test]
    fn victory_trigger_sets_flag() {
        let mut state = room();
        spawn_player(&mut state);
        let boss = ActorTemplate::builder("dragon")
            .stats(5, 1, 0)
            .on_death(DeathTrigger::Victory)
            .build();
        let id = spawn_actor(&mut state, &boss, Position::new(4, 4)).unwrap();
        let mut events = Vec::new();
        apply_damage(&mut state, id, 5, EntityId::PLAYER, &mut events);
        assert!(state.victory);
        assert!(state.is_game_over());
        assert!(events.contains(&GameEvent::Victory));
    }

    #[test]
    fn heal_reports_actual_recovery() {
        let mut state = room();
        let id = spawn_actor(&mut state, &orc(), Position::new(3, 3)).unwrap();
        let mut events = Vec::new();
        assert_eq!(heal(&mut state, id, 4, &mut events), 0);
        apply_damage(&mut state, id, 3, EntityId::PLAYER, &mut events);
        assert_eq!(heal(&mut state, id, 10, &mut events), 3);
    }

    #[test]
    fn spawn_near_gives_up_quietly() {
        let mut tiles = vec![TileFlags::WALL; 9];
        tiles[4] = TileFlags::FLOOR;
        let mut state = GameState::new(3, FloorState::new(1, "cell", 3, 3, tiles));
        let rng = PcgRng;
        let dice = Dice::for_actor(&rng, &state, EntityId(1));
        assert_eq!(
            spawn_near(&mut state, &orc(), Position::new(1, 1), 1, &dice, 10),
            None
        );
    }

    #[test]
    fn spawn_near_finds_free_tile() {
        let mut state = room();
        let rng = PcgRng;
        let dice = Dice::for_actor(&rng, &state, EntityId(1));
        let center = Position::new(4, 4);
        let id = spawn_near(&mut state, &orc(), center, 2, &dice, 50).unwrap();
        let position = state.actor(id).unwrap().position;
        assert!(position.chebyshev(center) <= 2);
        assert_ne!(position, center);
    }
}
