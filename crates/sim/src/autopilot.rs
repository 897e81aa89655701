//! A simple player brain for headless runs.
//!
//! Priorities, highest first: spend a pending level-up, drink a potion when
//! badly hurt, fight whatever is adjacent, collect loot, wear better gear,
//! walk towards visible monsters, climb the stairs, explore.
use delve_core::{
    Action, ActionKind, ActorState, Direction, EquipAction, FloorState, LevelUpAction,
    LevelUpChoice, MeleeAction, MoveAction, OpenDoorAction, PickupAction, Position,
    QuickHealAction, TakeStairsAction,
};
use delve_runtime::selection::{select_item, slot_letter};
use delve_runtime::{DecisionContext, DecisionSource};

/// Unexplored tiles considered per exploration step.
const EXPLORE_CANDIDATES: usize = 8;

#[derive(Debug, Default)]
pub struct Autopilot {
    /// Set after a refusal so the next answer is a plain wait instead of
    /// the same refused choice.
    refused: bool,
    levels_spent: u32,
}

impl DecisionSource for Autopilot {
    fn next_action(&mut self, ctx: &DecisionContext<'_>) -> Option<Action> {
        let me = ctx.actor_state()?;
        if std::mem::take(&mut self.refused) {
            return Some(Action::wait(ctx.actor, ctx.config));
        }
        let kind = self
            .level_up(me)
            .or_else(|| heal(me))
            .or_else(|| fight(ctx, me))
            .or_else(|| loot(ctx, me))
            .or_else(|| gear_up(me))
            .or_else(|| hunt(ctx, me))
            .or_else(|| climb(ctx, me))
            .or_else(|| explore(ctx, me));
        Some(match kind {
            Some(kind) => ctx.action(kind),
            None => Action::wait(ctx.actor, ctx.config),
        })
    }

    fn on_rejected(&mut self, action: &Action, reason: &str) {
        tracing::debug!(action = action.kind.as_str(), reason, "autopilot refused");
        self.refused = true;
    }
}

impl Autopilot {
    fn level_up(&mut self, me: &ActorState) -> Option<ActionKind> {
        if !me.level.requires_level_up() {
            return None;
        }
        let choice = match self.levels_spent % 3 {
            0 => LevelUpChoice::Constitution,
            1 => LevelUpChoice::Strength,
            _ => LevelUpChoice::Agility,
        };
        self.levels_spent += 1;
        Some(ActionKind::LevelUp(LevelUpAction { choice }))
    }
}

fn heal(me: &ActorState) -> Option<ActionKind> {
    let hurt = me.fighter.hp() * 2 < me.fighter.max_hp();
    let has_potion = me.inventory.items().iter().any(|item| item.is_healing());
    (hurt && has_potion).then_some(ActionKind::QuickHeal(QuickHealAction))
}

fn fight(ctx: &DecisionContext<'_>, me: &ActorState) -> Option<ActionKind> {
    let floor = ctx.state.floor();
    Direction::ALL.into_iter().find_map(|direction| {
        floor
            .living_actor_at(me.position.step(direction))
            .filter(|other| other.id != me.id)
            .map(|_| ActionKind::Melee(MeleeAction::new(direction)))
    })
}

fn loot(ctx: &DecisionContext<'_>, me: &ActorState) -> Option<ActionKind> {
    let underfoot = ctx.state.floor().items_at(me.position).next().is_some();
    (underfoot && !me.inventory.is_full()).then_some(ActionKind::Pickup(PickupAction))
}

/// Equips the first carried item whose slot is still empty, walking the
/// backpack by letter the way a player would.
fn gear_up(me: &ActorState) -> Option<ActionKind> {
    (0..me.inventory.len())
        .filter_map(slot_letter)
        .filter_map(|letter| select_item(me, letter).ok())
        .find(|item| {
            item.equippable()
                .is_some_and(|gear| me.equipment.get(gear.slot()).is_none())
        })
        .map(|item| ActionKind::Equip(EquipAction { item: item.id }))
}

fn hunt(ctx: &DecisionContext<'_>, me: &ActorState) -> Option<ActionKind> {
    let target = ctx
        .state
        .floor()
        .living_actors()
        .filter(|other| other.id != me.id && ctx.vision.is_visible(other.position))
        .min_by_key(|other| (me.position.chebyshev(other.position), other.id))?;
    walk_to(ctx, me, target.position)
}

fn climb(ctx: &DecisionContext<'_>, me: &ActorState) -> Option<ActionKind> {
    let stairs = ctx.state.floor().upstairs?;
    if !ctx.state.floor().is_explored(stairs) {
        return None;
    }
    if me.position == stairs {
        return Some(ActionKind::TakeStairs(TakeStairsAction));
    }
    walk_to(ctx, me, stairs)
}

fn explore(ctx: &DecisionContext<'_>, me: &ActorState) -> Option<ActionKind> {
    let floor = ctx.state.floor();
    let mut frontier: Vec<Position> = floor
        .positions()
        .filter(|&tile| !floor.is_explored(tile) && is_passable(floor, tile))
        .collect();
    frontier.sort_by_key(|&tile| (me.position.chebyshev(tile), tile.y, tile.x));
    frontier
        .into_iter()
        .take(EXPLORE_CANDIDATES)
        .find_map(|tile| walk_to(ctx, me, tile))
}

fn is_passable(floor: &FloorState, tile: Position) -> bool {
    floor.is_walkable(tile) || floor.tile(tile).is_closed_door()
}

/// First step of the path to `goal`, opening doors on the way.
fn walk_to(ctx: &DecisionContext<'_>, me: &ActorState, goal: Position) -> Option<ActionKind> {
    let floor = ctx.state.floor();
    let next = *ctx.vision.path_to(floor, me.position, goal).first()?;
    let direction = me.position.direction_to(next)?;
    if floor.tile(next).is_closed_door() {
        return Some(ActionKind::OpenDoor(OpenDoorAction { direction }));
    }
    Some(ActionKind::Move(MoveAction::new(direction)))
}
