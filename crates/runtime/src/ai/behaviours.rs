use delve_core::{
    Action, ActionKind, ActorState, AiMemory, Direction, MeleeAction, MoveAction, OpenDoorAction,
    Position, PounceAction, SummonAction,
};

use super::AiContext;

/// Seed contexts for behaviour rolls; kept clear of the combat contexts.
mod roll {
    pub const WANDER: u32 = 0x100;
    pub const PHASE: u32 = 0x101;
}

/// Walk up to the player once seen and strike when adjacent.
pub(super) fn chase(memory: &mut AiMemory, ctx: &AiContext<'_>, target: &ActorState) -> Action {
    if ctx.in_view() {
        if let Some(action) = strike(ctx, target) {
            return action;
        }
        memory.path = ctx.path_to(target.position);
    }
    follow_path(memory, ctx)
}

/// Stand still and shoot whenever the player can be seen.
pub(super) fn shoot(ctx: &AiContext<'_>, target: &ActorState) -> Action {
    if ctx.in_view() {
        return Action::ranged(ctx.id(), target.position, ctx.env.config());
    }
    ctx.wait()
}

/// Flutter randomly, then dive at the player, switching every few turns.
pub(super) fn flutter(
    memory: &mut AiMemory,
    ctx: &AiContext<'_>,
    target: &ActorState,
    min_period: u32,
    max_period: u32,
) -> Action {
    if !ctx.in_view() {
        return follow_path(memory, ctx);
    }
    if let Some(action) = strike(ctx, target) {
        return action;
    }

    if memory.phase_turns == 0 {
        memory.phase_turns = ctx.dice().range(roll::PHASE, min_period, max_period).max(1);
    }
    let engaged = memory.engaged;
    memory.phase_turns -= 1;
    if memory.phase_turns == 0 {
        memory.engaged = !engaged;
    }

    if engaged {
        memory.path = ctx.path_to(target.position);
        follow_path(memory, ctx)
    } else {
        memory.path.clear();
        stumble(ctx)
    }
}

/// Bump into a random neighbour, attacking whatever stands there.
pub(super) fn stumble(ctx: &AiContext<'_>) -> Action {
    let direction = ctx.random_direction(roll::WANDER);
    Action::bump(ctx.id(), direction, ctx.env.config())
}

/// Call minions the first time the player is seen, then chase.
pub(super) fn summon_then_chase(
    memory: &mut AiMemory,
    ctx: &AiContext<'_>,
    target: &ActorState,
    minion: &str,
    count: u32,
    radius: u32,
) -> Action {
    if ctx.in_view() && !memory.summoned {
        memory.summoned = true;
        return ctx.action(ActionKind::Summon(SummonAction {
            template: minion.to_owned(),
            radius,
            count,
        }));
    }
    chase(memory, ctx, target)
}

/// Leap at the player from up to `reach` tiles when there is room to land.
pub(super) fn pounce_or_chase(
    memory: &mut AiMemory,
    ctx: &AiContext<'_>,
    target: &ActorState,
    reach: u32,
) -> Action {
    if ctx.in_view() {
        if let Some(action) = strike(ctx, target) {
            return action;
        }
        if ctx.distance_to(target.position) <= reach {
            let landing = landing_tile(target.position, ctx.position());
            if landing.is_some_and(|tile| ctx.state.floor().is_free(tile)) {
                return ctx.action(ActionKind::Pounce(PounceAction::new(target.position, reach)));
            }
        }
        memory.path = ctx.path_to(target.position);
    }
    follow_path(memory, ctx)
}

fn strike(ctx: &AiContext<'_>, target: &ActorState) -> Option<Action> {
    if ctx.distance_to(target.position) != 1 {
        return None;
    }
    let direction = ctx.position().direction_to(target.position)?;
    Some(ctx.action(ActionKind::Melee(MeleeAction::new(direction))))
}

fn landing_tile(target: Position, origin: Position) -> Option<Position> {
    target.direction_to(origin).map(|direction| target.step(direction))
}

/// Takes the next remembered step. Closed doors are opened first and the
/// step is kept for the following turn.
fn follow_path(memory: &mut AiMemory, ctx: &AiContext<'_>) -> Action {
    let Some(&next) = memory.path.first() else {
        return ctx.wait();
    };
    let Some(direction) = step_towards(ctx.position(), next) else {
        memory.path.clear();
        return ctx.wait();
    };
    if ctx.state.floor().tile(next).is_closed_door() {
        return ctx.action(ActionKind::OpenDoor(OpenDoorAction { direction }));
    }
    memory.path.remove(0);
    ctx.action(ActionKind::Move(MoveAction::new(direction)))
}

fn step_towards(from: Position, to: Position) -> Option<Direction> {
    if from.chebyshev(to) != 1 {
        return None;
    }
    from.direction_to(to)
}
