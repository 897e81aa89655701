//! Monster behaviours.
//!
//! Each [`AiKind`] is a small strategy with one entry point; [`decide`]
//! dispatches on the closed set of kinds. A behaviour reads the world
//! through an [`AiContext`] and keeps whatever it must remember between
//! turns (current path, flight phase, whether it already summoned) in the
//! actor's [`AiMemory`], which lives in the game state and is therefore
//! part of every snapshot.
//!
//! Behaviours only ever propose actions. When the rules refuse one, the
//! engine has the monster wait at the normal cost instead.

mod behaviours;
mod context;

pub use context::AiContext;

use delve_core::{Action, AiKind, AiMemory};

/// Picks the next action for the monster in `ctx`, or `None` when there is
/// nobody to hunt.
pub fn decide(kind: &AiKind, memory: &mut AiMemory, ctx: &AiContext<'_>) -> Option<Action> {
    if matches!(kind, AiKind::ConfusedWalk) {
        return Some(behaviours::stumble(ctx));
    }
    let target = ctx.target()?;
    let action = match kind {
        AiKind::MeleeChaser => behaviours::chase(memory, ctx, target),
        AiKind::StaticRanged => behaviours::shoot(ctx, target),
        AiKind::FleeThenEngage {
            min_period,
            max_period,
        } => behaviours::flutter(memory, ctx, target, *min_period, *max_period),
        AiKind::ConfusedWalk => behaviours::stumble(ctx),
        AiKind::Summoner {
            minion,
            count,
            radius,
        } => behaviours::summon_then_chase(memory, ctx, target, minion, *count, *radius),
        AiKind::Pouncer { reach } => behaviours::pounce_or_chase(memory, ctx, target, *reach),
    };
    tracing::trace!(actor = %ctx.id(), action = action.kind.as_str(), "monster decided");
    Some(action)
}
