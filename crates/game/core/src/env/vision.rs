//! Field-of-view and pathfinding oracle.
//!
//! Both computations are external to the rules; actions and AI only ask
//! questions through this trait.

use crate::state::{FloorState, Position};

pub trait VisionOracle {
    /// Recomputes what `viewer` can see on `floor`.
    fn refresh(&mut self, floor: &FloorState, viewer: Position, radius: u32);

    /// Whether `position` was in view at the last refresh.
    fn is_visible(&self, position: Position) -> bool;

    /// Whether nothing opaque lies strictly between the two tiles.
    fn line_of_sight_clear(&self, floor: &FloorState, from: Position, to: Position) -> bool;

    /// Steps from `from` (exclusive) to `to` (inclusive), or empty when
    /// unreachable. Tiles held by blocking actors cost extra so crowds
    /// spread out instead of queueing.
    fn path_to(&self, floor: &FloorState, from: Position, to: Position) -> Vec<Position>;
}
