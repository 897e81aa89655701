//! Grid field of view and pathfinding served through
//! [`delve_core::VisionOracle`].
//!
//! Sight is a circle of the configured radius; a tile inside it is visible
//! when the Bresenham line from the viewer reaches it without crossing an
//! opaque tile. Walls that end a line are lit so rooms show their outline.
//!
//! Paths are A* over the eight neighbours. An orthogonal step costs 2 and a
//! diagonal one 3; entering a tile held by a blocking actor adds the
//! configured penalty so crowds flank instead of queueing. Closed doors are
//! passable for planning because walkers open them on the way.
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use delve_core::{Direction, FloorState, Position, VisionOracle};

const ORTHOGONAL_COST: u32 = 2;
const DIAGONAL_COST: u32 = 3;

#[derive(Clone, Debug, Default)]
pub struct GridVision {
    width: u32,
    height: u32,
    visible: Vec<bool>,
    blocked_penalty: u32,
}

impl GridVision {
    pub fn new(blocked_penalty: u32) -> Self {
        Self {
            blocked_penalty,
            ..Self::default()
        }
    }

    /// Tiles in view at the last refresh, row-major.
    pub fn visible_positions(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width.max(1) as usize;
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, seen)| **seen)
            .map(move |(index, _)| Position::new((index % width) as i32, (index / width) as i32))
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x < 0
            || position.y < 0
            || position.x as u32 >= self.width
            || position.y as u32 >= self.height
        {
            return None;
        }
        Some(position.y as usize * self.width as usize + position.x as usize)
    }

    fn step_cost(&self, floor: &FloorState, from: Position, to: Position) -> u32 {
        let base = if from.x != to.x && from.y != to.y {
            DIAGONAL_COST
        } else {
            ORTHOGONAL_COST
        };
        if floor.blocking_actor_at(to).is_some() {
            base + self.blocked_penalty
        } else {
            base
        }
    }
}

fn passable(floor: &FloorState, position: Position) -> bool {
    floor.in_bounds(position)
        && (floor.is_walkable(position) || floor.tile(position).is_closed_door())
}

/// Tiles on the straight line from `from` to `to`, both ends excluded.
fn line_between(from: Position, to: Position) -> Vec<Position> {
    let mut points = Vec::new();
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = (to.x - from.x).signum();
    let sy = (to.y - from.y).signum();
    let mut error = dx + dy;
    let (mut x, mut y) = (from.x, from.y);
    loop {
        if x == to.x && y == to.y {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += sx;
        }
        if doubled <= dx {
            error += dx;
            y += sy;
        }
        let point = Position::new(x, y);
        if point != to {
            points.push(point);
        }
    }
    points
}

impl VisionOracle for GridVision {
    fn refresh(&mut self, floor: &FloorState, viewer: Position, radius: u32) {
        self.width = floor.width();
        self.height = floor.height();
        self.visible = vec![false; (self.width * self.height) as usize];

        let reach = radius as i32;
        let limit = i64::from(radius) * i64::from(radius);
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if i64::from(dx * dx + dy * dy) > limit {
                    continue;
                }
                let position = Position::new(viewer.x + dx, viewer.y + dy);
                let Some(index) = self.index(position) else {
                    continue;
                };
                if self.line_of_sight_clear(floor, viewer, position) {
                    self.visible[index] = true;
                }
            }
        }
    }

    fn is_visible(&self, position: Position) -> bool {
        self.index(position)
            .is_some_and(|index| self.visible.get(index).copied().unwrap_or(false))
    }

    fn line_of_sight_clear(&self, floor: &FloorState, from: Position, to: Position) -> bool {
        line_between(from, to)
            .into_iter()
            .all(|point| floor.in_bounds(point) && floor.is_transparent(point))
    }

    fn path_to(&self, floor: &FloorState, from: Position, to: Position) -> Vec<Position> {
        if from == to || !floor.in_bounds(from) || !passable(floor, to) {
            return Vec::new();
        }
        let width = floor.width() as usize;
        let size = width * floor.height() as usize;
        let index = |position: Position| position.y as usize * width + position.x as usize;

        let mut best = vec![u32::MAX; size];
        let mut came_from: Vec<Option<Position>> = vec![None; size];
        let mut open = BinaryHeap::new();
        best[index(from)] = 0;
        open.push(Reverse((from.chebyshev(to) * ORTHOGONAL_COST, 0u32, from)));

        while let Some(Reverse((_, cost, current))) = open.pop() {
            if current == to {
                break;
            }
            if cost > best[index(current)] {
                continue;
            }
            for direction in Direction::ALL {
                let next = current.step(direction);
                if !passable(floor, next) {
                    continue;
                }
                let candidate = cost + self.step_cost(floor, current, next);
                if candidate < best[index(next)] {
                    best[index(next)] = candidate;
                    came_from[index(next)] = Some(current);
                    let estimate = candidate + next.chebyshev(to) * ORTHOGONAL_COST;
                    open.push(Reverse((estimate, candidate, next)));
                }
            }
        }

        if came_from[index(to)].is_none() {
            return Vec::new();
        }
        let mut path = vec![to];
        let mut cursor = to;
        while let Some(previous) = came_from[index(cursor)] {
            if previous == from {
                break;
            }
            path.push(previous);
            cursor = previous;
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::TileFlags;

    fn room() -> FloorState {
        FloorState::walled_room(1, 12, 8)
    }

    #[test]
    fn walls_block_sight_but_are_lit() {
        let mut floor = room();
        for y in 1..7 {
            floor.set_tile(Position::new(5, y), TileFlags::WALL);
        }
        let mut vision = GridVision::new(10);
        vision.refresh(&floor, Position::new(2, 3), 8);

        assert!(vision.is_visible(Position::new(2, 3)));
        assert!(vision.is_visible(Position::new(4, 3)));
        assert!(vision.is_visible(Position::new(5, 3)));
        assert!(!vision.is_visible(Position::new(7, 3)));
        assert!(!vision.is_visible(Position::new(-1, 3)));
    }

    #[test]
    fn radius_limits_sight() {
        let floor = FloorState::walled_room(1, 30, 5);
        let mut vision = GridVision::new(10);
        vision.refresh(&floor, Position::new(1, 2), 4);
        assert!(vision.is_visible(Position::new(5, 2)));
        assert!(!vision.is_visible(Position::new(6, 2)));
    }

    #[test]
    fn path_excludes_start_and_includes_goal() {
        let floor = room();
        let vision = GridVision::new(10);
        let path = vision.path_to(&floor, Position::new(1, 1), Position::new(4, 1));
        assert_eq!(
            path,
            vec![Position::new(2, 1), Position::new(3, 1), Position::new(4, 1)]
        );
    }

    #[test]
    fn path_goes_around_walls_and_through_doors() {
        let mut floor = room();
        for y in 1..7 {
            floor.set_tile(Position::new(5, y), TileFlags::WALL);
        }
        let vision = GridVision::new(10);
        assert!(vision
            .path_to(&floor, Position::new(2, 3), Position::new(8, 3))
            .is_empty());

        floor.set_tile(Position::new(5, 3), TileFlags::CLOSED_DOOR);
        let path = vision.path_to(&floor, Position::new(2, 3), Position::new(8, 3));
        assert!(path.contains(&Position::new(5, 3)));
        assert_eq!(path.last(), Some(&Position::new(8, 3)));
    }

    #[test]
    fn unreachable_goal_gives_empty_path() {
        let floor = room();
        let vision = GridVision::new(10);
        assert!(vision
            .path_to(&floor, Position::new(1, 1), Position::new(0, 0))
            .is_empty());
    }
}
