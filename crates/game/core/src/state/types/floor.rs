use std::collections::{BTreeMap, BTreeSet};

use bitflags::bitflags;

use super::{ActorState, EntityId, ItemState, Position};

bitflags! {
    /// Per-tile terrain flags supplied by the map generator.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TileFlags: u8 {
        const WALKABLE = 0b0000_0001;
        const TRANSPARENT = 0b0000_0010;
        const DOOR = 0b0000_0100;
        /// Only meaningful together with `DOOR`.
        const OPEN = 0b0000_1000;
    }
}

impl TileFlags {
    pub const WALL: Self = Self::empty();
    pub const FLOOR: Self = Self::WALKABLE.union(Self::TRANSPARENT);
    pub const CLOSED_DOOR: Self = Self::DOOR;
    pub const OPEN_DOOR: Self = Self::DOOR
        .union(Self::OPEN)
        .union(Self::WALKABLE)
        .union(Self::TRANSPARENT);

    pub fn is_closed_door(self) -> bool {
        self.contains(Self::DOOR) && !self.contains(Self::OPEN)
    }
}

/// Item lying on the floor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundItem {
    pub position: Position,
    pub item: ItemState,
}

/// One dungeon level: terrain, the actors living on it and the items lying
/// on it.
///
/// The floor is the arena that owns its actors. Dead actors stay in the
/// arena as corpses; only a level transition moves an actor between floors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorState {
    pub depth: u32,
    pub name: String,
    width: u32,
    height: u32,
    tiles: Vec<TileFlags>,
    explored: Vec<bool>,
    pub upstairs: Option<Position>,
    pub downstairs: Option<Position>,
    pub actors: BTreeMap<EntityId, ActorState>,
    pub items: Vec<GroundItem>,
    pub bloody_tiles: BTreeSet<Position>,
}

impl FloorState {
    /// Creates a floor from a row-major tile grid.
    ///
    /// # Panics
    ///
    /// Panics if `tiles.len() != width * height`.
    pub fn new(depth: u32, name: impl Into<String>, width: u32, height: u32, tiles: Vec<TileFlags>) -> Self {
        assert_eq!(
            tiles.len(),
            (width as usize) * (height as usize),
            "tile grid does not match floor dimensions"
        );
        Self {
            depth,
            name: name.into(),
            width,
            height,
            explored: vec![false; tiles.len()],
            tiles,
            upstairs: None,
            downstairs: None,
            actors: BTreeMap::new(),
            items: Vec::new(),
            bloody_tiles: BTreeSet::new(),
        }
    }

    /// A rectangular room: walls on the border, open floor inside.
    pub fn walled_room(depth: u32, width: u32, height: u32) -> Self {
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
                tiles.push(if border { TileFlags::WALL } else { TileFlags::FLOOR });
            }
        }
        Self::new(depth, format!("Floor {depth}"), width, height, tiles)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.in_bounds(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    /// Out-of-bounds positions read as solid wall.
    pub fn tile(&self, position: Position) -> TileFlags {
        self.index(position)
            .map_or(TileFlags::WALL, |index| self.tiles[index])
    }

    pub fn set_tile(&mut self, position: Position, flags: TileFlags) {
        if let Some(index) = self.index(position) {
            self.tiles[index] = flags;
        }
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).contains(TileFlags::WALKABLE)
    }

    pub fn is_transparent(&self, position: Position) -> bool {
        self.tile(position).contains(TileFlags::TRANSPARENT)
    }

    /// Opens a closed door; returns false if there was none.
    pub fn open_door(&mut self, position: Position) -> bool {
        if !self.tile(position).is_closed_door() {
            return false;
        }
        self.set_tile(position, TileFlags::OPEN_DOOR);
        true
    }

    pub fn is_explored(&self, position: Position) -> bool {
        self.index(position).is_some_and(|index| self.explored[index])
    }

    pub fn mark_explored(&mut self, position: Position) {
        if let Some(index) = self.index(position) {
            self.explored[index] = true;
        }
    }

    pub fn reveal_all(&mut self) {
        self.explored.iter_mut().for_each(|tile| *tile = true);
    }

    /// Iterates every in-bounds position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Living actor whose body blocks `position`.
    pub fn blocking_actor_at(&self, position: Position) -> Option<&ActorState> {
        self.actors
            .values()
            .find(|actor| actor.blocks_movement && actor.position == position)
    }

    /// Living actor standing on `position`.
    pub fn living_actor_at(&self, position: Position) -> Option<&ActorState> {
        self.actors
            .values()
            .find(|actor| actor.alive && actor.position == position)
    }

    pub fn living_actors(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values().filter(|actor| actor.alive)
    }

    /// True when the tile can receive a blocking body.
    pub fn is_free(&self, position: Position) -> bool {
        self.is_walkable(position) && self.blocking_actor_at(position).is_none()
    }

    pub fn items_at(&self, position: Position) -> impl Iterator<Item = &GroundItem> {
        self.items.iter().filter(move |ground| ground.position == position)
    }

    /// Removes and returns the first item lying on `position`.
    pub fn take_item_at(&mut self, position: Position) -> Option<ItemState> {
        let index = self
            .items
            .iter()
            .position(|ground| ground.position == position)?;
        Some(self.items.remove(index).item)
    }

    pub fn place_item(&mut self, position: Position, item: ItemState) {
        self.items.push(GroundItem { position, item });
    }

    /// Marks a tile as stained. Walls and out-of-bounds tiles are ignored.
    pub fn stain(&mut self, position: Position) -> bool {
        self.is_walkable(position) && self.bloody_tiles.insert(position)
    }

    /// First walkable tile in row-major order.
    pub fn first_walkable(&self) -> Option<Position> {
        self.positions().find(|&position| self.is_walkable(position))
    }

    /// Free tile closest to `position` (itself if free), ties resolved in
    /// row-major order.
    pub fn nearest_free(&self, position: Position) -> Option<Position> {
        self.positions()
            .filter(|&candidate| self.is_free(candidate))
            .min_by_key(|&candidate| candidate.chebyshev(position))
    }
}
