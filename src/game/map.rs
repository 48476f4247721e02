//! # Map Module
//!
//! The tile grid produced by the generator and the spatial queries that run
//! on it: walkability, single-step movement and line of sight.

use crate::utils::BresenhamLine;
use crate::{Direction, Position, Room};
use serde::{Deserialize, Serialize};

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Untouched rock outside any room or corridor
    #[default]
    Empty,
    /// Wall bordering a room or corridor
    Wall,
    /// Walkable floor
    Floor,
    /// Walkable doorway at a corridor end
    Door,
}

impl TileType {
    /// Whether entities can stand on this tile.
    pub fn is_walkable(self) -> bool {
        matches!(self, TileType::Floor | TileType::Door)
    }

    /// Whether this tile stops a line of sight.
    pub fn blocks_sight(self) -> bool {
        self == TileType::Wall
    }

    /// Character used for this tile in text output.
    pub fn glyph(self) -> char {
        match self {
            TileType::Empty => ' ',
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::Door => '+',
        }
    }
}

/// Fixed-size 2D grid of tiles, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<TileType>,
}

impl TileGrid {
    /// Creates a grid with every cell set to [`TileType::Empty`].
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileType::Empty; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks whether a position lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Gets the tile at a position, or None when off the grid.
    pub fn get(&self, pos: Position) -> Option<TileType> {
        self.index(pos).map(|idx| self.tiles[idx])
    }

    /// Sets the tile at a position.
    ///
    /// Returns false, without touching the grid, when the position is off the grid.
    pub fn set(&mut self, pos: Position, tile: TileType) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.tiles[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Overwrites every cell with `tile`.
    pub fn fill(&mut self, tile: TileType) {
        self.tiles.fill(tile);
    }

    /// Counts cells of the given type.
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Iterates over every cell with its position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Position, TileType)> + '_ {
        let width = self.width as usize;
        self.tiles.iter().enumerate().map(move |(idx, &tile)| {
            (
                Position::new((idx % width) as i32, (idx / width) as i32),
                tile,
            )
        })
    }

    /// Iterates over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[TileType]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }
}

/// A generated dungeon level: the tile grid plus its rooms.
///
/// Rooms are kept in leaf-discovery order and capped at `max_rooms`. The room
/// at index 0 is the start room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    /// Tile states of the level
    pub tiles: TileGrid,
    /// Rooms in discovery order
    pub rooms: Vec<Room>,
    max_rooms: usize,
}

impl Map {
    /// Creates an all-empty map with room for `max_rooms` rooms.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Map, Position, TileType};
    ///
    /// let map = Map::new(20, 10, 4);
    /// assert_eq!(map.width(), 20);
    /// assert_eq!(map.tiles.get(Position::new(3, 3)), Some(TileType::Empty));
    /// assert!(map.rooms.is_empty());
    /// ```
    pub fn new(width: u32, height: u32, max_rooms: usize) -> Self {
        Self {
            tiles: TileGrid::new(width, height),
            rooms: Vec::with_capacity(max_rooms),
            max_rooms,
        }
    }

    pub fn width(&self) -> u32 {
        self.tiles.width()
    }

    pub fn height(&self) -> u32 {
        self.tiles.height()
    }

    pub fn max_rooms(&self) -> usize {
        self.max_rooms
    }

    /// Resets every tile to empty and clears the room list.
    pub fn reset(&mut self) {
        self.tiles.fill(TileType::Empty);
        self.rooms.clear();
    }

    /// Whether another room fits under the room cap.
    pub fn has_room_capacity(&self) -> bool {
        self.rooms.len() < self.max_rooms
    }

    /// Appends a room to the room list.
    ///
    /// Rooms past the cap are dropped silently; the return value tells the
    /// caller whether the room was kept.
    pub fn add_room(&mut self, room: Room) -> bool {
        if !self.has_room_capacity() {
            return false;
        }
        self.rooms.push(room);
        true
    }

    /// The designated start room, if any room was generated.
    pub fn start_room(&self) -> Option<&Room> {
        self.rooms.first()
    }

    /// Where the player begins: the center of the start room.
    pub fn player_start(&self) -> Option<Position> {
        self.start_room().map(Room::center)
    }

    /// Checks whether the tile at `pos` can be stood on.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tiles.get(pos).is_some_and(TileType::is_walkable)
    }

    /// Moves `pos` by `(dx, dy)` if the destination is on the grid and walkable.
    ///
    /// On failure `pos` is left untouched and false is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Map, Position, TileType};
    ///
    /// let mut map = Map::new(5, 5, 1);
    /// map.tiles.set(Position::new(1, 1), TileType::Floor);
    /// map.tiles.set(Position::new(2, 1), TileType::Door);
    ///
    /// let mut pos = Position::new(1, 1);
    /// assert!(map.move_entity(&mut pos, 1, 0));
    /// assert_eq!(pos, Position::new(2, 1));
    /// assert!(!map.move_entity(&mut pos, 0, 1));
    /// assert_eq!(pos, Position::new(2, 1));
    /// ```
    pub fn move_entity(&self, pos: &mut Position, dx: i32, dy: i32) -> bool {
        let destination = Position::new(pos.x + dx, pos.y + dy);
        if !self.is_walkable(destination) {
            return false;
        }
        *pos = destination;
        true
    }

    /// Moves `pos` one tile in `direction`. See [`Map::move_entity`].
    pub fn step(&self, pos: &mut Position, direction: Direction) -> bool {
        let delta = direction.to_delta();
        self.move_entity(pos, delta.x, delta.y)
    }

    /// Traces a Bresenham line from `from` to `to` and reports whether it is
    /// free of walls.
    ///
    /// Every cell stepped onto after the start is tested, the target included.
    /// Off-grid cells block sight.
    pub fn is_visible(&self, from: Position, to: Position) -> bool {
        BresenhamLine::new(from, to).all(|pos| {
            self.tiles
                .get(pos)
                .is_some_and(|tile| !tile.blocks_sight())
        })
    }

    /// True when `room` comes within the 2-tile padding of any listed room
    /// (inclusive bounds).
    pub fn check_room_overlap(&self, room: &Room) -> bool {
        self.rooms.iter().any(|existing| room.overlaps_padded(existing, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor_map() -> Map {
        // ##########
        // #....#...#
        // ##########
        let mut map = Map::new(10, 3, 4);
        for x in 0..10 {
            map.tiles.set(Position::new(x, 0), TileType::Wall);
            map.tiles.set(Position::new(x, 2), TileType::Wall);
            let middle = if x == 0 || x == 5 || x == 9 {
                TileType::Wall
            } else {
                TileType::Floor
            };
            map.tiles.set(Position::new(x, 1), middle);
        }
        map
    }

    #[test]
    fn test_grid_starts_empty() {
        let grid = TileGrid::new(7, 4);
        assert_eq!(grid.count(TileType::Empty), 28);
        assert_eq!(grid.rows().count(), 4);
        assert!(grid.iter().all(|(_, tile)| tile == TileType::Empty));
    }

    #[test]
    fn test_grid_bounds() {
        let mut grid = TileGrid::new(4, 3);
        assert!(grid.in_bounds(Position::new(3, 2)));
        assert!(!grid.in_bounds(Position::new(4, 2)));
        assert!(!grid.in_bounds(Position::new(0, -1)));
        assert_eq!(grid.get(Position::new(-1, 0)), None);
        assert!(!grid.set(Position::new(0, 3), TileType::Floor));
        assert!(grid.set(Position::new(3, 2), TileType::Floor));
        assert_eq!(grid.get(Position::new(3, 2)), Some(TileType::Floor));
    }

    #[test]
    fn test_grid_iter_positions_are_row_major() {
        let grid = TileGrid::new(3, 2);
        let positions: Vec<_> = grid.iter().map(|(pos, _)| pos).collect();
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[2], Position::new(2, 0));
        assert_eq!(positions[3], Position::new(0, 1));
    }

    #[test]
    fn test_tile_properties() {
        assert!(TileType::Floor.is_walkable());
        assert!(TileType::Door.is_walkable());
        assert!(!TileType::Wall.is_walkable());
        assert!(!TileType::Empty.is_walkable());
        assert!(TileType::Wall.blocks_sight());
        assert!(!TileType::Door.blocks_sight());
        assert!(!TileType::Empty.blocks_sight());
    }

    #[test]
    fn test_room_cap_drops_silently() {
        let mut map = Map::new(40, 40, 2);
        assert!(map.add_room(Room::new(0, Position::new(1, 1), 5, 5)));
        assert!(map.add_room(Room::new(1, Position::new(10, 1), 5, 5)));
        assert!(!map.add_room(Room::new(2, Position::new(20, 1), 5, 5)));
        assert_eq!(map.rooms.len(), 2);
        assert_eq!(map.player_start(), Some(Position::new(3, 3)));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut map = corridor_map();
        map.add_room(Room::new(0, Position::new(1, 1), 3, 1));
        map.reset();
        assert!(map.rooms.is_empty());
        assert_eq!(map.tiles.count(TileType::Empty), 30);
    }

    #[test]
    fn test_movement_boundaries() {
        let map = corridor_map();

        let mut pos = Position::new(1, 1);
        assert!(!map.move_entity(&mut pos, -1, 0)); // wall
        assert!(!map.move_entity(&mut pos, 0, -1)); // wall
        assert_eq!(pos, Position::new(1, 1));

        assert!(map.step(&mut pos, Direction::East));
        assert_eq!(pos, Position::new(2, 1));

        let mut edge = Position::new(0, 0);
        assert!(!map.move_entity(&mut edge, -1, 0)); // off grid
        assert_eq!(edge, Position::new(0, 0));
    }

    #[test]
    fn test_movement_off_grid_edge_floor() {
        let mut map = Map::new(3, 3, 1);
        map.tiles.fill(TileType::Floor);
        let mut pos = Position::new(2, 2);
        assert!(!map.step(&mut pos, Direction::East));
        assert!(!map.step(&mut pos, Direction::South));
        assert_eq!(pos, Position::new(2, 2));
        assert!(map.step(&mut pos, Direction::North));
    }

    #[test]
    fn test_visibility_same_and_adjacent() {
        let map = corridor_map();
        let p = Position::new(2, 1);
        assert!(map.is_visible(p, p));
        assert!(map.is_visible(p, Position::new(3, 1)));
        assert!(map.is_visible(p, Position::new(1, 1)));
    }

    #[test]
    fn test_visibility_blocked_by_wall() {
        let map = corridor_map();
        assert!(map.is_visible(Position::new(1, 1), Position::new(4, 1)));
        assert!(!map.is_visible(Position::new(4, 1), Position::new(6, 1)));
        assert!(!map.is_visible(Position::new(1, 1), Position::new(8, 1)));
    }

    #[test]
    fn test_visibility_wall_at_target_blocks() {
        let map = corridor_map();
        assert!(!map.is_visible(Position::new(4, 1), Position::new(5, 1)));
    }

    #[test]
    fn test_overlap_check_uses_padding() {
        let mut map = Map::new(60, 30, 4);
        map.add_room(Room::new(0, Position::new(5, 5), 5, 5));

        // Touching the 2-tile padding counts as overlap.
        assert!(map.check_room_overlap(&Room::new(1, Position::new(14, 5), 5, 5)));
        // Well clear of it does not.
        assert!(!map.check_room_overlap(&Room::new(1, Position::new(20, 5), 5, 5)));
    }
}
