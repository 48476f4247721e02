//! # Generation Module
//!
//! Procedural generation of dungeon levels and their inhabitants.
//!
//! A level is produced in fixed stages: a BSP tree partitions the grid, a
//! room is carved in every leaf, sibling subtrees are joined by L-shaped
//! corridors, and finally enemies and items are scattered through the rooms.
//! Every stage draws from one seeded random number generator.

pub mod bsp;
pub mod corridors;
pub mod dungeon;
pub mod encounters;
pub mod items;
pub mod rooms;

pub use bsp::*;
pub use corridors::*;
pub use dungeon::*;
pub use encounters::*;
pub use items::*;
pub use rooms::*;

use crate::{config, DelveError, DelveResult, Position};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for procedural generation.
///
/// Missing fields in a JSON config fall back to the defaults of
/// [`GenerationConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in tiles
    pub grid_width: u32,
    /// Grid height in tiles
    pub grid_height: u32,
    /// Minimum room interior size along either axis
    pub min_room_size: u32,
    /// Maximum number of rooms kept in the map
    pub max_rooms: usize,
    /// Enemy roster capacity
    pub max_enemies: usize,
    /// Item roster capacity
    pub max_items: usize,
    /// Depth budget of the BSP tree
    pub bsp_max_depth: u32,
    /// Minimum region size along a split axis
    pub bsp_min_size: u32,
    /// Chance that each corridor endpoint becomes a door (0.0 to 1.0)
    pub door_chance: f64,
    /// Chance that a non-start room gets an enemy (0.0 to 1.0)
    pub enemy_chance: f64,
    /// Chance that a non-start room gets an item (0.0 to 1.0)
    pub item_chance: f64,
}

impl GenerationConfig {
    /// Creates the standard configuration: an 80x45 grid with up to 15 rooms.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.grid_width, 80);
    /// assert_eq!(config.bsp_min_size, config.min_room_size + 2);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            grid_width: config::DEFAULT_GRID_WIDTH,
            grid_height: config::DEFAULT_GRID_HEIGHT,
            min_room_size: config::MIN_ROOM_SIZE,
            max_rooms: config::MAX_ROOMS,
            max_enemies: config::MAX_ENEMIES,
            max_items: config::MAX_ITEMS,
            bsp_max_depth: config::BSP_MAX_DEPTH,
            bsp_min_size: config::MIN_ROOM_SIZE + 2,
            door_chance: config::DOOR_CHANCE,
            enemy_chance: config::ENEMY_CHANCE,
            item_chance: config::ITEM_CHANCE,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            grid_width: 40,
            grid_height: 30,
            min_room_size: 4,
            max_rooms: 10,
            max_enemies: 8,
            max_items: 8,
            bsp_max_depth: 4,
            bsp_min_size: 6,
            door_chance: 0.0,
            enemy_chance: config::ENEMY_CHANCE,
            item_chance: config::ITEM_CHANCE,
        }
    }

    /// Creates a configuration for large levels with many rooms.
    pub fn for_large_levels(seed: u64) -> Self {
        Self {
            seed,
            grid_width: 160,
            grid_height: 90,
            max_rooms: 64,
            max_enemies: 60,
            max_items: 80,
            bsp_max_depth: 7,
            ..Self::new(seed)
        }
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DelveResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        debug!("Loaded generation config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Creates a seeded random number generator from the config.
    pub fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }

    /// Rejects configurations the generator cannot work with.
    pub fn validate(&self) -> DelveResult<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(DelveError::InvalidConfig(format!(
                "grid must have non-zero dimensions, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.min_room_size < 3 {
            return Err(DelveError::InvalidConfig(format!(
                "min_room_size must be at least 3, got {}",
                self.min_room_size
            )));
        }
        match self.min_room_size.checked_add(2) {
            Some(walled) if walled <= self.grid_width && walled <= self.grid_height => {}
            _ => {
                return Err(DelveError::InvalidConfig(format!(
                    "min_room_size {} plus its wall ring does not fit the {}x{} grid",
                    self.min_room_size, self.grid_width, self.grid_height
                )));
            }
        }
        if self.bsp_max_depth == 0 {
            return Err(DelveError::InvalidConfig(
                "bsp_max_depth must be at least 1".to_string(),
            ));
        }
        let fits_twice = self
            .bsp_min_size
            .checked_mul(2)
            .is_some_and(|double| double < self.grid_width && double < self.grid_height);
        if self.bsp_min_size == 0 || !fits_twice {
            return Err(DelveError::InvalidConfig(format!(
                "bsp_min_size {} must be non-zero and less than half of the {}x{} grid",
                self.bsp_min_size, self.grid_width, self.grid_height
            )));
        }
        if self.max_rooms == 0 {
            return Err(DelveError::InvalidConfig(
                "max_rooms must be at least 1".to_string(),
            ));
        }
        for (name, chance) in [
            ("door_chance", self.door_chance),
            ("enemy_chance", self.enemy_chance),
            ("item_chance", self.item_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(DelveError::InvalidConfig(format!(
                    "{name} must be within 0.0..=1.0, got {chance}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room of floor tiles.
///
/// The rectangle covers the floor only; the room's walls sit on the ring of
/// tiles just outside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    /// Leaf-discovery ordinal of this room
    pub id: u32,
    /// Top-left floor tile of the room
    pub top_left: Position,
    /// Floor width in tiles
    pub width: u32,
    /// Floor height in tiles
    pub height: u32,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Room, Position};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.id, 1);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// ```
    pub fn new(id: u32, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
        }
    }

    /// Gets the bottom-right floor tile of the room.
    pub fn bottom_right(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 - 1,
            self.top_left.y + self.height as i32 - 1,
        )
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }

    /// Gets the area of the room in tiles.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Checks if a position is a floor tile of this room.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x < self.top_left.x + self.width as i32
            && pos.y < self.top_left.y + self.height as i32
    }

    /// Checks if this room shares any floor tile with another room.
    pub fn overlaps(&self, other: &Room) -> bool {
        self.top_left.x < other.top_left.x + other.width as i32
            && other.top_left.x < self.top_left.x + self.width as i32
            && self.top_left.y < other.top_left.y + other.height as i32
            && other.top_left.y < self.top_left.y + self.height as i32
    }

    /// Padded overlap test with inclusive bounds: both rectangles are grown by
    /// `padding` and touching edges count as overlapping.
    pub fn overlaps_padded(&self, other: &Room, padding: i32) -> bool {
        let (a, b) = (self, other);
        a.top_left.x - padding <= b.top_left.x + b.width as i32 + padding
            && a.top_left.x + a.width as i32 + padding >= b.top_left.x - padding
            && a.top_left.y - padding <= b.top_left.y + b.height as i32 + padding
            && a.top_left.y + a.height as i32 + padding >= b.top_left.y - padding
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.area() as usize);

        for y in self.top_left.y..(self.top_left.y + self.height as i32) {
            for x in self.top_left.x..(self.top_left.x + self.width as i32) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }

    /// Gets the ring of wall positions just outside the floor rectangle.
    ///
    /// Positions may lie off the grid for rooms touching the map edge.
    pub fn wall_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        let left = self.top_left.x - 1;
        let right = self.top_left.x + self.width as i32;
        let top = self.top_left.y - 1;
        let bottom = self.top_left.y + self.height as i32;

        // Top and bottom walls
        for x in left..=right {
            positions.push(Position::new(x, top));
            positions.push(Position::new(x, bottom));
        }

        // Left and right walls (excluding corners already added)
        for y in (top + 1)..bottom {
            positions.push(Position::new(left, y));
            positions.push(Position::new(right, y));
        }

        positions
    }

    /// Gets the floor tiles one step in from the room's edge, where entities
    /// are spawned.
    pub fn interior_positions(&self) -> Vec<Position> {
        if self.width < 3 || self.height < 3 {
            return Vec::new();
        }

        let mut positions = Vec::new();
        for y in (self.top_left.y + 1)..(self.top_left.y + self.height as i32 - 1) {
            for x in (self.top_left.x + 1)..(self.top_left.x + self.width as i32 - 1) {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }
}

/// Trait for procedural generators.
///
/// All generation systems in Delve implement this trait so they share one
/// interface for generating, validating and logging.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> DelveResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}
