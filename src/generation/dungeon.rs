//! # Dungeon Generation
//!
//! The BSP room-and-corridor generator.
//!
//! Generation runs in a fixed order:
//! 1. Validate the configuration
//! 2. Reset the grid to empty and clear the room list
//! 3. Partition the whole grid with a BSP tree
//! 4. Carve a room into every leaf
//! 5. Join sibling subtrees with L-shaped corridors
//! 6. Drop the tree, keeping only the map

use crate::{
    unreachable_rooms, validate_connectivity, BspTreeBuilder, CorridorConnector, DelveError,
    DelveResult, GenerationConfig, Generator, Map, Region, RoomCarver,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Counts describing one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Leaves of the BSP tree
    pub leaf_count: usize,
    /// Splits on the longest root-to-leaf path
    pub tree_depth: u32,
    /// Rooms listed in the map
    pub rooms_placed: usize,
    /// Rooms carved in a leaf but left off the map by the room cap
    pub rooms_dropped: usize,
    /// Leaves too small to hold a room
    pub leaves_without_room: usize,
    /// Corridors carved between sibling subtrees
    pub corridors: usize,
}

/// Dungeon generator using binary space partitioning.
///
/// The generator itself is stateless; every run is driven by the
/// [`GenerationConfig`] and the random number generator passed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BspDungeonGenerator;

impl BspDungeonGenerator {
    /// Creates a new dungeon generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{BspDungeonGenerator, GenerationConfig, Generator};
    ///
    /// let config = GenerationConfig::new(42);
    /// let map = BspDungeonGenerator::new()
    ///     .generate(&config, &mut config.rng())
    ///     .unwrap();
    /// assert!(!map.rooms.is_empty());
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Generates a fresh map and reports what happened along the way.
    pub fn generate_with_stats(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<(Map, GenerationStats)> {
        let mut map = Map::new(config.grid_width, config.grid_height, config.max_rooms);
        let stats = self.regenerate(&mut map, config, rng)?;
        Ok((map, stats))
    }

    /// Regenerates `map` in place. Its dimensions must match the config.
    pub fn regenerate(
        &self,
        map: &mut Map,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> DelveResult<GenerationStats> {
        config.validate()?;
        if map.width() != config.grid_width || map.height() != config.grid_height {
            return Err(DelveError::InvalidConfig(format!(
                "map is {}x{} but config asks for {}x{}",
                map.width(),
                map.height(),
                config.grid_width,
                config.grid_height
            )));
        }

        map.reset();

        let builder = BspTreeBuilder::new(config.bsp_min_size, config.bsp_max_depth);
        let mut tree = builder.build(
            Region::new(0, 0, config.grid_width, config.grid_height),
            rng,
        );
        let carved = RoomCarver::new(config.min_room_size).carve_all(&mut tree, map, rng);
        let corridors = CorridorConnector::new(config.door_chance).connect(&tree, &mut map.tiles, rng);

        let stats = GenerationStats {
            leaf_count: tree.leaf_count(),
            tree_depth: tree.depth(),
            rooms_placed: carved.placed,
            rooms_dropped: carved.dropped,
            leaves_without_room: carved.without_room,
            corridors,
        };
        drop(tree);

        debug!("Generation stats: {:?}", stats);
        if stats.leaves_without_room > 0 {
            warn!(
                "{} of {} leaves were too small for a room (bsp_min_size {}, min_room_size {})",
                stats.leaves_without_room, stats.leaf_count, config.bsp_min_size, config.min_room_size
            );
        }
        let unreachable = unreachable_rooms(map);
        if !unreachable.is_empty() {
            warn!("Rooms {:?} are not reachable from the start room", unreachable);
        }

        info!(
            "Generated {}x{} dungeon with {} rooms (seed {})",
            config.grid_width,
            config.grid_height,
            map.rooms.len(),
            config.seed
        );
        Ok(stats)
    }
}

impl Generator<Map> for BspDungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> DelveResult<Map> {
        self.generate_with_stats(config, rng).map(|(map, _)| map)
    }

    fn validate(&self, map: &Map, config: &GenerationConfig) -> DelveResult<()> {
        if map.rooms.len() > config.max_rooms {
            return Err(DelveError::GenerationFailed(format!(
                "{} rooms exceed the cap of {}",
                map.rooms.len(),
                config.max_rooms
            )));
        }
        validate_connectivity(map)
    }

    fn generator_type(&self) -> &'static str {
        "BspDungeonGenerator"
    }
}
