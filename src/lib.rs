//! # Delve
//!
//! A turn-based dungeon crawler whose levels come from a binary space
//! partitioning (BSP) generator.
//!
//! ## Architecture Overview
//!
//! - **Generation**: BSP tree builder, room carver, corridor connector and the
//!   orchestrating [`BspDungeonGenerator`], plus weighted encounter placement
//! - **Game**: the tile [`Map`] with movement and line of sight, entities,
//!   combat and the turn driver in [`GameState`]
//! - **Rendering**: a read-only ASCII view of the game for terminals and tests
//! - **Input**: mapping of line commands onto player actions
//!
//! Everything runs synchronously on one thread. All randomness flows from a
//! single seeded [`rand::rngs::StdRng`], so a seed and a [`GenerationConfig`]
//! fully determine a dungeon.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Delve engine.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration values cannot produce a dungeon
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generation produced an unusable map
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_GRID_WIDTH: u32 = 80;

    /// Default dungeon height in tiles
    pub const DEFAULT_GRID_HEIGHT: u32 = 45;

    /// Smallest room interior, in tiles, along either axis
    pub const MIN_ROOM_SIZE: u32 = 5;

    /// Maximum number of rooms kept per map
    pub const MAX_ROOMS: usize = 15;

    /// Enemy roster capacity
    pub const MAX_ENEMIES: usize = 20;

    /// Item roster capacity
    pub const MAX_ITEMS: usize = 30;

    /// Depth budget of the BSP tree
    pub const BSP_MAX_DEPTH: u32 = 5;

    /// Chance that a corridor endpoint becomes a door
    pub const DOOR_CHANCE: f64 = 0.30;

    /// Chance that a non-start room receives an enemy
    pub const ENEMY_CHANCE: f64 = 0.60;

    /// Chance that a non-start room receives an item
    pub const ITEM_CHANCE: f64 = 0.40;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HEALTH: i32 = 100;

    /// Default player attack
    pub const DEFAULT_PLAYER_ATTACK: i32 = 10;

    /// Default player defense
    pub const DEFAULT_PLAYER_DEFENSE: i32 = 5;
}
