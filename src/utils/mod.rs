//! # Utilities Module
//!
//! Grid math and reachability helpers shared by generation and gameplay.

pub mod math;
pub mod pathfinding;

pub use math::*;
pub use self::pathfinding::*;
