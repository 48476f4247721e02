//! # Rendering Module
//!
//! Read-only text views of the dungeon for terminals, logs and tests.

pub mod display;

pub use display::*;
