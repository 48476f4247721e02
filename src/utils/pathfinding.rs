//! # Reachability
//!
//! Flood fills over walkable tiles, used to check that generated rooms are
//! connected.

use crate::{DelveError, DelveResult, Map, Position, TileType};
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Collects every walkable tile reachable from `start` by 4-directional steps.
///
/// Returns an empty set when `start` itself is not walkable.
pub fn reachable_from(map: &Map, start: Position) -> HashSet<Position> {
    if !map.is_walkable(start) {
        return HashSet::new();
    }

    bfs_reach(start, |&pos: &Position| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&next| map.is_walkable(next))
            .collect::<Vec<_>>()
    })
    .collect()
}

/// Lists the ids of rooms whose center cannot be reached from the start
/// room's center.
pub fn unreachable_rooms(map: &Map) -> Vec<u32> {
    let Some(start) = map.player_start() else {
        return Vec::new();
    };

    let reachable = reachable_from(map, start);
    map.rooms
        .iter()
        .filter(|room| !reachable.contains(&room.center()))
        .map(|room| room.id)
        .collect()
}

/// Validates that a map has floor and that every room is reachable from the
/// start room.
pub fn validate_connectivity(map: &Map) -> DelveResult<()> {
    if map.tiles.count(TileType::Floor) == 0 {
        return Err(DelveError::GenerationFailed(
            "Map has no floor tiles".to_string(),
        ));
    }

    let unreachable = unreachable_rooms(map);
    if let Some(first) = unreachable.first() {
        return Err(DelveError::GenerationFailed(format!(
            "Room {} is not connected to the start room ({} unreachable)",
            first,
            unreachable.len()
        )));
    }

    Ok(())
}
