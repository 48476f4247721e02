//! # Encounter Placement
//!
//! Scatters enemies and items through the rooms of a generated map using
//! weighted random tables. The start room is always left empty.

use crate::{roll_item, EnemyKind, GenerationConfig, Position, Room, Roster};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A table of outcomes with integer weights, picked by cumulative threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedTable<T: 'static> {
    entries: &'static [(T, u32)],
}

impl<T: Copy> WeightedTable<T> {
    pub const fn new(entries: &'static [(T, u32)]) -> Self {
        Self { entries }
    }

    /// Sum of all weights.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|&(_, weight)| weight).sum()
    }

    /// Maps a roll in `0..total()` onto its outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{EnemyKind, ENEMY_TABLE};
    ///
    /// assert_eq!(ENEMY_TABLE.pick(39), Some(EnemyKind::Rat));
    /// assert_eq!(ENEMY_TABLE.pick(40), Some(EnemyKind::Goblin));
    /// assert_eq!(ENEMY_TABLE.pick(100), None);
    /// ```
    pub fn pick(&self, roll: u32) -> Option<T> {
        let mut threshold = 0;
        for &(outcome, weight) in self.entries {
            threshold += weight;
            if roll < threshold {
                return Some(outcome);
            }
        }
        None
    }

    /// Rolls uniformly over the total weight and picks the outcome.
    pub fn roll(&self, rng: &mut StdRng) -> Option<T> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        self.pick(rng.gen_range(0..total))
    }
}

/// Enemy kinds by cumulative thresholds 40/70/90/100.
pub const ENEMY_TABLE: WeightedTable<EnemyKind> = WeightedTable::new(&[
    (EnemyKind::Rat, 40),
    (EnemyKind::Goblin, 30),
    (EnemyKind::Orc, 20),
    (EnemyKind::Troll, 10),
]);

/// What a placement pass produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    /// Rooms considered (every room except the start room)
    pub rooms_visited: usize,
    pub enemies_spawned: usize,
    pub items_spawned: usize,
    /// Enemies rolled but dropped because the roster was full
    pub enemies_dropped: usize,
    /// Items rolled but dropped because the roster was full
    pub items_dropped: usize,
}

/// Rolls at most one enemy and one item for every room but the first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterPlacer {
    pub enemy_chance: f64,
    pub item_chance: f64,
}

impl EncounterPlacer {
    pub fn new(enemy_chance: f64, item_chance: f64) -> Self {
        Self {
            enemy_chance,
            item_chance,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.enemy_chance, config.item_chance)
    }

    /// Populates `roster` from `rooms`, skipping room 0.
    ///
    /// Per room the enemy is rolled first (chance, cell, kind), then the item.
    /// Spawn cells are drawn from the room interior, one tile in from its edge.
    pub fn place(&self, rooms: &[Room], roster: &mut Roster, rng: &mut StdRng) -> PlacementReport {
        let mut report = PlacementReport::default();

        for room in rooms.iter().skip(1) {
            report.rooms_visited += 1;
            let interior = room.interior_positions();

            if rng.gen_bool(self.enemy_chance) {
                let pos = spawn_cell(&interior, rng);
                let kind = ENEMY_TABLE.roll(rng);
                if let (Some(pos), Some(kind)) = (pos, kind) {
                    if roster.spawn_enemy(kind, pos) {
                        report.enemies_spawned += 1;
                    } else {
                        report.enemies_dropped += 1;
                    }
                }
            }

            if rng.gen_bool(self.item_chance) {
                if let Some(pos) = spawn_cell(&interior, rng) {
                    let (kind, value) = roll_item(rng);
                    if roster.spawn_item(kind, pos, value) {
                        report.items_spawned += 1;
                    } else {
                        report.items_dropped += 1;
                    }
                }
            }
        }

        debug!("Placement report: {:?}", report);
        report
    }
}

fn spawn_cell(interior: &[Position], rng: &mut StdRng) -> Option<Position> {
    interior.choose(rng).copied()
}
