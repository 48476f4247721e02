//! # Corridor Connector
//!
//! Joins sibling subtrees of the BSP tree with L-shaped corridors. The tree is
//! walked bottom-up, so by the time a node links its two halves each half is
//! already internally connected.

use crate::{BspNode, Position, Room, TileGrid, TileType};
use log::trace;
use rand::rngs::StdRng;
use rand::Rng;

/// Carves corridors between the rooms of a BSP tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorridorConnector {
    /// Chance that each corridor endpoint becomes a door
    pub door_chance: f64,
}

impl CorridorConnector {
    pub fn new(door_chance: f64) -> Self {
        Self { door_chance }
    }

    /// Connects every internal node's halves, children first.
    ///
    /// Returns the number of corridors carved. A split whose randomly picked
    /// leaf on either side holds no room gets no corridor.
    pub fn connect(&self, node: &BspNode, grid: &mut TileGrid, rng: &mut StdRng) -> usize {
        let Some((left, right)) = node.children() else {
            return 0;
        };

        let mut carved = self.connect(left, grid, rng);
        carved += self.connect(right, grid, rng);

        let from = pick_room(left, rng);
        let to = pick_room(right, rng);
        if let (Some(from), Some(to)) = (from, to) {
            self.carve_corridor(grid, from.center(), to.center(), rng);
            carved += 1;
        } else {
            trace!("No room on one side of split at {:?}", node.region);
        }

        carved
    }

    /// Carves an L-shaped corridor from `from` to `to` and rolls a door at
    /// each end.
    ///
    /// The elbow is `(to.x, from.y)` or `(from.x, to.y)` with equal odds.
    pub fn carve_corridor(&self, grid: &mut TileGrid, from: Position, to: Position, rng: &mut StdRng) {
        let elbow = if rng.gen_bool(0.5) {
            Position::new(to.x, from.y)
        } else {
            Position::new(from.x, to.y)
        };

        carve_leg(grid, from, elbow);
        carve_leg(grid, elbow, to);

        for end in [from, to] {
            if rng.gen_bool(self.door_chance) {
                grid.set(end, TileType::Door);
            }
        }
    }
}

/// Follows a uniformly random path from `node` down to a leaf and returns
/// that leaf's room.
pub fn pick_room<'a>(node: &'a BspNode, rng: &mut StdRng) -> Option<&'a Room> {
    let mut node = node;
    while let Some((left, right)) = node.children() {
        node = if rng.gen_bool(0.5) { left } else { right };
    }
    node.room.as_ref()
}

/// Carves a straight run between two cells sharing a row or a column.
///
/// Every run cell becomes floor; the cells beside it become wall if they are
/// still empty.
fn carve_leg(grid: &mut TileGrid, a: Position, b: Position) {
    if a.y == b.y {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            carve_cell(grid, Position::new(x, a.y), [Position::new(0, -1), Position::new(0, 1)]);
        }
    } else {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            carve_cell(grid, Position::new(a.x, y), [Position::new(-1, 0), Position::new(1, 0)]);
        }
    }
}

fn carve_cell(grid: &mut TileGrid, pos: Position, sides: [Position; 2]) {
    grid.set(pos, TileType::Floor);
    for side in sides {
        let neighbor = pos + side;
        if grid.get(neighbor) == Some(TileType::Empty) {
            grid.set(neighbor, TileType::Wall);
        }
    }
}
