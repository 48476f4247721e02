//! # Room Carving
//!
//! Synthesizes one room per BSP leaf and stamps the rooms that fit under the
//! map's room cap onto the tile grid.

use crate::{BspNode, Map, Position, Region, Room, TileGrid, TileType};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Counts gathered while carving rooms into a tree's leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarveSummary {
    /// Rooms listed in the map and stamped onto the grid
    pub placed: usize,
    /// Rooms kept on their leaf but dropped by the room cap
    pub dropped: usize,
    /// Leaves too small to hold a room
    pub without_room: usize,
}

/// Places rooms inside BSP leaf regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomCarver {
    /// Smallest room extent along either axis
    pub min_room_size: u32,
}

impl RoomCarver {
    pub fn new(min_room_size: u32) -> Self {
        Self { min_room_size }
    }

    /// Whether `region` is large enough for a minimum room plus its wall ring.
    pub fn fits(&self, region: Region) -> bool {
        let walled = self.min_room_size.saturating_add(2);
        region.width >= walled && region.height >= walled
    }

    /// Rolls a room for one leaf region.
    ///
    /// Each side is uniform in `[min_room_size, side - 2]`. The room starts
    /// centered, is jittered by up to one tile per axis, then clamped so a
    /// margin of at least one tile remains on every side. Returns None when
    /// the region is too small.
    pub fn room_for_region(&self, id: u32, region: Region, rng: &mut StdRng) -> Option<Room> {
        if !self.fits(region) {
            return None;
        }

        let width = rng.gen_range(self.min_room_size..=region.width - 2);
        let height = rng.gen_range(self.min_room_size..=region.height - 2);
        let jitter_x: i32 = rng.gen_range(-1..=1);
        let jitter_y: i32 = rng.gen_range(-1..=1);

        let x = region.x + (region.width - width) as i32 / 2 + jitter_x;
        let y = region.y + (region.height - height) as i32 / 2 + jitter_y;
        let x = x.clamp(region.x + 1, region.right() - 1 - width as i32);
        let y = y.clamp(region.y + 1, region.bottom() - 1 - height as i32);

        Some(Room::new(id, Position::new(x, y), width, height))
    }

    /// Carves a room into every leaf of `root`, in discovery order.
    ///
    /// A room's id is its leaf ordinal. Rooms are always stored on their leaf;
    /// only those accepted by [`Map::add_room`] are stamped onto the grid.
    pub fn carve_all(&self, root: &mut BspNode, map: &mut Map, rng: &mut StdRng) -> CarveSummary {
        let mut summary = CarveSummary::default();
        let mut ordinal = 0u32;

        root.for_each_leaf_mut(&mut |leaf| {
            let id = ordinal;
            ordinal += 1;

            let Some(room) = self.room_for_region(id, leaf.region, rng) else {
                debug!("Leaf {} at {:?} is too small for a room", id, leaf.region);
                summary.without_room += 1;
                return;
            };

            if map.add_room(room.clone()) {
                stamp_room(&mut map.tiles, &room);
                summary.placed += 1;
            } else {
                debug!("Room cap reached, room {} left off the map", id);
                summary.dropped += 1;
            }
            leaf.room = Some(room);
        });

        summary
    }
}

/// Stamps a room onto the grid: its rectangle becomes floor, then the ring
/// around it becomes wall wherever the ring is on the grid.
pub fn stamp_room(grid: &mut TileGrid, room: &Room) {
    for pos in room.floor_positions() {
        grid.set(pos, TileType::Floor);
    }
    for pos in room.wall_positions() {
        grid.set(pos, TileType::Wall);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BspTreeBuilder;
    use rand::SeedableRng;

    #[test]
    fn test_room_keeps_margin_inside_region() {
        let carver = RoomCarver::new(5);
        let mut rng = StdRng::seed_from_u64(17);
        for (width, height) in [(7, 7), (8, 12), (20, 9), (33, 17)] {
            let region = Region::new(4, 6, width, height);
            for _ in 0..50 {
                let room = carver.room_for_region(0, region, &mut rng).unwrap();
                assert!(region.contains_room(&room, 1), "{room:?} escapes {region:?}");
                assert!(room.width >= 5 && room.width <= width - 2);
                assert!(room.height >= 5 && room.height <= height - 2);
            }
        }
    }

    #[test]
    fn test_smallest_region_gets_exact_room() {
        let carver = RoomCarver::new(5);
        let mut rng = StdRng::seed_from_u64(3);
        let room = carver
            .room_for_region(2, Region::new(10, 10, 7, 7), &mut rng)
            .unwrap();
        assert_eq!(room, Room::new(2, Position::new(11, 11), 5, 5));
    }

    #[test]
    fn test_undersized_region_has_no_room() {
        let carver = RoomCarver::new(5);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(carver.room_for_region(0, Region::new(0, 0, 6, 20), &mut rng).is_none());
        assert!(carver.room_for_region(0, Region::new(0, 0, 20, 6), &mut rng).is_none());
    }

    #[test]
    fn test_huge_min_room_size_never_fits() {
        let carver = RoomCarver::new(u32::MAX);
        let mut rng = StdRng::seed_from_u64(3);
        let region = Region::new(0, 0, u32::MAX, u32::MAX);
        assert!(!carver.fits(region));
        assert!(carver.room_for_region(0, region, &mut rng).is_none());
    }

    #[test]
    fn test_stamp_room_draws_floor_and_wall_ring() {
        let mut grid = TileGrid::new(10, 10);
        let room = Room::new(0, Position::new(2, 2), 4, 3);
        stamp_room(&mut grid, &room);

        assert_eq!(grid.count(TileType::Floor), 12);
        assert_eq!(grid.count(TileType::Wall), 6 * 5 - 12);
        assert_eq!(grid.get(Position::new(1, 1)), Some(TileType::Wall));
        assert_eq!(grid.get(Position::new(6, 5)), Some(TileType::Wall));
        assert_eq!(grid.get(Position::new(5, 4)), Some(TileType::Floor));
    }

    #[test]
    fn test_stamp_room_clips_ring_at_grid_edge() {
        let mut grid = TileGrid::new(5, 5);
        let room = Room::new(0, Position::new(0, 0), 3, 3);
        stamp_room(&mut grid, &room);
        assert_eq!(grid.count(TileType::Floor), 9);
        assert_eq!(grid.count(TileType::Wall), 7);
    }

    #[test]
    fn test_carve_all_respects_room_cap() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut tree = BspTreeBuilder::new(7, 5).build(Region::new(0, 0, 80, 45), &mut rng);
        let leaves = tree.leaf_count();
        assert!(leaves > 3);

        let mut map = Map::new(80, 45, 3);
        let summary = RoomCarver::new(5).carve_all(&mut tree, &mut map, &mut rng);

        assert_eq!(summary.placed, 3);
        assert_eq!(summary.dropped, leaves - 3);
        assert_eq!(summary.without_room, 0);
        assert_eq!(map.rooms.len(), 3);

        // Dropped rooms stay on their leaves
        assert!(tree.leaves().iter().all(|leaf| leaf.room.is_some()));
        let ids: Vec<u32> = map.rooms.iter().map(|room| room.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        for room in &map.rooms {
            assert_eq!(map.tiles.get(room.center()), Some(TileType::Floor));
        }
    }

    #[test]
    fn test_carve_all_counts_undersized_leaves() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut tree = BspTreeBuilder::new(2, 3).build(Region::new(0, 0, 30, 6), &mut rng);
        let mut map = Map::new(30, 6, 10);
        let summary = RoomCarver::new(5).carve_all(&mut tree, &mut map, &mut rng);

        assert_eq!(summary.placed, 0);
        assert_eq!(summary.without_room, tree.leaf_count());
        assert_eq!(map.tiles.count(TileType::Floor), 0);
    }
}
