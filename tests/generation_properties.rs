//! Property tests for the BSP dungeon generator.

use delve::{
    reachable_from, BspDungeonGenerator, BspTreeBuilder, GenerationConfig, Generator, Region,
    Room, RoomCarver, TileType,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// Inclusive bounds of a room plus its wall ring.
fn footprint(room: &Room) -> (i32, i32, i32, i32) {
    (
        room.top_left.x - 1,
        room.top_left.y - 1,
        room.top_left.x + room.width as i32,
        room.top_left.y + room.height as i32,
    )
}

fn footprints_intersect(a: &Room, b: &Room) -> bool {
    let (ax0, ay0, ax1, ay1) = footprint(a);
    let (bx0, by0, bx1, by1) = footprint(b);
    ax0 <= bx1 && bx0 <= ax1 && ay0 <= by1 && by0 <= ay1
}

fn sized_config(seed: u64, width: u32, height: u32, depth: u32) -> GenerationConfig {
    GenerationConfig {
        grid_width: width,
        grid_height: height,
        bsp_max_depth: depth,
        ..GenerationConfig::new(seed)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_room_is_reachable_from_the_start(seed in any::<u64>()) {
        let config = GenerationConfig::new(seed);
        let generator = BspDungeonGenerator::new();
        let map = generator.generate(&config, &mut config.rng()).unwrap();

        prop_assert!(!map.rooms.is_empty());
        let start = map.player_start().unwrap();
        let reachable = reachable_from(&map, start);
        for room in &map.rooms {
            prop_assert!(
                reachable.contains(&room.center()),
                "seed={seed}: room {} at {:?} is cut off", room.id, room.top_left
            );
        }
        prop_assert!(generator.validate(&map, &config).is_ok());
    }

    #[test]
    fn grids_of_any_size_stay_connected(
        seed in any::<u64>(),
        width in 30_u32..120,
        height in 20_u32..70,
        depth in 1_u32..7,
    ) {
        let config = sized_config(seed, width, height, depth);
        let (map, stats) = BspDungeonGenerator::new()
            .generate_with_stats(&config, &mut config.rng())
            .unwrap();

        prop_assert_eq!(stats.leaves_without_room, 0);
        prop_assert!(map.rooms.len() <= config.max_rooms);
        prop_assert_eq!(map.rooms.len(), stats.leaf_count.min(config.max_rooms));
        prop_assert!(delve::validate_connectivity(&map).is_ok());
    }

    #[test]
    fn room_wall_footprints_are_disjoint(seed in any::<u64>()) {
        let config = GenerationConfig::for_large_levels(seed);
        let map = BspDungeonGenerator::new().generate(&config, &mut config.rng()).unwrap();

        for (i, a) in map.rooms.iter().enumerate() {
            for b in &map.rooms[i + 1..] {
                prop_assert!(!footprints_intersect(a, b), "{:?} touches {:?}", a, b);
            }
        }
    }

    #[test]
    fn rooms_keep_a_margin_inside_their_leaf(seed in any::<u64>(), min_room in 3_u32..7) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut tree = BspTreeBuilder::new(min_room + 2, 5).build(Region::new(0, 0, 80, 45), &mut rng);
        let mut map = delve::Map::new(80, 45, 64);
        RoomCarver::new(min_room).carve_all(&mut tree, &mut map, &mut rng);

        for leaf in tree.leaves() {
            let room = leaf.room.as_ref().unwrap();
            prop_assert!(leaf.region.contains_room(room, 1), "{:?} escapes {:?}", room, leaf.region);
        }
    }

    #[test]
    fn generation_is_deterministic(seed in any::<u64>()) {
        let config = GenerationConfig::for_testing(seed);
        let generator = BspDungeonGenerator::new();
        let first = generator.generate_with_stats(&config, &mut config.rng()).unwrap();
        let second = generator.generate_with_stats(&config, &mut config.rng()).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn undersized_leaves_leave_an_empty_map() {
    let config = GenerationConfig {
        grid_width: 30,
        grid_height: 7,
        min_room_size: 5,
        bsp_min_size: 2,
        bsp_max_depth: 20,
        ..GenerationConfig::new(42)
    };
    let (map, stats) = BspDungeonGenerator::new()
        .generate_with_stats(&config, &mut config.rng())
        .unwrap();

    assert!(stats.leaf_count > 1);
    assert_eq!(stats.leaves_without_room, stats.leaf_count);
    assert!(map.rooms.is_empty());
    assert_eq!(map.tiles.count(TileType::Empty), 30 * 7);
}

#[test]
fn room_cap_truncates_in_discovery_order() {
    let config = GenerationConfig {
        max_rooms: 4,
        ..GenerationConfig::new(42)
    };
    let (map, stats) = BspDungeonGenerator::new()
        .generate_with_stats(&config, &mut config.rng())
        .unwrap();

    assert_eq!(map.rooms.len(), 4);
    assert_eq!(stats.rooms_placed, 4);
    assert_eq!(stats.rooms_dropped, stats.leaf_count - 4);
    let ids: Vec<u32> = map.rooms.iter().map(|room| room.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert!(delve::validate_connectivity(&map).is_ok());
}
