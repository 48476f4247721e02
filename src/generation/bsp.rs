//! # BSP Tree
//!
//! Binary space partitioning of the tile grid into rectangular regions.
//!
//! Each node owns its two children by value (boxed together, so a node has
//! either zero or two children) and, once rooms are carved, at most one room.
//! The tree lives only for the duration of a generation call.

use crate::Room;
use log::trace;
use rand::rngs::StdRng;
use rand::Rng;

/// Ratio between the long and short side past which the split axis is forced.
const FORCED_SPLIT_RATIO: f64 = 1.25;

/// A rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the rightmost column.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Checks that `room` lies inside this region with at least `margin`
    /// tiles to spare on every side.
    pub fn contains_room(&self, room: &Room, margin: i32) -> bool {
        room.top_left.x >= self.x + margin
            && room.top_left.y >= self.y + margin
            && room.top_left.x + room.width as i32 <= self.right() - margin
            && room.top_left.y + room.height as i32 <= self.bottom() - margin
    }
}

/// Orientation of the cut that splits a region in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// A vertical cut: children sit side by side and split the width
    Vertical,
    /// A horizontal cut: children are stacked and split the height
    Horizontal,
}

/// A node of the BSP tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BspNode {
    /// Area covered by this node
    pub region: Region,
    children: Option<Box<[BspNode; 2]>>,
    /// Room carved in this node; only ever set on leaves
    pub room: Option<Room>,
}

impl BspNode {
    /// Creates a leaf covering `region`.
    pub fn new(region: Region) -> Self {
        Self {
            region,
            children: None,
            room: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The (left/top, right/bottom) children of an internal node.
    pub fn children(&self) -> Option<(&BspNode, &BspNode)> {
        self.children.as_deref().map(|[left, right]| (left, right))
    }

    pub fn children_mut(&mut self) -> Option<(&mut BspNode, &mut BspNode)> {
        self.children.as_deref_mut().map(|[left, right]| (left, right))
    }

    /// Cuts this node `offset` tiles from its origin along `axis`.
    fn split(&mut self, axis: SplitAxis, offset: u32) {
        let r = self.region;
        let (first, second) = match axis {
            SplitAxis::Vertical => (
                Region::new(r.x, r.y, offset, r.height),
                Region::new(r.x + offset as i32, r.y, r.width - offset, r.height),
            ),
            SplitAxis::Horizontal => (
                Region::new(r.x, r.y, r.width, offset),
                Region::new(r.x, r.y + offset as i32, r.width, r.height - offset),
            ),
        };
        self.children = Some(Box::new([BspNode::new(first), BspNode::new(second)]));
    }

    /// Leaves in discovery order: depth-first, left child first.
    pub fn leaves(&self) -> Vec<&BspNode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a BspNode>) {
        match self.children() {
            Some((left, right)) => {
                left.collect_leaves(out);
                right.collect_leaves(out);
            }
            None => out.push(self),
        }
    }

    /// Visits every leaf mutably in discovery order.
    pub fn for_each_leaf_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut BspNode),
    {
        match self.children_mut() {
            Some((left, right)) => {
                left.for_each_leaf_mut(f);
                right.for_each_leaf_mut(f);
            }
            None => f(self),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self.children() {
            Some((left, right)) => left.leaf_count() + right.leaf_count(),
            None => 1,
        }
    }

    /// Number of splits on the longest root-to-leaf path.
    pub fn depth(&self) -> u32 {
        match self.children() {
            Some((left, right)) => 1 + left.depth().max(right.depth()),
            None => 0,
        }
    }
}

/// Builds BSP trees with a minimum region size and a depth budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BspTreeBuilder {
    /// Smallest extent a child may have along the split axis
    pub min_size: u32,
    /// Maximum number of splits from root to leaf
    pub max_depth: u32,
}

impl BspTreeBuilder {
    pub fn new(min_size: u32, max_depth: u32) -> Self {
        Self {
            min_size,
            max_depth,
        }
    }

    /// Partitions `region` into a tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{BspTreeBuilder, Region};
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let tree = BspTreeBuilder::new(7, 5).build(Region::new(0, 0, 80, 45), &mut rng);
    /// assert!(tree.depth() <= 5);
    /// assert!(tree.leaf_count() > 1);
    /// ```
    pub fn build(&self, region: Region, rng: &mut StdRng) -> BspNode {
        let mut root = BspNode::new(region);
        self.split_recursive(&mut root, self.max_depth, rng);
        trace!(
            "Built BSP tree over {:?}: {} leaves, depth {}",
            region,
            root.leaf_count(),
            root.depth()
        );
        root
    }

    fn split_recursive(&self, node: &mut BspNode, depth_left: u32, rng: &mut StdRng) {
        if depth_left == 0 {
            return;
        }

        let Some(axis) = self.choose_axis(node.region, rng) else {
            return;
        };

        let extent = match axis {
            SplitAxis::Vertical => node.region.width,
            SplitAxis::Horizontal => node.region.height,
        };
        let offset = rng.gen_range(self.min_size..=extent - self.min_size);
        node.split(axis, offset);

        if let Some((left, right)) = node.children_mut() {
            self.split_recursive(left, depth_left - 1, rng);
            self.split_recursive(right, depth_left - 1, rng);
        }
    }

    /// Whether an extent can be cut with both halves keeping `min_size`.
    ///
    /// A zero `min_size` never splits, so no child can end up zero tiles wide.
    pub fn can_split(&self, extent: u32) -> bool {
        self.min_size > 0
            && self
                .min_size
                .checked_mul(2)
                .is_some_and(|double| extent > double)
    }

    /// Picks the cut for `region`, or None when it is too small to split.
    ///
    /// A region at least 1.25 times wider than tall is cut vertically, one at
    /// least 1.25 times taller than wide horizontally, anything else at random.
    /// When the preferred axis is too short to cut, the other axis is used.
    pub fn choose_axis(&self, region: Region, rng: &mut StdRng) -> Option<SplitAxis> {
        let can_cut_width = self.can_split(region.width);
        let can_cut_height = self.can_split(region.height);
        if !can_cut_width && !can_cut_height {
            return None;
        }

        let width = region.width as f64;
        let height = region.height as f64;
        let preferred = if width / height >= FORCED_SPLIT_RATIO {
            SplitAxis::Vertical
        } else if height / width >= FORCED_SPLIT_RATIO {
            SplitAxis::Horizontal
        } else if rng.gen_bool(0.5) {
            SplitAxis::Horizontal
        } else {
            SplitAxis::Vertical
        };

        match preferred {
            SplitAxis::Vertical if can_cut_width => Some(SplitAxis::Vertical),
            SplitAxis::Horizontal if can_cut_height => Some(SplitAxis::Horizontal),
            SplitAxis::Vertical => Some(SplitAxis::Horizontal),
            SplitAxis::Horizontal => Some(SplitAxis::Vertical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn assert_children_tile_parent(node: &BspNode) {
        let Some((left, right)) = node.children() else {
            return;
        };
        let parent = node.region;
        assert_eq!(left.region.area() + right.region.area(), parent.area());
        assert_eq!((left.region.x, left.region.y), (parent.x, parent.y));
        assert_eq!((right.region.right(), right.region.bottom()), (parent.right(), parent.bottom()));

        let side_by_side = left.region.right() == right.region.x
            && left.region.height == parent.height
            && right.region.height == parent.height;
        let stacked = left.region.bottom() == right.region.y
            && left.region.width == parent.width
            && right.region.width == parent.width;
        assert!(side_by_side || stacked, "children of {parent:?} do not tile it");

        assert_children_tile_parent(left);
        assert_children_tile_parent(right);
    }

    fn leaves_with_depth(node: &BspNode, depth: u32, out: &mut Vec<(Region, u32)>) {
        match node.children() {
            Some((left, right)) => {
                leaves_with_depth(left, depth + 1, out);
                leaves_with_depth(right, depth + 1, out);
            }
            None => out.push((node.region, depth)),
        }
    }

    #[test]
    fn test_children_exactly_tile_parent() {
        for seed in 0..20 {
            let tree = BspTreeBuilder::new(7, 5).build(Region::new(0, 0, 80, 45), &mut rng(seed));
            assert_children_tile_parent(&tree);
        }
    }

    #[test]
    fn test_leaves_respect_min_size_and_split_limit() {
        let builder = BspTreeBuilder::new(5, 5);
        for seed in 0..20 {
            let tree = builder.build(Region::new(0, 0, 80, 45), &mut rng(seed));
            let mut leaves = Vec::new();
            leaves_with_depth(&tree, 0, &mut leaves);

            for (region, depth) in leaves {
                assert!(region.width >= 5 && region.height >= 5, "{region:?} too small");
                assert!(depth <= 5);
                if depth < 5 {
                    assert!(
                        region.width <= 10 && region.height <= 10,
                        "{region:?} could still be split at depth {depth}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_depth_budget_of_one_gives_two_leaves() {
        let tree = BspTreeBuilder::new(5, 1).build(Region::new(0, 0, 80, 45), &mut rng(3));
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_small_region_is_a_single_leaf() {
        let tree = BspTreeBuilder::new(7, 5).build(Region::new(2, 3, 14, 14), &mut rng(3));
        assert!(tree.is_leaf());
        assert_eq!(tree.leaves().len(), 1);
        assert_eq!(tree.leaves()[0].region, Region::new(2, 3, 14, 14));
    }

    #[test]
    fn test_zero_min_size_never_splits() {
        let builder = BspTreeBuilder::new(0, 5);
        assert!(!builder.can_split(80));
        assert!(!builder.can_split(0));

        let tree = builder.build(Region::new(0, 0, 80, 45), &mut rng(11));
        assert!(tree.is_leaf());
        assert!(tree.leaves().iter().all(|leaf| leaf.region.width > 0 && leaf.region.height > 0));
    }

    #[test]
    fn test_huge_min_size_does_not_overflow() {
        let builder = BspTreeBuilder::new(u32::MAX, 5);
        assert!(!builder.can_split(u32::MAX));
        assert!(builder.build(Region::new(0, 0, 80, 45), &mut rng(11)).is_leaf());
    }

    #[test]
    fn test_axis_forced_by_aspect_ratio() {
        let builder = BspTreeBuilder::new(7, 5);
        let mut rng = rng(11);
        for _ in 0..20 {
            assert_eq!(
                builder.choose_axis(Region::new(0, 0, 30, 20), &mut rng),
                Some(SplitAxis::Vertical)
            );
            assert_eq!(
                builder.choose_axis(Region::new(0, 0, 20, 30), &mut rng),
                Some(SplitAxis::Horizontal)
            );
        }
    }

    #[test]
    fn test_axis_falls_back_when_preferred_is_too_short() {
        let builder = BspTreeBuilder::new(7, 5);
        let mut rng = rng(5);
        for _ in 0..20 {
            // Nearly square, only the width can be cut.
            assert_eq!(
                builder.choose_axis(Region::new(0, 0, 15, 14), &mut rng),
                Some(SplitAxis::Vertical)
            );
            // Tall but too narrow to cut the width, height can be cut.
            assert_eq!(
                builder.choose_axis(Region::new(0, 0, 14, 40), &mut rng),
                Some(SplitAxis::Horizontal)
            );
        }
        assert_eq!(builder.choose_axis(Region::new(0, 0, 14, 14), &mut rng), None);
    }

    #[test]
    fn test_square_regions_use_both_axes() {
        let builder = BspTreeBuilder::new(5, 5);
        let mut rng = rng(21);
        let axes: Vec<_> = (0..64)
            .filter_map(|_| builder.choose_axis(Region::new(0, 0, 30, 30), &mut rng))
            .collect();
        assert!(axes.contains(&SplitAxis::Vertical));
        assert!(axes.contains(&SplitAxis::Horizontal));
    }

    #[test]
    fn test_same_seed_same_tree() {
        let builder = BspTreeBuilder::new(7, 5);
        let a = builder.build(Region::new(0, 0, 80, 45), &mut rng(42));
        let b = builder.build(Region::new(0, 0, 80, 45), &mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_for_each_leaf_mut_visits_in_discovery_order() {
        let mut tree = BspTreeBuilder::new(7, 3).build(Region::new(0, 0, 80, 45), &mut rng(9));
        let expected: Vec<Region> = tree.leaves().iter().map(|leaf| leaf.region).collect();

        let mut visited = Vec::new();
        tree.for_each_leaf_mut(&mut |leaf| visited.push(leaf.region));
        assert_eq!(visited, expected);
    }

    #[test]
    fn test_region_contains_room_with_margin() {
        let region = Region::new(10, 10, 12, 9);
        let inside = Room::new(0, crate::Position::new(11, 11), 10, 7);
        let touching = Room::new(1, crate::Position::new(10, 11), 10, 7);
        assert!(region.contains_room(&inside, 1));
        assert!(!region.contains_room(&touching, 1));
        assert!(region.contains_room(&touching, 0));
    }
}
