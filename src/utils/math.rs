//! # Grid Mathematics
//!
//! Integer line stepping used by line-of-sight checks.

use crate::Position;

/// Iterator over the cells of an integer Bresenham line.
///
/// The start cell is not yielded; every cell stepped onto afterwards is,
/// ending with the target. A line whose start equals its target is empty.
///
/// # Examples
///
/// ```
/// use delve::{BresenhamLine, Position};
///
/// let cells: Vec<_> = BresenhamLine::new(Position::new(0, 0), Position::new(3, 0)).collect();
/// assert_eq!(cells, vec![Position::new(1, 0), Position::new(2, 0), Position::new(3, 0)]);
/// ```
#[derive(Debug, Clone)]
pub struct BresenhamLine {
    current: Position,
    target: Position,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(from: Position, to: Position) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        Self {
            current: from,
            target: to,
            dx,
            dy,
            sx: if from.x < to.x { 1 } else { -1 },
            sy: if from.y < to.y { 1 } else { -1 },
            err: dx + dy,
            done: from == to,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.done || self.current == self.target {
            self.done = true;
            return None;
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            if self.current.x == self.target.x {
                self.done = true;
                return None;
            }
            self.err += self.dy;
            self.current.x += self.sx;
        }
        if e2 <= self.dx {
            if self.current.y == self.target.y {
                self.done = true;
                return None;
            }
            self.err += self.dx;
            self.current.y += self.sy;
        }

        Some(self.current)
    }
}
