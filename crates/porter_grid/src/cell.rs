use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single grid cell, addressed by column (`x`) and row (`y`) from the
/// bottom-left corner of the floor plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Cell { x, y }
    }

    pub fn manhattan_distance(&self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn chebyshev_distance(&self, other: Cell) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for Cell {
    fn from((x, y): (u32, u32)) -> Self {
        Cell { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Cell::new(1, 1).manhattan_distance(Cell::new(4, 5)), 7);
        assert_eq!(Cell::new(4, 5).manhattan_distance(Cell::new(1, 1)), 7);
        assert_eq!(Cell::new(2, 2).manhattan_distance(Cell::new(2, 2)), 0);
    }

    #[test]
    fn test_chebyshev_distance() {
        assert_eq!(Cell::new(1, 1).chebyshev_distance(Cell::new(4, 5)), 4);
        assert_eq!(Cell::new(0, 0).chebyshev_distance(Cell::new(3, 3)), 3);
    }
}
