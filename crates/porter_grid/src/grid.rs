use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::GridError;

/// Neighborhood used for routing, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Connectivity {
    #[default]
    Four,
    Eight,
}

const FOUR_OFFSETS: [(i64, i64); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];
const EIGHT_OFFSETS: [(i64, i64); 8] = [
    (0, 1),
    (0, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, -1),
];

impl Connectivity {
    pub fn offsets(&self) -> &'static [(i64, i64)] {
        match self {
            Connectivity::Four => &FOUR_OFFSETS,
            Connectivity::Eight => &EIGHT_OFFSETS,
        }
    }

    /// Admissible and consistent heuristic for unit step cost under this
    /// neighborhood: Manhattan for 4-connected, Chebyshev for 8-connected.
    pub fn heuristic(&self, from: Cell, to: Cell) -> u32 {
        match self {
            Connectivity::Four => from.manhattan_distance(to),
            Connectivity::Eight => from.chebyshev_distance(to),
        }
    }
}

/// Static floor plan: passability per cell plus named locations (pick faces,
/// staging, depot berths). Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: u32,
    height: u32,
    cell_size_meters: f64,
    passable: Vec<bool>,
    locations: FxHashMap<String, Cell>,
}

impl Grid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size_meters(&self) -> f64 {
        self.cell_size_meters
    }

    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Row-major index of a cell, used as the node id in search structures.
    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        (cell.y as usize) * (self.width as usize) + (cell.x as usize)
    }

    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        let width = self.width as usize;
        Cell::new((index % width) as u32, (index / width) as u32)
    }

    /// Out-of-bounds cells are not passable.
    #[inline]
    pub fn is_passable(&self, cell: Cell) -> bool {
        self.contains(cell) && self.passable[self.index(cell)]
    }

    pub fn resolve(&self, name: &str) -> Result<Cell, GridError> {
        self.locations
            .get(name)
            .copied()
            .ok_or_else(|| GridError::UnknownLocation(name.to_string()))
    }

    pub fn locations(&self) -> impl Iterator<Item = (&str, Cell)> {
        self.locations.iter().map(|(name, &cell)| (name.as_str(), cell))
    }

    pub fn neighbors(
        &self,
        cell: Cell,
        connectivity: Connectivity,
    ) -> impl Iterator<Item = Cell> + '_ {
        connectivity.offsets().iter().filter_map(move |&(dx, dy)| {
            let x = cell.x as i64 + dx;
            let y = cell.y as i64 + dy;
            if x < 0 || y < 0 {
                return None;
            }
            let neighbor = Cell::new(x as u32, y as u32);
            self.is_passable(neighbor).then_some(neighbor)
        })
    }
}

#[derive(Default)]
pub struct GridBuilder {
    width: u32,
    height: u32,
    cell_size_meters: Option<f64>,
    blocked: Vec<Cell>,
    rows: Option<Vec<Vec<bool>>>,
    locations: Vec<(String, Cell)>,
}

impl GridBuilder {
    pub fn set_dimensions(&mut self, width: u32, height: u32) -> &mut GridBuilder {
        self.width = width;
        self.height = height;
        self
    }

    pub fn set_cell_size_meters(&mut self, cell_size_meters: f64) -> &mut GridBuilder {
        self.cell_size_meters = Some(cell_size_meters);
        self
    }

    /// Passability rows ordered bottom-up: `rows[y][x]` is the cell at (x, y).
    /// Also sets the dimensions.
    pub fn set_passable_rows(&mut self, rows: Vec<Vec<bool>>) -> &mut GridBuilder {
        self.height = rows.len() as u32;
        self.width = rows.first().map(|row| row.len()).unwrap_or(0) as u32;
        self.rows = Some(rows);
        self
    }

    pub fn block(&mut self, cell: Cell) -> &mut GridBuilder {
        self.blocked.push(cell);
        self
    }

    pub fn add_location(
        &mut self,
        name: impl Into<String>,
        cell: Cell,
    ) -> &mut GridBuilder {
        self.locations.push((name.into(), cell));
        self
    }

    pub fn build(self) -> Result<Grid, GridError> {
        let width = self.width;
        let height = self.height;

        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid);
        }

        let mut passable = match self.rows {
            Some(rows) => {
                if rows.len() != height as usize
                    || rows.iter().any(|row| row.len() != width as usize)
                {
                    return Err(GridError::DimensionMismatch { width, height });
                }
                rows.into_iter().flatten().collect()
            }
            None => vec![true; (width as usize) * (height as usize)],
        };

        for cell in self.blocked {
            if cell.x < width && cell.y < height {
                passable[(cell.y as usize) * (width as usize) + (cell.x as usize)] = false;
            }
        }

        let mut grid = Grid {
            width,
            height,
            cell_size_meters: self.cell_size_meters.unwrap_or(1.0),
            passable,
            locations: FxHashMap::default(),
        };

        // Every named location must sit on exactly one passable, in-bounds cell.
        for (name, cell) in self.locations {
            if !grid.contains(cell) {
                return Err(GridError::OutOfBounds {
                    name,
                    cell,
                    width,
                    height,
                });
            }
            if !grid.passable[grid.index(cell)] {
                return Err(GridError::Blocked { name, cell });
            }
            grid.locations.insert(name, cell);
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(width: u32, height: u32) -> Grid {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(width, height);
        builder.build().unwrap()
    }

    #[test]
    fn test_neighbors_four_connected() {
        let grid = open_grid(3, 3);
        let neighbors: Vec<Cell> = grid.neighbors(Cell::new(1, 1), Connectivity::Four).collect();
        assert_eq!(neighbors.len(), 4);

        let corner: Vec<Cell> = grid.neighbors(Cell::new(0, 0), Connectivity::Four).collect();
        assert_eq!(corner.len(), 2);
    }

    #[test]
    fn test_neighbors_eight_connected() {
        let grid = open_grid(3, 3);
        let neighbors: Vec<Cell> = grid
            .neighbors(Cell::new(1, 1), Connectivity::Eight)
            .collect();
        assert_eq!(neighbors.len(), 8);
    }

    #[test]
    fn test_neighbors_skip_blocked() {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(3, 3);
        builder.block(Cell::new(1, 2));
        let grid = builder.build().unwrap();

        let neighbors: Vec<Cell> = grid.neighbors(Cell::new(1, 1), Connectivity::Four).collect();
        assert_eq!(neighbors.len(), 3);
        assert!(!neighbors.contains(&Cell::new(1, 2)));
    }

    #[test]
    fn test_resolve_location() {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(4, 4);
        builder.add_location("staging", Cell::new(0, 0));
        let grid = builder.build().unwrap();

        assert_eq!(grid.resolve("staging").unwrap(), Cell::new(0, 0));
        assert_eq!(
            grid.resolve("nowhere"),
            Err(GridError::UnknownLocation(String::from("nowhere")))
        );
    }

    #[test]
    fn test_build_rejects_blocked_location() {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(4, 4);
        builder.block(Cell::new(2, 2));
        builder.add_location("rack", Cell::new(2, 2));

        assert!(matches!(
            builder.build(),
            Err(GridError::Blocked { .. })
        ));
    }

    #[test]
    fn test_build_rejects_out_of_bounds_location() {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(4, 4);
        builder.add_location("rack", Cell::new(9, 0));

        assert!(matches!(builder.build(), Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn test_grid_round_trips_through_json() {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(4, 3);
        builder.set_cell_size_meters(5.0);
        builder.block(Cell::new(1, 1));
        builder.add_location("staging", Cell::new(0, 0));
        let grid = builder.build().unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.width(), 4);
        assert_eq!(restored.cell_size_meters(), 5.0);
        assert!(!restored.is_passable(Cell::new(1, 1)));
        assert_eq!(restored.resolve("staging").unwrap(), Cell::new(0, 0));
    }

    #[test]
    fn test_passable_rows() {
        let mut builder = GridBuilder::default();
        builder.set_passable_rows(vec![
            vec![true, true, true],
            vec![true, false, true],
            vec![true, true, true],
        ]);
        let grid = builder.build().unwrap();

        assert!(grid.is_passable(Cell::new(0, 0)));
        assert!(!grid.is_passable(Cell::new(1, 1)));
        assert!(!grid.is_passable(Cell::new(3, 0)));
    }
}
