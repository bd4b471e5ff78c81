use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::grid::{Connectivity, Grid};

const INVALID_NODE: usize = usize::MAX;
const MAX_COST: u32 = u32::MAX;

/// A concrete path through the grid: every cell from start to goal inclusive,
/// plus the total step cost (uniform cost, one per move).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPath {
    pub cells: Vec<Cell>,
    pub cost: u32,
}

impl GridPath {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Eq, Copy, Clone, Debug)]
struct HeapItem {
    cell_index: usize,
    g_score: u32,
    f_score: u32, // g_score + h_score
    h_score: u32,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flipped comparisons turn the max-heap into a min-heap. Equal f
        // prefers the lower heuristic, then the lower row-major index, so
        // expansion order is a fixed total order.
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.h_score.cmp(&self.h_score))
            .then_with(|| other.cell_index.cmp(&self.cell_index))
    }
}

#[derive(Clone)]
struct NodeData {
    settled: bool,
    g_score: u32,
    parent: usize,
}

impl NodeData {
    fn new() -> Self {
        NodeData {
            settled: false,
            g_score: MAX_COST,
            parent: INVALID_NODE,
        }
    }
}

/// Reusable A* searcher over a fixed grid. The heap and per-cell data are
/// reset on every query, so one searcher can serve many (start, goal) pairs.
pub struct AStar {
    heap: BinaryHeap<HeapItem>,
    data: Vec<NodeData>,
}

impl AStar {
    pub fn new(grid: &Grid) -> Self {
        AStar {
            heap: BinaryHeap::with_capacity(1024),
            data: vec![NodeData::new(); grid.cell_count()],
        }
    }

    fn reset(&mut self, grid: &Grid) {
        self.heap.clear();
        self.data.clear();
        self.data.resize_with(grid.cell_count(), NodeData::new);
    }

    /// Shortest path from `start` to `goal`, or `None` when the goal is
    /// unreachable through passable cells. Identical inputs always produce an
    /// identical path and cost.
    pub fn find_path(
        &mut self,
        grid: &Grid,
        connectivity: Connectivity,
        start: Cell,
        goal: Cell,
    ) -> Option<GridPath> {
        if !grid.is_passable(start) || !grid.is_passable(goal) {
            return None;
        }

        if start == goal {
            return Some(GridPath {
                cells: vec![start],
                cost: 0,
            });
        }

        self.reset(grid);

        let start_index = grid.index(start);
        let goal_index = grid.index(goal);

        let h_start = connectivity.heuristic(start, goal);
        self.heap.push(HeapItem {
            cell_index: start_index,
            g_score: 0,
            f_score: h_start,
            h_score: h_start,
        });
        self.data[start_index].g_score = 0;

        while let Some(item) = self.heap.pop() {
            if self.data[item.cell_index].settled {
                continue;
            }
            self.data[item.cell_index].settled = true;

            if item.cell_index == goal_index {
                return Some(self.build_path(grid, start_index, goal_index));
            }

            let cell = grid.cell_at(item.cell_index);
            for neighbor in grid.neighbors(cell, connectivity) {
                let neighbor_index = grid.index(neighbor);
                if self.data[neighbor_index].settled {
                    continue;
                }

                let tentative_g = item.g_score + 1;
                if tentative_g < self.data[neighbor_index].g_score {
                    self.data[neighbor_index].g_score = tentative_g;
                    self.data[neighbor_index].parent = item.cell_index;

                    let h = connectivity.heuristic(neighbor, goal);
                    self.heap.push(HeapItem {
                        cell_index: neighbor_index,
                        g_score: tentative_g,
                        f_score: tentative_g + h,
                        h_score: h,
                    });
                }
            }
        }

        None
    }

    fn build_path(&self, grid: &Grid, start_index: usize, goal_index: usize) -> GridPath {
        let cost = self.data[goal_index].g_score;
        let mut cells = Vec::with_capacity(cost as usize + 1);

        let mut node = goal_index;
        while node != INVALID_NODE {
            cells.push(grid.cell_at(node));
            if node == start_index {
                break;
            }
            node = self.data[node].parent;
        }

        cells.reverse();

        GridPath { cells, cost }
    }
}

/// One-shot convenience wrapper around [`AStar`].
pub fn find_path(
    grid: &Grid,
    connectivity: Connectivity,
    start: Cell,
    goal: Cell,
) -> Option<GridPath> {
    AStar::new(grid).find_path(grid, connectivity, start, goal)
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::grid::GridBuilder;

    fn open_grid(width: u32, height: u32) -> Grid {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(width, height);
        builder.build().unwrap()
    }

    /// Reference shortest-path cost by breadth-first search.
    fn bfs_cost(grid: &Grid, connectivity: Connectivity, start: Cell, goal: Cell) -> Option<u32> {
        if !grid.is_passable(start) || !grid.is_passable(goal) {
            return None;
        }

        let mut costs = vec![MAX_COST; grid.cell_count()];
        let mut queue = VecDeque::new();
        costs[grid.index(start)] = 0;
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            if cell == goal {
                return Some(costs[grid.index(cell)]);
            }
            let cost = costs[grid.index(cell)];
            for neighbor in grid.neighbors(cell, connectivity) {
                let index = grid.index(neighbor);
                if costs[index] == MAX_COST {
                    costs[index] = cost + 1;
                    queue.push_back(neighbor);
                }
            }
        }

        None
    }

    #[test]
    fn test_straight_line() {
        let grid = open_grid(5, 5);
        let path = find_path(&grid, Connectivity::Four, Cell::new(0, 0), Cell::new(4, 0)).unwrap();

        assert_eq!(path.cost, 4);
        assert_eq!(path.cells.len(), 5);
        assert_eq!(path.cells[0], Cell::new(0, 0));
        assert_eq!(path.cells[4], Cell::new(4, 0));
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = open_grid(3, 3);
        let path = find_path(&grid, Connectivity::Four, Cell::new(1, 1), Cell::new(1, 1)).unwrap();

        assert_eq!(path.cost, 0);
        assert_eq!(path.cells, vec![Cell::new(1, 1)]);
    }

    #[test]
    fn test_detour_around_obstacle() {
        // Wall across the middle with a single gap at the top.
        let mut builder = GridBuilder::default();
        builder.set_dimensions(5, 5);
        for y in 0..4 {
            builder.block(Cell::new(2, y));
        }
        let grid = builder.build().unwrap();

        let path = find_path(&grid, Connectivity::Four, Cell::new(0, 0), Cell::new(4, 0)).unwrap();

        assert_eq!(path.cost, bfs_cost(&grid, Connectivity::Four, Cell::new(0, 0), Cell::new(4, 0)).unwrap());
        assert!(path.cells.contains(&Cell::new(2, 4)));
    }

    #[test]
    fn test_unreachable_goal() {
        // Goal boxed in by obstacles.
        let mut builder = GridBuilder::default();
        builder.set_dimensions(5, 5);
        builder.block(Cell::new(2, 1));
        builder.block(Cell::new(2, 3));
        builder.block(Cell::new(1, 2));
        builder.block(Cell::new(3, 2));
        let grid = builder.build().unwrap();

        assert_eq!(
            find_path(&grid, Connectivity::Four, Cell::new(0, 0), Cell::new(2, 2)),
            None
        );
    }

    #[test]
    fn test_blocked_endpoint() {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(3, 3);
        builder.block(Cell::new(2, 2));
        let grid = builder.build().unwrap();

        assert_eq!(
            find_path(&grid, Connectivity::Four, Cell::new(0, 0), Cell::new(2, 2)),
            None
        );
        assert_eq!(
            find_path(&grid, Connectivity::Four, Cell::new(2, 2), Cell::new(0, 0)),
            None
        );
    }

    #[test]
    fn test_optimality_against_bfs() {
        // Scattered obstacles; every reachable pair must match the BFS cost.
        let mut builder = GridBuilder::default();
        builder.set_dimensions(8, 8);
        for &(x, y) in &[(1, 1), (2, 1), (3, 1), (5, 3), (5, 4), (5, 5), (2, 6), (3, 6), (6, 2)] {
            builder.block(Cell::new(x, y));
        }
        let grid = builder.build().unwrap();
        let mut astar = AStar::new(&grid);

        for start_y in 0..8 {
            for goal_x in 0..8 {
                let start = Cell::new(0, start_y);
                let goal = Cell::new(goal_x, 7);
                let expected = bfs_cost(&grid, Connectivity::Four, start, goal);
                let found = astar
                    .find_path(&grid, Connectivity::Four, start, goal)
                    .map(|path| path.cost);
                assert_eq!(found, expected, "{start} -> {goal}");
            }
        }
    }

    #[test]
    fn test_eight_connected_diagonal() {
        let grid = open_grid(5, 5);
        let path =
            find_path(&grid, Connectivity::Eight, Cell::new(0, 0), Cell::new(4, 4)).unwrap();

        assert_eq!(path.cost, 4);
    }

    #[test]
    fn test_determinism() {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(6, 6);
        builder.block(Cell::new(3, 2));
        builder.block(Cell::new(3, 3));
        let grid = builder.build().unwrap();
        let mut astar = AStar::new(&grid);

        let first = astar
            .find_path(&grid, Connectivity::Four, Cell::new(0, 0), Cell::new(5, 5))
            .unwrap();
        for _ in 0..10 {
            let again = astar
                .find_path(&grid, Connectivity::Four, Cell::new(0, 0), Cell::new(5, 5))
                .unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_path_is_connected() {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(7, 7);
        builder.block(Cell::new(2, 0));
        builder.block(Cell::new(2, 1));
        builder.block(Cell::new(2, 2));
        builder.block(Cell::new(4, 6));
        builder.block(Cell::new(4, 5));
        let grid = builder.build().unwrap();

        let path = find_path(&grid, Connectivity::Four, Cell::new(0, 0), Cell::new(6, 6)).unwrap();
        for pair in path.cells.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
            assert!(grid.is_passable(pair[1]));
        }
        assert_eq!(path.cost as usize, path.cells.len() - 1);
    }
}
