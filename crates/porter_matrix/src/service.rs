use std::sync::Arc;

use fxhash::FxHashMap;
use jiff::SignedDuration;
use parking_lot::RwLock;

use porter_grid::{AStar, Cell, Connectivity, Grid, GridPath};

use crate::error::RoutingError;

/// Travel distance and estimated time between two named locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelCost {
    pub distance_meters: f64,
    pub time: SignedDuration,
}

/// Pairwise routing with explicit concurrent caches.
///
/// Uniform-cost grid A* is symmetric, so distances are cached under the
/// unordered cell pair. Concrete paths are direction-sensitive and cached
/// under the ordered pair. Both caches are best-effort: concurrent misses may
/// compute the same pair twice, the last write wins, nothing is corrupted.
pub struct DistanceService {
    grid: Arc<Grid>,
    connectivity: Connectivity,
    distances: RwLock<FxHashMap<(Cell, Cell), f64>>,
    paths: RwLock<FxHashMap<(Cell, Cell), Arc<GridPath>>>,
}

impl DistanceService {
    pub fn new(grid: Arc<Grid>, connectivity: Connectivity) -> Self {
        DistanceService {
            grid,
            connectivity,
            distances: RwLock::new(FxHashMap::default()),
            paths: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    fn unordered(from: Cell, to: Cell) -> (Cell, Cell) {
        if to < from { (to, from) } else { (from, to) }
    }

    /// Distance in meters between two cells, memoized per unordered pair.
    pub fn distance_between(&self, from: Cell, to: Cell) -> Result<f64, RoutingError> {
        let key = Self::unordered(from, to);
        if let Some(&distance) = self.distances.read().get(&key) {
            return Ok(distance);
        }

        let path = self.route_between(from, to)?;
        let distance = path.cost as f64 * self.grid.cell_size_meters();
        self.distances.write().insert(key, distance);

        Ok(distance)
    }

    /// Concrete cell-by-cell route between two cells, memoized per ordered
    /// pair.
    pub fn route_between(&self, from: Cell, to: Cell) -> Result<Arc<GridPath>, RoutingError> {
        if let Some(path) = self.paths.read().get(&(from, to)) {
            return Ok(Arc::clone(path));
        }

        let path = AStar::new(&self.grid)
            .find_path(&self.grid, self.connectivity, from, to)
            .ok_or(RoutingError::Infeasible { from, to })?;
        let path = Arc::new(path);
        self.paths
            .write()
            .insert((from, to), Arc::clone(&path));

        Ok(path)
    }

    /// Distance and estimated travel time between two named locations for an
    /// agent moving at `speed_mps`.
    pub fn travel_cost(
        &self,
        from: &str,
        to: &str,
        speed_mps: f64,
    ) -> Result<TravelCost, RoutingError> {
        let from_cell = self.grid.resolve(from)?;
        let to_cell = self.grid.resolve(to)?;
        let distance_meters = self.distance_between(from_cell, to_cell)?;

        Ok(TravelCost {
            distance_meters,
            time: SignedDuration::from_secs_f64(distance_meters / speed_mps),
        })
    }

    #[cfg(test)]
    fn cached_distance_pairs(&self) -> usize {
        self.distances.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use porter_grid::GridBuilder;

    fn service() -> DistanceService {
        let mut builder = GridBuilder::default();
        builder.set_dimensions(6, 6);
        builder.set_cell_size_meters(5.0);
        builder.add_location("staging", Cell::new(0, 0));
        builder.add_location("rack-a", Cell::new(5, 0));
        let grid = builder.build().unwrap();
        DistanceService::new(Arc::new(grid), Connectivity::Four)
    }

    #[test]
    fn test_travel_cost() {
        let service = service();
        let cost = service.travel_cost("staging", "rack-a", 2.5).unwrap();

        assert_eq!(cost.distance_meters, 25.0);
        assert_eq!(cost.time, SignedDuration::from_secs(10));
    }

    #[test]
    fn test_unknown_location() {
        let service = service();
        assert!(matches!(
            service.travel_cost("staging", "rack-z", 1.0),
            Err(RoutingError::Grid(_))
        ));
    }

    #[test]
    fn test_symmetric_pair_shares_cache_entry() {
        let service = service();
        service
            .distance_between(Cell::new(0, 0), Cell::new(5, 0))
            .unwrap();
        service
            .distance_between(Cell::new(5, 0), Cell::new(0, 0))
            .unwrap();

        assert_eq!(service.cached_distance_pairs(), 1);
    }

    #[test]
    fn test_route_between_is_cached_per_direction() {
        let service = service();
        let forward = service
            .route_between(Cell::new(0, 0), Cell::new(5, 0))
            .unwrap();
        let again = service
            .route_between(Cell::new(0, 0), Cell::new(5, 0))
            .unwrap();

        assert!(Arc::ptr_eq(&forward, &again));
        assert_eq!(forward.cells.first(), Some(&Cell::new(0, 0)));
        assert_eq!(forward.cells.last(), Some(&Cell::new(5, 0)));
    }
}
