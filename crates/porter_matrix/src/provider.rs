use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use porter_grid::{AStar, Cell, Connectivity, Grid};

use crate::error::RoutingError;

/// Flat pairwise distance matrix over a fixed list of cells, in meters.
/// Index with `from * num_locations + to`. Serializable so callers can
/// persist matrices between runs over the same floor plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTravelMatrices {
    pub distances: Vec<f64>,
    pub num_locations: usize,
}

/// Builds pairwise travel matrices by running A* between every cell pair.
/// Rows are computed in parallel; each worker owns its searcher.
pub struct GridMatrixProvider<'a> {
    grid: &'a Grid,
    connectivity: Connectivity,
}

impl<'a> GridMatrixProvider<'a> {
    pub fn new(grid: &'a Grid, connectivity: Connectivity) -> Self {
        GridMatrixProvider { grid, connectivity }
    }

    /// Computes the full distance matrix for `cells`. Any unreachable pair
    /// aborts the build with [`RoutingError::Infeasible`] — downstream cost
    /// models require every pair to be routable.
    pub fn matrices_for(&self, cells: &[Cell]) -> Result<RawTravelMatrices, RoutingError> {
        let num_locations = cells.len();
        let step_meters = self.grid.cell_size_meters();

        let rows: Vec<Vec<f64>> = cells
            .par_iter()
            .map(|&from| -> Result<Vec<f64>, RoutingError> {
                let mut astar = AStar::new(self.grid);
                let mut row = Vec::with_capacity(num_locations);
                for &to in cells {
                    let path = astar
                        .find_path(self.grid, self.connectivity, from, to)
                        .ok_or(RoutingError::Infeasible { from, to })?;
                    row.push(path.cost as f64 * step_meters);
                }
                Ok(row)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            locations = num_locations,
            "built travel matrix over {} pairs",
            num_locations * num_locations
        );

        Ok(RawTravelMatrices {
            distances: rows.into_iter().flatten().collect(),
            num_locations,
        })
    }
}
