use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use porter_grid::{Cell, GridPath};

/// Occupancy of one cell for the half-open interval `[enter, exit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellVisit {
    pub cell: Cell,
    pub enter: Timestamp,
    pub exit: Timestamp,
}

impl CellVisit {
    pub fn overlaps(&self, other: &CellVisit) -> bool {
        self.cell == other.cell && self.enter < other.exit && other.enter < self.exit
    }
}

/// One movement segment: a concrete path plus the dwell at its final cell
/// (picking at a stop, unloading at the berth).
#[derive(Debug, Clone)]
pub struct TraceLeg {
    pub path: Arc<GridPath>,
    pub dwell: SignedDuration,
}

/// The full spatio-temporal footprint of one agent's day.
#[derive(Debug, Clone)]
pub struct AgentTrace {
    pub agent_index: usize,
    pub visits: Vec<CellVisit>,
}

/// Walks the legs cell by cell at the agent's speed from `start`, producing
/// one occupancy interval per cell. Consecutive legs share their boundary
/// cell; the shared cell gets a single merged interval. Pure: stamping the
/// same legs at the same start always yields the same visits.
pub fn stamp(
    agent_index: usize,
    legs: &[TraceLeg],
    speed_mps: f64,
    cell_size_meters: f64,
    start: Timestamp,
) -> AgentTrace {
    let step = SignedDuration::from_secs_f64(cell_size_meters / speed_mps);
    let mut visits: Vec<CellVisit> = Vec::new();
    let mut time = start;

    for leg in legs {
        for (index, &cell) in leg.path.cells.iter().enumerate() {
            // The leg starts where the previous one ended; no re-entry.
            let continues_previous = index == 0
                && visits
                    .last()
                    .is_some_and(|last: &CellVisit| last.cell == cell);
            if continues_previous {
                continue;
            }

            visits.push(CellVisit {
                cell,
                enter: time,
                exit: time + step,
            });
            time += step;
        }

        if leg.dwell > SignedDuration::ZERO {
            if let Some(last) = visits.last_mut() {
                last.exit += leg.dwell;
            }
            time += leg.dwell;
        }
    }

    AgentTrace {
        agent_index,
        visits,
    }
}

/// Cells an agent occupies, for callers that only need the footprint.
pub fn cells_of(trace: &AgentTrace) -> impl Iterator<Item = Cell> + '_ {
    trace.visits.iter().map(|visit| visit.cell)
}
