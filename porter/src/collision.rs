use fxhash::FxHashMap;
use jiff::{SignedDuration, Timestamp};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use porter_grid::Cell;

use crate::config::{DelayPolicy, ResolverConfig};
use crate::error::PorterError;
use crate::pipeline::RunStage;
use crate::trace::{AgentTrace, CellVisit};

/// Two agents on the same cell during overlapping intervals. Indices refer
/// to the roster order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub first: usize,
    pub second: usize,
    pub cell: Cell,
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Resolved,
    PartiallyResolved,
}

#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub status: ResolutionStatus,
    pub iterations: usize,
    pub delays: Vec<SignedDuration>,
    pub unresolved: Vec<Collision>,
}

fn pair_collisions(first: &AgentTrace, second: &AgentTrace) -> Vec<Collision> {
    let mut by_cell: FxHashMap<Cell, Vec<&CellVisit>> = FxHashMap::default();
    for visit in &first.visits {
        by_cell.entry(visit.cell).or_default().push(visit);
    }

    let mut collisions = Vec::new();
    for visit in &second.visits {
        if let Some(candidates) = by_cell.get(&visit.cell) {
            for candidate in candidates {
                if candidate.overlaps(visit) {
                    collisions.push(Collision {
                        first: first.agent_index,
                        second: second.agent_index,
                        cell: visit.cell,
                        start: candidate.enter.max(visit.enter),
                        end: candidate.exit.min(visit.exit),
                    });
                }
            }
        }
    }

    collisions
}

/// Scans every agent pair for spatio-temporal overlaps. Read-only and
/// parallel over pairs; the result is sorted into a fixed order so repeated
/// scans of the same traces are identical.
pub fn detect_collisions(traces: &[AgentTrace]) -> Vec<Collision> {
    let pairs: Vec<(usize, usize)> = (0..traces.len())
        .flat_map(|i| ((i + 1)..traces.len()).map(move |j| (i, j)))
        .collect();

    let mut collisions: Vec<Collision> = pairs
        .par_iter()
        .flat_map_iter(|&(i, j)| pair_collisions(&traces[i], &traces[j]))
        .collect();

    collisions.sort_unstable_by_key(|collision| {
        (
            collision.first,
            collision.second,
            collision.start,
            collision.cell,
        )
    });
    collisions
}

/// Iterative deconfliction over an arena of immutable trace snapshots. Each
/// iteration delays the worst-colliding agent (ties to the lowest index) and
/// re-stamps only that agent through `restamp`. The assignment itself is
/// never touched.
pub fn resolve<F>(
    mut traces: Vec<AgentTrace>,
    restamp: F,
    config: &ResolverConfig,
    deadline: Option<Timestamp>,
) -> Result<(Vec<AgentTrace>, ResolutionReport), PorterError>
where
    F: Fn(usize, SignedDuration) -> AgentTrace,
{
    let num_agents = traces.len();
    let mut delays = vec![SignedDuration::ZERO; num_agents];
    let mut times_delayed = vec![0u32; num_agents];

    for iteration in 0..config.max_iterations {
        if let Some(deadline) = deadline
            && Timestamp::now() > deadline
        {
            return Err(PorterError::PipelineTimeout {
                stage: RunStage::Deconflicting,
            });
        }

        let collisions = detect_collisions(&traces);
        if collisions.is_empty() {
            debug!(iterations = iteration, "deconfliction converged");
            return Ok((
                traces,
                ResolutionReport {
                    status: ResolutionStatus::Resolved,
                    iterations: iteration,
                    delays,
                    unresolved: Vec::new(),
                },
            ));
        }

        let victim = select_victim(&collisions, num_agents);
        let increment = match config.policy {
            DelayPolicy::FixedIncrement => config.delay_increment,
            DelayPolicy::Escalating => config.delay_increment * (times_delayed[victim] as i32 + 1),
        };

        delays[victim] += increment;
        times_delayed[victim] += 1;
        traces[victim] = restamp(victim, delays[victim]);

        debug!(
            iteration,
            victim,
            collisions = collisions.len(),
            delay_secs = delays[victim].as_secs(),
            "delaying agent to break collisions"
        );
    }

    let unresolved = detect_collisions(&traces);
    warn!(
        remaining = unresolved.len(),
        cap = config.max_iterations,
        "deconfliction hit its iteration cap with collisions left"
    );

    Ok((
        traces,
        ResolutionReport {
            status: ResolutionStatus::PartiallyResolved,
            iterations: config.max_iterations,
            delays,
            unresolved,
        },
    ))
}

/// The agent involved in the most collisions; ties go to the lowest index.
fn select_victim(collisions: &[Collision], num_agents: usize) -> usize {
    let mut counts = vec![0usize; num_agents];
    for collision in collisions {
        counts[collision.first] += 1;
        counts[collision.second] += 1;
    }

    counts
        .iter()
        .enumerate()
        .max_by(|(index_a, count_a), (index_b, count_b)| {
            count_a.cmp(count_b).then(index_b.cmp(index_a))
        })
        .map(|(index, _)| index)
        .expect("collision list implies at least one agent")
}
