use jiff::Timestamp;
use rayon::prelude::*;

use crate::problem::agent::AgentIdx;
use crate::problem::order_line::LineIdx;
use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::Constraint;
use crate::solver::score::Score;
use crate::solver::solution::agent_route::AgentRoute;
use crate::solver::solution::working_solution::WorkingSolution;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// One candidate placement of a line. `trip_index == route.trips().len()`
/// opens a new trip at the end of the agent's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub agent_id: AgentIdx,
    pub trip_index: usize,
    pub position: usize,
    pub line_id: LineIdx,
}

/// Enumerates every placement of `line_id` on agents capable of serving it:
/// every position of every existing trip, plus one fresh trip per agent with
/// trip budget left.
pub fn for_each_insertion(
    solution: &WorkingSolution,
    line_id: LineIdx,
    mut f: impl FnMut(Insertion),
) {
    let problem = solution.problem();

    for agent_id in problem.compatible_agents(line_id) {
        let route = solution.route(agent_id);

        for (trip_index, trip) in route.trips().iter().enumerate() {
            for position in 0..=trip.len() {
                f(Insertion {
                    agent_id,
                    trip_index,
                    position,
                    line_id,
                });
            }
        }

        if route.trips().len() < problem.agent(agent_id).max_trips() {
            f(Insertion {
                agent_id,
                trip_index: route.trips().len(),
                position: 0,
                line_id,
            });
        }
    }
}

pub fn collect_insertions(solution: &WorkingSolution, line_id: LineIdx) -> Vec<Insertion> {
    let mut insertions = Vec::new();
    for_each_insertion(solution, line_id, |insertion| insertions.push(insertion));
    insertions
}

fn route_score(problem: &PickingProblem, route: &AgentRoute, constraints: &[Constraint]) -> Score {
    constraints.iter().fold(Score::zero(), |acc, constraint| {
        acc + constraint.compute_route_score(problem, route)
    })
}

/// Scores candidate insertions against a fixed solution. The delta is the
/// perturbed route's constraint score change plus the global makespan change,
/// so candidates on different agents compare on the full objective.
pub struct InsertionEvaluator<'a> {
    solution: &'a WorkingSolution,
    constraints: &'a [Constraint],
}

impl<'a> InsertionEvaluator<'a> {
    pub fn new(solution: &'a WorkingSolution, constraints: &'a [Constraint]) -> Self {
        InsertionEvaluator {
            solution,
            constraints,
        }
    }

    pub fn score(&self, insertion: &Insertion) -> Score {
        let problem = self.solution.problem();
        let route = self.solution.route(insertion.agent_id);

        let before = route_score(problem, route, self.constraints);

        let mut candidate = route.clone();
        candidate.insert(insertion.trip_index, insertion.position, insertion.line_id);
        candidate.resync(problem);

        let after = route_score(problem, &candidate, self.constraints);

        let mut delta = after - before;
        delta += self.makespan_delta(insertion.agent_id, candidate.end());
        delta
    }

    fn makespan_delta(&self, agent_id: AgentIdx, candidate_end: Option<Timestamp>) -> Score {
        let problem = self.solution.problem();
        let weight = problem.weights().makespan_per_hour;
        if weight == 0.0 {
            return Score::zero();
        }

        let horizon = problem.horizon_start();
        let old_end = self.solution.latest_end().unwrap_or(horizon);
        let others_end = self
            .solution
            .latest_end_excluding(agent_id)
            .unwrap_or(horizon);
        let new_end = candidate_end.unwrap_or(horizon).max(others_end);

        let delta_hours = new_end.duration_since(old_end).as_secs_f64() / SECONDS_PER_HOUR;
        Score::soft(delta_hours * weight)
    }

    /// Best candidate under a fixed total order: score, then agent, trip and
    /// position indices. Candidates are scored in parallel; the reduction is
    /// deterministic because the order is total.
    pub fn best(&self, insertions: &[Insertion]) -> Option<(Insertion, Score)> {
        insertions
            .par_iter()
            .map(|insertion| (*insertion, self.score(insertion)))
            .min_by(|(a, score_a), (b, score_b)| {
                score_a
                    .cmp(score_b)
                    .then_with(|| a.agent_id.cmp(&b.agent_id))
                    .then_with(|| a.trip_index.cmp(&b.trip_index))
                    .then_with(|| a.position.cmp(&b.position))
            })
    }
}
