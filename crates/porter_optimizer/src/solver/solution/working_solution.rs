use std::sync::Arc;

use fxhash::FxHashSet;
use jiff::{SignedDuration, Timestamp};
use rand::seq::IteratorRandom;

use crate::problem::agent::AgentIdx;
use crate::problem::order_line::LineIdx;
use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::Constraint;
use crate::solver::insertion::Insertion;
use crate::solver::score::{Score, ScoreAnalysis};
use crate::solver::solution::agent_route::AgentRoute;

#[derive(Clone)]
pub struct WorkingSolution {
    problem: Arc<PickingProblem>,
    routes: Vec<AgentRoute>,
    unassigned_lines: FxHashSet<LineIdx>,
}

impl WorkingSolution {
    pub fn new(problem: Arc<PickingProblem>) -> Self {
        let routes = (0..problem.fleet().len())
            .map(|agent_id| AgentRoute::empty(AgentIdx::new(agent_id)))
            .collect();
        let unassigned_lines = (0..problem.lines().len()).map(LineIdx::new).collect();

        WorkingSolution {
            problem,
            routes,
            unassigned_lines,
        }
    }

    pub fn problem(&self) -> &PickingProblem {
        self.problem.as_ref()
    }

    pub fn problem_arc(&self) -> &Arc<PickingProblem> {
        &self.problem
    }

    pub fn routes(&self) -> &[AgentRoute] {
        &self.routes
    }

    pub fn route(&self, agent_id: AgentIdx) -> &AgentRoute {
        &self.routes[agent_id.get()]
    }

    pub fn non_empty_routes_iter(&self) -> impl Iterator<Item = &AgentRoute> {
        self.routes.iter().filter(|route| !route.is_empty())
    }

    pub fn unassigned_lines(&self) -> &FxHashSet<LineIdx> {
        &self.unassigned_lines
    }

    pub fn has_unassigned(&self) -> bool {
        !self.unassigned_lines.is_empty()
    }

    pub fn is_unassigned(&self, line_id: LineIdx) -> bool {
        self.unassigned_lines.contains(&line_id)
    }

    pub fn assigned_count(&self) -> usize {
        self.problem.lines().len() - self.unassigned_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unassigned_lines.len() == self.problem.lines().len()
    }

    pub fn route_of_line(&self, line_id: LineIdx) -> Option<AgentIdx> {
        self.routes
            .iter()
            .find(|route| route.contains_line(line_id))
            .map(AgentRoute::agent_id)
    }

    pub fn insert(&mut self, insertion: &Insertion) {
        let route = &mut self.routes[insertion.agent_id.get()];
        route.insert(insertion.trip_index, insertion.position, insertion.line_id);
        route.resync(&self.problem);
        self.unassigned_lines.remove(&insertion.line_id);
    }

    pub fn remove_line(&mut self, line_id: LineIdx) -> bool {
        for route in &mut self.routes {
            if route.remove_line(line_id) {
                route.resync(&self.problem);
                self.unassigned_lines.insert(line_id);
                return true;
            }
        }
        false
    }

    /// Unassigns a whole trip of one agent.
    pub fn remove_trip(&mut self, agent_id: AgentIdx, trip_index: usize) {
        let stops = self.routes[agent_id.get()].remove_trip(trip_index);
        self.routes[agent_id.get()].resync(&self.problem);
        self.unassigned_lines.extend(stops);
    }

    pub fn random_assigned_line<R>(&self, rng: &mut R) -> Option<LineIdx>
    where
        R: rand::Rng,
    {
        if self.is_empty() {
            return None;
        }

        loop {
            let line_id = self.problem.random_line(rng);
            if !self.unassigned_lines.contains(&line_id) {
                return Some(line_id);
            }
        }
    }

    pub fn random_non_empty_route<R>(&self, rng: &mut R) -> Option<AgentIdx>
    where
        R: rand::Rng,
    {
        self.routes
            .iter()
            .filter(|route| !route.is_empty())
            .choose(rng)
            .map(AgentRoute::agent_id)
    }

    /// Latest trip end across all non-empty routes.
    pub fn latest_end(&self) -> Option<Timestamp> {
        self.non_empty_routes_iter().filter_map(AgentRoute::end).max()
    }

    pub fn latest_end_excluding(&self, agent_id: AgentIdx) -> Option<Timestamp> {
        self.non_empty_routes_iter()
            .filter(|route| route.agent_id() != agent_id)
            .filter_map(AgentRoute::end)
            .max()
    }

    /// Time from the fleet's horizon start until the last agent finishes.
    pub fn makespan(&self) -> SignedDuration {
        match self.latest_end() {
            Some(end) => end.duration_since(self.problem.horizon_start()),
            None => SignedDuration::ZERO,
        }
    }

    pub fn compute_solution_score(&self, constraints: &[Constraint]) -> (Score, ScoreAnalysis) {
        let mut analysis = ScoreAnalysis::default();
        let mut total = Score::zero();

        for constraint in constraints {
            let score = constraint.compute_score(&self.problem, self);
            total += score;
            *analysis
                .scores
                .entry(constraint.constraint_name())
                .or_insert(Score::ZERO) += score;
        }

        (total, analysis)
    }

    /// Structural equality: same stops in the same trips in the same order,
    /// per agent.
    pub fn is_identical(&self, other: &WorkingSolution) -> bool {
        if self.routes.len() != other.routes.len() {
            return false;
        }

        self.routes.iter().zip(&other.routes).all(|(route, other_route)| {
            route.agent_id() == other_route.agent_id()
                && route.trips().len() == other_route.trips().len()
                && route
                    .trips()
                    .iter()
                    .zip(other_route.trips())
                    .all(|(trip, other_trip)| trip.stops() == other_trip.stops())
        })
    }
}
