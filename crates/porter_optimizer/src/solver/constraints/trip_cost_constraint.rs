use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::RouteConstraint;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;
use crate::solver::solution::agent_route::AgentRoute;

/// Fixed cost per opened trip, discouraging many near-empty rounds.
#[derive(Clone, Default)]
pub struct TripCostConstraint;

impl RouteConstraint for TripCostConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Soft
    }

    fn compute_score(&self, problem: &PickingProblem, route: &AgentRoute) -> Score {
        Score::of(
            self.score_level(),
            route.trips().len() as f64 * problem.weights().trip_cost,
        )
    }
}
