use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::RouteConstraint;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;
use crate::solver::solution::agent_route::AgentRoute;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Working time billed at the agent's hourly rate. The dominant objective
/// term: a robot hour is cheaper than a picker hour.
#[derive(Clone, Default)]
pub struct LaborCostConstraint;

impl RouteConstraint for LaborCostConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Soft
    }

    fn compute_score(&self, problem: &PickingProblem, route: &AgentRoute) -> Score {
        let agent = route.agent(problem);
        let hours = route.working_duration().as_secs_f64() / SECONDS_PER_HOUR;

        Score::of(self.score_level(), hours * agent.hourly_cost())
    }
}
