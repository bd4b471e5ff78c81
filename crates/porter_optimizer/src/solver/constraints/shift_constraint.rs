use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::RouteConstraint;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;
use crate::solver::solution::agent_route::AgentRoute;

/// The route must finish before the agent's shift ends.
#[derive(Clone, Default)]
pub struct ShiftConstraint;

impl RouteConstraint for ShiftConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Hard
    }

    fn compute_score(&self, problem: &PickingProblem, route: &AgentRoute) -> Score {
        let agent = route.agent(problem);

        if let (Some(latest_end), Some(end)) = (agent.latest_end(), route.end())
            && end > latest_end
        {
            return Score::of(
                self.score_level(),
                end.duration_since(latest_end).as_secs_f64(),
            );
        }

        Score::zero()
    }
}
