use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::RouteConstraint;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;
use crate::solver::solution::agent_route::AgentRoute;

/// Total time between the route's first berth departure and last unload must
/// not exceed the agent's maximum working duration.
#[derive(Clone, Default)]
pub struct WorkingDurationConstraint;

impl RouteConstraint for WorkingDurationConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Hard
    }

    fn compute_score(&self, problem: &PickingProblem, route: &AgentRoute) -> Score {
        let agent = route.agent(problem);

        if let Some(maximum) = agent.maximum_working_duration() {
            let working = route.working_duration();
            if working > maximum {
                return Score::of(
                    self.score_level(),
                    working.as_secs_f64() - maximum.as_secs_f64(),
                );
            }
        }

        Score::zero()
    }
}
