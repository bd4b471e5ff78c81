use crate::problem::agent::Agent;
use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::TripConstraint;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;
use crate::solver::solution::trip::Trip;

/// A trip's cumulative demand must fit the agent's capacity in every
/// dimension. The violation amount is the score, so the search can rank
/// near-feasible solutions.
#[derive(Clone, Default)]
pub struct CapacityConstraint;

impl TripConstraint for CapacityConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Hard
    }

    fn compute_score(&self, problem: &PickingProblem, agent: &Agent, trip: &Trip) -> Score {
        if !problem.has_capacity() {
            return Score::zero();
        }

        let load = trip.load();
        let capacity = agent.capacity();
        let dims = load.len().max(capacity.len());

        let mut violation = 0.0;
        for i in 0..dims {
            let excess = load.get(i) - capacity.get(i);
            if excess > 0.0 {
                violation += excess;
            }
        }

        Score::of(self.score_level(), violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::order_line::LineIdx;
    use crate::solver::constraints::constraint::TripConstraint;
    use crate::solver::solution::agent_route::AgentRoute;
    use crate::test_utils;

    #[test]
    fn test_overloaded_trip_fails() {
        // Fixture agent capacity: 10 kg / 50 dm3. Each line weighs 4 kg.
        let problem = test_utils::small_problem();
        let mut route = AgentRoute::empty(0.into());
        route.insert(0, 0, LineIdx::new(0));
        route.insert(0, 1, LineIdx::new(1));
        route.insert(0, 2, LineIdx::new(0));
        route.resync(&problem);

        let agent = problem.agent(0.into());
        let score = CapacityConstraint.compute_score(&problem, agent, route.trip(0));
        assert!(score.is_failure());
        assert_eq!(score.hard_score, 2.0);
    }

    #[test]
    fn test_within_capacity_is_clean() {
        let problem = test_utils::small_problem();
        let mut route = AgentRoute::empty(0.into());
        route.insert(0, 0, LineIdx::new(0));
        route.insert(0, 1, LineIdx::new(1));
        route.resync(&problem);

        let agent = problem.agent(0.into());
        let score = CapacityConstraint.compute_score(&problem, agent, route.trip(0));
        assert_eq!(score, Score::zero());
    }
}
