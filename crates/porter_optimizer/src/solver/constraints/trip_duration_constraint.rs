use crate::problem::agent::Agent;
use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::TripConstraint;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;
use crate::solver::solution::trip::Trip;

/// Berth-to-berth duration of a single trip must not exceed the agent's
/// configured maximum.
#[derive(Clone, Default)]
pub struct TripDurationConstraint;

impl TripConstraint for TripDurationConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Hard
    }

    fn compute_score(&self, _problem: &PickingProblem, agent: &Agent, trip: &Trip) -> Score {
        if let Some(maximum) = agent.maximum_trip_duration() {
            let duration = trip.duration();
            if duration > maximum {
                return Score::of(
                    self.score_level(),
                    duration.as_secs_f64() - maximum.as_secs_f64(),
                );
            }
        }

        Score::zero()
    }
}
