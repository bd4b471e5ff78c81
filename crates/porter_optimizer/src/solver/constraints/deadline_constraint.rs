use jiff::Timestamp;

use crate::problem::order_line::OrderLine;
use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::ActivityConstraint;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;

/// Arrival at each stop must meet the line's pick deadline. The overtime in
/// seconds is the violation amount.
#[derive(Clone, Default)]
pub struct DeadlineConstraint;

impl ActivityConstraint for DeadlineConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Hard
    }

    fn compute_score(
        &self,
        problem: &PickingProblem,
        line: &OrderLine,
        arrival: Timestamp,
    ) -> Score {
        if !problem.has_time_windows() {
            return Score::zero();
        }

        Score::of(
            self.score_level(),
            line.time_window().overtime(arrival) as f64,
        )
    }
}
