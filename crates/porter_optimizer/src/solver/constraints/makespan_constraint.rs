use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::GlobalConstraint;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;
use crate::solver::solution::working_solution::WorkingSolution;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Weighted time until the last agent finishes, measured from the fleet's
/// horizon start. Pulls the search toward balanced workloads.
#[derive(Clone, Default)]
pub struct MakespanConstraint;

impl GlobalConstraint for MakespanConstraint {
    fn score_level(&self) -> ScoreLevel {
        ScoreLevel::Soft
    }

    fn compute_score(&self, problem: &PickingProblem, solution: &WorkingSolution) -> Score {
        let hours = solution.makespan().as_secs_f64() / SECONDS_PER_HOUR;

        Score::of(
            self.score_level(),
            hours * problem.weights().makespan_per_hour,
        )
    }
}
