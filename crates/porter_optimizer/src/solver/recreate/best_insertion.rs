use std::fmt::Display;

use jiff::Timestamp;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::problem::order_line::LineIdx;
use crate::problem::picking_problem::PickingProblem;
use crate::solver::insertion::{InsertionEvaluator, collect_insertions};
use crate::solver::recreate::recreate_strategy::RecreateContext;
use crate::solver::solution::working_solution::WorkingSolution;

/// Order in which unassigned lines are fed to the insertion loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BestInsertionSort {
    #[default]
    Random,
    /// Largest demand first.
    Demand,
    /// Earliest deadline first.
    Deadline,
    /// Farthest from the depots first.
    Far,
    /// Closest to the depots first.
    Close,
}

impl Display for BestInsertionSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "Random"),
            Self::Demand => write!(f, "Demand"),
            Self::Deadline => write!(f, "Deadline"),
            Self::Far => write!(f, "Far"),
            Self::Close => write!(f, "Close"),
        }
    }
}

pub fn sort_unassigned_lines(
    problem: &PickingProblem,
    lines: &mut [LineIdx],
    sort: BestInsertionSort,
    rng: &mut rand::rngs::SmallRng,
) {
    match sort {
        BestInsertionSort::Random => lines.shuffle(rng),
        BestInsertionSort::Demand => lines.sort_unstable_by(|&a, &b| {
            let demand_a = problem.line(a).demand().get(0);
            let demand_b = problem.line(b).demand().get(0);
            demand_b.total_cmp(&demand_a).then(a.cmp(&b))
        }),
        BestInsertionSort::Deadline => lines.sort_unstable_by_key(|&line_id| {
            let end = problem.line(line_id).time_window().end();
            (end.unwrap_or(Timestamp::MAX), line_id)
        }),
        BestInsertionSort::Far => lines.sort_unstable_by(|&a, &b| {
            let distance_a = problem.average_distance_from_depot(problem.line(a).location_id());
            let distance_b = problem.average_distance_from_depot(problem.line(b).location_id());
            distance_b.total_cmp(&distance_a).then(a.cmp(&b))
        }),
        BestInsertionSort::Close => lines.sort_unstable_by(|&a, &b| {
            let distance_a = problem.average_distance_from_depot(problem.line(a).location_id());
            let distance_b = problem.average_distance_from_depot(problem.line(b).location_id());
            distance_a.total_cmp(&distance_b).then(a.cmp(&b))
        }),
    }
}

/// Greedy cheapest-position insertion with blinking. Lines whose best
/// placement still breaks a hard constraint stay unassigned.
pub fn recreate(
    solution: &mut WorkingSolution,
    context: RecreateContext,
    sort: BestInsertionSort,
) {
    let mut unassigned: Vec<LineIdx> = solution.unassigned_lines().iter().copied().collect();
    unassigned.sort_unstable();
    sort_unassigned_lines(solution.problem(), &mut unassigned, sort, context.rng);

    for line_id in unassigned {
        let mut candidates = collect_insertions(solution, line_id);
        if candidates.is_empty() {
            continue;
        }

        if context.blink_rate > 0.0 && candidates.len() > 1 {
            let kept: Vec<_> = candidates
                .iter()
                .copied()
                .filter(|_| !context.rng.random_bool(context.blink_rate))
                .collect();
            if !kept.is_empty() {
                candidates = kept;
            }
        }

        let evaluator = InsertionEvaluator::new(solution, context.constraints);
        if let Some((insertion, score)) = evaluator.best(&candidates)
            && !score.is_failure()
        {
            solution.insert(&insertion);
        }
    }
}
