use rayon::prelude::*;

use crate::problem::order_line::LineIdx;
use crate::solver::insertion::{Insertion, InsertionEvaluator, collect_insertions};
use crate::solver::recreate::recreate_strategy::RecreateContext;
use crate::solver::score::Score;
use crate::solver::solution::working_solution::WorkingSolution;

struct LineRegret {
    line_id: LineIdx,
    best: Insertion,
    best_score: Score,
    regret: Score,
}

/// Regret-2 insertion: at each step commit the line that would lose the most
/// if denied its best placement. More expensive than plain best insertion,
/// much harder to trap in bad early commitments.
pub fn recreate(solution: &mut WorkingSolution, context: RecreateContext) {
    loop {
        let mut pending: Vec<LineIdx> = solution.unassigned_lines().iter().copied().collect();
        pending.sort_unstable();
        if pending.is_empty() {
            return;
        }

        let evaluator = InsertionEvaluator::new(solution, context.constraints);

        let mut chosen: Option<LineRegret> = None;
        for line_id in pending {
            let candidates = collect_insertions(solution, line_id);
            if candidates.is_empty() {
                continue;
            }

            let mut scored: Vec<(Insertion, Score)> = candidates
                .par_iter()
                .map(|insertion| (*insertion, evaluator.score(insertion)))
                .collect();
            scored.sort_unstable_by(|(a, score_a), (b, score_b)| {
                score_a
                    .cmp(score_b)
                    .then_with(|| a.agent_id.cmp(&b.agent_id))
                    .then_with(|| a.trip_index.cmp(&b.trip_index))
                    .then_with(|| a.position.cmp(&b.position))
            });

            let (best, best_score) = scored[0];
            if best_score.is_failure() {
                continue;
            }

            // A line with a single candidate placement must be committed
            // before other lines crowd it out: maximal regret.
            let regret = match scored.get(1) {
                Some((_, second_score)) => *second_score - best_score,
                None => Score::MAX,
            };

            let replace = match &chosen {
                None => true,
                Some(current) => {
                    regret > current.regret
                        || (regret == current.regret && line_id < current.line_id)
                }
            };
            if replace {
                chosen = Some(LineRegret {
                    line_id,
                    best,
                    best_score,
                    regret,
                });
            }
        }

        match chosen {
            Some(line_regret) if !line_regret.best_score.is_failure() => {
                solution.insert(&line_regret.best);
            }
            _ => return,
        }
    }
}
