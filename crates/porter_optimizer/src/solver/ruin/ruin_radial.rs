use crate::solver::ruin::ruin_strategy::RuinContext;
use crate::solver::solution::working_solution::WorkingSolution;

/// Unassigns a random seed line plus its nearest assigned neighbors, leaving
/// a spatial hole that recreate can fill with a different pattern.
pub fn ruin(solution: &mut WorkingSolution, context: RuinContext) {
    let Some(seed) = solution.random_assigned_line(context.rng) else {
        return;
    };

    solution.remove_line(seed);
    let mut removed = 1;

    for &neighbor in context.problem.nearest_lines(seed) {
        if removed >= context.num_lines_to_remove {
            break;
        }
        if solution.remove_line(neighbor) {
            removed += 1;
        }
    }
}
