use crate::solver::ruin::ruin_strategy::RuinContext;
use crate::solver::solution::working_solution::WorkingSolution;

pub fn ruin(solution: &mut WorkingSolution, context: RuinContext) {
    for _ in 0..context.num_lines_to_remove {
        let Some(line_id) = solution.random_assigned_line(context.rng) else {
            return;
        };
        solution.remove_line(line_id);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::sync::Arc;

    use super::*;
    use crate::problem::agent::AgentIdx;
    use crate::problem::order_line::LineIdx;
    use crate::solver::insertion::Insertion;
    use crate::test_utils;

    #[test]
    fn test_ruin_unassigns_lines() {
        let problem = Arc::new(test_utils::small_problem());
        let mut solution = WorkingSolution::new(Arc::clone(&problem));
        for (index, line_id) in [LineIdx::new(0), LineIdx::new(1)].into_iter().enumerate() {
            solution.insert(&Insertion {
                agent_id: AgentIdx::new(0),
                trip_index: 0,
                position: index,
                line_id,
            });
        }
        assert!(!solution.has_unassigned());

        let mut rng = SmallRng::seed_from_u64(7);
        ruin(
            &mut solution,
            RuinContext {
                problem: &problem,
                num_lines_to_remove: 1,
                rng: &mut rng,
            },
        );

        assert_eq!(solution.unassigned_lines().len(), 1);
    }
}
