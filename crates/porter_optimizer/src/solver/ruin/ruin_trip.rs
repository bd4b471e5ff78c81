use rand::Rng;

use crate::solver::ruin::ruin_strategy::RuinContext;
use crate::solver::solution::working_solution::WorkingSolution;

pub fn ruin(solution: &mut WorkingSolution, context: RuinContext) {
    let Some(agent_id) = solution.random_non_empty_route(context.rng) else {
        return;
    };

    let num_trips = solution.route(agent_id).trips().len();
    let trip_index = context.rng.random_range(0..num_trips);
    solution.remove_trip(agent_id, trip_index);
}
