use std::fmt::Display;

use rand::rngs::SmallRng;

use crate::problem::picking_problem::PickingProblem;
use crate::solver::solution::working_solution::WorkingSolution;

use super::{ruin_radial, ruin_random, ruin_trip};

pub struct RuinContext<'a> {
    pub problem: &'a PickingProblem,
    pub num_lines_to_remove: usize,
    pub rng: &'a mut SmallRng,
}

/// Destruction operators: unassign part of the solution so recreate can
/// rebuild it differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuinStrategy {
    /// Unassign uniformly random lines.
    Random,
    /// Unassign one whole trip of a random agent.
    Trip,
    /// Unassign a random line and its nearest neighbors.
    Radial,
}

impl RuinStrategy {
    pub fn ruin_solution(&self, solution: &mut WorkingSolution, context: RuinContext) {
        match self {
            RuinStrategy::Random => ruin_random::ruin(solution, context),
            RuinStrategy::Trip => ruin_trip::ruin(solution, context),
            RuinStrategy::Radial => ruin_radial::ruin(solution, context),
        }
    }
}

impl Display for RuinStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuinStrategy::Random => write!(f, "Random"),
            RuinStrategy::Trip => write!(f, "Trip"),
            RuinStrategy::Radial => write!(f, "Radial"),
        }
    }
}
