use std::fmt::Display;

use rand::rngs::SmallRng;

use crate::solver::constraints::constraint::Constraint;
use crate::solver::solution::working_solution::WorkingSolution;

use super::best_insertion::{self, BestInsertionSort};
use super::regret_insertion;

pub struct RecreateContext<'a> {
    pub constraints: &'a [Constraint],
    pub rng: &'a mut SmallRng,
    /// Probability of skipping a candidate position, letting the search
    /// escape locally-optimal placements.
    pub blink_rate: f64,
}

/// Repair operators: reassign the currently unassigned lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecreateStrategy {
    BestInsertion(BestInsertionSort),
    Regret,
}

impl RecreateStrategy {
    pub fn recreate_solution(&self, solution: &mut WorkingSolution, context: RecreateContext) {
        match self {
            RecreateStrategy::BestInsertion(sort) => {
                best_insertion::recreate(solution, context, *sort)
            }
            RecreateStrategy::Regret => regret_insertion::recreate(solution, context),
        }
    }
}

impl Display for RecreateStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecreateStrategy::BestInsertion(sort) => write!(f, "BestInsertion({sort})"),
            RecreateStrategy::Regret => write!(f, "Regret"),
        }
    }
}
