use jiff::SignedDuration;

use crate::solver::recreate::best_insertion::BestInsertionSort;
use crate::solver::recreate::recreate_strategy::RecreateStrategy;
use crate::solver::ruin::ruin_strategy::RuinStrategy;

#[derive(Clone, Debug)]
pub struct SolverParams {
    /// The search stops at the first condition met.
    pub terminations: Vec<Termination>,
    /// Every random decision in the search derives from this seed; identical
    /// (problem, params) runs produce identical solutions.
    pub seed: u64,
    /// Thread count for scoring insertion candidates.
    pub insertion_threads: Threads,

    /// Size of the accepted-solution pool.
    pub max_solutions: usize,
    /// Probability of selecting the pool's best (vs a random member) as the
    /// iteration's starting point.
    pub select_best_probability: f64,

    /// Candidate-skip probability during recreate.
    pub blink_rate: f64,
    /// Share of lines unassigned by a ruin step.
    pub ruin_minimum_ratio: f64,
    pub ruin_maximum_ratio: f64,

    /// Operator-weight bookkeeping: rewards per outcome, blended into the
    /// selection weights every `segment_iterations`.
    pub segment_iterations: usize,
    pub reaction_factor: f64,
    pub best_factor: f64,
    pub improvement_factor: f64,
    pub accepted_factor: f64,

    pub construction_sort: BestInsertionSort,
    pub ruin_strategies: Vec<RuinStrategy>,
    pub recreate_strategies: Vec<RecreateStrategy>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Duration(SignedDuration),
    Iterations(usize),
    IterationsWithoutImprovement(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => *num,
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            terminations: vec![
                Termination::IterationsWithoutImprovement(400),
                Termination::Iterations(5000),
                Termination::Duration(SignedDuration::from_secs(45)),
            ],
            seed: 12345,
            insertion_threads: Threads::Multi(4),

            max_solutions: 5,
            select_best_probability: 0.7,

            blink_rate: 0.01,
            ruin_minimum_ratio: 0.1,
            ruin_maximum_ratio: 0.4,

            segment_iterations: 50,
            reaction_factor: 0.3,
            best_factor: 33.0,
            improvement_factor: 9.0,
            accepted_factor: 3.0,

            construction_sort: BestInsertionSort::Deadline,
            ruin_strategies: vec![RuinStrategy::Random, RuinStrategy::Trip, RuinStrategy::Radial],
            recreate_strategies: vec![
                RecreateStrategy::BestInsertion(BestInsertionSort::Random),
                RecreateStrategy::BestInsertion(BestInsertionSort::Demand),
                RecreateStrategy::BestInsertion(BestInsertionSort::Deadline),
                RecreateStrategy::BestInsertion(BestInsertionSort::Far),
                RecreateStrategy::BestInsertion(BestInsertionSort::Close),
                RecreateStrategy::Regret,
            ],
        }
    }
}
