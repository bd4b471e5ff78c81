use std::sync::Arc;

use jiff::Timestamp;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::Constraint;
use crate::solver::operator_weights::OperatorWeights;
use crate::solver::outcome::SearchStatus;
use crate::solver::recreate::best_insertion;
use crate::solver::recreate::recreate_strategy::RecreateContext;
use crate::solver::ruin::ruin_strategy::RuinContext;
use crate::solver::score::{Score, ScoreAnalysis};
use crate::solver::solution::working_solution::WorkingSolution;
use crate::solver::solver_params::{SolverParams, Termination};

pub(crate) struct AcceptedSolution {
    pub solution: WorkingSolution,
    pub score: Score,
    pub analysis: ScoreAnalysis,
}

impl AcceptedSolution {
    /// Pool rank: full coverage first, then score.
    fn rank(&self) -> (usize, Score) {
        (self.solution.unassigned_lines().len(), self.score)
    }
}

pub(crate) struct SearchResult {
    pub best: AcceptedSolution,
    pub status: SearchStatus,
    pub iterations: usize,
}

struct SearchState {
    pool: Vec<AcceptedSolution>,
    iteration: usize,
    iterations_without_improvement: usize,
    start: Timestamp,
}

/// Seeded ruin-and-recreate search. Construction builds the initial
/// solution; every iteration perturbs a pool member, repairs it, and offers
/// it back to the pool. Single search thread; candidate scoring fans out on
/// the insertion thread pool.
pub(crate) fn run_search(
    problem: Arc<PickingProblem>,
    constraints: &[Constraint],
    params: &SolverParams,
) -> SearchResult {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(params.insertion_threads.number_of_threads())
        .build()
        .expect("Failed to build insertion thread pool");

    let mut state = SearchState {
        pool: Vec::with_capacity(params.max_solutions),
        iteration: 0,
        iterations_without_improvement: 0,
        start: Timestamp::now(),
    };

    // Construction: deterministic sorted best insertion, no blinking.
    let mut initial = WorkingSolution::new(Arc::clone(&problem));
    thread_pool.install(|| {
        best_insertion::recreate(
            &mut initial,
            RecreateContext {
                constraints,
                rng: &mut rng,
                blink_rate: 0.0,
            },
            params.construction_sort,
        );
    });
    let (score, analysis) = initial.compute_solution_score(constraints);
    debug!(%score.soft_score, unassigned = initial.unassigned_lines().len(), "constructed initial solution");
    state.pool.push(AcceptedSolution {
        solution: initial,
        score,
        analysis,
    });

    let mut ruin_weights = OperatorWeights::new(params.ruin_strategies.clone());
    let mut recreate_weights = OperatorWeights::new(params.recreate_strategies.clone());

    let status = loop {
        if let Some(status) = check_terminations(params, &state) {
            break status;
        }
        state.iteration += 1;

        let parent_index = if rng.random_bool(params.select_best_probability) {
            0
        } else {
            rng.random_range(0..state.pool.len())
        };
        let parent_rank = state.pool[parent_index].rank();
        let mut working = state.pool[parent_index].solution.clone();

        let ruin_strategy = ruin_weights.select(&mut rng);
        let recreate_strategy = recreate_weights.select(&mut rng);

        ruin_strategy.ruin_solution(
            &mut working,
            RuinContext {
                problem: &problem,
                num_lines_to_remove: num_lines_to_remove(&problem, params, &mut rng),
                rng: &mut rng,
            },
        );

        thread_pool.install(|| {
            recreate_strategy.recreate_solution(
                &mut working,
                RecreateContext {
                    constraints,
                    rng: &mut rng,
                    blink_rate: params.blink_rate,
                },
            );
        });

        let (score, analysis) = working.compute_solution_score(constraints);
        let candidate = AcceptedSolution {
            solution: working,
            score,
            analysis,
        };
        let rank = candidate.rank();

        let is_best = rank < state.pool[0].rank();
        let improved = rank < parent_rank;
        let accepted = accept_into_pool(&mut state.pool, candidate, params.max_solutions);

        if is_best {
            state.iterations_without_improvement = 0;
            debug!(
                iteration = state.iteration,
                soft_score = state.pool[0].score.soft_score,
                "new best solution"
            );
        } else {
            state.iterations_without_improvement += 1;
        }

        let reward = if is_best {
            params.best_factor
        } else if improved {
            params.improvement_factor
        } else if accepted {
            params.accepted_factor
        } else {
            0.0
        };
        ruin_weights.reward(ruin_strategy, reward);
        recreate_weights.reward(recreate_strategy, reward);

        if state.iteration.is_multiple_of(params.segment_iterations) {
            ruin_weights.update(params.reaction_factor);
            recreate_weights.update(params.reaction_factor);
        }
    };

    debug!(
        iterations = state.iteration,
        ?status,
        unassigned = state.pool[0].solution.unassigned_lines().len(),
        "search finished"
    );

    SearchResult {
        best: state.pool.swap_remove(0),
        status,
        iterations: state.iteration,
    }
}

fn num_lines_to_remove(
    problem: &PickingProblem,
    params: &SolverParams,
    rng: &mut SmallRng,
) -> usize {
    let num_lines = problem.lines().len();
    let minimum = ((params.ruin_minimum_ratio * num_lines as f64).ceil() as usize).max(1);
    let maximum = ((params.ruin_maximum_ratio * num_lines as f64).floor() as usize).max(minimum);

    rng.random_range(minimum..=maximum)
}

/// Inserts the candidate unless it duplicates a pool member or ranks below
/// the full pool's worst. The pool stays sorted best-first.
fn accept_into_pool(
    pool: &mut Vec<AcceptedSolution>,
    candidate: AcceptedSolution,
    max_solutions: usize,
) -> bool {
    let is_duplicate = pool.iter().any(|member| {
        member.score == candidate.score && member.solution.is_identical(&candidate.solution)
    });
    if is_duplicate {
        return false;
    }

    if pool.len() >= max_solutions
        && candidate.rank() >= pool[pool.len() - 1].rank()
    {
        return false;
    }

    let position = pool
        .iter()
        .position(|member| candidate.rank() < member.rank())
        .unwrap_or(pool.len());
    pool.insert(position, candidate);
    pool.truncate(max_solutions);

    true
}

fn check_terminations(params: &SolverParams, state: &SearchState) -> Option<SearchStatus> {
    for termination in &params.terminations {
        let met = match *termination {
            Termination::Iterations(max_iterations) => state.iteration >= max_iterations,
            Termination::Duration(max_duration) => {
                Timestamp::now().duration_since(state.start) > max_duration
            }
            Termination::IterationsWithoutImprovement(max_stale) => {
                state.iterations_without_improvement >= max_stale
            }
        };

        if met {
            return Some(match termination {
                Termination::Iterations(_) => SearchStatus::IterationLimit,
                Termination::Duration(_) => SearchStatus::TimeLimit,
                Termination::IterationsWithoutImprovement(_) => SearchStatus::Converged,
            });
        }
    }

    None
}
