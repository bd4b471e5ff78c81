use std::sync::Arc;

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::problem::order_line::{LineIdx, OrderLine};
use crate::problem::picking_problem::PickingProblem;
use crate::solver::constraints::constraint::{Constraint, default_constraints};
use crate::solver::outcome::{ConstraintClass, SearchStatus, SolveOutcome, UnassignedLine};
use crate::solver::score::{Score, ScoreAnalysis};
use crate::solver::search::run_search;
use crate::solver::solution::working_solution::WorkingSolution;
use crate::solver::solver_params::SolverParams;

#[derive(Error, Debug)]
pub enum OptimizerError {
    /// No assignment covering every line exists within the configured
    /// constraints. `class` names the dominant blocking constraint family.
    #[error("no feasible assignment ({class:?}): {detail}")]
    Infeasible {
        class: ConstraintClass,
        detail: String,
        unassigned: Vec<UnassignedLine>,
    },
}

/// Front door of the assignment stage: validates the instance, runs the
/// search, and refuses to return partial coverage.
pub struct Solver {
    problem: Arc<PickingProblem>,
    constraints: Vec<Constraint>,
    params: SolverParams,
}

impl Solver {
    pub fn new(problem: PickingProblem, params: SolverParams) -> Self {
        Solver {
            problem: Arc::new(problem),
            constraints: default_constraints(),
            params,
        }
    }

    pub fn problem(&self) -> &PickingProblem {
        &self.problem
    }

    pub fn solve(&self) -> Result<SolveOutcome, OptimizerError> {
        self.validate()?;

        if self.problem.lines().is_empty() {
            return Ok(SolveOutcome {
                solution: WorkingSolution::new(Arc::clone(&self.problem)),
                score: Score::zero(),
                analysis: ScoreAnalysis::default(),
                status: SearchStatus::Converged,
                iterations: 0,
            });
        }

        let result = run_search(Arc::clone(&self.problem), &self.constraints, &self.params);

        if result.best.solution.has_unassigned() {
            let unassigned = self.diagnose_unassigned(&result.best.solution);
            let class = dominant_class(&unassigned);
            let detail = format!(
                "{} of {} lines could not be assigned ({})",
                unassigned.len(),
                self.problem.lines().len(),
                unassigned
                    .iter()
                    .map(|line| line.external_id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return Err(OptimizerError::Infeasible {
                class,
                detail,
                unassigned,
            });
        }

        info!(
            status = ?result.status,
            iterations = result.iterations,
            objective = result.best.score.soft_score,
            "assignment solved"
        );

        Ok(SolveOutcome {
            solution: result.best.solution,
            score: result.best.score,
            analysis: result.best.analysis,
            status: result.status,
            iterations: result.iterations,
        })
    }

    /// Rejects instances that can never be covered, before any search runs.
    fn validate(&self) -> Result<(), OptimizerError> {
        let problem = &self.problem;

        for (index, line) in problem.lines().iter().enumerate() {
            let line_id = LineIdx::new(index);

            if problem.compatible_agents(line_id).next().is_none() {
                return Err(self.infeasible_line(line_id, line, ConstraintClass::Capability));
            }

            let fits_some_agent = problem.compatible_agents(line_id).any(|agent_id| {
                line.demand().fits_within(problem.agent(agent_id).capacity())
            });
            if !fits_some_agent {
                return Err(self.infeasible_line(line_id, line, ConstraintClass::Capacity));
            }
        }

        // Aggregate bound: total demand vs the fleet's capacity over its trip
        // budget. Necessary, not sufficient; residual cases surface after the
        // search.
        let total_demand = problem.total_demand();
        let mut fleet_bound = crate::problem::capacity::Capacity::empty();
        for agent in problem.agents() {
            fleet_bound += &agent.capacity().scale(agent.max_trips() as f64);
        }
        if !total_demand.fits_within(&fleet_bound) {
            return Err(OptimizerError::Infeasible {
                class: ConstraintClass::Capacity,
                detail: format!(
                    "total demand exceeds fleet trip capacity ({:?} > {:?})",
                    total_demand, fleet_bound
                ),
                unassigned: Vec::new(),
            });
        }

        Ok(())
    }

    fn infeasible_line(
        &self,
        line_id: LineIdx,
        line: &OrderLine,
        class: ConstraintClass,
    ) -> OptimizerError {
        OptimizerError::Infeasible {
            class,
            detail: format!("line {} cannot be served", line.external_id()),
            unassigned: vec![UnassignedLine {
                line_id,
                external_id: line.external_id().to_string(),
                reason: class,
            }],
        }
    }

    /// Attributes each residual unassigned line to the constraint family
    /// most likely blocking it.
    fn diagnose_unassigned(&self, solution: &WorkingSolution) -> Vec<UnassignedLine> {
        let problem = &self.problem;
        let mut lines: Vec<LineIdx> = solution.unassigned_lines().iter().copied().collect();
        lines.sort_unstable();

        lines
            .into_iter()
            .map(|line_id| {
                let line = problem.line(line_id);
                let reason = self.unassigned_reason(line_id, line);
                UnassignedLine {
                    line_id,
                    external_id: line.external_id().to_string(),
                    reason,
                }
            })
            .collect()
    }

    fn unassigned_reason(&self, line_id: LineIdx, line: &OrderLine) -> ConstraintClass {
        let problem = &self.problem;

        if problem.compatible_agents(line_id).next().is_none() {
            return ConstraintClass::Capability;
        }

        let fits_some_agent = problem
            .compatible_agents(line_id)
            .any(|agent_id| line.demand().fits_within(problem.agent(agent_id).capacity()));
        if !fits_some_agent {
            return ConstraintClass::Capacity;
        }

        if let Some(deadline) = line.time_window().end() {
            let earliest_arrival: Option<Timestamp> = problem
                .compatible_agents(line_id)
                .map(|agent_id| {
                    let agent = problem.agent(agent_id);
                    agent.earliest_start()
                        + problem.travel_time(
                            agent,
                            agent.depot_location_id(),
                            line.location_id(),
                        )
                })
                .min();

            if let Some(earliest_arrival) = earliest_arrival
                && earliest_arrival > deadline
            {
                return ConstraintClass::Deadline;
            }
        }

        ConstraintClass::Shift
    }
}

fn dominant_class(unassigned: &[UnassignedLine]) -> ConstraintClass {
    // Report the most actionable class present, in fixed priority order.
    for class in [
        ConstraintClass::Capability,
        ConstraintClass::Capacity,
        ConstraintClass::Deadline,
        ConstraintClass::Shift,
    ] {
        if unassigned.iter().any(|line| line.reason == class) {
            return class;
        }
    }
    ConstraintClass::Shift
}
