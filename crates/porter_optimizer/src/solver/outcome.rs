use serde::Serialize;

use crate::problem::order_line::LineIdx;
use crate::solver::score::{Score, ScoreAnalysis};
use crate::solver::solution::working_solution::WorkingSolution;

/// How the search stopped. Only `Converged` means the no-improvement
/// criterion was met; the limit variants return the best feasible solution
/// found so far, which callers must not treat as settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Converged,
    IterationLimit,
    TimeLimit,
}

/// Constraint family blocking an assignment, reported with infeasibility so
/// operators know what to relax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintClass {
    Capability,
    Capacity,
    Deadline,
    Shift,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnassignedLine {
    pub line_id: LineIdx,
    pub external_id: String,
    pub reason: ConstraintClass,
}

pub struct SolveOutcome {
    pub solution: WorkingSolution,
    pub score: Score,
    pub analysis: ScoreAnalysis,
    pub status: SearchStatus,
    pub iterations: usize,
}
