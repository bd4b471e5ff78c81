use jiff::Timestamp;

use crate::problem::agent::Agent;
use crate::problem::order_line::OrderLine;
use crate::problem::picking_problem::PickingProblem;
use crate::solver::score::Score;
use crate::solver::score_level::ScoreLevel;
use crate::solver::solution::agent_route::AgentRoute;
use crate::solver::solution::trip::Trip;
use crate::solver::solution::working_solution::WorkingSolution;

use super::capacity_constraint::CapacityConstraint;
use super::deadline_constraint::DeadlineConstraint;
use super::labor_cost_constraint::LaborCostConstraint;
use super::makespan_constraint::MakespanConstraint;
use super::shift_constraint::ShiftConstraint;
use super::trip_cost_constraint::TripCostConstraint;
use super::trip_duration_constraint::TripDurationConstraint;
use super::working_duration_constraint::WorkingDurationConstraint;

/// Scope of a constraint: the whole solution, one agent's route, one trip,
/// or one stop.
pub trait GlobalConstraint {
    fn score_level(&self) -> ScoreLevel;
    fn compute_score(&self, problem: &PickingProblem, solution: &WorkingSolution) -> Score;
}

pub trait RouteConstraint {
    fn score_level(&self) -> ScoreLevel;
    fn compute_score(&self, problem: &PickingProblem, route: &AgentRoute) -> Score;
}

pub trait TripConstraint {
    fn score_level(&self) -> ScoreLevel;
    fn compute_score(&self, problem: &PickingProblem, agent: &Agent, trip: &Trip) -> Score;
}

pub trait ActivityConstraint {
    fn score_level(&self) -> ScoreLevel;
    fn compute_score(&self, problem: &PickingProblem, line: &OrderLine, arrival: Timestamp)
    -> Score;
}

#[derive(Clone)]
pub enum GlobalConstraintType {
    Makespan(MakespanConstraint),
}

#[derive(Clone)]
pub enum RouteConstraintType {
    Shift(ShiftConstraint),
    WorkingDuration(WorkingDurationConstraint),
    LaborCost(LaborCostConstraint),
    TripCost(TripCostConstraint),
}

#[derive(Clone)]
pub enum TripConstraintType {
    Capacity(CapacityConstraint),
    TripDuration(TripDurationConstraint),
}

#[derive(Clone)]
pub enum ActivityConstraintType {
    Deadline(DeadlineConstraint),
}

#[derive(Clone)]
pub enum Constraint {
    Global(GlobalConstraintType),
    Route(RouteConstraintType),
    Trip(TripConstraintType),
    Activity(ActivityConstraintType),
}

impl Constraint {
    pub fn score_level(&self) -> ScoreLevel {
        match self {
            Constraint::Global(GlobalConstraintType::Makespan(c)) => c.score_level(),
            Constraint::Route(RouteConstraintType::Shift(c)) => c.score_level(),
            Constraint::Route(RouteConstraintType::WorkingDuration(c)) => c.score_level(),
            Constraint::Route(RouteConstraintType::LaborCost(c)) => c.score_level(),
            Constraint::Route(RouteConstraintType::TripCost(c)) => c.score_level(),
            Constraint::Trip(TripConstraintType::Capacity(c)) => c.score_level(),
            Constraint::Trip(TripConstraintType::TripDuration(c)) => c.score_level(),
            Constraint::Activity(ActivityConstraintType::Deadline(c)) => c.score_level(),
        }
    }

    pub fn constraint_name(&self) -> &'static str {
        match self {
            Constraint::Global(GlobalConstraintType::Makespan(_)) => "makespan",
            Constraint::Route(RouteConstraintType::Shift(_)) => "shift",
            Constraint::Route(RouteConstraintType::WorkingDuration(_)) => "working_duration",
            Constraint::Route(RouteConstraintType::LaborCost(_)) => "labor_cost",
            Constraint::Route(RouteConstraintType::TripCost(_)) => "trip_cost",
            Constraint::Trip(TripConstraintType::Capacity(_)) => "capacity",
            Constraint::Trip(TripConstraintType::TripDuration(_)) => "trip_duration",
            Constraint::Activity(ActivityConstraintType::Deadline(_)) => "deadline",
        }
    }

    /// Score over the whole solution.
    pub fn compute_score(&self, problem: &PickingProblem, solution: &WorkingSolution) -> Score {
        match self {
            Constraint::Global(GlobalConstraintType::Makespan(c)) => {
                c.compute_score(problem, solution)
            }
            _ => solution
                .non_empty_routes_iter()
                .fold(Score::zero(), |acc, route| {
                    acc + self.compute_route_score(problem, route)
                }),
        }
    }

    /// Score over a single route. Global constraints score zero here; their
    /// contribution cannot be attributed to one agent.
    pub fn compute_route_score(&self, problem: &PickingProblem, route: &AgentRoute) -> Score {
        match self {
            Constraint::Global(_) => Score::zero(),
            Constraint::Route(constraint) => {
                let route_constraint: &dyn RouteConstraint = match constraint {
                    RouteConstraintType::Shift(c) => c,
                    RouteConstraintType::WorkingDuration(c) => c,
                    RouteConstraintType::LaborCost(c) => c,
                    RouteConstraintType::TripCost(c) => c,
                };
                route_constraint.compute_score(problem, route)
            }
            Constraint::Trip(constraint) => {
                let trip_constraint: &dyn TripConstraint = match constraint {
                    TripConstraintType::Capacity(c) => c,
                    TripConstraintType::TripDuration(c) => c,
                };
                let agent = route.agent(problem);
                route.trips().iter().fold(Score::zero(), |acc, trip| {
                    acc + trip_constraint.compute_score(problem, agent, trip)
                })
            }
            Constraint::Activity(ActivityConstraintType::Deadline(c)) => route
                .trips()
                .iter()
                .fold(Score::zero(), |acc, trip| {
                    acc + trip
                        .stops()
                        .iter()
                        .enumerate()
                        .fold(Score::zero(), |acc, (position, &line_id)| {
                            acc + c.compute_score(
                                problem,
                                problem.line(line_id),
                                trip.arrival(position),
                            )
                        })
                }),
        }
    }
}

/// The constraint set used by the solver: hard feasibility first, then the
/// weighted objective terms.
pub fn default_constraints() -> Vec<Constraint> {
    vec![
        // Hard constraints
        Constraint::Trip(TripConstraintType::Capacity(CapacityConstraint)),
        Constraint::Trip(TripConstraintType::TripDuration(TripDurationConstraint)),
        Constraint::Route(RouteConstraintType::Shift(ShiftConstraint)),
        Constraint::Route(RouteConstraintType::WorkingDuration(
            WorkingDurationConstraint,
        )),
        Constraint::Activity(ActivityConstraintType::Deadline(DeadlineConstraint)),
        // Soft constraints
        Constraint::Route(RouteConstraintType::LaborCost(LaborCostConstraint)),
        Constraint::Route(RouteConstraintType::TripCost(TripCostConstraint)),
        Constraint::Global(GlobalConstraintType::Makespan(MakespanConstraint)),
    ]
}
