use std::sync::Arc;

use fxhash::FxHashMap;
use jiff::{SignedDuration, Timestamp};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use porter_grid::{Cell, GridPath};
use porter_matrix::{DistanceService, GridMatrixProvider, RoutingError};
use porter_optimizer::problem::agent::{AgentBuilder, AgentIdx};
use porter_optimizer::problem::agent_profile::AgentProfile;
use porter_optimizer::problem::fleet::Fleet;
use porter_optimizer::problem::location::Location;
use porter_optimizer::problem::order_line::{OrderLine, OrderLineBuilder};
use porter_optimizer::problem::picking_problem::{PickingProblem, PickingProblemBuilder};
use porter_optimizer::problem::skill::Skill;
use porter_optimizer::problem::time_window::TimeWindow;
use porter_optimizer::problem::travel_cost_matrix::TravelMatrices;
use porter_optimizer::solver::outcome::{ConstraintClass, SearchStatus, SolveOutcome};
use porter_optimizer::solver::solver::{OptimizerError, Solver};

use crate::catalog::{PickLine, expand_orders};
use crate::collision::{ResolutionReport, ResolutionStatus, resolve};
use crate::config::PorterConfig;
use crate::error::PorterError;
use crate::request::PlanRequest;
use crate::schedule::{
    AgentItinerary, RouteLeg, RunDiagnostics, Schedule, Stop, TripPlan, UnresolvedCollision,
};
use crate::trace::{AgentTrace, TraceLeg, stamp};

/// Pipeline state machine. A run moves strictly forward; a caller wanting a
/// different assignment restarts the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStage {
    Planning,
    Routing,
    Deconflicting,
    Resolved,
    PartiallyResolved,
}

fn check_budget(deadline: Option<Timestamp>, stage: RunStage) -> Result<(), PorterError> {
    if let Some(deadline) = deadline
        && Timestamp::now() > deadline
    {
        return Err(PorterError::PipelineTimeout { stage });
    }
    Ok(())
}

/// One concrete movement between two points of a trip, with the dwell at its
/// destination.
struct LegPlan {
    from: Cell,
    to: Cell,
    path: Arc<GridPath>,
    dwell: SignedDuration,
}

/// Runs the full pipeline: Planning (assignment) -> Routing (concrete paths)
/// -> Deconflicting (collision resolution) -> Schedule. Synchronous; returns
/// the terminal artifact or an explicit failure, never a partial schedule.
pub fn run(request: &PlanRequest, config: &PorterConfig) -> Result<Schedule, PorterError> {
    let deadline = config
        .pipeline_budget
        .map(|budget| Timestamp::now() + budget);

    // --- Planning ---
    info!(stage = ?RunStage::Planning, orders = request.orders.len(), agents = request.agents.len(), "starting run");

    let pick_lines = expand_orders(&request.products, &request.orders)?;

    if request.agents.is_empty() {
        if pick_lines.is_empty() {
            return Ok(empty_schedule());
        }
        return Err(PorterError::AssignmentInfeasible(
            OptimizerError::Infeasible {
                class: ConstraintClass::Capability,
                detail: String::from("the agent roster is empty"),
                unassigned: Vec::new(),
            },
        ));
    }

    let (locations, location_index, berth_of_agent) = build_locations(request, &pick_lines)?;

    let cells: Vec<Cell> = locations.iter().map(Location::cell).collect();
    let provider = GridMatrixProvider::new(&request.grid, config.connectivity);
    let raw = provider.matrices_for(&cells)?;

    let problem = build_problem(
        request,
        config,
        locations,
        &location_index,
        &berth_of_agent,
        &pick_lines,
        &raw,
    );

    check_budget(deadline, RunStage::Planning)?;

    let solver = Solver::new(problem, config.solver.clone());
    let outcome = solver.solve()?;

    check_budget(deadline, RunStage::Planning)?;

    // --- Routing ---
    info!(stage = ?RunStage::Routing, "assignment complete, computing routes");

    let service = DistanceService::new(Arc::new(request.grid.clone()), config.connectivity);
    let leg_plans = build_leg_plans(&outcome, &service)?;

    check_budget(deadline, RunStage::Routing)?;

    // --- Deconflicting ---
    info!(stage = ?RunStage::Deconflicting, "routes computed, checking collisions");

    let problem = outcome.solution.problem();
    let cell_size = request.grid.cell_size_meters();
    let flat_legs: Vec<Vec<TraceLeg>> = leg_plans
        .iter()
        .map(|trips| {
            trips
                .iter()
                .flatten()
                .map(|leg| TraceLeg {
                    path: Arc::clone(&leg.path),
                    dwell: leg.dwell,
                })
                .collect()
        })
        .collect();

    let agent_speed = |agent_index: usize| {
        let agent = problem.agent(AgentIdx::new(agent_index));
        problem.profile(agent).speed_mps()
    };
    let agent_start =
        |agent_index: usize| problem.agent(AgentIdx::new(agent_index)).earliest_start();

    let initial_traces: Vec<AgentTrace> = (0..request.agents.len())
        .map(|index| {
            stamp(
                index,
                &flat_legs[index],
                agent_speed(index),
                cell_size,
                agent_start(index),
            )
        })
        .collect();

    let (traces, report) = resolve(
        initial_traces,
        |agent_index, delay| {
            stamp(
                agent_index,
                &flat_legs[agent_index],
                agent_speed(agent_index),
                cell_size,
                agent_start(agent_index) + delay,
            )
        },
        &config.resolver,
        deadline,
    )?;

    let stage = match report.status {
        ResolutionStatus::Resolved => RunStage::Resolved,
        ResolutionStatus::PartiallyResolved => RunStage::PartiallyResolved,
    };
    info!(?stage, resolver_iterations = report.iterations, "run finished");

    Ok(assemble(request, &outcome, &leg_plans, &traces, &report, cell_size))
}

fn empty_schedule() -> Schedule {
    Schedule {
        itineraries: Vec::new(),
        diagnostics: RunDiagnostics {
            objective: 0.0,
            optimizer_status: SearchStatus::Converged,
            optimizer_iterations: 0,
            resolver_iterations: 0,
            resolution: ResolutionStatus::Resolved,
            unresolved_collisions: Vec::new(),
        },
    }
}

/// Resolves every named location the run touches: one berth per agent
/// (first-free from the request's berth list, staging as the fallback), then
/// every pick face. Deduplicated by name, in deterministic order.
fn build_locations(
    request: &PlanRequest,
    pick_lines: &[PickLine],
) -> Result<(Vec<Location>, FxHashMap<String, usize>, Vec<usize>), PorterError> {
    let mut locations: Vec<Location> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    let mut add = |name: &str| -> Result<usize, PorterError> {
        if let Some(&existing) = index.get(name) {
            return Ok(existing);
        }
        let cell = request.grid.resolve(name).map_err(RoutingError::from)?;
        let id = locations.len();
        locations.push(Location::new(name, cell));
        index.insert(name.to_string(), id);
        Ok(id)
    };

    let mut berth_of_agent = Vec::with_capacity(request.agents.len());
    for agent_index in 0..request.agents.len() {
        let berth_name = request
            .depot_berths
            .get(agent_index)
            .map(String::as_str)
            .unwrap_or(request.staging_location.as_str());
        berth_of_agent.push(add(berth_name)?);
    }

    for line in pick_lines {
        add(&line.location_name)?;
    }

    Ok((locations, index, berth_of_agent))
}

fn build_problem(
    request: &PlanRequest,
    config: &PorterConfig,
    locations: Vec<Location>,
    location_index: &FxHashMap<String, usize>,
    berth_of_agent: &[usize],
    pick_lines: &[PickLine],
    raw: &porter_matrix::RawTravelMatrices,
) -> PickingProblem {
    // Per-type overrides replace roster speed/cost before anything is built.
    let effective: Vec<(f64, f64)> = request
        .agents
        .iter()
        .map(|spec| {
            let type_override = config
                .agent_overrides
                .iter()
                .find(|entry| entry.agent_type == spec.agent_type);
            (
                type_override
                    .and_then(|entry| entry.speed_mps)
                    .unwrap_or(spec.speed_mps),
                type_override
                    .and_then(|entry| entry.hourly_cost)
                    .unwrap_or(spec.hourly_cost),
            )
        })
        .collect();

    // One profile per distinct speed; all profiles share the distance matrix.
    let mut speeds: Vec<f64> = Vec::new();
    let mut profile_of_agent: Vec<usize> = Vec::new();
    for (agent_index, _) in request.agents.iter().enumerate() {
        let speed = effective[agent_index].0;
        let profile = match speeds.iter().position(|&existing| existing == speed) {
            Some(existing) => existing,
            None => {
                speeds.push(speed);
                speeds.len() - 1
            }
        };
        profile_of_agent.push(profile);
    }

    let base = TravelMatrices::from_raw(raw, speeds[0]);
    let profiles: Vec<AgentProfile> = speeds
        .iter()
        .enumerate()
        .map(|(profile_index, &speed)| {
            if profile_index == 0 {
                AgentProfile::new(speed, base.clone())
            } else {
                AgentProfile::new(speed, base.with_speed(speed))
            }
        })
        .collect();

    let agents = request
        .agents
        .iter()
        .enumerate()
        .map(|(agent_index, spec)| {
            let mut builder = AgentBuilder::default();
            builder
                .set_agent_id(&spec.id)
                .set_agent_type(spec.agent_type)
                .set_profile_id(profile_of_agent[agent_index])
                .set_capacity(
                    porter_optimizer::problem::capacity::Capacity::weight_and_volume(
                        spec.capacity_weight_kg,
                        spec.capacity_volume_dm3,
                    ),
                )
                .set_hourly_cost(effective[agent_index].1)
                .set_depot_location_id(berth_of_agent[agent_index])
                .set_depot_duration(config.depot_dwell)
                .set_skills(spec.skills.iter().map(Skill::new).collect());
            if let Some(shift) = &spec.shift {
                builder.set_shift(shift.clone());
            }
            if let Some(max_trips) = spec.max_trips {
                builder.set_max_trips(max_trips);
            }
            builder.build()
        })
        .collect();

    let lines: Vec<OrderLine> = pick_lines
        .iter()
        .map(|line| {
            let mut builder = OrderLineBuilder::default();
            builder
                .set_line_id(&line.external_id)
                .set_order_id(&line.order_id)
                .set_product_id(&line.product_id)
                .set_location_id(location_index[&line.location_name])
                .set_quantity(line.quantity)
                .set_demand(line.demand.clone())
                .set_handling_duration(line.handling_duration)
                .set_required_skills(line.required_skills.clone());
            if let Some(deadline) = line.deadline {
                builder.set_time_window(TimeWindow::deadline(deadline));
            }
            builder.build()
        })
        .collect();

    let mut builder = PickingProblemBuilder::default();
    builder
        .set_locations(locations)
        .set_fleet(Fleet::new(agents))
        .set_profiles(profiles)
        .set_lines(lines);
    builder.build()
}

/// Computes the concrete path of every leg of every (agent, trip). Distinct
/// legs are routed in parallel; the distance service caches shared pairs.
fn build_leg_plans(
    outcome: &SolveOutcome,
    service: &DistanceService,
) -> Result<Vec<Vec<Vec<LegPlan>>>, PorterError> {
    let problem = outcome.solution.problem();

    // Warm the path cache in parallel over the distinct cell pairs.
    let mut pairs: Vec<(Cell, Cell)> = Vec::new();
    for route in outcome.solution.routes() {
        let agent = route.agent(problem);
        let berth = problem.location(agent.depot_location_id()).cell();
        for trip in route.trips() {
            let mut previous = berth;
            for &line_id in trip.stops() {
                let cell = problem.location(problem.line(line_id).location_id()).cell();
                pairs.push((previous, cell));
                previous = cell;
            }
            pairs.push((previous, berth));
        }
    }
    pairs.sort_unstable();
    pairs.dedup();
    pairs
        .par_iter()
        .map(|&(from, to)| service.route_between(from, to).map(|_| ()))
        .collect::<Result<Vec<()>, RoutingError>>()?;

    // Assemble per-agent, per-trip leg plans from the warmed cache.
    let mut leg_plans = Vec::with_capacity(outcome.solution.routes().len());
    for route in outcome.solution.routes() {
        let agent = route.agent(problem);
        let berth = problem.location(agent.depot_location_id()).cell();

        let mut trips = Vec::with_capacity(route.trips().len());
        for trip in route.trips() {
            let mut legs = Vec::with_capacity(trip.len() + 1);
            let mut previous = berth;

            for &line_id in trip.stops() {
                let line = problem.line(line_id);
                let cell = problem.location(line.location_id()).cell();
                legs.push(LegPlan {
                    from: previous,
                    to: cell,
                    path: service.route_between(previous, cell)?,
                    dwell: line.handling_duration(),
                });
                previous = cell;
            }

            legs.push(LegPlan {
                from: previous,
                to: berth,
                path: service.route_between(previous, berth)?,
                dwell: agent.depot_duration(),
            });
            trips.push(legs);
        }
        leg_plans.push(trips);
    }

    Ok(leg_plans)
}

fn assemble(
    request: &PlanRequest,
    outcome: &SolveOutcome,
    leg_plans: &[Vec<Vec<LegPlan>>],
    traces: &[AgentTrace],
    report: &ResolutionReport,
    cell_size: f64,
) -> Schedule {
    let problem = outcome.solution.problem();

    let itineraries = request
        .agents
        .iter()
        .enumerate()
        .map(|(agent_index, spec)| {
            let route = outcome.solution.route(AgentIdx::new(agent_index));
            let agent = route.agent(problem);
            let delay = report.delays[agent_index];

            let trips = route
                .trips()
                .iter()
                .zip(&leg_plans[agent_index])
                .map(|(trip, legs)| TripPlan {
                    start: trip.start() + delay,
                    end: trip.end() + delay,
                    stops: trip
                        .stops()
                        .iter()
                        .enumerate()
                        .map(|(position, &line_id)| {
                            let line = problem.line(line_id);
                            let location = problem.location(line.location_id());
                            Stop {
                                line_id: line.external_id().to_string(),
                                order_id: line.order_id().to_string(),
                                product_id: line.product_id().to_string(),
                                location: location.name().to_string(),
                                cell: location.cell(),
                                arrival: trip.arrival(position) + delay,
                                departure: trip.departure(position) + delay,
                            }
                        })
                        .collect(),
                    legs: legs
                        .iter()
                        .map(|leg| RouteLeg {
                            from: leg.from,
                            to: leg.to,
                            cells: leg.path.cells.clone(),
                            distance_meters: leg.path.cost as f64 * cell_size,
                        })
                        .collect(),
                })
                .collect();

            AgentItinerary {
                agent_id: spec.id.clone(),
                agent_type: spec.agent_type,
                berth: problem.location(agent.depot_location_id()).cell(),
                start_delay: delay,
                trips,
                occupancy: traces[agent_index].visits.clone(),
            }
        })
        .collect();

    let unresolved_collisions = report
        .unresolved
        .iter()
        .map(|collision| UnresolvedCollision {
            first_agent: request.agents[collision.first].id.clone(),
            second_agent: request.agents[collision.second].id.clone(),
            cell: collision.cell,
            start: collision.start,
            end: collision.end,
        })
        .collect();

    Schedule {
        itineraries,
        diagnostics: RunDiagnostics {
            objective: outcome.score.soft_score,
            optimizer_status: outcome.status,
            optimizer_iterations: outcome.iterations,
            resolver_iterations: report.iterations,
            resolution: report.status,
            unresolved_collisions,
        },
    }
}
