use jiff::{SignedDuration, Timestamp};
use serde::Serialize;

use porter_grid::Cell;
use porter_optimizer::problem::agent::AgentType;
use porter_optimizer::solver::outcome::SearchStatus;

use crate::collision::ResolutionStatus;
use crate::trace::CellVisit;

/// One serviced order line: where, when, and for how long the agent stands
/// at the pick face.
#[derive(Debug, Clone, Serialize)]
pub struct Stop {
    pub line_id: String,
    pub order_id: String,
    pub product_id: String,
    pub location: String,
    pub cell: Cell,
    pub arrival: Timestamp,
    pub departure: Timestamp,
}

/// Concrete path between two consecutive points of a trip.
#[derive(Debug, Clone, Serialize)]
pub struct RouteLeg {
    pub from: Cell,
    pub to: Cell,
    pub cells: Vec<Cell>,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub start: Timestamp,
    pub end: Timestamp,
    pub stops: Vec<Stop>,
    /// berth -> first stop, stop -> stop, last stop -> berth.
    pub legs: Vec<RouteLeg>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentItinerary {
    pub agent_id: String,
    pub agent_type: AgentType,
    pub berth: Cell,
    /// Deconfliction shift applied to every timestamp of this agent.
    pub start_delay: SignedDuration,
    pub trips: Vec<TripPlan>,
    /// Full cell occupancy after deconfliction, for rendering and audits.
    pub occupancy: Vec<CellVisit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedCollision {
    pub first_agent: String,
    pub second_agent: String,
    pub cell: Cell,
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunDiagnostics {
    /// Final soft objective value (labor + trip + makespan terms).
    pub objective: f64,
    pub optimizer_status: SearchStatus,
    pub optimizer_iterations: usize,
    pub resolver_iterations: usize,
    pub resolution: ResolutionStatus,
    /// Non-empty only when the resolver hit its iteration cap.
    pub unresolved_collisions: Vec<UnresolvedCollision>,
}

/// The terminal artifact of a run: per-agent itineraries plus diagnostics.
/// Plain records and sequences throughout, so external assemblers can
/// serialize and round-trip it.
#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub itineraries: Vec<AgentItinerary>,
    pub diagnostics: RunDiagnostics,
}

impl Schedule {
    pub fn is_collision_free(&self) -> bool {
        self.diagnostics.unresolved_collisions.is_empty()
    }

    pub fn total_stops(&self) -> usize {
        self.itineraries
            .iter()
            .flat_map(|itinerary| itinerary.trips.iter())
            .map(|trip| trip.stops.len())
            .sum()
    }
}
