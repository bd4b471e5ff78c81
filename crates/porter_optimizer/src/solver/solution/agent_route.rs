use jiff::{SignedDuration, Timestamp};

use crate::problem::agent::{Agent, AgentIdx};
use crate::problem::capacity::Capacity;
use crate::problem::order_line::LineIdx;
use crate::problem::picking_problem::PickingProblem;
use crate::solver::solution::trip::Trip;

/// All trips of one agent, in execution order. Mutations leave the timing
/// stale; callers must `resync` before reading arrivals or trip bounds.
#[derive(Debug, Clone)]
pub struct AgentRoute {
    pub(super) agent_id: AgentIdx,
    pub(super) trips: Vec<Trip>,
}

impl AgentRoute {
    pub fn empty(agent_id: AgentIdx) -> Self {
        AgentRoute {
            agent_id,
            trips: Vec::new(),
        }
    }

    pub fn agent_id(&self) -> AgentIdx {
        self.agent_id
    }

    pub fn agent<'a>(&self, problem: &'a PickingProblem) -> &'a Agent {
        problem.agent(self.agent_id)
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, trip_index: usize) -> &Trip {
        &self.trips[trip_index]
    }

    pub fn num_stops(&self) -> usize {
        self.trips.iter().map(Trip::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.iter().all(Trip::is_empty)
    }

    /// Departure from the berth for the first trip.
    pub fn start(&self) -> Option<Timestamp> {
        self.trips.first().map(Trip::start)
    }

    /// End of the last trip's unload dwell.
    pub fn end(&self) -> Option<Timestamp> {
        self.trips.last().map(Trip::end)
    }

    pub fn working_duration(&self) -> SignedDuration {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => end.duration_since(start),
            _ => SignedDuration::ZERO,
        }
    }

    pub fn lines_iter(&self) -> impl Iterator<Item = LineIdx> + '_ {
        self.trips.iter().flat_map(|trip| trip.stops.iter().copied())
    }

    pub fn position_of(&self, line_id: LineIdx) -> Option<(usize, usize)> {
        for (trip_index, trip) in self.trips.iter().enumerate() {
            if let Some(position) = trip.stops.iter().position(|&stop| stop == line_id) {
                return Some((trip_index, position));
            }
        }
        None
    }

    pub fn contains_line(&self, line_id: LineIdx) -> bool {
        self.position_of(line_id).is_some()
    }

    /// Inserts a stop. `trip_index == trips.len()` opens a new trip at the
    /// end of the route.
    pub fn insert(&mut self, trip_index: usize, position: usize, line_id: LineIdx) {
        if trip_index == self.trips.len() {
            self.trips.push(Trip::empty());
        }
        self.trips[trip_index].stops.insert(position, line_id);
    }

    /// Removes a stop; a trip emptied by the removal is dropped.
    pub fn remove_line(&mut self, line_id: LineIdx) -> bool {
        if let Some((trip_index, position)) = self.position_of(line_id) {
            self.trips[trip_index].stops.remove(position);
            if self.trips[trip_index].stops.is_empty() {
                self.trips.remove(trip_index);
            }
            true
        } else {
            false
        }
    }

    /// Removes a whole trip, returning its stops.
    pub fn remove_trip(&mut self, trip_index: usize) -> Vec<LineIdx> {
        self.trips.remove(trip_index).stops
    }

    /// Recomputes every derived field from scratch: trip chaining from the
    /// agent's shift start, per-stop arrival/departure (travel + handling),
    /// berth return and unload dwell closing each trip, and per-trip loads.
    pub fn resync(&mut self, problem: &PickingProblem) {
        self.trips.retain(|trip| !trip.stops.is_empty());

        let agent = problem.agent(self.agent_id);
        let depot = agent.depot_location_id();
        let mut cursor = agent.earliest_start();

        for trip in &mut self.trips {
            trip.start = cursor;
            trip.arrivals.clear();
            trip.departures.clear();

            let mut time = cursor;
            let mut load = Capacity::empty();
            let mut previous = depot;

            for &line_id in &trip.stops {
                let line = problem.line(line_id);
                time += problem.travel_time(agent, previous, line.location_id());
                trip.arrivals.push(time);
                time += line.handling_duration();
                trip.departures.push(time);
                load += line.demand();
                previous = line.location_id();
            }

            time += problem.travel_time(agent, previous, depot);
            time += agent.depot_duration();

            trip.end = time;
            trip.load = load;
            cursor = time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_resync_timing_chain() {
        // Two locations 10 s apart at profile speed, handling 60 s each.
        let problem = test_utils::small_problem();
        let mut route = AgentRoute::empty(AgentIdx::new(0));

        route.insert(0, 0, LineIdx::new(0));
        route.insert(0, 1, LineIdx::new(1));
        route.resync(&problem);

        let trip = route.trip(0);
        let start = problem.agent(AgentIdx::new(0)).earliest_start();
        assert_eq!(trip.start(), start);
        assert_eq!(trip.arrival(0), start + SignedDuration::from_secs(10));
        assert_eq!(trip.departure(0), start + SignedDuration::from_secs(70));
        // rack-a to rack-b travel keeps the chain strictly increasing
        assert!(trip.arrival(1) > trip.departure(0));
        assert!(trip.end() > trip.arrival(1));
    }

    #[test]
    fn test_trips_chain_sequentially() {
        let problem = test_utils::small_problem();
        let mut route = AgentRoute::empty(AgentIdx::new(0));

        route.insert(0, 0, LineIdx::new(0));
        route.insert(1, 0, LineIdx::new(1));
        route.resync(&problem);

        assert_eq!(route.trips().len(), 2);
        assert_eq!(route.trip(1).start(), route.trip(0).end());
        assert!(route.trip(0).end() > route.trip(0).start());
    }

    #[test]
    fn test_remove_last_stop_drops_trip() {
        let problem = test_utils::small_problem();
        let mut route = AgentRoute::empty(AgentIdx::new(0));

        route.insert(0, 0, LineIdx::new(0));
        route.resync(&problem);
        assert!(!route.is_empty());

        assert!(route.remove_line(LineIdx::new(0)));
        route.resync(&problem);
        assert!(route.is_empty());
        assert_eq!(route.trips().len(), 0);
    }

    #[test]
    fn test_resync_is_idempotent() {
        let problem = test_utils::small_problem();
        let mut route = AgentRoute::empty(AgentIdx::new(0));
        route.insert(0, 0, LineIdx::new(0));
        route.insert(0, 1, LineIdx::new(1));

        route.resync(&problem);
        let first = (route.trip(0).arrivals.clone(), route.trip(0).end());
        route.resync(&problem);
        assert_eq!(first, (route.trip(0).arrivals.clone(), route.trip(0).end()));
    }
}
