use jiff::{SignedDuration, Timestamp};

use crate::problem::agent::{Agent, AgentIdx};
use crate::problem::agent_profile::AgentProfile;
use crate::problem::capacity::Capacity;
use crate::problem::fleet::Fleet;
use crate::problem::location::{Location, LocationIdx};
use crate::problem::order_line::{LineIdx, OrderLine};
use crate::problem::travel_cost_matrix::Distance;

/// Soft-objective weights. Labor cost comes from each agent's hourly rate;
/// these scale the secondary terms.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveWeights {
    /// Fixed cost charged per opened trip.
    pub trip_cost: f64,
    /// Cost per hour of makespan (time until the last agent finishes).
    pub makespan_per_hour: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        ObjectiveWeights {
            trip_cost: 5.0,
            makespan_per_hour: 25.0,
        }
    }
}

/// One immutable picking instance: floor locations, fleet, order backlog,
/// and the travel matrices behind each agent speed class.
pub struct PickingProblem {
    locations: Vec<Location>,
    fleet: Fleet,
    profiles: Vec<AgentProfile>,
    lines: Vec<OrderLine>,
    weights: ObjectiveWeights,

    has_time_windows: bool,
    has_capacity: bool,

    horizon_start: Timestamp,
    precomputed_compatibilities: Vec<bool>,
    precomputed_nearest_lines: Vec<Vec<LineIdx>>,
    precomputed_depot_distances: Vec<Distance>,
}

impl PickingProblem {
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, location_id: LocationIdx) -> &Location {
        &self.locations[location_id]
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn agent(&self, agent_id: AgentIdx) -> &Agent {
        self.fleet.agent(agent_id)
    }

    pub fn agents(&self) -> &[Agent] {
        self.fleet.agents()
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn line(&self, line_id: LineIdx) -> &OrderLine {
        &self.lines[line_id]
    }

    pub fn weights(&self) -> &ObjectiveWeights {
        &self.weights
    }

    pub fn has_time_windows(&self) -> bool {
        self.has_time_windows
    }

    pub fn has_capacity(&self) -> bool {
        self.has_capacity
    }

    /// Earliest shift start across the fleet; the zero point for makespan.
    pub fn horizon_start(&self) -> Timestamp {
        self.horizon_start
    }

    pub fn profile(&self, agent: &Agent) -> &AgentProfile {
        &self.profiles[agent.profile_id()]
    }

    pub fn travel_time(&self, agent: &Agent, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        self.profile(agent).travel_time(from, to)
    }

    pub fn travel_distance(&self, agent: &Agent, from: LocationIdx, to: LocationIdx) -> Distance {
        self.profile(agent).travel_distance(from, to)
    }

    pub fn is_agent_compatible(&self, agent_id: AgentIdx, line_id: LineIdx) -> bool {
        self.precomputed_compatibilities[agent_id.get() * self.lines.len() + line_id.get()]
    }

    pub fn compatible_agents(&self, line_id: LineIdx) -> impl Iterator<Item = AgentIdx> + '_ {
        (0..self.fleet.len())
            .map(AgentIdx::new)
            .filter(move |&agent_id| self.is_agent_compatible(agent_id, line_id))
    }

    /// Other lines ordered by travel distance from `line_id`'s location,
    /// nearest first. Ties break on line index.
    pub fn nearest_lines(&self, line_id: LineIdx) -> &[LineIdx] {
        &self.precomputed_nearest_lines[line_id.get()]
    }

    /// Mean travel distance from the fleet's depot berths to a location.
    pub fn average_distance_from_depot(&self, location_id: LocationIdx) -> Distance {
        self.precomputed_depot_distances[location_id.get()]
    }

    pub fn random_line<R>(&self, rng: &mut R) -> LineIdx
    where
        R: rand::Rng,
    {
        rng.random_range(0..self.lines.len()).into()
    }

    pub fn total_demand(&self) -> Capacity {
        let mut total = Capacity::empty();
        for line in &self.lines {
            total += line.demand();
        }
        total
    }

    fn precompute_compatibilities(fleet: &Fleet, lines: &[OrderLine]) -> Vec<bool> {
        let mut compatibilities = vec![true; fleet.len() * lines.len()];

        for (agent_index, agent) in fleet.agents().iter().enumerate() {
            for (line_index, line) in lines.iter().enumerate() {
                if !agent.is_compatible_with(line) {
                    compatibilities[agent_index * lines.len() + line_index] = false;
                }
            }
        }

        compatibilities
    }

    fn precompute_depot_distances(
        fleet: &Fleet,
        profiles: &[AgentProfile],
        locations: &[Location],
    ) -> Vec<Distance> {
        let num_agents = fleet.len().max(1);

        (0..locations.len())
            .map(|location_index| {
                let location_id = LocationIdx::new(location_index);
                fleet
                    .agents()
                    .iter()
                    .map(|agent| {
                        profiles[agent.profile_id()]
                            .travel_distance(agent.depot_location_id(), location_id)
                    })
                    .sum::<Distance>()
                    / num_agents as Distance
            })
            .collect()
    }

    fn precompute_nearest_lines(
        profiles: &[AgentProfile],
        lines: &[OrderLine],
    ) -> Vec<Vec<LineIdx>> {
        let reference = &profiles[0];

        lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let mut others: Vec<LineIdx> = (0..lines.len())
                    .filter(|&other| other != index)
                    .map(LineIdx::new)
                    .collect();

                others.sort_unstable_by(|&a, &b| {
                    let distance_a =
                        reference.travel_distance(line.location_id(), lines[a].location_id());
                    let distance_b =
                        reference.travel_distance(line.location_id(), lines[b].location_id());
                    distance_a.total_cmp(&distance_b).then(a.cmp(&b))
                });

                others
            })
            .collect()
    }
}

#[derive(Default)]
pub struct PickingProblemBuilder {
    locations: Option<Vec<Location>>,
    fleet: Option<Fleet>,
    profiles: Option<Vec<AgentProfile>>,
    lines: Option<Vec<OrderLine>>,
    weights: Option<ObjectiveWeights>,
}

impl PickingProblemBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut PickingProblemBuilder {
        self.locations = Some(locations);
        self
    }

    pub fn set_fleet(&mut self, fleet: Fleet) -> &mut PickingProblemBuilder {
        self.fleet = Some(fleet);
        self
    }

    pub fn set_profiles(&mut self, profiles: Vec<AgentProfile>) -> &mut PickingProblemBuilder {
        self.profiles = Some(profiles);
        self
    }

    pub fn set_lines(&mut self, lines: Vec<OrderLine>) -> &mut PickingProblemBuilder {
        self.lines = Some(lines);
        self
    }

    pub fn set_weights(&mut self, weights: ObjectiveWeights) -> &mut PickingProblemBuilder {
        self.weights = Some(weights);
        self
    }

    pub fn build(self) -> PickingProblem {
        let locations = self.locations.expect("Expected list of locations");
        let fleet = self.fleet.expect("Expected fleet");
        let profiles = self.profiles.expect("Expected list of agent profiles");
        let lines = self.lines.unwrap_or_default();

        assert!(!profiles.is_empty(), "At least one agent profile is required");

        for line in &lines {
            assert!(
                line.location_id().get() < locations.len(),
                "Line location_id must be within the range of locations"
            );
        }

        for agent in fleet.agents() {
            assert!(
                agent.profile_id().get() < profiles.len(),
                "Agent profile ID out of bounds"
            );
            assert!(
                agent.depot_location_id().get() < locations.len(),
                "Agent depot location out of bounds"
            );
        }

        let precomputed_compatibilities =
            PickingProblem::precompute_compatibilities(&fleet, &lines);
        let precomputed_nearest_lines =
            PickingProblem::precompute_nearest_lines(&profiles, &lines);
        let precomputed_depot_distances =
            PickingProblem::precompute_depot_distances(&fleet, &profiles, &locations);

        let horizon_start = fleet
            .agents()
            .iter()
            .map(Agent::earliest_start)
            .min()
            .unwrap_or(Timestamp::UNIX_EPOCH);

        PickingProblem {
            has_time_windows: lines.iter().any(|line| line.has_deadline()),
            has_capacity: lines.iter().any(|line| !line.demand().is_empty()),
            horizon_start,
            locations,
            fleet,
            profiles,
            lines,
            weights: self.weights.unwrap_or_default(),
            precomputed_compatibilities,
            precomputed_nearest_lines,
            precomputed_depot_distances,
        }
    }
}
