use fxhash::FxHashSet;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;
use crate::problem::agent_profile::AgentProfileIdx;
use crate::problem::capacity::Capacity;
use crate::problem::location::LocationIdx;
use crate::problem::order_line::OrderLine;
use crate::problem::skill::Skill;

define_index_newtype!(AgentIdx, Agent);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Robot,
    Human,
    Cart,
}

/// A fleet unit: robot, human picker, or guided cart. Immutable for the
/// duration of one optimization run.
#[derive(Serialize, Debug, Clone)]
pub struct Agent {
    external_id: String,
    agent_type: AgentType,
    profile_id: AgentProfileIdx,
    capacity: Capacity,
    hourly_cost: f64,
    shift: Option<AgentShift>,
    depot_location_id: LocationIdx,
    depot_duration: SignedDuration,
    max_trips: usize,
    skills: FxHashSet<Skill>,
}

impl Agent {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    pub fn profile_id(&self) -> AgentProfileIdx {
        self.profile_id
    }

    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    pub fn hourly_cost(&self) -> f64 {
        self.hourly_cost
    }

    pub fn shift(&self) -> Option<&AgentShift> {
        self.shift.as_ref()
    }

    pub fn depot_location_id(&self) -> LocationIdx {
        self.depot_location_id
    }

    /// Dwell at the depot berth when dropping a trip's load.
    pub fn depot_duration(&self) -> SignedDuration {
        self.depot_duration
    }

    pub fn max_trips(&self) -> usize {
        self.max_trips
    }

    pub fn skills(&self) -> &FxHashSet<Skill> {
        &self.skills
    }

    pub fn earliest_start(&self) -> Timestamp {
        self.shift
            .as_ref()
            .and_then(|shift| shift.earliest_start)
            .unwrap_or(Timestamp::UNIX_EPOCH)
    }

    pub fn latest_end(&self) -> Option<Timestamp> {
        self.shift.as_ref().and_then(|shift| shift.latest_end)
    }

    pub fn maximum_working_duration(&self) -> Option<SignedDuration> {
        self.shift
            .as_ref()
            .and_then(|shift| shift.maximum_working_duration)
    }

    pub fn maximum_trip_duration(&self) -> Option<SignedDuration> {
        self.shift
            .as_ref()
            .and_then(|shift| shift.maximum_trip_duration)
    }

    /// An agent can serve a line when it carries every skill the line
    /// requires.
    pub fn is_compatible_with(&self, line: &OrderLine) -> bool {
        line.required_skills().is_subset(&self.skills)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentShift {
    pub earliest_start: Option<Timestamp>,
    pub latest_end: Option<Timestamp>,
    pub maximum_working_duration: Option<SignedDuration>,
    pub maximum_trip_duration: Option<SignedDuration>,
}

#[derive(Default)]
pub struct AgentBuilder {
    external_id: Option<String>,
    agent_type: Option<AgentType>,
    profile_id: Option<usize>,
    capacity: Option<Capacity>,
    hourly_cost: Option<f64>,
    shift: Option<AgentShift>,
    depot_location_id: Option<usize>,
    depot_duration: Option<SignedDuration>,
    max_trips: Option<usize>,
    skills: Option<Vec<Skill>>,
}

impl AgentBuilder {
    pub fn set_agent_id(&mut self, external_id: impl Into<String>) -> &mut AgentBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_agent_type(&mut self, agent_type: AgentType) -> &mut AgentBuilder {
        self.agent_type = Some(agent_type);
        self
    }

    pub fn set_profile_id(&mut self, profile_id: usize) -> &mut AgentBuilder {
        self.profile_id = Some(profile_id);
        self
    }

    pub fn set_capacity(&mut self, capacity: Capacity) -> &mut AgentBuilder {
        self.capacity = Some(capacity);
        self
    }

    pub fn set_hourly_cost(&mut self, hourly_cost: f64) -> &mut AgentBuilder {
        self.hourly_cost = Some(hourly_cost);
        self
    }

    pub fn set_shift(&mut self, shift: AgentShift) -> &mut AgentBuilder {
        self.shift = Some(shift);
        self
    }

    pub fn set_depot_location_id(&mut self, depot_location_id: usize) -> &mut AgentBuilder {
        self.depot_location_id = Some(depot_location_id);
        self
    }

    pub fn set_depot_duration(&mut self, duration: SignedDuration) -> &mut AgentBuilder {
        self.depot_duration = Some(duration);
        self
    }

    pub fn set_max_trips(&mut self, max_trips: usize) -> &mut AgentBuilder {
        self.max_trips = Some(max_trips);
        self
    }

    pub fn set_skills(&mut self, skills: Vec<Skill>) -> &mut AgentBuilder {
        self.skills = Some(skills);
        self
    }

    pub fn build(self) -> Agent {
        Agent {
            external_id: self.external_id.expect("Agent ID is required"),
            agent_type: self.agent_type.expect("Agent type is required"),
            profile_id: self.profile_id.expect("Agent profile ID is required").into(),
            capacity: self.capacity.unwrap_or(Capacity::EMPTY),
            hourly_cost: self.hourly_cost.unwrap_or(0.0),
            shift: self.shift,
            depot_location_id: self
                .depot_location_id
                .expect("Depot location is required")
                .into(),
            depot_duration: self.depot_duration.unwrap_or(SignedDuration::ZERO),
            max_trips: self.max_trips.unwrap_or(DEFAULT_MAX_TRIPS),
            skills: FxHashSet::from_iter(self.skills.unwrap_or_default()),
        }
    }
}

/// Upper bound on trips per agent within one planning horizon.
pub const DEFAULT_MAX_TRIPS: usize = 15;
