use jiff::SignedDuration;

use crate::define_index_newtype;
use crate::problem::location::LocationIdx;
use crate::problem::travel_cost_matrix::{Distance, TravelMatrices};

define_index_newtype!(AgentProfileIdx, AgentProfile);

/// A speed class shared by agents that move at the same pace: holds the
/// travel matrices timed for that speed.
#[derive(Debug, Clone)]
pub struct AgentProfile {
    speed_mps: f64,
    travel: TravelMatrices,
}

impl AgentProfile {
    pub fn new(speed_mps: f64, travel: TravelMatrices) -> Self {
        AgentProfile { speed_mps, travel }
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_mps
    }

    pub fn travel(&self) -> &TravelMatrices {
        &self.travel
    }

    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> SignedDuration {
        self.travel.travel_time(from, to)
    }

    pub fn travel_distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        self.travel.travel_distance(from, to)
    }
}
