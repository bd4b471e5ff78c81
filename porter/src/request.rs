use serde::{Deserialize, Serialize};

use porter_grid::Grid;
use porter_optimizer::problem::agent::{AgentShift, AgentType};

use crate::catalog::{Order, Product};

/// Roster entry as supplied by the loader collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: String,
    pub agent_type: AgentType,
    pub speed_mps: f64,
    pub capacity_weight_kg: f64,
    pub capacity_volume_dm3: f64,
    pub hourly_cost: f64,
    #[serde(default)]
    pub shift: Option<AgentShift>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub max_trips: Option<usize>,
}

/// Everything one optimization run consumes. Built by the external loader;
/// the pipeline never touches files itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub grid: Grid,
    /// Shared staging point; the fallback berth when `depot_berths` runs out.
    pub staging_location: String,
    /// Named berth cells around staging, assigned one per agent in roster
    /// order so depot dwells do not pile onto a single cell.
    #[serde(default)]
    pub depot_berths: Vec<String>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub agents: Vec<AgentSpec>,
}
