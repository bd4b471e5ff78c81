use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use porter_grid::Connectivity;
use porter_optimizer::problem::agent::AgentType;
use porter_optimizer::solver::solver_params::SolverParams;

/// Fleet-wide tuning knob: replaces the roster's speed or cost for every
/// agent of one type, without editing the roster itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTypeOverride {
    pub agent_type: AgentType,
    #[serde(default)]
    pub speed_mps: Option<f64>,
    #[serde(default)]
    pub hourly_cost: Option<f64>,
}

/// Which agent gets delayed each resolver iteration, and by how much. Kept
/// explicit and configurable; both variants are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DelayPolicy {
    /// Add the configured increment on every delay.
    #[default]
    FixedIncrement,
    /// Multiply the increment by how often this agent was already delayed,
    /// separating repeat offenders faster.
    Escalating,
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub max_iterations: usize,
    pub delay_increment: SignedDuration,
    pub policy: DelayPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            max_iterations: 250,
            delay_increment: SignedDuration::from_mins(2),
            policy: DelayPolicy::FixedIncrement,
        }
    }
}

/// All tunables of one run, passed explicitly into the pipeline. Never
/// process-global: concurrent runs with different parameters must not
/// interfere.
#[derive(Debug, Clone)]
pub struct PorterConfig {
    pub connectivity: Connectivity,
    pub solver: SolverParams,
    pub resolver: ResolverConfig,
    /// Wall-clock budget for the whole run; exceeded means abort, not a
    /// partial schedule.
    pub pipeline_budget: Option<SignedDuration>,
    /// Unload dwell at the depot berth closing every trip.
    pub depot_dwell: SignedDuration,
    pub agent_overrides: Vec<AgentTypeOverride>,
}

impl Default for PorterConfig {
    fn default() -> Self {
        PorterConfig {
            connectivity: Connectivity::Four,
            solver: SolverParams::default(),
            resolver: ResolverConfig::default(),
            pipeline_budget: None,
            depot_dwell: SignedDuration::from_mins(2),
            agent_overrides: Vec::new(),
        }
    }
}
