pub mod agent;
pub mod agent_profile;
pub mod capacity;
pub mod fleet;
pub mod location;
pub mod order_line;
pub mod picking_problem;
pub mod skill;
pub mod time_window;
pub mod travel_cost_matrix;
