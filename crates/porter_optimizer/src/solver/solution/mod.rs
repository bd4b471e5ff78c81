pub mod agent_route;
pub mod trip;
pub mod working_solution;
