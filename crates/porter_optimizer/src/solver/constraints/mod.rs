pub mod capacity_constraint;
pub mod constraint;
pub mod deadline_constraint;
pub mod labor_cost_constraint;
pub mod makespan_constraint;
pub mod shift_constraint;
pub mod trip_cost_constraint;
pub mod trip_duration_constraint;
pub mod working_duration_constraint;
