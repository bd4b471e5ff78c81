use jiff::SignedDuration;
use porter_matrix::RawTravelMatrices;

use crate::problem::agent::{AgentBuilder, AgentShift, AgentType};
use crate::problem::agent_profile::AgentProfile;
use crate::problem::capacity::Capacity;
use crate::problem::fleet::Fleet;
use crate::problem::location::Location;
use crate::problem::order_line::{OrderLine, OrderLineBuilder};
use crate::problem::picking_problem::{PickingProblem, PickingProblemBuilder};
use crate::problem::travel_cost_matrix::TravelMatrices;
use porter_grid::Cell;

pub fn shift_starting_at(iso: &str) -> AgentShift {
    AgentShift {
        earliest_start: Some(iso.parse().expect("Error parsing ISO")),
        ..AgentShift::default()
    }
}

/// Staging berth (location 0) plus two pick faces, one agent.
/// Distances in meters at 1 m/s: berth->rack-a 10, rack-a->rack-b 8,
/// berth->rack-b 14. Lines weigh 4 kg / 10 dm3 each, 60 s handling.
pub fn small_problem() -> PickingProblem {
    let locations = vec![
        Location::new("staging", Cell::new(0, 0)),
        Location::new("rack-a", Cell::new(10, 0)),
        Location::new("rack-b", Cell::new(10, 8)),
    ];

    let raw = RawTravelMatrices {
        distances: vec![
            0.0, 10.0, 14.0, //
            10.0, 0.0, 8.0, //
            14.0, 8.0, 0.0,
        ],
        num_locations: 3,
    };
    let profiles = vec![AgentProfile::new(1.0, TravelMatrices::from_raw(&raw, 1.0))];

    let mut agent_builder = AgentBuilder::default();
    agent_builder
        .set_agent_id("agent-1")
        .set_agent_type(AgentType::Robot)
        .set_profile_id(0)
        .set_capacity(Capacity::weight_and_volume(10.0, 50.0))
        .set_hourly_cost(5.0)
        .set_depot_location_id(0)
        .set_depot_duration(SignedDuration::from_secs(120))
        .set_shift(shift_starting_at("2026-03-02T08:00:00Z"));
    let fleet = Fleet::new(vec![agent_builder.build()]);

    let lines = vec![line("line-0", "rack-a", 1), line("line-1", "rack-b", 2)];

    let mut builder = PickingProblemBuilder::default();
    builder
        .set_locations(locations)
        .set_fleet(fleet)
        .set_profiles(profiles)
        .set_lines(lines);
    builder.build()
}

fn line(id: &str, location: &str, location_id: usize) -> OrderLine {
    let mut builder = OrderLineBuilder::default();
    builder
        .set_line_id(id)
        .set_order_id("order-1")
        .set_product_id(location)
        .set_location_id(location_id)
        .set_quantity(1)
        .set_demand(Capacity::weight_and_volume(4.0, 10.0))
        .set_handling_duration(SignedDuration::from_secs(60));
    builder.build()
}
