use jiff::SignedDuration;

use porter::catalog::{Order, OrderItem, Priority, Product};
use porter::config::PorterConfig;
use porter::error::PorterError;
use porter::request::{AgentSpec, PlanRequest};
use porter_grid::{Cell, GridBuilder};
use porter_optimizer::problem::agent::{AgentShift, AgentType};
use porter_optimizer::solver::outcome::ConstraintClass;
use porter_optimizer::solver::solver::OptimizerError;
use porter_optimizer::solver::solver_params::Termination;

fn product(id: &str, location: &str, weight_kg: f64) -> Product {
    Product {
        id: id.to_string(),
        name: id.to_string(),
        category: "general".to_string(),
        weight_kg,
        volume_dm3: 1.0,
        fragile: false,
        location: location.to_string(),
        handling_duration: SignedDuration::from_secs(60),
    }
}

fn order(id: &str, items: &[(&str, u32)]) -> Order {
    Order {
        id: id.to_string(),
        deadline: None,
        priority: Priority::Standard,
        items: items
            .iter()
            .map(|&(product_id, quantity)| OrderItem {
                product_id: product_id.to_string(),
                quantity,
            })
            .collect(),
    }
}

fn agent(id: &str) -> AgentSpec {
    AgentSpec {
        id: id.to_string(),
        agent_type: AgentType::Robot,
        speed_mps: 1.0,
        capacity_weight_kg: 50.0,
        capacity_volume_dm3: 100.0,
        hourly_cost: 5.0,
        shift: Some(AgentShift {
            earliest_start: Some("2026-03-02T08:00:00Z".parse().unwrap()),
            ..AgentShift::default()
        }),
        skills: Vec::new(),
        max_trips: None,
    }
}

fn fast_config() -> PorterConfig {
    let mut config = PorterConfig::default();
    config.solver.terminations = vec![Termination::Iterations(100)];
    config
}

#[test]
fn test_trivial_grid_single_pick() {
    // 3x3 open grid, staging in one corner, a single pick face in the other.
    let mut builder = GridBuilder::default();
    builder.set_dimensions(3, 3);
    builder.set_cell_size_meters(1.0);
    builder.add_location("staging", Cell::new(0, 0));
    builder.add_location("face-1", Cell::new(2, 2));
    let grid = builder.build().unwrap();

    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: Vec::new(),
        products: vec![product("p1", "face-1", 2.0)],
        orders: vec![order("o1", &[("p1", 1)])],
        agents: vec![agent("robot-1")],
    };

    let schedule = porter::run(&request, &fast_config()).unwrap();

    assert_eq!(schedule.itineraries.len(), 1);
    let itinerary = &schedule.itineraries[0];
    assert_eq!(itinerary.trips.len(), 1);

    let trip = &itinerary.trips[0];
    assert_eq!(trip.stops.len(), 1);
    assert_eq!(trip.stops[0].cell, Cell::new(2, 2));
    // outbound leg plus the return to the berth
    assert_eq!(trip.legs.len(), 2);
    // route length equals the Manhattan distance between staging and the face
    let manhattan = Cell::new(0, 0).manhattan_distance(Cell::new(2, 2));
    assert_eq!(trip.legs[0].cells.len() as u32, manhattan + 1);
    assert_eq!(trip.legs[0].distance_meters, manhattan as f64);

    assert!(schedule.is_collision_free());
    assert_eq!(schedule.total_stops(), 1);
}

#[test]
fn test_unreachable_target_aborts() {
    // The pick face is walled in: passable itself, but with no open neighbor.
    let mut builder = GridBuilder::default();
    builder.set_dimensions(5, 5);
    builder.add_location("staging", Cell::new(0, 0));
    builder.add_location("face-1", Cell::new(2, 2));
    for cell in [
        Cell::new(1, 2),
        Cell::new(3, 2),
        Cell::new(2, 1),
        Cell::new(2, 3),
    ] {
        builder.block(cell);
    }
    let grid = builder.build().unwrap();

    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: Vec::new(),
        products: vec![product("p1", "face-1", 2.0)],
        orders: vec![order("o1", &[("p1", 1)])],
        agents: vec![agent("robot-1")],
    };

    let result = porter::run(&request, &fast_config());
    assert!(matches!(result, Err(PorterError::RoutingInfeasible(_))));
}

#[test]
fn test_crossing_agents_are_deconflicted() {
    // A robot moves along y = 2, a picker along x = 2; their shortest routes
    // share (2, 2) at the same time when both start together.
    let mut builder = GridBuilder::default();
    builder.set_dimensions(5, 5);
    builder.set_cell_size_meters(1.0);
    builder.add_location("staging", Cell::new(0, 0));
    builder.add_location("berth-r", Cell::new(0, 2));
    builder.add_location("berth-h", Cell::new(2, 0));
    builder.add_location("face-east", Cell::new(4, 2));
    builder.add_location("face-north", Cell::new(2, 4));
    let grid = builder.build().unwrap();

    // The heavy product pins the east face to the robot, the fragile one
    // pins the north face to the picker.
    let heavy = product("p-heavy", "face-east", 20.0);
    let mut fragile = product("p-fragile", "face-north", 1.0);
    fragile.fragile = true;

    let mut robot = agent("robot-1");
    robot.skills = vec!["heavy".to_string()];

    let mut picker = agent("picker-1");
    picker.agent_type = AgentType::Human;
    picker.hourly_cost = 25.0;
    picker.skills = vec!["fragile".to_string()];

    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: vec!["berth-r".to_string(), "berth-h".to_string()],
        products: vec![heavy, fragile],
        orders: vec![order("o1", &[("p-heavy", 1), ("p-fragile", 1)])],
        agents: vec![robot, picker],
    };

    let mut config = fast_config();
    config.resolver.delay_increment = SignedDuration::from_secs(5);

    let schedule = porter::run(&request, &config).unwrap();

    assert!(schedule.is_collision_free());
    assert!(schedule.diagnostics.unresolved_collisions.is_empty());

    // Exactly one agent was delayed, and the delay broke the overlap: no
    // cell is shared during overlapping intervals across the two agents.
    let delayed = schedule
        .itineraries
        .iter()
        .filter(|itinerary| itinerary.start_delay > SignedDuration::ZERO)
        .count();
    assert_eq!(delayed, 1);

    let first = &schedule.itineraries[0].occupancy;
    let second = &schedule.itineraries[1].occupancy;
    for visit in first {
        for other in second {
            assert!(
                !visit.overlaps(other),
                "agents still overlap on {} between {} and {}",
                visit.cell,
                visit.enter,
                visit.exit
            );
        }
    }
}

#[test]
fn test_capacity_overflow_reports_infeasible() {
    let mut builder = GridBuilder::default();
    builder.set_dimensions(4, 4);
    builder.add_location("staging", Cell::new(0, 0));
    builder.add_location("face-1", Cell::new(3, 3));
    let grid = builder.build().unwrap();

    let mut small_agent = agent("robot-1");
    small_agent.capacity_weight_kg = 10.0;
    small_agent.max_trips = Some(1);

    // 3 x 5 kg on a 10 kg agent with a single trip.
    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: Vec::new(),
        products: vec![product("p1", "face-1", 5.0)],
        orders: vec![order("o1", &[("p1", 3)])],
        agents: vec![small_agent],
    };

    let result = porter::run(&request, &fast_config());
    match result {
        Err(PorterError::AssignmentInfeasible(OptimizerError::Infeasible { class, .. })) => {
            assert_eq!(class, ConstraintClass::Capacity);
        }
        other => panic!("expected capacity infeasibility, got {other:?}"),
    }
}

#[test]
fn test_unreachable_deadline_reports_infeasible() {
    let mut builder = GridBuilder::default();
    builder.set_dimensions(4, 4);
    builder.add_location("staging", Cell::new(0, 0));
    builder.add_location("face-1", Cell::new(3, 3));
    let grid = builder.build().unwrap();

    let mut late_order = order("o1", &[("p1", 1)]);
    // Deadline before the shift even starts.
    late_order.deadline = Some("2026-03-02T06:00:00Z".parse().unwrap());

    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: Vec::new(),
        products: vec![product("p1", "face-1", 2.0)],
        orders: vec![late_order],
        agents: vec![agent("robot-1")],
    };

    let result = porter::run(&request, &fast_config());
    match result {
        Err(PorterError::AssignmentInfeasible(OptimizerError::Infeasible {
            class,
            unassigned,
            ..
        })) => {
            assert_eq!(class, ConstraintClass::Deadline);
            assert_eq!(unassigned.len(), 1);
        }
        other => panic!("expected deadline infeasibility, got {other:?}"),
    }
}

#[test]
fn test_empty_backlog_returns_empty_schedule() {
    let mut builder = GridBuilder::default();
    builder.set_dimensions(3, 3);
    builder.add_location("staging", Cell::new(0, 0));
    let grid = builder.build().unwrap();

    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: Vec::new(),
        products: Vec::new(),
        orders: Vec::new(),
        agents: vec![agent("robot-1")],
    };

    let schedule = porter::run(&request, &fast_config()).unwrap();

    assert_eq!(schedule.total_stops(), 0);
    assert!(schedule.is_collision_free());
    assert!(schedule.itineraries.iter().all(|i| i.trips.is_empty()));
}

#[test]
fn test_runs_are_reproducible() {
    let mut builder = GridBuilder::default();
    builder.set_dimensions(6, 6);
    builder.set_cell_size_meters(2.0);
    builder.add_location("staging", Cell::new(0, 0));
    builder.add_location("face-1", Cell::new(5, 1));
    builder.add_location("face-2", Cell::new(1, 5));
    builder.add_location("face-3", Cell::new(5, 5));
    let grid = builder.build().unwrap();

    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: Vec::new(),
        products: vec![
            product("p1", "face-1", 3.0),
            product("p2", "face-2", 4.0),
            product("p3", "face-3", 5.0),
        ],
        orders: vec![
            order("o1", &[("p1", 2), ("p2", 1)]),
            order("o2", &[("p3", 1)]),
        ],
        agents: vec![agent("robot-1"), agent("robot-2")],
    };

    let first = porter::run(&request, &fast_config()).unwrap();
    let second = porter::run(&request, &fast_config()).unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_agent_type_speed_override_shortens_trips() {
    let mut builder = GridBuilder::default();
    builder.set_dimensions(8, 8);
    builder.set_cell_size_meters(2.0);
    builder.add_location("staging", Cell::new(0, 0));
    builder.add_location("face-1", Cell::new(7, 7));
    let grid = builder.build().unwrap();

    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: Vec::new(),
        products: vec![product("p1", "face-1", 2.0)],
        orders: vec![order("o1", &[("p1", 1)])],
        agents: vec![agent("robot-1")],
    };

    let base = porter::run(&request, &fast_config()).unwrap();

    let mut boosted_config = fast_config();
    boosted_config.agent_overrides = vec![porter::AgentTypeOverride {
        agent_type: AgentType::Robot,
        speed_mps: Some(4.0),
        hourly_cost: None,
    }];
    let boosted = porter::run(&request, &boosted_config).unwrap();

    let trip_duration = |schedule: &porter::Schedule| {
        let trip = &schedule.itineraries[0].trips[0];
        trip.end.duration_since(trip.start)
    };
    assert!(trip_duration(&boosted) < trip_duration(&base));
}

#[test]
fn test_capability_restriction_routes_to_capable_agent() {
    let mut builder = GridBuilder::default();
    builder.set_dimensions(4, 4);
    builder.add_location("staging", Cell::new(0, 0));
    builder.add_location("face-1", Cell::new(3, 0));
    let grid = builder.build().unwrap();

    let mut fragile = product("p-glass", "face-1", 1.0);
    fragile.fragile = true;

    let robot = agent("robot-1");
    let mut picker = agent("picker-1");
    picker.agent_type = AgentType::Human;
    picker.skills = vec!["fragile".to_string()];

    let request = PlanRequest {
        grid,
        staging_location: "staging".to_string(),
        depot_berths: Vec::new(),
        products: vec![fragile],
        orders: vec![order("o1", &[("p-glass", 1)])],
        agents: vec![robot, picker],
    };

    let schedule = porter::run(&request, &fast_config()).unwrap();

    let robot_itinerary = &schedule.itineraries[0];
    let picker_itinerary = &schedule.itineraries[1];
    assert!(robot_itinerary.trips.is_empty());
    assert_eq!(picker_itinerary.trips.len(), 1);
}
