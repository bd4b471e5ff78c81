use fxhash::FxHashSet;
use jiff::SignedDuration;
use serde::Serialize;

use crate::define_index_newtype;
use crate::problem::capacity::Capacity;
use crate::problem::location::LocationIdx;
use crate::problem::skill::Skill;
use crate::problem::time_window::TimeWindow;

define_index_newtype!(LineIdx, OrderLine);

/// A single demand drawn from a customer order: pick `quantity` units of one
/// product at one location. Served by exactly one (agent, trip) pair.
#[derive(Serialize, Debug, Clone)]
pub struct OrderLine {
    external_id: String,
    order_id: String,
    product_id: String,
    location_id: LocationIdx,
    quantity: u32,
    demand: Capacity,
    handling_duration: SignedDuration,
    time_window: TimeWindow,
    required_skills: FxHashSet<Skill>,
}

impl OrderLine {
    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn location_id(&self) -> LocationIdx {
        self.location_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn demand(&self) -> &Capacity {
        &self.demand
    }

    pub fn handling_duration(&self) -> SignedDuration {
        self.handling_duration
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn has_deadline(&self) -> bool {
        self.time_window.end().is_some()
    }

    pub fn required_skills(&self) -> &FxHashSet<Skill> {
        &self.required_skills
    }
}

#[derive(Default)]
pub struct OrderLineBuilder {
    external_id: Option<String>,
    order_id: Option<String>,
    product_id: Option<String>,
    location_id: Option<usize>,
    quantity: Option<u32>,
    demand: Option<Capacity>,
    handling_duration: Option<SignedDuration>,
    time_window: Option<TimeWindow>,
    required_skills: Option<Vec<Skill>>,
}

impl OrderLineBuilder {
    pub fn set_line_id(&mut self, external_id: impl Into<String>) -> &mut OrderLineBuilder {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn set_order_id(&mut self, order_id: impl Into<String>) -> &mut OrderLineBuilder {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn set_product_id(&mut self, product_id: impl Into<String>) -> &mut OrderLineBuilder {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn set_location_id(&mut self, location_id: usize) -> &mut OrderLineBuilder {
        self.location_id = Some(location_id);
        self
    }

    pub fn set_quantity(&mut self, quantity: u32) -> &mut OrderLineBuilder {
        self.quantity = Some(quantity);
        self
    }

    pub fn set_demand(&mut self, demand: Capacity) -> &mut OrderLineBuilder {
        self.demand = Some(demand);
        self
    }

    pub fn set_handling_duration(&mut self, duration: SignedDuration) -> &mut OrderLineBuilder {
        self.handling_duration = Some(duration);
        self
    }

    pub fn set_time_window(&mut self, time_window: TimeWindow) -> &mut OrderLineBuilder {
        self.time_window = Some(time_window);
        self
    }

    pub fn set_required_skills(&mut self, skills: Vec<Skill>) -> &mut OrderLineBuilder {
        self.required_skills = Some(skills);
        self
    }

    pub fn build(self) -> OrderLine {
        OrderLine {
            external_id: self.external_id.expect("Line ID is required"),
            order_id: self.order_id.expect("Order ID is required"),
            product_id: self.product_id.unwrap_or_default(),
            location_id: self.location_id.expect("Location ID is required").into(),
            quantity: self.quantity.unwrap_or(1),
            demand: self.demand.unwrap_or(Capacity::EMPTY),
            handling_duration: self.handling_duration.unwrap_or(SignedDuration::ZERO),
            time_window: self.time_window.unwrap_or_default(),
            required_skills: FxHashSet::from_iter(self.required_skills.unwrap_or_default()),
        }
    }
}
