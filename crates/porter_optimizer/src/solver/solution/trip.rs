use jiff::{SignedDuration, Timestamp};

use crate::problem::capacity::Capacity;
use crate::problem::order_line::LineIdx;

/// One capacity-bounded round: depart the depot berth, serve the stops in
/// order, return to the berth and unload. Timing fields are derived data,
/// recomputed by the owning route after every mutation.
#[derive(Debug, Clone)]
pub struct Trip {
    pub(super) stops: Vec<LineIdx>,
    pub(super) arrivals: Vec<Timestamp>,
    pub(super) departures: Vec<Timestamp>,
    pub(super) load: Capacity,
    pub(super) start: Timestamp,
    pub(super) end: Timestamp,
}

impl Trip {
    pub(super) fn empty() -> Self {
        Trip {
            stops: Vec::new(),
            arrivals: Vec::new(),
            departures: Vec::new(),
            load: Capacity::empty(),
            start: Timestamp::UNIX_EPOCH,
            end: Timestamp::UNIX_EPOCH,
        }
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn stops(&self) -> &[LineIdx] {
        &self.stops
    }

    pub fn arrival(&self, position: usize) -> Timestamp {
        self.arrivals[position]
    }

    pub fn departure(&self, position: usize) -> Timestamp {
        self.departures[position]
    }

    pub fn load(&self) -> &Capacity {
        &self.load
    }

    /// Departure from the depot berth.
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Back at the berth with the unload dwell finished.
    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn duration(&self) -> SignedDuration {
        self.end.duration_since(self.start)
    }

    pub fn contains(&self, line_id: LineIdx) -> bool {
        self.stops.contains(&line_id)
    }
}
