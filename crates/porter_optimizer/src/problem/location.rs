use porter_grid::Cell;
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

define_index_newtype!(LocationIdx, Location);

/// A named, resolved warehouse location: pick face, staging point, or depot
/// berth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    name: String,
    cell: Cell,
}

impl Location {
    pub fn new(name: impl Into<String>, cell: Cell) -> Self {
        Location {
            name: name.into(),
            cell,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }
}
