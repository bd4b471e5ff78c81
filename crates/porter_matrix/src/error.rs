use porter_grid::{Cell, GridError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    /// No passable path exists between the two cells. This is a hard failure:
    /// callers must not substitute an approximate cost.
    #[error("no path between {from} and {to}")]
    Infeasible { from: Cell, to: Cell },
    #[error(transparent)]
    Grid(#[from] GridError),
}
