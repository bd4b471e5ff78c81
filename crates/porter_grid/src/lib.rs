pub mod astar;
pub mod cell;
pub mod error;
pub mod grid;

pub use astar::{AStar, GridPath};
pub use cell::Cell;
pub use error::GridError;
pub use grid::{Connectivity, Grid, GridBuilder};
