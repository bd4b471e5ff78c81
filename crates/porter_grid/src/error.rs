use thiserror::Error;

use crate::cell::Cell;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("unknown location '{0}'")]
    UnknownLocation(String),
    #[error("location '{name}' at {cell} is outside the {width}x{height} grid")]
    OutOfBounds {
        name: String,
        cell: Cell,
        width: u32,
        height: u32,
    },
    #[error("location '{name}' at {cell} is on a blocked cell")]
    Blocked { name: String, cell: Cell },
    #[error("passability rows do not match the declared {width}x{height} dimensions")]
    DimensionMismatch { width: u32, height: u32 },
    #[error("grid has zero area")]
    EmptyGrid,
}
