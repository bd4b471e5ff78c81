pub mod error;
pub mod provider;
pub mod service;

pub use error::RoutingError;
pub use provider::{GridMatrixProvider, RawTravelMatrices};
pub use service::DistanceService;
