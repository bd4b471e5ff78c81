use thiserror::Error;

use porter_matrix::RoutingError;
use porter_optimizer::solver::solver::OptimizerError;

use crate::catalog::CatalogError;
use crate::pipeline::RunStage;

#[derive(Error, Debug)]
pub enum PorterError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A required location pair has no path. Routing correctness is a hard
    /// precondition for the cost model, so this aborts the whole run.
    #[error("routing infeasible: {0}")]
    RoutingInfeasible(#[from] RoutingError),

    #[error("assignment infeasible: {0}")]
    AssignmentInfeasible(#[from] OptimizerError),

    #[error("pipeline wall-clock budget exceeded during {stage:?}")]
    PipelineTimeout { stage: RunStage },
}
