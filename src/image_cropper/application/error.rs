use thiserror::Error;
use crate::infrastructure::error::InfrastructureError; // InfrastructureError をラップするため

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Infrastructure error occurred: {0}")]
    InfrastructureError(#[from] InfrastructureError),
}
