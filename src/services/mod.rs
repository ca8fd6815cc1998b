//! Use cases invoked by the HTTP routes.
//!
//! Services are generic over the repository traits so they can be exercised
//! against mocks. Absence is modelled with `Option`/`bool` results; errors are
//! reserved for validation failures and infrastructure problems.

use thiserror::Error;
use validator::ValidationErrors;

use crate::repository::errors::RepositoryError;

pub mod category;
pub mod product;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("resource not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ForeignKeyViolation(message)
            | RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => {
                log::error!("Repository failure: {other}");
                ServiceError::Internal
            }
        }
    }
}
