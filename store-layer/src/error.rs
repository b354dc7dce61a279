use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("{entity} already exists: {id}")]
    DuplicateId { entity: &'static str, id: Uuid },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
