use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] coursegate_service::error::ServiceError),

    #[error(transparent)]
    CoreError(#[from] coursegate_core::error::CoreError),

    #[error("Session handler setup failed: {0}")]
    SessionSetup(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
