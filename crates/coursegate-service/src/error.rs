use thiserror::Error;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    CoreError(#[from] coursegate_core::error::CoreError),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("No session in depot")]
    NoSession,

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Invalid listing parameters")]
    InvalidParams,

    #[error("Access denied to directory: {0}")]
    AccessDenied(String),

    #[error("File root unavailable: {0}")]
    RootUnavailable(#[source] std::io::Error),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
