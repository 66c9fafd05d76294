use std::error::Error as StdError;
use std::fmt;

use crate::session::SessionError;
use crate::usage::WalkError;

#[derive(Debug)]
pub enum AppError {
    Configuration(String),
    Remote(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
            AppError::Remote(e) => write!(f, "Remote server error: {}", e),
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl StdError for AppError {}

impl From<SessionError> for AppError {
    fn from(error: SessionError) -> Self {
        AppError::Remote(error.to_string())
    }
}

impl From<WalkError> for AppError {
    fn from(error: WalkError) -> Self {
        AppError::Remote(error.to_string())
    }
}

// Define AppResult type alias for Result<T, AppError>
pub type AppResult<T> = Result<T, AppError>;
