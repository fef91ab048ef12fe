use thiserror::Error;

use crate::session;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("HTTP error! status: {0}")]
    StatusCodeError(u16),
    #[error("Request to the backend could not be completed: {0}")]
    TransportError(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Model training failed. StatusCode: {0}")]
    TrainingFailed(u16),
    #[error("Could not build request URL from {0}")]
    UrlError(String),
    #[error("Could not (de)serialize payload. Error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    SessionError(#[from] session::error::Error),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::TransportError(value.to_string())
    }
}
