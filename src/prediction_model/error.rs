use thiserror::Error;

use crate::api_client;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ApiError(#[from] api_client::error::Error),
    #[error("Training file {0} is empty")]
    EmptyTrainingFile(String),
    #[error("Prediction horizon must be at least one day")]
    InvalidHorizon,
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::ApiError(api_client::error::Error::SerdeError(value))
    }
}
