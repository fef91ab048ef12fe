use thiserror::Error;

use crate::api_client;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ApiError(#[from] api_client::error::Error),
    #[error("Requested amount must be positive, got {0}")]
    InvalidAmount(f64),
    #[error("Could not parse refill status from string {0}")]
    CouldNotParseStatus(String),
}
