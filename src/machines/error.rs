use thiserror::Error;

use crate::api_client;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ApiError(#[from] api_client::error::Error),
    #[error("Invalid machine: {0}")]
    InvalidMachine(String),
}
