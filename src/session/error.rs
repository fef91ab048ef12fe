use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not read token file {0}. Error: {1}")]
    ReadTokenError(PathBuf, std::io::Error),
    #[error("Could not write token file {0}. Error: {1}")]
    WriteTokenError(PathBuf, std::io::Error),
    #[error("Could not remove token file {0}. Error: {1}")]
    RemoveTokenError(PathBuf, std::io::Error),
    #[error("Could not parse role from string {0}")]
    CouldNotParseRole(String),
}
