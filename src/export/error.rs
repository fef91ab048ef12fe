use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No data to export")]
    NoData,
    #[error("Could not write report {0}: {1}")]
    WriteError(PathBuf, std::io::Error),
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
}
