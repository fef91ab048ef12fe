use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not connect to push channel: {0}")]
    ConnectError(String),
    #[error("Push channel stream failed: {0}")]
    StreamError(String),
}
