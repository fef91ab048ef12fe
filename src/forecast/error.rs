use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid {0} factor: {1}")]
    InvalidFactor(&'static str, f64),
    #[error("Forecast horizon must be at least one day")]
    InvalidHorizon,
}
