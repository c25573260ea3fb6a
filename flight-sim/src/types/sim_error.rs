use thiserror::Error;

/// Represents errors that can occur in the flight simulator.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid input. Please check your input and try again.")]
    InvalidInput,
    #[error("Invalid flight details: {0}")]
    InvalidFlight(String),
    #[error("Airport not found: {0}")]
    AirportNotFound(String),
    #[error("Invalid airport: {0}")]
    InvalidAirport(String),
    #[error("Timer lock error: {0}")]
    TimerLockError(String),
    #[error("Timer start error: {0}")]
    TimerStartError(String),
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
    #[error("Invalid flight status: {0}")]
    InvalidStatus(String),
    #[error("Failed to encode snapshot: {0}")]
    Encoding(#[from] serde_json::Error),
}
