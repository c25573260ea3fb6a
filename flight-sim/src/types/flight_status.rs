use std::{fmt, str::FromStr};

use super::sim_error::SimError;

/// Represents the various statuses a flight can have.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FlightStatus {
    Scheduled,
    OnTime,
    Delayed,
    Finished,
    Canceled,
}

impl FlightStatus {
    /// Converts the `FlightStatus` variant to its corresponding string representation.
    pub fn as_str(&self) -> &str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::OnTime => "on time",
            FlightStatus::Delayed => "delayed",
            FlightStatus::Finished => "finished",
            FlightStatus::Canceled => "canceled",
        }
    }

    /// Whether a flight with this status is in the air and has a live position.
    pub fn is_airborne(&self) -> bool {
        matches!(self, FlightStatus::OnTime | FlightStatus::Delayed)
    }
}

impl FromStr for FlightStatus {
    type Err = SimError;

    fn from_str(status: &str) -> Result<Self, Self::Err> {
        match status.to_lowercase().as_str() {
            "scheduled" => Ok(FlightStatus::Scheduled),
            "on time" => Ok(FlightStatus::OnTime),
            "delayed" => Ok(FlightStatus::Delayed),
            "finished" => Ok(FlightStatus::Finished),
            "canceled" => Ok(FlightStatus::Canceled),
            _ => Err(SimError::InvalidStatus(status.to_string())),
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!("On Time".parse::<FlightStatus>().unwrap(), FlightStatus::OnTime);
        assert_eq!("canceled".parse::<FlightStatus>().unwrap(), FlightStatus::Canceled);
        assert!("boarding".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_airborne() {
        assert!(FlightStatus::Delayed.is_airborne());
        assert!(!FlightStatus::Scheduled.is_airborne());
        assert!(!FlightStatus::Finished.is_airborne());
    }
}
