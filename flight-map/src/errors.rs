use thiserror::Error;

/// Represents the errors that can occur while rendering flights on a panel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// No drawing target exists for the given container id.
    #[error("map container not found: {0}")]
    ContainerNotFound(String),

    /// The rendering backend has not been initialized yet.
    #[error("rendering backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The payload, or one of its entries, could not be decoded.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// A single flight could not be rendered.
    #[error("failed to render flight {flight}: {reason}")]
    PerFlightRenderFailure { flight: String, reason: String },

    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

impl MapError {
    pub(crate) fn flight_failure(flight: &str, reason: impl Into<String>) -> Self {
        MapError::PerFlightRenderFailure {
            flight: flight.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error aborts a whole render call, as opposed to a single flight.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MapError::ContainerNotFound(_)
                | MapError::BackendUnavailable(_)
                | MapError::MalformedSnapshot(_)
                | MapError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_errors() {
        assert!(MapError::ContainerNotFound("map-1".into()).is_fatal());
        assert!(MapError::BackendUnavailable("tiles".into()).is_fatal());
        assert!(!MapError::flight_failure("LH1234", "empty code").is_fatal());
    }

    #[test]
    fn test_flight_failure_message() {
        let err = MapError::flight_failure("LH1234", "empty departure code");
        assert_eq!(
            err.to_string(),
            "failed to render flight LH1234: empty departure code"
        );
    }
}
