use serde::{Deserialize, Serialize};

use super::{Coordinate, Endpoint};
use crate::errors::MapError;

/// One flight as seen in a single snapshot.
///
/// `position` is `None` when there is no live tracking data for this cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSnapshot {
    pub flight_number: String,
    pub departure: Endpoint,
    pub arrival: Endpoint,
    #[serde(default)]
    pub position: Option<Coordinate>,
}

impl FlightSnapshot {
    pub fn new(
        flight_number: impl Into<String>,
        departure: Endpoint,
        arrival: Endpoint,
        position: Option<Coordinate>,
    ) -> Self {
        Self {
            flight_number: flight_number.into(),
            departure,
            arrival,
            position,
        }
    }

    pub fn with_position(mut self, position: Coordinate) -> Self {
        self.position = Some(position);
        self
    }

    pub fn without_position(mut self) -> Self {
        self.position = None;
        self
    }

    /// Checks the parts of a flight that the coordinate type cannot enforce.
    pub fn validate(&self) -> Result<(), MapError> {
        if self.flight_number.trim().is_empty() {
            return Err(MapError::flight_failure(
                &self.flight_number,
                "empty flight number",
            ));
        }
        if self.departure.code.trim().is_empty() {
            return Err(MapError::flight_failure(
                &self.flight_number,
                "empty departure code",
            ));
        }
        if self.arrival.code.trim().is_empty() {
            return Err(MapError::flight_failure(
                &self.flight_number,
                "empty arrival code",
            ));
        }
        Ok(())
    }

    /// The points the route line must go through for this snapshot.
    pub fn route_points(&self) -> Vec<Coordinate> {
        match self.position {
            Some(position) => vec![self.departure.position, position, self.arrival.position],
            None => vec![self.departure.position, self.arrival.position],
        }
    }

    /// Popup text shown on the aircraft marker.
    pub fn aircraft_label(&self) -> Option<String> {
        self.position.map(|position| {
            format!(
                "Flight {}\nFrom: {}\nTo: {}\nLat: {:.4}\nLon: {:.4}",
                self.flight_number,
                self.departure.code,
                self.arrival.code,
                position.lat(),
                position.lon()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fra() -> Endpoint {
        Endpoint::new("FRA", Coordinate::new(50.033333, 8.570556).unwrap())
    }

    fn lis() -> Endpoint {
        Endpoint::new("LIS", Coordinate::new(38.7613, -9.1357).unwrap())
    }

    #[test]
    fn test_flight_creation() {
        let flight = FlightSnapshot::new("LH1234", fra(), lis(), None);

        assert_eq!(flight.flight_number, "LH1234");
        assert_eq!(flight.departure.code, "FRA");
        assert_eq!(flight.arrival.code, "LIS");
        assert_eq!(flight.position, None);
    }

    #[test]
    fn test_route_points_follow_position() {
        let flight = FlightSnapshot::new("LH1234", fra(), lis(), None);
        assert_eq!(
            flight.route_points(),
            vec![fra().position, lis().position]
        );

        let position = Coordinate::new(45.0, 0.0).unwrap();
        let flight = flight.with_position(position);
        assert_eq!(
            flight.route_points(),
            vec![fra().position, position, lis().position]
        );
    }

    #[test]
    fn test_aircraft_label() {
        let flight = FlightSnapshot::new("LH1234", fra(), lis(), None);
        assert_eq!(flight.aircraft_label(), None);

        let flight = flight.with_position(Coordinate::new(45.0, 0.123456).unwrap());
        assert_eq!(
            flight.aircraft_label().unwrap(),
            "Flight LH1234\nFrom: FRA\nTo: LIS\nLat: 45.0000\nLon: 0.1235"
        );
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        assert!(FlightSnapshot::new("LH1234", fra(), lis(), None)
            .validate()
            .is_ok());
        assert!(FlightSnapshot::new(" ", fra(), lis(), None)
            .validate()
            .is_err());

        let mut nameless = lis();
        nameless.code.clear();
        assert!(FlightSnapshot::new("LH1234", fra(), nameless, None)
            .validate()
            .is_err());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "flightNumber": "TP577",
            "departure": { "code": "LIS", "position": [38.7613, -9.1357] },
            "arrival": { "code": "FRA", "position": [50.033333, 8.570556] },
            "position": null
        }"#;

        let flight: FlightSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(flight.flight_number, "TP577");
        assert_eq!(flight.position, None);
    }
}
