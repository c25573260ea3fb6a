use flight_map::{Coordinate, Endpoint};

use super::sim_error::SimError;

/// Represents an airport with its IATA code, name, country and geographical position.
#[derive(Clone, Debug, PartialEq)]
pub struct Airport {
    pub iata_code: String,
    pub country: String,
    pub name: String,
    pub position: Coordinate,
}

impl Airport {
    pub fn new(
        iata_code: &str,
        country: &str,
        name: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, SimError> {
        let position = Coordinate::new(latitude, longitude)
            .map_err(|e| SimError::InvalidAirport(format!("{}: {}", iata_code, e)))?;

        Ok(Airport {
            iata_code: iata_code.to_string(),
            country: country.to_string(),
            name: name.to_string(),
            position,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.position.lat()
    }

    pub fn longitude(&self) -> f64 {
        self.position.lon()
    }

    /// The airport as a flight map endpoint.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.iata_code.clone(), self.position)
    }
}
