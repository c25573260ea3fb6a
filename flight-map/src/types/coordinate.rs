use serde::{Deserialize, Serialize};

use crate::errors::MapError;

/// A validated (latitude, longitude) pair.
///
/// On the wire a coordinate is a two-element array `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting non-finite or out of range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, MapError> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);

        if valid {
            Ok(Self { lat, lon })
        } else {
            Err(MapError::InvalidCoordinate { lat, lon })
        }
    }

    /// For compile time constants that are known to be in range.
    pub(crate) const fn new_unchecked(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = MapError;

    fn try_from([lat, lon]: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(lat, lon)
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = MapError;

    fn try_from((lat, lon): (f64, f64)) -> Result<Self, Self::Error> {
        Coordinate::new(lat, lon)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.lat, coordinate.lon]
    }
}
