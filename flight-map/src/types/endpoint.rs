use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A departure or arrival airport of a flight: its code and where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub code: String,
    pub position: Coordinate,
}

impl Endpoint {
    pub fn new(code: impl Into<String>, position: Coordinate) -> Self {
        Self {
            code: code.into(),
            position,
        }
    }
}
