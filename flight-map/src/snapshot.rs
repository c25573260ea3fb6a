use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::{errors::MapError, types::FlightSnapshot};

/// An entry of the payload that could not be turned into a flight.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    /// Position of the entry in the payload's `flights` array.
    pub index: usize,
    /// The flight number, when the entry carried a readable one.
    pub flight_number: Option<String>,
    pub error: MapError,
}

/// A decoded payload: the flights to render, in payload order, and the
/// entries that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub flights: Vec<FlightSnapshot>,
    pub rejected: Vec<RejectedEntry>,
}

#[derive(Deserialize)]
struct Payload {
    flights: Vec<Value>,
}

impl Snapshot {
    pub fn new(flights: Vec<FlightSnapshot>) -> Self {
        Self {
            flights,
            rejected: Vec::new(),
        }
    }

    /// Decodes a `{ "flights": [...] }` payload.
    ///
    /// A payload that is not JSON or has no `flights` array fails as a whole
    /// with [`MapError::MalformedSnapshot`]. A single entry that does not
    /// decode (missing endpoint, bad coordinate, repeated flight number) is
    /// moved to `rejected` and the remaining entries are kept.
    pub fn parse(payload: &str) -> Result<Self, MapError> {
        let payload: Payload =
            serde_json::from_str(payload).map_err(|e| MapError::MalformedSnapshot(e.to_string()))?;

        let mut snapshot = Snapshot::default();
        let mut seen = HashSet::new();

        for (index, entry) in payload.flights.into_iter().enumerate() {
            let flight_number = entry
                .get("flightNumber")
                .and_then(Value::as_str)
                .map(str::to_string);

            let decoded = serde_json::from_value::<FlightSnapshot>(entry)
                .map_err(|e| MapError::MalformedSnapshot(format!("flight entry {}: {}", index, e)))
                .and_then(|flight| {
                    flight.validate()?;
                    if seen.insert(flight.flight_number.clone()) {
                        Ok(flight)
                    } else {
                        Err(MapError::flight_failure(
                            &flight.flight_number,
                            "repeated in the same snapshot",
                        ))
                    }
                });

            match decoded {
                Ok(flight) => snapshot.flights.push(flight),
                Err(error) => snapshot.rejected.push(RejectedEntry {
                    index,
                    flight_number,
                    error,
                }),
            }
        }

        Ok(snapshot)
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Flight numbers named by the payload, whether or not their entry decoded.
    pub(crate) fn named_flights(&self) -> impl Iterator<Item = &str> {
        self.flights
            .iter()
            .map(|flight| flight.flight_number.as_str())
            .chain(
                self.rejected
                    .iter()
                    .filter_map(|entry| entry.flight_number.as_deref()),
            )
    }
}
