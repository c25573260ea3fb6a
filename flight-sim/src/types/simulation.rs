use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use flight_map::Snapshot;
use log::debug;
use rand::Rng;
use serde_json::json;

use super::airport::Airport;
use super::flight::Flight;
use super::flight_status::FlightStatus;
use super::sim_error::SimError;

/// Holds the airports and flights of a simulation and advances them in time.
///
/// Flights keep the order they were added in, which is also the order of
/// the snapshots they produce.
pub struct Simulation {
    airports: HashMap<String, Airport>,
    flights: Vec<Flight>,
    current_time: NaiveDateTime,
}

impl Simulation {
    pub fn new(start_time: NaiveDateTime) -> Self {
        Simulation {
            airports: HashMap::new(),
            flights: Vec::new(),
            current_time: start_time,
        }
    }

    /// A simulation seeded with Argentinian airports and flights whose
    /// departures are spread randomly around `start_time`.
    pub fn with_test_data(start_time: NaiveDateTime) -> Result<Self, SimError> {
        let mut sim = Simulation::new(start_time);

        for (iata_code, name, latitude, longitude) in TEST_AIRPORTS {
            sim.add_airport(Airport::new(iata_code, "ARG", name, *latitude, *longitude)?);
        }

        let mut rng = rand::thread_rng();
        for (flight_number, origin, destination, minutes, speed) in TEST_FLIGHTS {
            let departure = start_time + Duration::minutes(rng.gen_range(-60..=30));
            sim.add_flight(
                flight_number,
                origin,
                destination,
                departure,
                departure + Duration::minutes(*minutes),
                *speed,
            )?;
        }

        sim.advance(start_time);
        Ok(sim)
    }

    pub fn add_airport(&mut self, airport: Airport) {
        self.airports.insert(airport.iata_code.clone(), airport);
    }

    /// Adds a flight between two known airports.
    pub fn add_flight(
        &mut self,
        flight_number: &str,
        origin: &str,
        destination: &str,
        departure_time: NaiveDateTime,
        arrival_time: NaiveDateTime,
        average_speed: i32,
    ) -> Result<(), SimError> {
        if self.flight(flight_number).is_some() {
            return Err(SimError::InvalidFlight(format!(
                "{} already exists",
                flight_number
            )));
        }

        let origin = self.airport(origin)?.clone();
        let destination = self.airport(destination)?.clone();

        let flight = Flight::new(
            flight_number,
            origin,
            destination,
            departure_time,
            arrival_time,
            average_speed,
        )?;
        self.flights.push(flight);

        Ok(())
    }

    pub fn cancel_flight(&mut self, flight_number: &str) -> Result<(), SimError> {
        let flight = self
            .flights
            .iter_mut()
            .find(|flight| flight.flight_number == flight_number)
            .ok_or_else(|| SimError::InvalidFlight(format!("{} not found", flight_number)))?;
        flight.cancel();
        Ok(())
    }

    /// Moves every flight to `current_time`.
    pub fn advance(&mut self, current_time: NaiveDateTime) {
        self.current_time = current_time;
        for flight in &mut self.flights {
            if matches!(flight.status, FlightStatus::Finished | FlightStatus::Canceled) {
                continue;
            }
            if flight.check_states_and_update_flight(current_time) {
                debug!("Flight {} is now {}", flight.flight_number, flight.status);
            }
        }
    }

    /// Every flight as the map sees it. Only airborne flights carry a position.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.flights.iter().map(Flight::snapshot).collect())
    }

    /// The current snapshot as a `{ "flights": [...] }` JSON payload.
    pub fn payload(&self) -> Result<String, SimError> {
        let payload = json!({ "flights": self.snapshot().flights });
        Ok(serde_json::to_string(&payload)?)
    }

    pub fn airport(&self, iata_code: &str) -> Result<&Airport, SimError> {
        self.airports
            .get(iata_code)
            .ok_or_else(|| SimError::AirportNotFound(iata_code.to_string()))
    }

    /// Airports sorted by IATA code.
    pub fn airports(&self) -> Vec<&Airport> {
        let mut airports: Vec<&Airport> = self.airports.values().collect();
        airports.sort_by(|a, b| a.iata_code.cmp(&b.iata_code));
        airports
    }

    pub fn flight(&self, flight_number: &str) -> Option<&Flight> {
        self.flights
            .iter()
            .find(|flight| flight.flight_number == flight_number)
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn current_time(&self) -> NaiveDateTime {
        self.current_time
    }
}

const TEST_AIRPORTS: &[(&str, &str, f64, f64)] = &[
    ("AEP", "Aeroparque Jorge Newbery", -34.5592, -58.4156),
    ("EZE", "Ministro Pistarini", -34.8222, -58.5358),
    ("COR", "Ingeniero Ambrosio Taravella", -31.3236, -64.2080),
    ("MDZ", "El Plumerillo", -32.8328, -68.7928),
    ("ROS", "Islas Malvinas", -32.9036, -60.7850),
    ("SLA", "Martín Miguel de Güemes", -24.8425, -65.4861),
    ("IGR", "Cataratas del Iguazú", -25.7373, -54.4734),
    ("BRC", "Teniente Luis Candelaria", -41.1512, -71.1578),
    ("USH", "Malvinas Argentinas", -54.8433, -68.2958),
    ("TUC", "Teniente General Benjamín Matienzo", -26.8409, -65.1048),
    ("NQN", "Presidente Perón", -38.9490, -68.1560),
    ("CRD", "General Enrique Mosconi", -45.7853, -67.4655),
];

const TEST_FLIGHTS: &[(&str, &str, &str, i64, i32)] = &[
    ("AR1234", "AEP", "MDZ", 120, 550),
    ("AR5678", "MDZ", "AEP", 120, 550),
    ("AR9101", "EZE", "BRC", 180, 600),
    ("AR2233", "COR", "USH", 240, 700),
    ("AR4455", "SLA", "IGR", 150, 500),
    ("AR6677", "CRD", "NQN", 120, 500),
    ("AR1011", "TUC", "ROS", 120, 650),
    ("AR1920", "EZE", "ROS", 60, 550),
];

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 20)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap()
    }

    fn simulation() -> Simulation {
        let mut sim = Simulation::new(start_time());
        sim.add_airport(Airport::new("AEP", "ARG", "Aeroparque", -34.5592, -58.4156).unwrap());
        sim.add_airport(Airport::new("MDZ", "ARG", "El Plumerillo", -32.8328, -68.7928).unwrap());
        sim.add_flight(
            "AR1234",
            "AEP",
            "MDZ",
            start_time() + Duration::minutes(10),
            start_time() + Duration::hours(2),
            550,
        )
        .unwrap();
        sim
    }

    #[test]
    fn test_unknown_airport() {
        let mut sim = simulation();
        let result = sim.add_flight(
            "AR1",
            "AEP",
            "XXX",
            start_time(),
            start_time() + Duration::hours(1),
            500,
        );
        assert!(matches!(result, Err(SimError::AirportNotFound(_))));
    }

    #[test]
    fn test_repeated_flight_number() {
        let mut sim = simulation();
        let result = sim.add_flight(
            "AR1234",
            "MDZ",
            "AEP",
            start_time(),
            start_time() + Duration::hours(1),
            500,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_follows_flight_lifecycle() {
        let mut sim = simulation();

        sim.advance(start_time());
        assert!(sim.snapshot().flights[0].position.is_none());

        sim.advance(start_time() + Duration::minutes(40));
        assert!(sim.snapshot().flights[0].position.is_some());

        sim.advance(start_time() + Duration::hours(4));
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.flights.len(), 1);
        assert!(snapshot.flights[0].position.is_none());
    }

    #[test]
    fn test_canceled_flight_stays_without_position() {
        let mut sim = simulation();
        sim.advance(start_time() + Duration::minutes(40));
        sim.cancel_flight("AR1234").unwrap();

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.flights[0].flight_number, "AR1234");
        assert!(snapshot.flights[0].position.is_none());
        assert!(sim.cancel_flight("AR0000").is_err());
    }

    #[test]
    fn test_payload_decodes_as_snapshot() {
        let mut sim = simulation();
        sim.advance(start_time() + Duration::minutes(40));

        let snapshot = Snapshot::parse(&sim.payload().unwrap()).unwrap();
        assert_eq!(snapshot, sim.snapshot());
    }

    #[test]
    fn test_with_test_data() {
        let sim = Simulation::with_test_data(start_time()).unwrap();
        assert_eq!(sim.airports().len(), TEST_AIRPORTS.len());
        assert_eq!(sim.flights().len(), TEST_FLIGHTS.len());
        assert_eq!(sim.airports()[0].iata_code, "AEP");
    }
}
