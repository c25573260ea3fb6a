use std::f64::consts::PI;

use chrono::NaiveDateTime;
use flight_map::{Coordinate, FlightSnapshot};

use super::{airport::Airport, flight_status::FlightStatus, sim_error::SimError};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Represents a flight in the simulator, including its status, route and
/// current position.
#[derive(Debug, Clone)]
pub struct Flight {
    pub flight_number: String,
    pub status: FlightStatus,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub origin: Airport,
    pub destination: Airport,
    pub latitude: f64,
    pub longitude: f64,
    pub angle: f32,
    pub total_distance: f64,
    pub distance_traveled: f64,
    pub average_speed: i32,
}

impl Flight {
    /// Creates a scheduled flight sitting at its origin.
    pub fn new(
        flight_number: &str,
        origin: Airport,
        destination: Airport,
        departure_time: NaiveDateTime,
        arrival_time: NaiveDateTime,
        average_speed: i32,
    ) -> Result<Self, SimError> {
        if flight_number.trim().is_empty() {
            return Err(SimError::InvalidFlight("empty flight number".to_string()));
        }
        if arrival_time <= departure_time || average_speed <= 0 {
            return Err(SimError::InvalidInput);
        }

        let total_distance = haversine_distance(
            origin.latitude(),
            origin.longitude(),
            destination.latitude(),
            destination.longitude(),
        );
        if total_distance <= 0.0 {
            return Err(SimError::InvalidFlight(format!(
                "{} departs from and arrives at {}",
                flight_number, origin.iata_code
            )));
        }

        let mut flight = Flight {
            flight_number: flight_number.to_string(),
            status: FlightStatus::Scheduled,
            departure_time,
            arrival_time,
            latitude: origin.latitude(),
            longitude: origin.longitude(),
            origin,
            destination,
            angle: 0.0,
            total_distance,
            distance_traveled: 0.0,
            average_speed,
        };

        flight.angle = flight.calculate_bearing() as f32;

        Ok(flight)
    }

    /// Bearing from the current position to the destination, in degrees.
    fn calculate_bearing(&self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();
        let lat2 = self.destination.latitude().to_radians();
        let lon2 = self.destination.longitude().to_radians();

        let delta_lon = lon2 - lon1;

        let y = delta_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
        let bearing = y.atan2(x).to_degrees();

        (bearing + 360.0) % 360.0
    }

    fn calculate_position(&mut self, current_time: NaiveDateTime) {
        let elapsed_hours = current_time
            .signed_duration_since(self.departure_time)
            .num_seconds() as f64
            / 3600.0;

        self.distance_traveled = (self.average_speed as f64 * elapsed_hours)
            .clamp(0.0, self.total_distance);
        let progress_ratio = self.distance_traveled / self.total_distance;
        self.latitude = self.origin.latitude()
            + progress_ratio * (self.destination.latitude() - self.origin.latitude());
        self.longitude = self.origin.longitude()
            + progress_ratio * (self.destination.longitude() - self.origin.longitude());
    }

    /// Advances the flight to `current_time`. Returns whether its status changed.
    pub fn check_states_and_update_flight(&mut self, current_time: NaiveDateTime) -> bool {
        let previous = self.status;

        match self.status {
            FlightStatus::Scheduled => {
                if current_time >= self.departure_time {
                    self.status = FlightStatus::OnTime;
                    self.calculate_position(current_time);
                }
            }
            FlightStatus::OnTime | FlightStatus::Delayed => {
                self.calculate_position(current_time);
                if self.distance_traveled >= self.total_distance {
                    self.land_at_destination();
                } else if current_time >= self.arrival_time {
                    self.status = FlightStatus::Delayed;
                }
            }
            FlightStatus::Canceled => {
                self.latitude = self.origin.latitude();
                self.longitude = self.origin.longitude();
            }
            FlightStatus::Finished => {}
        }

        if self.status.is_airborne() {
            self.angle = self.calculate_bearing() as f32;
        }

        self.status != previous
    }

    pub fn cancel(&mut self) {
        if !matches!(self.status, FlightStatus::Finished) {
            self.status = FlightStatus::Canceled;
            self.latitude = self.origin.latitude();
            self.longitude = self.origin.longitude();
        }
    }

    fn land_at_destination(&mut self) {
        self.status = FlightStatus::Finished;
        self.distance_traveled = self.total_distance;
        self.latitude = self.destination.latitude();
        self.longitude = self.destination.longitude();
    }

    /// Current position, present only while the flight is in the air.
    pub fn position(&self) -> Option<Coordinate> {
        if self.status.is_airborne() {
            Coordinate::new(self.latitude, self.longitude).ok()
        } else {
            None
        }
    }

    /// The flight as the map sees it right now.
    pub fn snapshot(&self) -> FlightSnapshot {
        FlightSnapshot::new(
            self.flight_number.clone(),
            self.origin.endpoint(),
            self.destination.endpoint(),
            self.position(),
        )
    }
}

fn haversine_distance(origin_lat: f64, origin_lon: f64, dest_lat: f64, dest_lon: f64) -> f64 {
    let origin_lat_rad = origin_lat * PI / 180.0;
    let origin_lon_rad = origin_lon * PI / 180.0;
    let dest_lat_rad = dest_lat * PI / 180.0;
    let dest_lon_rad = dest_lon * PI / 180.0;

    let delta_lat = dest_lat_rad - origin_lat_rad;
    let delta_lon = dest_lon_rad - origin_lon_rad;

    let a = (delta_lat / 2.0).sin().powi(2)
        + origin_lat_rad.cos() * dest_lat_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
