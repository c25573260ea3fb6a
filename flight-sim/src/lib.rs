//! Moves flights between airports over simulated time and reports them as
//! flight map snapshots.

pub mod types;

pub use types::{
    airport::Airport, flight::Flight, flight_status::FlightStatus, sim_error::SimError,
    simulation::Simulation, timer::Timer, TICK_FREQUENCY_MILLIS,
};
