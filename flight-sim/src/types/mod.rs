pub const TICK_FREQUENCY_MILLIS: u64 = 2000;

pub mod airport;

pub mod flight_status;

pub mod sim_error;

pub mod timer;

pub mod simulation;

pub mod flight;
