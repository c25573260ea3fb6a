use chrono::{Duration, NaiveDateTime};
use simulator::{Airport, SimError, Simulation};

/// A source of airports and flight snapshots for the cockpit.
///
/// The cockpit polls it once per refresh tick and renders whatever payload
/// it returns, so implementors only need to say what the world looks like now.
pub trait Provider {
    fn get_airports(&mut self) -> Result<Vec<Airport>, SimError>;

    /// The current flights as a `{ "flights": [...] }` JSON payload.
    fn get_flights(&mut self) -> Result<String, SimError>;
}

/// Feeds the cockpit from an in-process simulation that moves forward a
/// fixed number of simulated minutes every time flights are polled.
pub struct SimulatedFeed {
    simulation: Simulation,
    minutes_per_poll: i64,
}

impl SimulatedFeed {
    pub fn new(simulation: Simulation, minutes_per_poll: i64) -> Result<Self, SimError> {
        if minutes_per_poll <= 0 {
            return Err(SimError::InvalidDuration(minutes_per_poll.to_string()));
        }

        Ok(Self {
            simulation,
            minutes_per_poll,
        })
    }

    pub fn with_test_data(start_time: NaiveDateTime, minutes_per_poll: i64) -> Result<Self, SimError> {
        Self::new(Simulation::with_test_data(start_time)?, minutes_per_poll)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }
}

impl Provider for SimulatedFeed {
    fn get_airports(&mut self) -> Result<Vec<Airport>, SimError> {
        Ok(self.simulation.airports().into_iter().cloned().collect())
    }

    fn get_flights(&mut self) -> Result<String, SimError> {
        let next = self.simulation.current_time() + Duration::minutes(self.minutes_per_poll);
        self.simulation.advance(next);
        self.simulation.payload()
    }
}
