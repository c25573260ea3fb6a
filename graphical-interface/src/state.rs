use flight_map::ReconcileSummary;
use log::warn;
use simulator::Airport;

use crate::feed::Provider;

/// Tracks the airport picked in the side list.
#[derive(Default)]
pub struct SelectionState {
    pub airport: Option<Airport>,
}

impl SelectionState {
    pub fn new() -> SelectionState {
        Self::default()
    }

    /// If the provided airport is already selected, it will be deselected.
    /// Otherwise, it will be selected.
    pub fn toggle_airport_selection(&mut self, airport: &Airport) {
        if self.airport.as_ref() == Some(airport) {
            self.airport = None;
        } else {
            self.airport = Some(airport.clone());
        }
    }
}

/// Tracks what the cockpit shows besides the map itself.
pub struct ViewState {
    pub airports: Vec<Airport>,
    /// Last payload rendered on the map, kept to frame it on demand.
    pub last_payload: Option<String>,
    pub last_summary: Option<ReconcileSummary>,
    pub last_error: Option<String>,
    /// Whether new snapshots keep being rendered on every tick.
    pub live: bool,
}

impl ViewState {
    pub fn new(airports: Vec<Airport>) -> Self {
        Self {
            airports,
            last_payload: None,
            last_summary: None,
            last_error: None,
            live: true,
        }
    }

    pub fn update_airports<P: Provider>(&mut self, provider: &mut P) {
        match provider.get_airports() {
            Ok(airports) => self.airports = airports,
            Err(e) => warn!("Failed to refresh airports: {}", e),
        }
    }
}
