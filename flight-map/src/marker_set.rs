use crate::{
    surface::{DrawingSurface, Handle, LineHandle, LineStyle, MarkerHandle, MarkerStyle},
    types::FlightSnapshot,
};

/// What happened to a flight's aircraft marker during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AircraftTransition {
    Moved,
    /// The marker existed but had been detached from the surface.
    Reattached,
    Created,
    Removed,
    Unchanged,
}

/// The live elements of one flight on one panel.
///
/// Endpoint markers and the route line live as long as the set itself. The
/// aircraft marker comes and goes with the flight's live position.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSet {
    departure: MarkerHandle,
    arrival: MarkerHandle,
    route: LineHandle,
    aircraft: Option<MarkerHandle>,
}

impl MarkerSet {
    /// Creates and attaches every element of a flight seen for the first time.
    pub(crate) fn create<S: DrawingSurface>(surface: &mut S, flight: &FlightSnapshot) -> Self {
        let departure = surface.create_marker(
            flight.departure.position,
            &MarkerStyle::departure(&flight.departure.code),
        );
        let arrival = surface.create_marker(
            flight.arrival.position,
            &MarkerStyle::arrival(&flight.arrival.code),
        );
        let route = surface.create_line(&flight.route_points(), &LineStyle::ROUTE);
        let aircraft = create_aircraft(surface, flight);

        surface.attach(departure.into());
        surface.attach(arrival.into());
        surface.attach(route.into());

        Self {
            departure,
            arrival,
            route,
            aircraft,
        }
    }

    /// Brings an existing set in line with a new snapshot of its flight.
    pub(crate) fn update<S: DrawingSurface>(
        &mut self,
        surface: &mut S,
        flight: &FlightSnapshot,
    ) -> AircraftTransition {
        surface.set_marker_position(self.departure, flight.departure.position);
        surface.set_marker_position(self.arrival, flight.arrival.position);

        let transition = match (flight.position, self.aircraft) {
            (Some(position), Some(aircraft)) => {
                surface.set_marker_position(aircraft, position);
                if let Some(label) = flight.aircraft_label() {
                    surface.set_marker_tooltip(aircraft, &label);
                }
                if surface.is_attached(aircraft.into()) {
                    AircraftTransition::Moved
                } else {
                    surface.attach(aircraft.into());
                    AircraftTransition::Reattached
                }
            }
            (Some(_), None) => {
                self.aircraft = create_aircraft(surface, flight);
                AircraftTransition::Created
            }
            (None, Some(aircraft)) => {
                surface.discard(aircraft.into());
                self.aircraft = None;
                AircraftTransition::Removed
            }
            (None, None) => AircraftTransition::Unchanged,
        };

        surface.set_line_points(self.route, &flight.route_points());

        transition
    }

    /// Detaches and discards every element of the set.
    pub(crate) fn teardown<S: DrawingSurface>(self, surface: &mut S) {
        for handle in self.handles() {
            surface.discard(handle);
        }
    }

    pub fn departure(&self) -> MarkerHandle {
        self.departure
    }

    pub fn arrival(&self) -> MarkerHandle {
        self.arrival
    }

    pub fn route(&self) -> LineHandle {
        self.route
    }

    pub fn aircraft(&self) -> Option<MarkerHandle> {
        self.aircraft
    }

    pub fn handles(&self) -> Vec<Handle> {
        let mut handles = vec![
            self.departure.into(),
            self.arrival.into(),
            self.route.into(),
        ];
        if let Some(aircraft) = self.aircraft {
            handles.push(aircraft.into());
        }
        handles
    }
}

fn create_aircraft<S: DrawingSurface>(
    surface: &mut S,
    flight: &FlightSnapshot,
) -> Option<MarkerHandle> {
    let position = flight.position?;
    let label = flight.aircraft_label()?;

    let aircraft = surface.create_marker(position, &MarkerStyle::aircraft(label));
    surface.attach(aircraft.into());
    Some(aircraft)
}
