use std::collections::HashSet;

use log::{debug, warn};

use crate::{
    config::PrunePolicy,
    errors::MapError,
    marker_set::{AircraftTransition, MarkerSet},
    registry::PanelSession,
    snapshot::Snapshot,
    surface::{DrawingSurface, Padding},
    types::{Bounds, Coordinate, FlightSnapshot},
};

/// Counts of what one reconciliation did to a panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub pruned: usize,
    pub failed: usize,
    pub aircraft_created: usize,
    pub aircraft_removed: usize,
}

/// Brings a session's marker sets in line with `snapshot`.
///
/// Flights are handled in snapshot order. A flight that cannot be rendered is
/// logged and skipped, the others still go through. Entries the snapshot
/// already rejected while decoding are logged here as well.
pub fn apply<S: DrawingSurface>(
    session: &mut PanelSession<S>,
    snapshot: &Snapshot,
    policy: PrunePolicy,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();
    let container_id = session.container_id().to_string();

    for entry in &snapshot.rejected {
        warn!(
            "[{}] skipping flight entry {} ({}): {}",
            container_id,
            entry.index,
            entry.flight_number.as_deref().unwrap_or("unknown"),
            entry.error
        );
        summary.failed += 1;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let (surface, marker_sets) = session.parts_mut();

    for flight in &snapshot.flights {
        if let Err(error) = check_flight(flight, &mut seen) {
            warn!("[{}] {}", container_id, error);
            summary.failed += 1;
            continue;
        }

        match marker_sets.get_mut(&flight.flight_number) {
            Some(existing) => {
                match existing.update(surface, flight) {
                    AircraftTransition::Created => summary.aircraft_created += 1,
                    AircraftTransition::Removed => summary.aircraft_removed += 1,
                    AircraftTransition::Reattached => debug!(
                        "[{}] re-attached aircraft marker of {}",
                        container_id, flight.flight_number
                    ),
                    AircraftTransition::Moved | AircraftTransition::Unchanged => {}
                }
                summary.updated += 1;
            }
            None => {
                let marker_set = MarkerSet::create(surface, flight);
                if marker_set.aircraft().is_some() {
                    summary.aircraft_created += 1;
                }
                marker_sets.insert(flight.flight_number.clone(), marker_set);
                summary.created += 1;
            }
        }
    }

    if policy == PrunePolicy::PruneAbsent {
        let named: HashSet<&str> = snapshot.named_flights().collect();
        let stale: Vec<String> = marker_sets
            .keys()
            .filter(|flight_number| !named.contains(flight_number.as_str()))
            .cloned()
            .collect();

        for flight_number in stale {
            if let Some(marker_set) = marker_sets.remove(&flight_number) {
                debug!("[{}] pruning flight {}", container_id, flight_number);
                marker_set.teardown(surface);
                summary.pruned += 1;
            }
        }
    }

    summary
}

fn check_flight<'a>(flight: &'a FlightSnapshot, seen: &mut HashSet<&'a str>) -> Result<(), MapError> {
    flight.validate()?;
    if !seen.insert(flight.flight_number.as_str()) {
        return Err(MapError::flight_failure(
            &flight.flight_number,
            "repeated in the same snapshot",
        ));
    }
    Ok(())
}

/// Every departure, arrival and live position of `flights`.
pub fn content_points(flights: &[FlightSnapshot]) -> Vec<Coordinate> {
    flights
        .iter()
        .flat_map(|flight| {
            [Some(flight.departure.position), Some(flight.arrival.position), flight.position]
        })
        .flatten()
        .collect()
}

/// Frames the session's viewport around everything in `flights`.
///
/// Does nothing and returns `None` for an empty flight list.
pub fn fit_to_content<S: DrawingSurface>(
    session: &mut PanelSession<S>,
    flights: &[FlightSnapshot],
    padding: Padding,
) -> Option<Bounds> {
    let bounds = Bounds::covering(&content_points(flights))?;
    session.surface_mut().fit_bounds(&bounds, padding);
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        memory::MemorySurface,
        surface::MarkerRole,
        types::Endpoint,
    };

    fn coordinate(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn flight(number: &str, position: Option<(f64, f64)>) -> FlightSnapshot {
        FlightSnapshot::new(
            number,
            Endpoint::new("FRA", coordinate(50.033333, 8.570556)),
            Endpoint::new("LIS", coordinate(38.7613, -9.1357)),
            position.map(|(lat, lon)| coordinate(lat, lon)),
        )
    }

    fn session() -> PanelSession<MemorySurface> {
        PanelSession::new("map-1", MemorySurface::new("map-1"))
    }

    #[test]
    fn test_first_snapshot_creates_sets() {
        let mut session = session();
        let snapshot = Snapshot::new(vec![flight("LH1", None), flight("LH2", Some((45.0, 0.0)))]);

        let summary = apply(&mut session, &snapshot, PrunePolicy::Retain);

        assert_eq!(summary.created, 2);
        assert_eq!(summary.aircraft_created, 1);
        assert_eq!(session.marker_sets().len(), 2);
        assert!(session.marker_set("LH1").unwrap().aircraft().is_none());
        assert!(session.marker_set("LH2").unwrap().aircraft().is_some());
    }

    #[test]
    fn test_second_snapshot_updates_in_place() {
        let mut session = session();
        apply(&mut session, &Snapshot::new(vec![flight("LH1", None)]), PrunePolicy::Retain);
        let before = session.marker_set("LH1").unwrap().clone();

        let summary = apply(
            &mut session,
            &Snapshot::new(vec![flight("LH1", Some((45.0, 0.0)))]),
            PrunePolicy::Retain,
        );
        let after = session.marker_set("LH1").unwrap();

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.created, 0);
        assert_eq!(before.departure(), after.departure());
        assert_eq!(before.arrival(), after.arrival());
        assert_eq!(before.route(), after.route());
    }

    #[test]
    fn test_moved_arrival_keeps_its_marker() {
        let mut session = session();
        apply(&mut session, &Snapshot::new(vec![flight("LH1", None)]), PrunePolicy::Retain);
        let arrival = session.marker_set("LH1").unwrap().arrival();

        let moved = Endpoint::new("LIS", coordinate(38.0, -9.0));
        let snapshot = Snapshot::new(vec![FlightSnapshot::new(
            "LH1",
            Endpoint::new("FRA", coordinate(50.033333, 8.570556)),
            moved.clone(),
            None,
        )]);
        apply(&mut session, &snapshot, PrunePolicy::Retain);

        let set = session.marker_set("LH1").unwrap();
        assert_eq!(set.arrival(), arrival);
        assert_eq!(session.surface().marker(arrival).unwrap().position, moved.position);
        assert_eq!(
            session.surface().line(set.route()).unwrap().points.last(),
            Some(&moved.position)
        );
    }

    #[test]
    fn test_invalid_flight_is_skipped() {
        let mut session = session();
        let snapshot = Snapshot::new(vec![flight("", None), flight("LH2", None)]);

        let summary = apply(&mut session, &snapshot, PrunePolicy::Retain);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(session.marker_sets().len(), 1);
    }

    #[test]
    fn test_repeated_flight_number_renders_first_only() {
        let mut session = session();
        let snapshot = Snapshot::new(vec![
            flight("LH1", None),
            flight("LH1", Some((45.0, 0.0))),
        ]);

        let summary = apply(&mut session, &snapshot, PrunePolicy::Retain);

        assert_eq!(summary.failed, 1);
        assert!(session.marker_set("LH1").unwrap().aircraft().is_none());
    }

    #[test]
    fn test_retain_keeps_absent_flights() {
        let mut session = session();
        apply(
            &mut session,
            &Snapshot::new(vec![flight("LH1", None), flight("LH2", None)]),
            PrunePolicy::Retain,
        );
        apply(&mut session, &Snapshot::new(vec![flight("LH1", None)]), PrunePolicy::Retain);

        assert!(session.marker_set("LH2").is_some());
        assert_eq!(session.surface().attached_lines().len(), 2);
    }

    #[test]
    fn test_prune_absent_tears_down_missing_flights() {
        let mut session = session();
        apply(
            &mut session,
            &Snapshot::new(vec![flight("LH1", None), flight("LH2", Some((45.0, 0.0)))]),
            PrunePolicy::PruneAbsent,
        );
        let summary = apply(
            &mut session,
            &Snapshot::new(vec![flight("LH1", None)]),
            PrunePolicy::PruneAbsent,
        );

        assert_eq!(summary.pruned, 1);
        assert!(session.marker_set("LH2").is_none());
        assert_eq!(session.surface().attached_lines().len(), 1);
        assert!(session
            .surface()
            .attached_markers(MarkerRole::Aircraft)
            .is_empty());
    }

    #[test]
    fn test_prune_keeps_flights_with_rejected_entries() {
        let mut session = session();
        apply(&mut session, &Snapshot::new(vec![flight("LH1", None)]), PrunePolicy::PruneAbsent);

        let snapshot = Snapshot::parse(r#"{ "flights": [ { "flightNumber": "LH1" } ] }"#).unwrap();
        let summary = apply(&mut session, &snapshot, PrunePolicy::PruneAbsent);

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pruned, 0);
        assert!(session.marker_set("LH1").is_some());
    }

    #[test]
    fn test_fit_to_content() {
        let mut session = session();
        let flights = vec![flight("LH1", Some((45.0, 20.0)))];

        let bounds = fit_to_content(&mut session, &flights, Padding::uniform(50.0)).unwrap();

        assert_eq!(bounds.min_lat, 38.7613);
        assert_eq!(bounds.max_lat, 50.033333);
        assert_eq!(bounds.min_lon, -9.1357);
        assert_eq!(bounds.max_lon, 20.0);
        assert_eq!(session.surface().last_fit().unwrap().0, bounds);
    }

    #[test]
    fn test_fit_to_content_skips_empty() {
        let mut session = session();
        assert!(fit_to_content(&mut session, &[], Padding::uniform(50.0)).is_none());
        assert!(session.surface().last_fit().is_none());
    }
}
