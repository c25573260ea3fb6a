//! Keeps a map panel's markers and route lines in step with a stream of
//! flight snapshots.
//!
//! A [`FlightMap`] owns one [`PanelSession`] per container. Each call to
//! [`FlightMap::render_flights`] reconciles the panel against the new
//! snapshot, creating, moving or removing elements through a
//! [`DrawingSurface`] instead of redrawing everything.

pub mod config;
pub mod errors;
mod host;
mod marker_set;
pub mod memory;
pub mod reconciler;
mod registry;
mod snapshot;
pub mod surface;
pub mod types;

pub use config::{MapConfig, PrunePolicy, Viewport};
pub use errors::MapError;
pub use host::FlightMap;
pub use marker_set::{AircraftTransition, MarkerSet};
pub use reconciler::ReconcileSummary;
pub use registry::{PanelRegistry, PanelSession};
pub use snapshot::{RejectedEntry, Snapshot};
pub use surface::{DrawingSurface, SurfaceFactory};
pub use types::{Bounds, Coordinate, Endpoint, FlightSnapshot};
