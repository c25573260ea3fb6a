use std::{cell::RefCell, collections::BTreeMap, collections::HashMap, rc::Rc};

use egui::Context;
use flight_map::{
    surface::{
        DrawingSurface, Handle, LineHandle, LineStyle, MarkerHandle, MarkerStyle, Padding,
        SurfaceFactory,
    },
    Bounds, Coordinate, MapError, Viewport,
};
use log::debug;

/// A marker as the map plugin draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayer {
    pub position: Coordinate,
    pub style: MarkerStyle,
    pub attached: bool,
}

/// A polyline as the map plugin draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    pub points: Vec<Coordinate>,
    pub style: LineStyle,
    pub attached: bool,
}

/// Camera change asked by a surface, applied by the app on its next frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewRequest {
    Center { center: Coordinate, zoom: f64 },
    Fit { bounds: Bounds, padding: Padding },
}

/// Everything drawn on one map container.
///
/// Elements are kept in creation order so routes end up below the markers
/// of their flight and aircraft above their airports.
#[derive(Debug, Default)]
pub struct Layers {
    markers: BTreeMap<u64, MarkerLayer>,
    lines: BTreeMap<u64, LineLayer>,
    next_id: u64,
    view_request: Option<ViewRequest>,
}

pub type SharedLayers = Rc<RefCell<Layers>>;

impl Layers {
    pub fn attached_markers(&self) -> impl Iterator<Item = &MarkerLayer> {
        self.markers.values().filter(|marker| marker.attached)
    }

    pub fn attached_lines(&self) -> impl Iterator<Item = &LineLayer> {
        self.lines.values().filter(|line| line.attached)
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&MarkerLayer> {
        self.markers.get(&handle.0)
    }

    pub fn line(&self, handle: LineHandle) -> Option<&LineLayer> {
        self.lines.get(&handle.0)
    }

    /// Hands the pending camera change over to the caller, leaving none behind.
    pub fn take_view_request(&mut self) -> Option<ViewRequest> {
        self.view_request.take()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn set_attached(&mut self, handle: Handle, attached: bool) {
        match handle {
            Handle::Marker(MarkerHandle(id)) => {
                if let Some(marker) = self.markers.get_mut(&id) {
                    marker.attached = attached;
                }
            }
            Handle::Line(LineHandle(id)) => {
                if let Some(line) = self.lines.get_mut(&id) {
                    line.attached = attached;
                }
            }
        }
    }

    fn clear(&mut self) {
        self.markers.clear();
        self.lines.clear();
        self.view_request = None;
    }
}

/// A [`DrawingSurface`] backed by the layers of a walkers map.
pub struct WalkersSurface {
    container_id: String,
    layers: SharedLayers,
}

impl WalkersSurface {
    pub(crate) fn new(container_id: &str, layers: SharedLayers, viewport: &Viewport) -> Self {
        {
            let mut layers = layers.borrow_mut();
            layers.clear();
            layers.view_request = Some(ViewRequest::Center {
                center: viewport.center,
                zoom: viewport.zoom,
            });
        }

        Self {
            container_id: container_id.to_string(),
            layers,
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }
}

impl DrawingSurface for WalkersSurface {
    fn create_marker(&mut self, position: Coordinate, style: &MarkerStyle) -> MarkerHandle {
        let mut layers = self.layers.borrow_mut();
        let id = layers.next_id();
        layers.markers.insert(
            id,
            MarkerLayer {
                position,
                style: style.clone(),
                attached: false,
            },
        );
        MarkerHandle(id)
    }

    fn set_marker_position(&mut self, handle: MarkerHandle, position: Coordinate) {
        if let Some(marker) = self.layers.borrow_mut().markers.get_mut(&handle.0) {
            marker.position = position;
        }
    }

    fn set_marker_tooltip(&mut self, handle: MarkerHandle, tooltip: &str) {
        if let Some(marker) = self.layers.borrow_mut().markers.get_mut(&handle.0) {
            marker.style.tooltip = Some(tooltip.to_string());
        }
    }

    fn attach(&mut self, handle: Handle) {
        self.layers.borrow_mut().set_attached(handle, true);
    }

    fn detach(&mut self, handle: Handle) {
        self.layers.borrow_mut().set_attached(handle, false);
    }

    fn discard(&mut self, handle: Handle) {
        let mut layers = self.layers.borrow_mut();
        match handle {
            Handle::Marker(MarkerHandle(id)) => {
                layers.markers.remove(&id);
            }
            Handle::Line(LineHandle(id)) => {
                layers.lines.remove(&id);
            }
        }
    }

    fn is_attached(&self, handle: Handle) -> bool {
        let layers = self.layers.borrow();
        match handle {
            Handle::Marker(handle) => layers.marker(handle).is_some_and(|m| m.attached),
            Handle::Line(handle) => layers.line(handle).is_some_and(|l| l.attached),
        }
    }

    fn create_line(&mut self, points: &[Coordinate], style: &LineStyle) -> LineHandle {
        let mut layers = self.layers.borrow_mut();
        let id = layers.next_id();
        layers.lines.insert(
            id,
            LineLayer {
                points: points.to_vec(),
                style: *style,
                attached: false,
            },
        );
        LineHandle(id)
    }

    fn set_line_points(&mut self, handle: LineHandle, points: &[Coordinate]) {
        if let Some(line) = self.layers.borrow_mut().lines.get_mut(&handle.0) {
            line.points = points.to_vec();
        }
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: Padding) {
        self.layers.borrow_mut().view_request = Some(ViewRequest::Fit {
            bounds: *bounds,
            padding,
        });
    }

    fn release(&mut self) {
        debug!("[{}] releasing map layers", self.container_id);
        self.layers.borrow_mut().clear();
    }
}

/// The map containers of the window, handed out as [`WalkersSurface`]s.
///
/// Surfaces can only be acquired once the egui context is known.
#[derive(Default)]
pub struct Containers {
    slots: HashMap<String, SharedLayers>,
    ctx: Option<Context>,
}

impl Containers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(ctx: Context) -> Self {
        Self {
            slots: HashMap::new(),
            ctx: Some(ctx),
        }
    }

    /// Declares a container and returns the layers its surface will draw into.
    pub fn declare(&mut self, container_id: &str) -> SharedLayers {
        Rc::clone(
            self.slots
                .entry(container_id.to_string())
                .or_insert_with(|| Rc::new(RefCell::new(Layers::default()))),
        )
    }
}

impl SurfaceFactory for Containers {
    type Surface = WalkersSurface;

    fn acquire(
        &mut self,
        container_id: &str,
        viewport: &Viewport,
    ) -> Result<WalkersSurface, MapError> {
        let ctx = self.ctx.as_ref().ok_or_else(|| {
            MapError::BackendUnavailable("egui context is not ready".to_string())
        })?;

        let layers = self
            .slots
            .get(container_id)
            .ok_or_else(|| MapError::ContainerNotFound(container_id.to_string()))?;

        ctx.request_repaint();
        Ok(WalkersSurface::new(container_id, Rc::clone(layers), viewport))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_map::{Endpoint, FlightMap, FlightSnapshot, MapConfig, Snapshot};

    fn coordinate(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn surface() -> (WalkersSurface, SharedLayers) {
        let layers = SharedLayers::default();
        let surface = WalkersSurface::new("map-1", Rc::clone(&layers), &Viewport::default());
        (surface, layers)
    }

    #[test]
    fn test_new_surface_requests_initial_view() {
        let (_, layers) = surface();
        let viewport = Viewport::default();

        assert_eq!(
            layers.borrow_mut().take_view_request(),
            Some(ViewRequest::Center {
                center: viewport.center,
                zoom: viewport.zoom
            })
        );
        assert_eq!(layers.borrow_mut().take_view_request(), None);
    }

    #[test]
    fn test_only_attached_elements_are_drawn() {
        let (mut surface, layers) = surface();

        let marker = surface.create_marker(coordinate(1.0, 2.0), &MarkerStyle::departure("FRA"));
        let line = surface.create_line(
            &[coordinate(1.0, 2.0), coordinate(3.0, 4.0)],
            &LineStyle::ROUTE,
        );
        assert_eq!(layers.borrow().attached_markers().count(), 0);

        surface.attach(marker.into());
        surface.attach(line.into());
        assert!(surface.is_attached(marker.into()));
        assert_eq!(layers.borrow().attached_lines().count(), 1);

        surface.detach(marker.into());
        surface.detach(marker.into());
        assert!(!surface.is_attached(marker.into()));
        assert_eq!(layers.borrow().attached_markers().count(), 0);
    }

    #[test]
    fn test_updates_reach_the_layers() {
        let (mut surface, layers) = surface();
        let marker = surface.create_marker(
            coordinate(1.0, 2.0),
            &MarkerStyle::aircraft("old".to_string()),
        );
        let line = surface.create_line(&[coordinate(1.0, 2.0)], &LineStyle::ROUTE);

        surface.set_marker_position(marker, coordinate(5.0, 6.0));
        surface.set_marker_tooltip(marker, "new");
        surface.set_line_points(line, &[coordinate(0.0, 0.0), coordinate(1.0, 1.0)]);

        let layers = layers.borrow();
        let drawn = layers.marker(marker).unwrap();
        assert_eq!(drawn.position, coordinate(5.0, 6.0));
        assert_eq!(drawn.style.tooltip.as_deref(), Some("new"));
        assert_eq!(layers.line(line).unwrap().points.len(), 2);
    }

    #[test]
    fn test_discard_drops_the_element() {
        let (mut surface, layers) = surface();
        let marker = surface.create_marker(
            coordinate(1.0, 2.0),
            &MarkerStyle::aircraft("LH1".to_string()),
        );
        let line = surface.create_line(&[coordinate(1.0, 2.0)], &LineStyle::ROUTE);
        surface.attach(marker.into());
        surface.attach(line.into());

        surface.discard(marker.into());
        surface.discard(line.into());
        surface.discard(marker.into());

        assert!(!surface.is_attached(marker.into()));
        let layers = layers.borrow();
        assert!(layers.marker(marker).is_none());
        assert!(layers.line(line).is_none());
        assert_eq!(layers.attached_markers().count(), 0);
    }

    #[test]
    fn test_release_empties_the_layers() {
        let (mut surface, layers) = surface();
        let marker = surface.create_marker(coordinate(1.0, 2.0), &MarkerStyle::arrival("LIS"));
        surface.attach(marker.into());
        surface.fit_bounds(
            &Bounds::covering(&[coordinate(1.0, 2.0)]).unwrap(),
            Padding::uniform(50.0),
        );

        surface.release();

        let mut layers = layers.borrow_mut();
        assert!(layers.marker(marker).is_none());
        assert!(layers.take_view_request().is_none());
    }

    #[test]
    fn test_acquire_without_context() {
        let mut containers = Containers::new();
        containers.declare("map-1");

        let result = containers.acquire("map-1", &Viewport::default());
        assert!(matches!(result, Err(MapError::BackendUnavailable(_))));
    }

    #[test]
    fn test_acquire_unknown_container() {
        let mut containers = Containers::with_context(Context::default());

        let result = containers.acquire("map-404", &Viewport::default());
        assert!(matches!(result, Err(MapError::ContainerNotFound(_))));
    }

    #[test]
    fn test_flight_map_draws_into_declared_container() {
        let mut containers = Containers::with_context(Context::default());
        let layers = containers.declare("map-1");
        let mut map = FlightMap::new(containers, MapConfig::default());

        let flight = FlightSnapshot::new(
            "LH1234",
            Endpoint::new("FRA", coordinate(50.033333, 8.570556)),
            Endpoint::new("LIS", coordinate(38.7613, -9.1357)),
            Some(coordinate(45.0, 0.0)),
        );
        map.render_snapshot("map-1", &Snapshot::new(vec![flight]))
            .unwrap();

        let layers = layers.borrow();
        assert_eq!(layers.attached_markers().count(), 3);
        let route: Vec<_> = layers.attached_lines().collect();
        assert_eq!(route.len(), 1);
        assert_eq!(route[0].points.len(), 3);
    }
}
