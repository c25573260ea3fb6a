//! A headless drawing surface that keeps every element in memory.
//!
//! Useful wherever there is no real map to draw on: tests, batch checks, or
//! a host that only wants to know what would be on screen.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use crate::{
    config::Viewport,
    errors::MapError,
    surface::{
        DrawingSurface, Handle, LineHandle, LineStyle, MarkerHandle, MarkerRole, MarkerStyle,
        Padding, SurfaceFactory,
    },
    types::{Bounds, Coordinate},
};

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub position: Coordinate,
    pub style: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub points: Vec<Coordinate>,
    pub style: LineStyle,
}

/// In-memory [`DrawingSurface`].
#[derive(Debug)]
pub struct MemorySurface {
    container_id: String,
    next_id: u64,
    markers: HashMap<MarkerHandle, MarkerRecord>,
    lines: HashMap<LineHandle, LineRecord>,
    attached: HashSet<Handle>,
    center: Coordinate,
    zoom: f64,
    fits: Vec<(Bounds, Padding)>,
    released: bool,
    release_log: Option<ReleaseLog>,
}

impl MemorySurface {
    pub fn new(container_id: &str) -> Self {
        Self::with_viewport(container_id, &Viewport::default())
    }

    pub fn with_viewport(container_id: &str, viewport: &Viewport) -> Self {
        Self {
            container_id: container_id.to_string(),
            next_id: 0,
            markers: HashMap::new(),
            lines: HashMap::new(),
            attached: HashSet::new(),
            center: viewport.center,
            zoom: viewport.zoom,
            fits: Vec::new(),
            released: false,
            release_log: None,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&MarkerRecord> {
        self.markers.get(&handle)
    }

    pub fn line(&self, handle: LineHandle) -> Option<&LineRecord> {
        self.lines.get(&handle)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }

    /// Attached markers drawn with the given role.
    pub fn attached_markers(&self, role: MarkerRole) -> Vec<&MarkerRecord> {
        self.markers
            .iter()
            .filter(|(handle, record)| {
                record.style.role == role && self.attached.contains(&Handle::Marker(**handle))
            })
            .map(|(_, record)| record)
            .collect()
    }

    pub fn attached_lines(&self) -> Vec<&LineRecord> {
        self.lines
            .iter()
            .filter(|(handle, _)| self.attached.contains(&Handle::Line(**handle)))
            .map(|(_, record)| record)
            .collect()
    }

    /// Number of elements currently held, attached or not.
    pub fn stored_count(&self) -> usize {
        self.markers.len() + self.lines.len()
    }

    /// Number of elements ever created, attached or not.
    pub fn created_count(&self) -> u64 {
        self.next_id
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn last_fit(&self) -> Option<&(Bounds, Padding)> {
        self.fits.last()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl DrawingSurface for MemorySurface {
    fn create_marker(&mut self, position: Coordinate, style: &MarkerStyle) -> MarkerHandle {
        let handle = MarkerHandle(self.next_id());
        self.markers.insert(
            handle,
            MarkerRecord {
                position,
                style: style.clone(),
            },
        );
        handle
    }

    fn set_marker_position(&mut self, handle: MarkerHandle, position: Coordinate) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.position = position;
        }
    }

    fn set_marker_tooltip(&mut self, handle: MarkerHandle, tooltip: &str) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.style.tooltip = Some(tooltip.to_string());
        }
    }

    fn attach(&mut self, handle: Handle) {
        let known = match handle {
            Handle::Marker(marker) => self.markers.contains_key(&marker),
            Handle::Line(line) => self.lines.contains_key(&line),
        };
        if known {
            self.attached.insert(handle);
        }
    }

    fn detach(&mut self, handle: Handle) {
        self.attached.remove(&handle);
    }

    fn is_attached(&self, handle: Handle) -> bool {
        self.attached.contains(&handle)
    }

    fn discard(&mut self, handle: Handle) {
        self.attached.remove(&handle);
        match handle {
            Handle::Marker(marker) => {
                self.markers.remove(&marker);
            }
            Handle::Line(line) => {
                self.lines.remove(&line);
            }
        }
    }

    fn create_line(&mut self, points: &[Coordinate], style: &LineStyle) -> LineHandle {
        let handle = LineHandle(self.next_id());
        self.lines.insert(
            handle,
            LineRecord {
                points: points.to_vec(),
                style: *style,
            },
        );
        handle
    }

    fn set_line_points(&mut self, handle: LineHandle, points: &[Coordinate]) {
        if let Some(line) = self.lines.get_mut(&handle) {
            line.points = points.to_vec();
        }
    }

    fn fit_bounds(&mut self, bounds: &Bounds, padding: Padding) {
        let (lat, lon) = bounds.center();
        if let Ok(center) = Coordinate::new(lat, lon) {
            self.center = center;
        }
        self.fits.push((*bounds, padding));
    }

    fn release(&mut self) {
        self.attached.clear();
        self.markers.clear();
        self.lines.clear();
        self.released = true;
        if let Some(log) = &self.release_log {
            log.borrow_mut().push(self.container_id.clone());
        }
    }
}

/// Container ids of released surfaces, in release order.
pub type ReleaseLog = Rc<RefCell<Vec<String>>>;

/// Hands out [`MemorySurface`]s for a fixed set of declared containers.
#[derive(Debug, Default)]
pub struct MemoryFactory {
    containers: HashSet<String>,
    unavailable: bool,
    acquired: usize,
    release_log: ReleaseLog,
}

impl MemoryFactory {
    pub fn new<I, S>(containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            containers: containers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// A factory whose backend never comes up.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn declare(&mut self, container_id: &str) {
        self.containers.insert(container_id.to_string());
    }

    pub fn remove(&mut self, container_id: &str) {
        self.containers.remove(container_id);
    }

    pub fn acquired(&self) -> usize {
        self.acquired
    }

    pub fn release_log(&self) -> ReleaseLog {
        Rc::clone(&self.release_log)
    }
}

impl SurfaceFactory for MemoryFactory {
    type Surface = MemorySurface;

    fn acquire(&mut self, container_id: &str, viewport: &Viewport) -> Result<MemorySurface, MapError> {
        if self.unavailable {
            return Err(MapError::BackendUnavailable(
                "memory backend disabled".to_string(),
            ));
        }
        if !self.containers.contains(container_id) {
            return Err(MapError::ContainerNotFound(container_id.to_string()));
        }

        self.acquired += 1;
        let mut surface = MemorySurface::with_viewport(container_id, viewport);
        surface.release_log = Some(Rc::clone(&self.release_log));
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_elements_are_hidden_until_attached() {
        let mut surface = MemorySurface::new("map-1");
        let marker = surface.create_marker(coordinate(1.0, 2.0), &MarkerStyle::departure("FRA"));

        assert!(!surface.is_attached(marker.into()));
        surface.attach(marker.into());
        assert!(surface.is_attached(marker.into()));
        assert_eq!(surface.attached_markers(MarkerRole::Departure).len(), 1);
    }

    #[test]
    fn test_detach_is_idempotent() {
        let mut surface = MemorySurface::new("map-1");
        let line = surface.create_line(
            &[coordinate(1.0, 2.0), coordinate(3.0, 4.0)],
            &LineStyle::ROUTE,
        );

        surface.detach(line.into());
        surface.attach(line.into());
        surface.detach(line.into());
        surface.detach(line.into());
        assert!(!surface.is_attached(line.into()));
        assert!(surface.line(line).is_some());
    }

    #[test]
    fn test_discard_forgets_the_element() {
        let mut surface = MemorySurface::new("map-1");
        let marker = surface.create_marker(coordinate(1.0, 2.0), &MarkerStyle::departure("FRA"));
        surface.attach(marker.into());

        surface.discard(marker.into());
        surface.discard(marker.into());
        surface.attach(marker.into());

        assert!(surface.marker(marker).is_none());
        assert!(!surface.is_attached(marker.into()));
        assert_eq!(surface.stored_count(), 0);
    }

    #[test]
    fn test_release_clears_everything() {
        let mut factory = MemoryFactory::new(["map-1"]);
        let log = factory.release_log();
        let mut surface = factory.acquire("map-1", &Viewport::default()).unwrap();
        let marker = surface.create_marker(coordinate(1.0, 2.0), &MarkerStyle::arrival("LIS"));
        surface.attach(marker.into());

        surface.release();
        assert_eq!(surface.attached_count(), 0);
        assert!(surface.marker(marker).is_none());
        assert!(surface.is_released());
        assert_eq!(*log.borrow(), vec!["map-1".to_string()]);
    }

    #[test]
    fn test_factory_errors() {
        let mut factory = MemoryFactory::new(["map-1"]);
        assert!(matches!(
            factory.acquire("map-2", &Viewport::default()),
            Err(MapError::ContainerNotFound(_))
        ));

        let mut factory = MemoryFactory::unavailable();
        assert!(matches!(
            factory.acquire("map-1", &Viewport::default()),
            Err(MapError::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_fit_bounds_recenters() {
        let mut surface = MemorySurface::new("map-1");
        let bounds = Bounds::covering(&[coordinate(40.0, -10.0), coordinate(50.0, 10.0)]).unwrap();
        surface.fit_bounds(&bounds, Padding::uniform(50.0));

        assert_eq!(surface.center(), coordinate(45.0, 0.0));
        assert_eq!(surface.last_fit(), Some(&(bounds, Padding::uniform(50.0))));
    }
}
