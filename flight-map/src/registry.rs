use std::collections::HashMap;

use log::{debug, info};

use crate::{
    config::Viewport,
    errors::MapError,
    marker_set::MarkerSet,
    surface::{DrawingSurface, SurfaceFactory},
};

/// A live panel: its drawing surface and the marker sets drawn on it.
#[derive(Debug)]
pub struct PanelSession<S: DrawingSurface> {
    container_id: String,
    surface: S,
    marker_sets: HashMap<String, MarkerSet>,
}

impl<S: DrawingSurface> PanelSession<S> {
    pub fn new(container_id: &str, surface: S) -> Self {
        Self {
            container_id: container_id.to_string(),
            surface,
            marker_sets: HashMap::new(),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn marker_sets(&self) -> &HashMap<String, MarkerSet> {
        &self.marker_sets
    }

    pub fn marker_set(&self, flight_number: &str) -> Option<&MarkerSet> {
        self.marker_sets.get(flight_number)
    }

    /// Split borrow used by the reconciler.
    pub(crate) fn parts_mut(&mut self) -> (&mut S, &mut HashMap<String, MarkerSet>) {
        (&mut self.surface, &mut self.marker_sets)
    }

    /// Releases the surface, taking every element of every flight with it.
    fn release(mut self) {
        self.marker_sets.clear();
        self.surface.release();
    }
}

/// One session per container, created on demand.
///
/// Every surface acquired from the factory is released exactly once: by
/// [`PanelRegistry::cleanup`], by [`PanelRegistry::reset`], or when the
/// registry is dropped.
pub struct PanelRegistry<F: SurfaceFactory> {
    factory: F,
    viewport: Viewport,
    sessions: HashMap<String, PanelSession<F::Surface>>,
}

impl<F: SurfaceFactory> PanelRegistry<F> {
    pub fn new(factory: F, viewport: Viewport) -> Self {
        Self {
            factory,
            viewport,
            sessions: HashMap::new(),
        }
    }

    /// Returns the session of `container_id`, creating it if needed.
    ///
    /// When the factory fails nothing is registered.
    pub fn resolve(&mut self, container_id: &str) -> Result<&mut PanelSession<F::Surface>, MapError> {
        if !self.sessions.contains_key(container_id) {
            let surface = self.factory.acquire(container_id, &self.viewport)?;
            info!("Created map panel {}", container_id);
            self.sessions.insert(
                container_id.to_string(),
                PanelSession::new(container_id, surface),
            );
        }

        self.sessions
            .get_mut(container_id)
            .ok_or_else(|| MapError::ContainerNotFound(container_id.to_string()))
    }

    /// Throws away the current session of `container_id`, if any, and starts a new one.
    pub fn reset(&mut self, container_id: &str) -> Result<&mut PanelSession<F::Surface>, MapError> {
        self.cleanup(container_id);
        self.resolve(container_id)
    }

    /// Releases the session of `container_id`. Returns whether there was one.
    pub fn cleanup(&mut self, container_id: &str) -> bool {
        match self.sessions.remove(container_id) {
            Some(session) => {
                debug!(
                    "Releasing map panel {} with {} flights",
                    container_id,
                    session.marker_sets.len()
                );
                session.release();
                true
            }
            None => false,
        }
    }

    pub fn cleanup_all(&mut self) {
        for (_, session) in self.sessions.drain() {
            session.release();
        }
    }

    pub fn session(&self, container_id: &str) -> Option<&PanelSession<F::Surface>> {
        self.sessions.get(container_id)
    }

    pub fn contains(&self, container_id: &str) -> bool {
        self.sessions.contains_key(container_id)
    }

    pub fn container_ids(&self) -> Vec<&str> {
        self.sessions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

impl<F: SurfaceFactory> Drop for PanelRegistry<F> {
    fn drop(&mut self) {
        self.cleanup_all();
    }
}
