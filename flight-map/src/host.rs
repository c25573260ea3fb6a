use log::{error, info};

use crate::{
    config::MapConfig,
    errors::MapError,
    reconciler::{self, ReconcileSummary},
    registry::{PanelRegistry, PanelSession},
    snapshot::Snapshot,
    surface::SurfaceFactory,
    types::Bounds,
};

/// Entry point for a UI that hosts flight map panels.
///
/// Owns the panel registry. Callers must not render or clear the same
/// container from two places at once; every call runs to completion before
/// returning.
pub struct FlightMap<F: SurfaceFactory> {
    registry: PanelRegistry<F>,
    config: MapConfig,
}

impl<F: SurfaceFactory> FlightMap<F> {
    pub fn new(factory: F, config: MapConfig) -> Self {
        Self {
            registry: PanelRegistry::new(factory, config.viewport.clone()),
            config,
        }
    }

    /// Decodes a JSON payload and renders it on `container_id`.
    ///
    /// The payload is decoded before the panel is touched, so a malformed
    /// payload leaves the panel as it was.
    pub fn render_flights(
        &mut self,
        container_id: &str,
        payload: &str,
    ) -> Result<ReconcileSummary, MapError> {
        let snapshot = Snapshot::parse(payload).inspect_err(|e| {
            error!("[{}] rejecting snapshot: {}", container_id, e);
        })?;
        self.render_snapshot(container_id, &snapshot)
    }

    /// Renders an already decoded snapshot on `container_id`.
    pub fn render_snapshot(
        &mut self,
        container_id: &str,
        snapshot: &Snapshot,
    ) -> Result<ReconcileSummary, MapError> {
        let session = self.registry.resolve(container_id).inspect_err(|e| {
            error!("[{}] cannot render flights: {}", container_id, e);
        })?;

        let summary = reconciler::apply(session, snapshot, self.config.prune);
        if self.config.auto_fit {
            reconciler::fit_to_content(session, &snapshot.flights, self.config.padding());
        }

        if summary.created > 0 || summary.pruned > 0 || summary.failed > 0 {
            info!(
                "[{}] rendered {} flights ({} new, {} pruned, {} failed)",
                container_id,
                snapshot.flights.len(),
                summary.created,
                summary.pruned,
                summary.failed
            );
        }

        Ok(summary)
    }

    /// Frames `container_id` around `snapshot`.
    pub fn fit_panel(
        &mut self,
        container_id: &str,
        snapshot: &Snapshot,
    ) -> Result<Option<Bounds>, MapError> {
        let padding = self.config.padding();
        let session = self.registry.resolve(container_id)?;
        Ok(reconciler::fit_to_content(session, &snapshot.flights, padding))
    }

    /// Removes the panel and everything drawn on it. Does nothing for an unknown container.
    pub fn clear_panel(&mut self, container_id: &str) {
        if self.registry.cleanup(container_id) {
            info!("[{}] cleared", container_id);
        }
    }

    /// Starts `container_id` over with an empty panel.
    pub fn reset_panel(&mut self, container_id: &str) -> Result<(), MapError> {
        self.registry.reset(container_id).map(|_| ())
    }

    pub fn panel(&self, container_id: &str) -> Option<&PanelSession<F::Surface>> {
        self.registry.session(container_id)
    }

    pub fn registry(&self) -> &PanelRegistry<F> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PanelRegistry<F> {
        &mut self.registry
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}
