use std::time::{Duration, Instant};

use egui::Context;
use flight_map::{FlightMap, MapConfig, Snapshot};
use log::{info, warn};
use uuid::Uuid;
use walkers::{HttpOptions, HttpTiles, Map, MapMemory, Position, Tiles};

use crate::{
    feed::Provider,
    fit,
    layers::{Containers, SharedLayers, ViewRequest},
    plugins,
    state::{SelectionState, ViewState},
    tiles::TileServer,
    widgets::WidgetAirports,
    windows::{self, PanelAction},
};

const UPDATE_TICK_MS: u64 = 1000;
const AIRPORT_ZOOM: f64 = 7.0;

/// The cockpit window: one live flight map panel fed by a [`Provider`].
///
/// Every tick the provider is polled and its payload rendered on the panel.
/// Camera changes asked by the panel are applied to the map memory before
/// the map is drawn.
pub struct CockpitApp<P: Provider> {
    tiles: Box<dyn Tiles>,
    map_memory: MapMemory,
    flight_map: FlightMap<Containers>,
    container_id: String,
    layers: SharedLayers,
    selection_state: SelectionState,
    view_state: ViewState,
    provider: P,
    last_update: Instant,
}

impl<P: Provider> CockpitApp<P> {
    pub fn new(egui_ctx: Context, config: MapConfig, mut provider: P) -> Self {
        let container_id = format!("map-{}", Uuid::new_v4());

        let mut containers = Containers::with_context(egui_ctx.clone());
        let layers = containers.declare(&container_id);

        let mut map_memory = MapMemory::default();
        windows::set_zoom(&mut map_memory, &config.viewport, config.viewport.zoom);

        let mut view_state = ViewState::new(vec![]);
        view_state.update_airports(&mut provider);

        info!("Cockpit started with panel {}", container_id);

        Self {
            tiles: Box::new(HttpTiles::with_options(
                TileServer::new(&config.viewport.tile_url),
                HttpOptions::default(),
                egui_ctx,
            )),
            map_memory,
            flight_map: FlightMap::new(containers, config),
            container_id,
            layers,
            selection_state: SelectionState::new(),
            view_state,
            provider,
            last_update: Instant::now()
                .checked_sub(Duration::from_millis(UPDATE_TICK_MS))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Polls the provider and renders its payload on the panel.
    fn refresh(&mut self) {
        let payload = match self.provider.get_flights() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to fetch flights: {}", e);
                self.view_state.last_error = Some(e.to_string());
                return;
            }
        };

        match self.flight_map.render_flights(&self.container_id, &payload) {
            Ok(summary) => {
                self.view_state.last_summary = Some(summary);
                self.view_state.last_error = None;
                self.view_state.last_payload = Some(payload);
            }
            Err(e) => self.view_state.last_error = Some(e.to_string()),
        }
    }

    fn handle_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::Fit => {
                let Some(payload) = &self.view_state.last_payload else {
                    return;
                };
                let result = Snapshot::parse(payload)
                    .and_then(|snapshot| self.flight_map.fit_panel(&self.container_id, &snapshot));
                if let Err(e) = result {
                    self.view_state.last_error = Some(e.to_string());
                }
            }
            PanelAction::Clear => {
                self.flight_map.clear_panel(&self.container_id);
                self.view_state.live = false;
                self.view_state.last_summary = None;
                self.view_state.last_payload = None;
            }
            PanelAction::Reset => {
                if let Err(e) = self.flight_map.reset_panel(&self.container_id) {
                    self.view_state.last_error = Some(e.to_string());
                }
                self.view_state.last_summary = None;
            }
        }
    }

    /// Applies the camera change the panel asked for, if any.
    fn apply_view_request(&mut self, width: f32, height: f32) {
        let Some(request) = self.layers.borrow_mut().take_view_request() else {
            return;
        };

        let viewport = &self.flight_map.config().viewport;
        let (center, zoom) = match request {
            ViewRequest::Center { center, zoom } => ((center.lat(), center.lon()), zoom),
            ViewRequest::Fit { bounds, padding } => {
                fit::fit_view(&bounds, padding, width, height, viewport)
            }
        };

        self.map_memory
            .center_at(Position::from_lat_lon(center.0, center.1));
        windows::set_zoom(&mut self.map_memory, viewport, zoom);
    }

    fn center_on_selected_airport(&mut self) {
        let Some(airport) = &self.selection_state.airport else {
            return;
        };

        self.map_memory
            .center_at(Position::from_lat_lon(airport.latitude(), airport.longitude()));
        windows::set_zoom(
            &mut self.map_memory,
            &self.flight_map.config().viewport,
            AIRPORT_ZOOM,
        );
    }
}

impl<P: Provider> eframe::App for CockpitApp<P> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.last_update.elapsed() >= Duration::from_millis(UPDATE_TICK_MS) {
            if self.view_state.live {
                self.refresh();
            }
            self.last_update = Instant::now();
        }

        ctx.request_repaint_after(Duration::from_millis(UPDATE_TICK_MS));

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| {
                let size = ui.available_size();
                self.apply_view_request(size.x, size.y);

                let viewport = self.flight_map.config().viewport.clone();
                let my_position = Position::from_lat_lon(viewport.center.lat(), viewport.center.lon());

                let map = Map::new(Some(self.tiles.as_mut()), &mut self.map_memory, my_position)
                    .with_plugin(plugins::Flights::new(self.layers.clone()));

                ui.add(map);

                let selected_before = self.selection_state.airport.clone();
                ui.add(WidgetAirports::new(&self.view_state, &mut self.selection_state));
                if self.selection_state.airport != selected_before {
                    self.center_on_selected_airport();
                }

                if let Some(action) = windows::controls(ui, &mut self.view_state) {
                    self.handle_action(action);
                }

                windows::zoom(ui, &mut self.map_memory, &viewport);
                windows::attribution(ui, &viewport);
            });
    }
}
