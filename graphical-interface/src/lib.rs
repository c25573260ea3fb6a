mod feed;
mod fit;
mod layers;
mod map;
mod plugins;
mod state;
mod tiles;
mod widgets;
mod windows;

pub use feed::{Provider, SimulatedFeed};
pub use layers::{Containers, LineLayer, Layers, MarkerLayer, SharedLayers, ViewRequest, WalkersSurface};
use flight_map::MapConfig;
use map::CockpitApp;

/// Opens the cockpit window and renders `provider`'s flights until it is closed.
pub fn run<P: Provider + 'static>(config: MapConfig, provider: P) -> Result<(), eframe::Error> {
    eframe::run_native(
        "Sky Cockpit",
        Default::default(),
        Box::new(move |cc| Ok(Box::new(CockpitApp::new(cc.egui_ctx.clone(), config, provider)))),
    )
}
