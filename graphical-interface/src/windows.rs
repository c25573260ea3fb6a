use egui::{Align2, RichText, Ui, Window};
use flight_map::Viewport;
use log::warn;
use walkers::MapMemory;

use crate::state::ViewState;

/// What the user asked the panel to do from the controls window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    Fit,
    Clear,
    Reset,
}

/// Zoom buttons, kept inside the viewport limits.
pub fn zoom(ui: &Ui, map_memory: &mut MapMemory, viewport: &Viewport) {
    Window::new("Zoom")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(Align2::LEFT_BOTTOM, [10., -10.])
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                let current = map_memory.zoom();

                if ui.button(RichText::new("➕").heading()).clicked() {
                    set_zoom(map_memory, viewport, current + 1.0);
                }

                if ui.button(RichText::new("➖").heading()).clicked() {
                    set_zoom(map_memory, viewport, current - 1.0);
                }
            });
        });
}

pub fn set_zoom(map_memory: &mut MapMemory, viewport: &Viewport, zoom: f64) {
    if map_memory.set_zoom(viewport.clamp_zoom(zoom)).is_err() {
        warn!("Zoom level {} rejected by the map", zoom);
    }
}

/// Panel controls and the outcome of the last refresh.
pub fn controls(ui: &Ui, view_state: &mut ViewState) -> Option<PanelAction> {
    let mut action = None;

    Window::new("Flights")
        .collapsible(true)
        .resizable(false)
        .anchor(Align2::LEFT_TOP, [10., 10.])
        .show(ui.ctx(), |ui| {
            ui.horizontal(|ui| {
                if ui.button("Fit").clicked() {
                    action = Some(PanelAction::Fit);
                }
                if ui.button("Clear").clicked() {
                    action = Some(PanelAction::Clear);
                }
                if ui.button("Reset").clicked() {
                    action = Some(PanelAction::Reset);
                }
            });

            ui.checkbox(&mut view_state.live, "Live");

            if let Some(summary) = &view_state.last_summary {
                ui.label(format!(
                    "{} new, {} updated, {} failed",
                    summary.created, summary.updated, summary.failed
                ));
            }

            if let Some(error) = &view_state.last_error {
                ui.colored_label(egui::Color32::LIGHT_RED, error);
            }
        });

    action
}

/// Tile attribution required by the configured tile server.
pub fn attribution(ui: &Ui, viewport: &Viewport) {
    if viewport.attribution.is_empty() {
        return;
    }

    egui::Area::new("attribution".into())
        .anchor(Align2::RIGHT_BOTTOM, [-10., -10.])
        .show(ui.ctx(), |ui| {
            ui.small(&viewport.attribution);
        });
}
