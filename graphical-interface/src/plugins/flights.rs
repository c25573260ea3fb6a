use egui::{Align2, Color32, FontId, Pos2, Rect, Response, Shape, Stroke, Vec2};
use flight_map::surface::Rgb;
use walkers::{Plugin, Position, Projector};

use crate::layers::{LineLayer, MarkerLayer, SharedLayers};

/// Draws the attached routes and markers of a map container.
pub struct Flights {
    layers: SharedLayers,
}

impl Flights {
    pub fn new(layers: SharedLayers) -> Self {
        Self { layers }
    }
}

impl Plugin for Flights {
    fn run(self: Box<Self>, ui: &mut egui::Ui, _response: &Response, projector: &Projector) {
        let layers = self.layers.borrow();

        for line in layers.attached_lines() {
            line.draw(ui, projector);
        }

        for marker in layers.attached_markers() {
            marker.draw(ui, projector);
        }
    }
}

fn color(rgb: Rgb, opacity: f32) -> Color32 {
    let Rgb(r, g, b) = rgb;
    Color32::from_rgba_unmultiplied(r, g, b, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

fn screen_position(projector: &Projector, lat: f64, lon: f64) -> Pos2 {
    projector
        .project(Position::from_lat_lon(lat, lon))
        .to_pos2()
}

impl LineLayer {
    fn draw(&self, ui: &mut egui::Ui, projector: &Projector) {
        let points: Vec<Pos2> = self
            .points
            .iter()
            .map(|point| screen_position(projector, point.lat(), point.lon()))
            .collect();

        let stroke = Stroke::new(self.style.weight, color(self.style.color, self.style.opacity));

        match self.style.dash {
            Some((dash, gap)) => ui
                .painter()
                .extend(Shape::dashed_line(&points, stroke, dash, gap)),
            None => {
                ui.painter().add(Shape::line(points, stroke));
            }
        }
    }
}

impl MarkerLayer {
    fn draw(&self, ui: &mut egui::Ui, projector: &Projector) {
        let center = screen_position(projector, self.position.lat(), self.position.lon());
        let size = self.style.role.size();

        let painter = ui.painter();
        painter.circle(
            center,
            size / 2.0,
            color(self.style.role.color(), 1.0),
            Stroke::new(1.5, Color32::WHITE),
        );
        painter.text(
            center,
            Align2::CENTER_CENTER,
            &self.style.text,
            FontId::proportional(size * 0.4),
            Color32::WHITE,
        );

        let Some(tooltip) = &self.style.tooltip else {
            return;
        };

        let hover_area = Rect::from_center_size(center, Vec2::splat(size));
        let response = ui.allocate_rect(hover_area, egui::Sense::hover());
        response.on_hover_text(tooltip.as_str());
    }
}
