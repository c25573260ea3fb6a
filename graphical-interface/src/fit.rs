use std::f64::consts::PI;

use flight_map::{surface::Padding, Bounds, Viewport};

const TILE_SIZE: f64 = 256.0;

/// Center and zoom that frame `bounds` inside a map of `width` x `height`
/// pixels, keeping `padding` free on every side.
pub fn fit_view(
    bounds: &Bounds,
    padding: Padding,
    width: f32,
    height: f32,
    viewport: &Viewport,
) -> ((f64, f64), f64) {
    let usable_width = (width - 2.0 * padding.x).max(1.0) as f64;
    let usable_height = (height - 2.0 * padding.y).max(1.0) as f64;

    let span_x = (bounds.max_lon - bounds.min_lon) / 360.0;
    let span_y = (mercator_y(bounds.min_lat) - mercator_y(bounds.max_lat)).abs();

    let zoom_for = |usable: f64, span: f64| {
        if span > 0.0 {
            (usable / (TILE_SIZE * span)).log2()
        } else {
            viewport.max_zoom
        }
    };

    let zoom = zoom_for(usable_width, span_x).min(zoom_for(usable_height, span_y));

    (bounds.center(), viewport.clamp_zoom(zoom.floor()))
}

/// Web mercator y of a latitude, in [0, 1] from north to south.
fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-85.0511, 85.0511).to_radians();
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}
