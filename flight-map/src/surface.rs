//! The drawing capability the reconciler renders through.
//!
//! A backend (a tile map widget, a test recorder, ...) implements
//! [`DrawingSurface`] and hands out opaque handles for the elements it
//! creates. The reconciler never inspects a handle, it only passes it back.

use crate::{
    config::Viewport,
    errors::MapError,
    types::{Bounds, Coordinate},
};

/// Opaque id of a marker created by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Opaque id of a polyline created by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineHandle(pub u64);

/// Any element that can be attached to or detached from a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Marker(MarkerHandle),
    Line(LineHandle),
}

impl From<MarkerHandle> for Handle {
    fn from(handle: MarkerHandle) -> Self {
        Handle::Marker(handle)
    }
}

impl From<LineHandle> for Handle {
    fn from(handle: LineHandle) -> Self {
        Handle::Line(handle)
    }
}

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Rgb = Rgb(0x4C, 0xAF, 0x50);
    pub const RED: Rgb = Rgb(0xF4, 0x43, 0x36);
    pub const BLUE: Rgb = Rgb(0x21, 0x96, 0xF3);
}

/// The role a marker plays for its flight. Each role has a fixed look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    Departure,
    Arrival,
    Aircraft,
}

impl MarkerRole {
    pub fn color(&self) -> Rgb {
        match self {
            MarkerRole::Departure => Rgb::GREEN,
            MarkerRole::Arrival => Rgb::RED,
            MarkerRole::Aircraft => Rgb::BLUE,
        }
    }

    /// Icon size in pixels.
    pub fn size(&self) -> f32 {
        match self {
            MarkerRole::Departure | MarkerRole::Arrival => 30.0,
            MarkerRole::Aircraft => 20.0,
        }
    }
}

/// Everything a surface needs to draw a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub role: MarkerRole,
    /// Text drawn inside the icon.
    pub text: String,
    /// Popup shown when hovering the marker.
    pub tooltip: Option<String>,
}

impl MarkerStyle {
    pub fn departure(code: &str) -> Self {
        Self {
            role: MarkerRole::Departure,
            text: code.to_string(),
            tooltip: None,
        }
    }

    pub fn arrival(code: &str) -> Self {
        Self {
            role: MarkerRole::Arrival,
            text: code.to_string(),
            tooltip: None,
        }
    }

    pub fn aircraft(tooltip: String) -> Self {
        Self {
            role: MarkerRole::Aircraft,
            text: "✈".to_string(),
            tooltip: Some(tooltip),
        }
    }
}

/// Stroke of a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
    pub weight: f32,
    /// Dash and gap lengths in pixels, `None` for a solid line.
    pub dash: Option<(f32, f32)>,
    pub opacity: f32,
}

impl LineStyle {
    pub const ROUTE: LineStyle = LineStyle {
        color: Rgb::BLUE,
        weight: 2.0,
        dash: Some((5.0, 10.0)),
        opacity: 0.6,
    };
}

/// Screen space kept free around fitted content, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub x: f32,
    pub y: f32,
}

impl Padding {
    pub fn uniform(pixels: f32) -> Self {
        Self {
            x: pixels,
            y: pixels,
        }
    }
}

/// Capability to place and move map elements.
///
/// Created elements are not visible until attached. `detach` must be
/// idempotent and accept handles that are not attached. `discard` detaches
/// one element and forgets it, after which its handle is dead. `release`
/// discards every element the surface ever created.
pub trait DrawingSurface {
    fn create_marker(&mut self, position: Coordinate, style: &MarkerStyle) -> MarkerHandle;

    fn set_marker_position(&mut self, handle: MarkerHandle, position: Coordinate);

    /// Replaces the popup text of a marker. Surfaces without popups can ignore it.
    fn set_marker_tooltip(&mut self, _handle: MarkerHandle, _tooltip: &str) {}

    fn attach(&mut self, handle: Handle);

    fn detach(&mut self, handle: Handle);

    fn is_attached(&self, handle: Handle) -> bool;

    /// Detaches the element and drops it. Unknown handles are ignored.
    fn discard(&mut self, handle: Handle);

    fn create_line(&mut self, points: &[Coordinate], style: &LineStyle) -> LineHandle;

    fn set_line_points(&mut self, handle: LineHandle, points: &[Coordinate]);

    fn fit_bounds(&mut self, bounds: &Bounds, padding: Padding);

    fn release(&mut self);
}

/// Hands out surfaces bound to a container.
pub trait SurfaceFactory {
    type Surface: DrawingSurface;

    /// Binds a new surface to `container_id` and sets its initial viewport.
    ///
    /// Fails with [`MapError::ContainerNotFound`] when there is no such
    /// container and with [`MapError::BackendUnavailable`] when the rendering
    /// backend is not ready.
    fn acquire(&mut self, container_id: &str, viewport: &Viewport)
        -> Result<Self::Surface, MapError>;
}
