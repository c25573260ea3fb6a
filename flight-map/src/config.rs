use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{errors::MapError, surface::Padding, types::Coordinate};

const INITIAL_CENTER: Coordinate = Coordinate::new_unchecked(45.0, 0.0);
const INITIAL_ZOOM: f64 = 4.0;
const MIN_ZOOM: f64 = 3.0;
const MAX_ZOOM: f64 = 10.0;
const FIT_PADDING: [f32; 2] = [50.0, 50.0];
const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// What happens to flights that were rendered before but are missing from
/// the incoming snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrunePolicy {
    /// Keep their markers until the panel is cleaned up.
    #[default]
    Retain,
    /// Tear their markers down at the end of the reconciliation.
    PruneAbsent,
}

/// Initial view and base layer of a freshly created panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: INITIAL_CENTER,
            zoom: INITIAL_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            tile_url: TILE_URL.to_string(),
            attribution: ATTRIBUTION.to_string(),
        }
    }
}

impl Viewport {
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

/// Settings shared by every panel of a [`crate::FlightMap`].
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub viewport: Viewport,
    pub fit_padding: [f32; 2],
    /// Frame every rendered snapshot automatically.
    pub auto_fit: bool,
    pub prune: PrunePolicy,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            fit_padding: FIT_PADDING,
            auto_fit: false,
            prune: PrunePolicy::Retain,
        }
    }
}

impl MapConfig {
    /// Loads a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, MapError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| MapError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, MapError> {
        let config: MapConfig =
            serde_json::from_str(contents).map_err(|e| MapError::Config(e.to_string()))?;

        if config.viewport.min_zoom > config.viewport.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} is greater than max_zoom {}",
                config.viewport.min_zoom, config.viewport.max_zoom
            )));
        }

        Ok(config)
    }

    pub fn padding(&self) -> Padding {
        Padding {
            x: self.fit_padding[0],
            y: self.fit_padding[1],
        }
    }
}
