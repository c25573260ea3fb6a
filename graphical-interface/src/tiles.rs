use walkers::{
    sources::{Attribution, TileSource},
    TileId,
};

/// Raster tiles fetched from a `{z}/{x}/{y}` URL template.
pub struct TileServer {
    url_template: String,
}

impl TileServer {
    pub fn new(url_template: &str) -> Self {
        Self {
            url_template: url_template.to_string(),
        }
    }

    fn url(&self, x: u32, y: u32, zoom: u8) -> String {
        self.url_template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl TileSource for TileServer {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.url(tile_id.x, tile_id.y, tile_id.zoom)
    }

    // The configured attribution is drawn by the cockpit itself.
    fn attribution(&self) -> Attribution {
        Attribution {
            text: "",
            url: "",
            logo_light: None,
            logo_dark: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_template() {
        let server = TileServer::new("https://tile.openstreetmap.org/{z}/{x}/{y}.png");
        assert_eq!(
            server.url(3, 5, 4),
            "https://tile.openstreetmap.org/4/3/5.png"
        );
    }
}
