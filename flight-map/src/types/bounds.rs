use super::Coordinate;

/// The smallest latitude/longitude box covering a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Returns `None` for an empty set of points.
    pub fn covering<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;

        let mut bounds = Bounds {
            min_lat: first.lat(),
            max_lat: first.lat(),
            min_lon: first.lon(),
            max_lon: first.lon(),
        };

        for point in points {
            bounds.min_lat = bounds.min_lat.min(point.lat());
            bounds.max_lat = bounds.max_lat.max(point.lat());
            bounds.min_lon = bounds.min_lon.min(point.lon());
            bounds.max_lon = bounds.max_lon.max(point.lon());
        }

        Some(bounds)
    }

    /// Checks whether a given position is within the bounds.
    pub fn contains(&self, pos: &Coordinate) -> bool {
        pos.lat() >= self.min_lat
            && pos.lat() <= self.max_lat
            && pos.lon() >= self.min_lon
            && pos.lon() <= self.max_lon
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_points_have_no_bounds() {
        let points: Vec<Coordinate> = Vec::new();
        assert_eq!(Bounds::covering(&points), None);
    }

    #[test]
    fn test_bounds_cover_all_points() {
        let points = [
            Coordinate::new(50.0, 8.5).unwrap(),
            Coordinate::new(38.7, -9.1).unwrap(),
            Coordinate::new(45.0, 0.0).unwrap(),
        ];

        let bounds = Bounds::covering(&points).unwrap();
        assert_eq!(bounds.min_lat, 38.7);
        assert_eq!(bounds.max_lat, 50.0);
        assert_eq!(bounds.min_lon, -9.1);
        assert_eq!(bounds.max_lon, 8.5);
        assert!(points.iter().all(|p| bounds.contains(p)));
    }
}
