use std::f64::consts::PI;

use egui::Vec2;
use walkers::Position;

/// Side of a map tile in points, which fixes the Web-Mercator scale per zoom level.
const TILE_SIZE: f64 = 256.0;

/// Represents the geographical boundaries of a map view, defined by minimum
/// and maximum latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl MapBounds {
    /// Smallest bounds containing every position, `None` for an empty iterator.
    pub fn around(positions: impl IntoIterator<Item = Position>) -> Option<Self> {
        positions.into_iter().fold(None, |bounds, pos| {
            Some(match bounds {
                None => MapBounds {
                    min_lat: pos.lat(),
                    max_lat: pos.lat(),
                    min_lon: pos.lon(),
                    max_lon: pos.lon(),
                },
                Some(b) => MapBounds {
                    min_lat: b.min_lat.min(pos.lat()),
                    max_lat: b.max_lat.max(pos.lat()),
                    min_lon: b.min_lon.min(pos.lon()),
                    max_lon: b.max_lon.max(pos.lon()),
                },
            })
        })
    }

    /// Checks whether a given position is within the map bounds.
    pub fn is_within_bounds(&self, pos: &Position) -> bool {
        pos.lat() >= self.min_lat
            && pos.lat() <= self.max_lat
            && pos.lon() >= self.min_lon
            && pos.lon() <= self.max_lon
    }

    /// Returns the centre and zoom level that frame these bounds inside a
    /// viewport of `viewport` points, leaving `padding` points on every side.
    ///
    /// Bounds that collapse to a single point (or a viewport too small to
    /// measure) yield `None` for the zoom, letting the caller pick one.
    pub fn fit(&self, viewport: Vec2, padding: f32) -> (Position, Option<f64>) {
        let (west, north) = (lon_to_x(self.min_lon), lat_to_y(self.max_lat));
        let (east, south) = (lon_to_x(self.max_lon), lat_to_y(self.min_lat));

        let center = Position::from_lat_lon(
            y_to_lat((north + south) / 2.0),
            x_to_lon((west + east) / 2.0),
        );

        let span_x = east - west;
        let span_y = south - north;
        let width = (viewport.x - 2.0 * padding) as f64;
        let height = (viewport.y - 2.0 * padding) as f64;

        if width <= 0.0 || height <= 0.0 || (span_x <= f64::EPSILON && span_y <= f64::EPSILON) {
            return (center, None);
        }

        let scale_x = if span_x > f64::EPSILON {
            width / (TILE_SIZE * span_x)
        } else {
            f64::INFINITY
        };
        let scale_y = if span_y > f64::EPSILON {
            height / (TILE_SIZE * span_y)
        } else {
            f64::INFINITY
        };

        (center, Some(scale_x.min(scale_y).log2()))
    }
}

// Web-Mercator coordinates normalised to [0, 1], y growing southwards.

fn lon_to_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

fn x_to_lon(x: f64) -> f64 {
    x * 360.0 - 180.0
}

fn lat_to_y(lat: f64) -> f64 {
    let lat = lat.clamp(-85.051_128, 85.051_128).to_radians();
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}

fn y_to_lat(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
}
