//! Web Mercator viewport fitting.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use field_common::{LatLng, LatLngBounds};

/// Map center used before any field is selected.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 14.7696,
    lng: 104.8141,
};

pub const DEFAULT_ZOOM: u8 = 5;
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 18;

const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Pixel size of the map container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: u32,
    pub height: u32,
}

impl Default for MapSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Where the map looks. `bounds` is set when the view was fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapViewport {
    pub center: LatLng,
    pub zoom: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<LatLngBounds>,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            bounds: None,
        }
    }
}

impl MapViewport {
    /// Fit the view so `bounds` fills as much of `size` as an integer zoom allows.
    pub fn fit_bounds(bounds: LatLngBounds, size: MapSize) -> Self {
        let sw = project(bounds.south_west, 0);
        let ne = project(bounds.north_east, 0);

        let span_x = (ne.0 - sw.0).abs();
        let span_y = (sw.1 - ne.1).abs();
        let scale_x = if span_x > 0.0 { size.width as f64 / span_x } else { f64::INFINITY };
        let scale_y = if span_y > 0.0 { size.height as f64 / span_y } else { f64::INFINITY };

        let scale = scale_x.min(scale_y);
        let zoom = if scale.is_finite() && scale > 0.0 {
            scale.log2().floor().clamp(MIN_ZOOM as f64, MAX_ZOOM as f64) as u8
        } else {
            MAX_ZOOM
        };

        let center = unproject(((sw.0 + ne.0) / 2.0, (sw.1 + ne.1) / 2.0), 0);

        Self {
            center,
            zoom,
            bounds: Some(bounds),
        }
    }

    /// Back to the default center and zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Project a position to world pixel coordinates at `zoom`.
pub fn project(point: LatLng, zoom: u8) -> (f64, f64) {
    let world = TILE_SIZE * 2f64.powi(zoom as i32);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (point.lng + 180.0) / 360.0 * world;
    let y = (1.0 - lat.tan().asinh() / PI) / 2.0 * world;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(pixel: (f64, f64), zoom: u8) -> LatLng {
    let world = TILE_SIZE * 2f64.powi(zoom as i32);

    let lng = pixel.0 / world * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * pixel.1 / world)).sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}
