//! Geographic coordinate and bounds types.

use serde::{Deserialize, Serialize};

/// A geographic position in (latitude, longitude) order, degrees.
///
/// GeoJSON stores positions as (longitude, latitude); use
/// [`LatLng::from_lon_lat`] when reading GeoJSON coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Swap a GeoJSON `[lon, lat]` pair into latitude-first order.
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lng: lon }
    }
}

/// An axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Create bounds from two corners.
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest bounds containing every point, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    /// Grow the bounds to include a point.
    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lon_lat_swaps() {
        let p = LatLng::from_lon_lat(104.8, 14.7);
        assert_eq!(p.lat, 14.7);
        assert_eq!(p.lng, 104.8);
    }

    #[test]
    fn test_from_points() {
        let bounds = LatLngBounds::from_points(vec![
            LatLng::new(10.0, 100.0),
            LatLng::new(12.0, 98.0),
            LatLng::new(11.0, 103.0),
        ])
        .unwrap();
        assert_eq!(bounds.south_west, LatLng::new(10.0, 98.0));
        assert_eq!(bounds.north_east, LatLng::new(12.0, 103.0));
    }
}
