//! Reading stored shapes and locating the ring a selection zooms to.

use geojson::{Feature, GeoJson, Geometry, Position, Value as GeometryValue};
use serde_json::Value;

use field_common::{FieldError, FieldResult, LatLng, LatLngBounds};

/// Parse a stored shape into its features.
///
/// Ingestion stores a bare feature array; a `FeatureCollection`, a single
/// `Feature` or a bare geometry are accepted too.
pub fn parse_features(shape: &str) -> FieldResult<Vec<Feature>> {
    let value: Value =
        serde_json::from_str(shape).map_err(|e| FieldError::InvalidShape(e.to_string()))?;

    if value.is_array() {
        return serde_json::from_value(value).map_err(|e| FieldError::InvalidShape(e.to_string()));
    }

    match GeoJson::from_json_value(value).map_err(|e| FieldError::InvalidShape(e.to_string()))? {
        GeoJson::FeatureCollection(fc) => Ok(fc.features),
        GeoJson::Feature(feature) => Ok(vec![feature]),
        GeoJson::Geometry(geometry) => Ok(vec![Feature::from(geometry)]),
    }
}

/// The first ring of a geometry, latitude first.
///
/// Polygons give their outer ring, multi-polygons the outer ring of the
/// first polygon, lines and multi-points their coordinates, multi-lines the
/// first line and points themselves.
pub fn first_ring(geometry: &Geometry) -> Option<Vec<LatLng>> {
    let positions: Vec<Position> = match &geometry.value {
        GeometryValue::Point(p) => vec![p.clone()],
        GeometryValue::MultiPoint(points) => points.clone(),
        GeometryValue::LineString(line) => line.clone(),
        GeometryValue::MultiLineString(lines) => lines.first()?.clone(),
        GeometryValue::Polygon(rings) => rings.first()?.clone(),
        GeometryValue::MultiPolygon(polygons) => polygons.first()?.first()?.clone(),
        GeometryValue::GeometryCollection(geometries) => return first_ring(geometries.first()?),
    };

    let ring: Vec<LatLng> = positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| LatLng::from_lon_lat(p[0], p[1]))
        .collect();

    if ring.is_empty() {
        None
    } else {
        Some(ring)
    }
}

/// Bounds of the first feature's first ring.
pub fn first_ring_bounds(features: &[Feature]) -> Option<LatLngBounds> {
    let geometry = features.first()?.geometry.as_ref()?;
    LatLngBounds::from_points(first_ring(geometry)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_array() {
        let features = parse_features(&test_utils::sample_shape_json()).unwrap();
        assert_eq!(features.len(), 2);
    }

    #[test]
    fn test_parse_feature_collection() {
        let shape = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[104.0,14.0]},"properties":{}}
        ]}"#;
        assert_eq!(parse_features(shape).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_features("not json"), Err(FieldError::InvalidShape(_))));
        assert!(parse_features(r#"{"type":"Nope"}"#).is_err());
    }

    #[test]
    fn test_first_ring_variants() {
        let poly = Geometry::new(GeometryValue::MultiPolygon(vec![
            vec![vec![vec![104.0, 14.0], vec![105.0, 15.0]]],
            vec![vec![vec![0.0, 0.0]]],
        ]));
        let ring = first_ring(&poly).unwrap();
        assert_eq!(ring, vec![LatLng::new(14.0, 104.0), LatLng::new(15.0, 105.0)]);

        let point = Geometry::new(GeometryValue::Point(vec![104.0, 14.0]));
        assert_eq!(first_ring(&point).unwrap(), vec![LatLng::new(14.0, 104.0)]);

        let empty = Geometry::new(GeometryValue::Polygon(vec![]));
        assert!(first_ring(&empty).is_none());
    }

    #[test]
    fn test_first_ring_bounds_ignores_later_features() {
        let features = parse_features(&test_utils::sample_shape_json()).unwrap();
        let bounds = first_ring_bounds(&features).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(14.7, 104.8));
        assert_eq!(bounds.north_east, LatLng::new(14.75, 104.85));
    }
}
