//! Tests for LatLngBounds operations.

use field_common::bbox::{LatLng, LatLngBounds};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bounds_new() {
    let bounds = LatLngBounds::new(LatLng::new(-90.0, -180.0), LatLng::new(90.0, 180.0));
    assert_eq!(bounds.south_west.lat, -90.0);
    assert_eq!(bounds.south_west.lng, -180.0);
    assert_eq!(bounds.north_east.lat, 90.0);
    assert_eq!(bounds.north_east.lng, 180.0);
}

#[test]
fn test_bounds_copy() {
    let a = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(10.0, 10.0));
    let b = a;
    assert_eq!(a, b);
}

// ============================================================================
// from_points tests
// ============================================================================

#[test]
fn test_from_points_empty() {
    assert!(LatLngBounds::from_points(Vec::new()).is_none());
}

#[test]
fn test_from_points_single_point_is_degenerate() {
    let bounds = LatLngBounds::from_points(vec![LatLng::new(14.0, 104.0)]).unwrap();
    assert_eq!(bounds.south_west, bounds.north_east);
    assert_eq!(bounds.south_west, LatLng::new(14.0, 104.0));
}

#[test]
fn test_from_points_negative_coordinates() {
    let bounds = LatLngBounds::from_points(vec![
        LatLng::new(-33.9, 151.2),
        LatLng::new(-34.1, 150.9),
    ])
    .unwrap();
    assert!((bounds.south_west.lat - (-34.1)).abs() < 1e-9);
    assert!((bounds.north_east.lat - (-33.9)).abs() < 1e-9);
    assert!((bounds.south_west.lng - 150.9).abs() < 1e-9);
    assert!((bounds.north_east.lng - 151.2).abs() < 1e-9);
}

// ============================================================================
// extend tests
// ============================================================================

#[test]
fn test_extend_grows_bounds() {
    let mut bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
    bounds.extend(LatLng::new(-2.0, 3.0));
    assert_eq!(bounds.south_west, LatLng::new(-2.0, 0.0));
    assert_eq!(bounds.north_east, LatLng::new(1.0, 3.0));
}

#[test]
fn test_extend_with_interior_point_is_noop() {
    let mut bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(10.0, 10.0));
    let before = bounds;
    bounds.extend(LatLng::new(5.0, 5.0));
    bounds.extend(LatLng::new(10.0, 0.0));
    assert_eq!(bounds, before);
}

#[test]
fn test_bounds_serialization() {
    let bounds = LatLngBounds::new(LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0));
    let json = serde_json::to_string(&bounds).unwrap();
    assert!(json.contains("\"south_west\":{\"lat\":1.0,\"lng\":2.0}"));
}
