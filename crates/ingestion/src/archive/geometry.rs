//! Conversion of decoded shapefile records into GeoJSON geometries.
//!
//! Only x/y are kept; M and Z values are dropped.

use geojson::{Geometry, Position, Value};
use shapefile::{Point, PointM, PointZ, PolygonRing, Shape};

trait PlanarPoint {
    fn position(&self) -> Position;
}

impl PlanarPoint for Point {
    fn position(&self) -> Position {
        vec![self.x, self.y]
    }
}

impl PlanarPoint for PointM {
    fn position(&self) -> Position {
        vec![self.x, self.y]
    }
}

impl PlanarPoint for PointZ {
    fn position(&self) -> Position {
        vec![self.x, self.y]
    }
}

fn positions<P: PlanarPoint>(points: &[P]) -> Vec<Position> {
    points.iter().map(PlanarPoint::position).collect()
}

fn multipoint<P: PlanarPoint>(points: &[P]) -> Option<Value> {
    if points.is_empty() {
        None
    } else {
        Some(Value::MultiPoint(positions(points)))
    }
}

fn polyline<P: PlanarPoint>(parts: &[Vec<P>]) -> Option<Value> {
    let mut lines: Vec<Vec<Position>> = parts
        .iter()
        .filter(|part| !part.is_empty())
        .map(|part| positions(part))
        .collect();
    match lines.len() {
        0 => None,
        1 => lines.pop().map(Value::LineString),
        _ => Some(Value::MultiLineString(lines)),
    }
}

fn polygon<P: PlanarPoint>(rings: &[PolygonRing<P>]) -> Option<Value> {
    let mut outer = Vec::new();
    let mut holes = Vec::new();
    for ring in rings {
        match ring {
            PolygonRing::Outer(points) if !points.is_empty() => outer.push(positions(points)),
            PolygonRing::Inner(points) if !points.is_empty() => holes.push(positions(points)),
            _ => {}
        }
    }
    assemble_polygon(outer, holes)
}

/// GeoJSON geometry of one record; `None` for null and multipatch shapes.
pub(crate) fn shape_to_geometry(shape: &Shape) -> Option<Geometry> {
    let value = match shape {
        Shape::NullShape | Shape::Multipatch(_) => None,
        Shape::Point(p) => Some(Value::Point(p.position())),
        Shape::PointM(p) => Some(Value::Point(p.position())),
        Shape::PointZ(p) => Some(Value::Point(p.position())),
        Shape::Polyline(line) => polyline(line.parts()),
        Shape::PolylineM(line) => polyline(line.parts()),
        Shape::PolylineZ(line) => polyline(line.parts()),
        Shape::Polygon(poly) => polygon(poly.rings()),
        Shape::PolygonM(poly) => polygon(poly.rings()),
        Shape::PolygonZ(poly) => polygon(poly.rings()),
        Shape::Multipoint(points) => multipoint(points.points()),
        Shape::MultipointM(points) => multipoint(points.points()),
        Shape::MultipointZ(points) => multipoint(points.points()),
    };
    value.map(Geometry::new)
}

/// Ray-casting containment test.
fn ring_contains(ring: &[Position], point: &Position) -> bool {
    let (px, py) = (point[0], point[1]);
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i][0], ring[i][1]);
        let (xj, yj) = (ring[j][0], ring[j][1]);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Each outer ring opens a polygon; a hole joins the first outer ring that
/// contains it, else the last one.
fn assemble_polygon(outer: Vec<Vec<Position>>, holes: Vec<Vec<Position>>) -> Option<Value> {
    // Writers that ignore orientation: every ring is its own polygon.
    if outer.is_empty() {
        return match holes.len() {
            0 => None,
            1 => Some(Value::Polygon(holes)),
            _ => Some(Value::MultiPolygon(
                holes.into_iter().map(|r| vec![r]).collect(),
            )),
        };
    }

    let mut polygons: Vec<Vec<Vec<Position>>> = outer.into_iter().map(|r| vec![r]).collect();
    for hole in holes {
        let owner = polygons
            .iter()
            .position(|p| ring_contains(&p[0], &hole[0]))
            .unwrap_or(polygons.len() - 1);
        polygons[owner].push(hole);
    }

    if polygons.len() == 1 {
        polygons.pop().map(Value::Polygon)
    } else {
        Some(Value::MultiPolygon(polygons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<Position> {
        vec![
            vec![x0, y0],
            vec![x0, y0 + size],
            vec![x0 + size, y0 + size],
            vec![x0 + size, y0],
            vec![x0, y0],
        ]
    }

    #[test]
    fn test_single_outer_ring_is_polygon() {
        let value = assemble_polygon(vec![square(0.0, 0.0, 1.0)], vec![]).unwrap();
        assert!(matches!(value, Value::Polygon(ref rings) if rings.len() == 1));
    }

    #[test]
    fn test_hole_assigned_to_containing_outer() {
        let value = assemble_polygon(
            vec![square(0.0, 0.0, 10.0), square(20.0, 20.0, 10.0)],
            vec![square(22.0, 22.0, 2.0)],
        )
        .unwrap();
        match value {
            Value::MultiPolygon(polygons) => {
                assert_eq!(polygons.len(), 2);
                assert_eq!(polygons[0].len(), 1);
                assert_eq!(polygons[1].len(), 2);
            }
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_orphan_hole_goes_to_last_outer() {
        let value = assemble_polygon(
            vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)],
            vec![square(50.0, 50.0, 1.0)],
        )
        .unwrap();
        match value {
            Value::MultiPolygon(polygons) => assert_eq!(polygons[1].len(), 2),
            other => panic!("expected MultiPolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_inner_only_rings_become_polygons() {
        let value = assemble_polygon(vec![], vec![square(0.0, 0.0, 1.0)]).unwrap();
        assert!(matches!(value, Value::Polygon(_)));
        assert!(assemble_polygon(vec![], vec![]).is_none());
    }

    #[test]
    fn test_point_shapes_drop_measures() {
        let shape = Shape::PointZ(PointZ::new(104.0, 14.0, 3.0, 1.0));
        let geometry = shape_to_geometry(&shape).unwrap();
        assert_eq!(geometry.value, Value::Point(vec![104.0, 14.0]));
        assert!(shape_to_geometry(&Shape::NullShape).is_none());
    }
}
