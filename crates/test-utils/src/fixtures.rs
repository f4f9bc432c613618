//! Common test fixtures for mekong-fields tests.
//!
//! Canned archives, spreadsheets and serialized payloads representing the
//! usual upload scenarios.

use serde_json::{json, Value};

use crate::generators::{
    dbf_bytes, shp_bytes, spreadsheet, square_ring, zip_archive, Cell, DbfField, DbfRecord,
    TestShape,
};

/// Reference coordinates in the lower Mekong basin.
pub mod coords {
    /// Default map center `(lat, lng)`.
    pub const DEFAULT_CENTER: (f64, f64) = (14.7696, 104.8141);

    /// South-west corner `(lon, lat)` of the first sample plot.
    pub const PLOT_A: (f64, f64) = (104.80, 14.70);

    /// South-west corner `(lon, lat)` of the second sample plot.
    pub const PLOT_B: (f64, f64) = (105.10, 15.00);

    /// Side length of the sample plots in degrees.
    pub const PLOT_SIZE: f64 = 0.05;
}

fn plots_shp() -> Vec<u8> {
    let (ax, ay) = coords::PLOT_A;
    let (bx, by) = coords::PLOT_B;
    shp_bytes(&[
        TestShape::Polygon(vec![square_ring(ax, ay, coords::PLOT_SIZE)]),
        TestShape::Polygon(vec![square_ring(bx, by, coords::PLOT_SIZE)]),
    ])
}

fn plots_dbf() -> Vec<u8> {
    dbf_bytes(
        &[
            DbfField::character("NAME", 12),
            DbfField::numeric("AREA_HA", 8),
            DbfField::logical("IRRIGATED"),
        ],
        &[
            DbfRecord::new(&["Plot A", "12.5", "T"]),
            DbfRecord::new(&["Plot B", "7", "F"]),
        ],
    )
}

/// A single-layer archive with two polygon features and attributes.
pub fn field_archive() -> Vec<u8> {
    zip_archive(&[
        ("plots.shp", plots_shp().as_slice()),
        ("plots.dbf", plots_dbf().as_slice()),
    ])
}

/// A single-layer archive whose `.shp` has no records.
pub fn empty_field_archive() -> Vec<u8> {
    zip_archive(&[("empty.shp", shp_bytes(&[]).as_slice())])
}

/// An archive holding two layers, which decodes to a list of collections.
pub fn multi_layer_archive() -> Vec<u8> {
    let roads = shp_bytes(&[TestShape::PolyLine(vec![vec![
        (104.80, 14.70),
        (104.90, 14.80),
    ]])]);
    zip_archive(&[
        ("layers/plots.shp", plots_shp().as_slice()),
        ("layers/roads.shp", roads.as_slice()),
    ])
}

/// Bytes that are not a zip archive.
pub fn rar_bytes() -> Vec<u8> {
    b"Rar!\x1a\x07\x00not really a rar".to_vec()
}

/// The `A`/`B` spreadsheet: headers plus two numeric rows.
pub fn ab_spreadsheet() -> Vec<u8> {
    spreadsheet(&[
        vec![Cell::from("A"), Cell::from("B")],
        vec![Cell::from(1), Cell::from(2)],
        vec![Cell::from(3), Cell::from(4)],
    ])
}

/// Row objects matching [`ab_spreadsheet`].
pub fn ab_records() -> Value {
    json!([{"A": 1, "B": 2}, {"A": 3, "B": 4}])
}

/// A serialized feature array with two properties-bearing polygons.
pub fn sample_shape_json() -> String {
    json!([
        {
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[104.8, 14.7], [104.8, 14.75], [104.85, 14.75], [104.85, 14.7], [104.8, 14.7]]]
            },
            "properties": {"NAME": "Plot A", "AREA_HA": 12.5}
        },
        {
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [105.1, 15.0]},
            "properties": null
        }
    ])
    .to_string()
}

/// A serialized row array with mixed cell kinds.
pub fn sample_table_json() -> String {
    json!([
        {"Plot": "A", "Yield": 4.2, "Irrigated": true, "Note": null},
        {"Plot": "B", "Yield": 3, "Irrigated": false, "Note": "late"}
    ])
    .to_string()
}
