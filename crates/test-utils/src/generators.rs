//! Binary fixture builders for shapefiles, zip archives and spreadsheets.
//!
//! The builders write just enough of each format for the decoders under
//! test: `.shp` main files (no `.shx` index), dBase III tables and
//! single-sheet `.xlsx` workbooks.

use std::io::{Cursor, Write};

use bytes::BufMut;

/// A `(longitude, latitude)` pair.
pub type Coord = (f64, f64);

/// A shape record to encode into a `.shp` file.
#[derive(Debug, Clone)]
pub enum TestShape {
    Null,
    Point(Coord),
    MultiPoint(Vec<Coord>),
    PolyLine(Vec<Vec<Coord>>),
    Polygon(Vec<Vec<Coord>>),
    /// Encoded with a shape type code the decoders ignore.
    MultiPatch,
}

impl TestShape {
    fn type_code(&self) -> i32 {
        match self {
            TestShape::Null => 0,
            TestShape::Point(_) => 1,
            TestShape::PolyLine(_) => 3,
            TestShape::Polygon(_) => 5,
            TestShape::MultiPoint(_) => 8,
            TestShape::MultiPatch => 31,
        }
    }

    fn coords(&self) -> Vec<Coord> {
        match self {
            TestShape::Null | TestShape::MultiPatch => vec![],
            TestShape::Point(c) => vec![*c],
            TestShape::MultiPoint(points) => points.clone(),
            TestShape::PolyLine(parts) | TestShape::Polygon(parts) => {
                parts.iter().flatten().copied().collect()
            }
        }
    }
}

fn bounds(coords: &[Coord]) -> [f64; 4] {
    if coords.is_empty() {
        return [0.0; 4];
    }
    coords.iter().fold(
        [f64::MAX, f64::MAX, f64::MIN, f64::MIN],
        |[x0, y0, x1, y1], &(x, y)| [x0.min(x), y0.min(y), x1.max(x), y1.max(y)],
    )
}

fn put_bounds(buf: &mut Vec<u8>, b: [f64; 4]) {
    for v in b {
        buf.put_f64_le(v);
    }
}

fn encode_record(shape: &TestShape) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.put_i32_le(shape.type_code());
    match shape {
        TestShape::Null => {}
        TestShape::MultiPatch => {
            // Bounding box, zero parts and points, then the mandatory Z range.
            put_bounds(&mut buf, [0.0; 4]);
            buf.put_i32_le(0);
            buf.put_i32_le(0);
            buf.put_f64_le(0.0);
            buf.put_f64_le(0.0);
        }
        TestShape::Point((x, y)) => {
            buf.put_f64_le(*x);
            buf.put_f64_le(*y);
        }
        TestShape::MultiPoint(points) => {
            put_bounds(&mut buf, bounds(points));
            buf.put_i32_le(points.len() as i32);
            for (x, y) in points {
                buf.put_f64_le(*x);
                buf.put_f64_le(*y);
            }
        }
        TestShape::PolyLine(parts) | TestShape::Polygon(parts) => {
            let coords = shape.coords();
            put_bounds(&mut buf, bounds(&coords));
            buf.put_i32_le(parts.len() as i32);
            buf.put_i32_le(coords.len() as i32);
            let mut start = 0;
            for part in parts {
                buf.put_i32_le(start);
                start += part.len() as i32;
            }
            for (x, y) in coords {
                buf.put_f64_le(x);
                buf.put_f64_le(y);
            }
        }
    }
    buf
}

/// Encode shape records as a `.shp` main file.
pub fn shp_bytes(shapes: &[TestShape]) -> Vec<u8> {
    let records: Vec<Vec<u8>> = shapes.iter().map(encode_record).collect();
    let total_len = 100 + records.iter().map(|r| r.len() + 8).sum::<usize>();

    let all_coords: Vec<Coord> = shapes.iter().flat_map(|s| s.coords()).collect();
    let shape_type = shapes
        .iter()
        .map(TestShape::type_code)
        .find(|&c| c != 0)
        .unwrap_or(0);

    let mut buf = Vec::with_capacity(total_len);
    buf.put_i32(9994);
    for _ in 0..5 {
        buf.put_i32(0);
    }
    buf.put_i32((total_len / 2) as i32);
    buf.put_i32_le(1000);
    buf.put_i32_le(shape_type);
    put_bounds(&mut buf, bounds(&all_coords));
    for _ in 0..4 {
        buf.put_f64_le(0.0);
    }

    for (i, record) in records.iter().enumerate() {
        buf.put_i32(i as i32 + 1);
        buf.put_i32((record.len() / 2) as i32);
        buf.put_slice(record);
    }
    buf
}

/// A dBase field descriptor.
#[derive(Debug, Clone)]
pub struct DbfField {
    pub name: String,
    pub kind: u8,
    pub length: u8,
}

impl DbfField {
    pub fn character(name: &str, length: u8) -> Self {
        Self {
            name: name.to_string(),
            kind: b'C',
            length,
        }
    }

    pub fn numeric(name: &str, length: u8) -> Self {
        Self {
            name: name.to_string(),
            kind: b'N',
            length,
        }
    }

    pub fn logical(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: b'L',
            length: 1,
        }
    }

    pub fn date(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: b'D',
            length: 8,
        }
    }
}

/// A dBase record, one text value per field.
#[derive(Debug, Clone)]
pub struct DbfRecord {
    pub values: Vec<String>,
}

impl DbfRecord {
    pub fn new(values: &[&str]) -> Self {
        Self {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Encode a dBase III table. Character values are left aligned, all other
/// kinds right aligned, as dBase writers do.
pub fn dbf_bytes(fields: &[DbfField], records: &[DbfRecord]) -> Vec<u8> {
    let header_len = 32 + 32 * fields.len() + 1;
    let record_len = 1 + fields.iter().map(|f| f.length as usize).sum::<usize>();

    let mut buf = Vec::new();
    buf.put_u8(0x03);
    buf.put_slice(&[124, 1, 1]);
    buf.put_u32_le(records.len() as u32);
    buf.put_u16_le(header_len as u16);
    buf.put_u16_le(record_len as u16);
    buf.put_bytes(0, 20);

    for field in fields {
        let mut name = [0u8; 11];
        let len = field.name.len().min(10);
        name[..len].copy_from_slice(&field.name.as_bytes()[..len]);
        buf.put_slice(&name);
        buf.put_u8(field.kind);
        buf.put_bytes(0, 4);
        buf.put_u8(field.length);
        buf.put_u8(0);
        buf.put_bytes(0, 14);
    }
    buf.put_u8(0x0D);

    for record in records {
        buf.put_u8(b' ');
        for (field, value) in fields.iter().zip(&record.values) {
            let width = field.length as usize;
            let mut text: String = value.chars().take(width).collect();
            let pad = " ".repeat(width - text.len());
            text = if field.kind == b'C' {
                format!("{}{}", text, pad)
            } else {
                format!("{}{}", pad, text)
            };
            buf.put_slice(text.as_bytes());
        }
    }
    buf.put_u8(0x1A);
    buf
}

/// Build a zip archive from `(path, contents)` entries.
///
/// Paths ending in `/` become directory entries.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for (path, contents) in entries {
        if path.ends_with('/') {
            writer
                .add_directory(*path, options)
                .expect("add zip directory");
        } else {
            writer.start_file(*path, options).expect("start zip entry");
            writer.write_all(contents).expect("write zip entry");
        }
    }

    writer.finish().expect("finish zip archive").into_inner()
}

/// A clockwise square ring starting at its south-west corner.
pub fn square_ring(lon: f64, lat: f64, size: f64) -> Vec<Coord> {
    vec![
        (lon, lat),
        (lon, lat + size),
        (lon + size, lat + size),
        (lon + size, lat),
        (lon, lat),
    ]
}

/// A spreadsheet cell for [`spreadsheet`].
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Bool(bool),
    Blank,
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// Build a one-sheet `.xlsx` workbook.
pub fn spreadsheet(rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();

    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(r, c, s.as_str()).expect("write string cell");
                }
                Cell::Number(n) => {
                    sheet.write_number(r, c, *n).expect("write number cell");
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(r, c, *b).expect("write boolean cell");
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save_to_buffer().expect("save workbook")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shp_header_length_matches() {
        let shp = shp_bytes(&[TestShape::Point((104.0, 14.0))]);
        assert_eq!(shp.len(), 100 + 8 + 20);
        let words = i32::from_be_bytes([shp[24], shp[25], shp[26], shp[27]]);
        assert_eq!(words as usize * 2, shp.len());
    }

    #[test]
    fn test_dbf_layout() {
        let fields = vec![DbfField::character("NAME", 8), DbfField::numeric("AREA", 6)];
        let dbf = dbf_bytes(&fields, &[DbfRecord::new(&["Plot", "12"])]);
        let header_len = u16::from_le_bytes([dbf[8], dbf[9]]) as usize;
        assert_eq!(header_len, 32 + 64 + 1);
        assert_eq!(dbf[header_len - 1], 0x0D);
        assert_eq!(&dbf[header_len..header_len + 15], b" Plot        12");
    }

    #[test]
    fn test_zip_archive_is_zip() {
        let archive = zip_archive(&[("a.txt", &b"hello"[..])]);
        assert_eq!(&archive[..2], b"PK");
    }
}
