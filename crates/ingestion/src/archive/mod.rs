//! Zipped ESRI shapefile decoding.
//!
//! An archive may hold several layers; each `.shp` is paired with the `.dbf`
//! sharing its path stem. Layers are emitted in path order.

mod attributes;
mod geometry;

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::Value;
use shapefile::ShapeReader;
use tracing::{debug, warn};

use crate::error::ShapeDecodeError;
use crate::shape::{DecodedShape, ShapeDecoder};

/// Foreign member naming the layer a collection came from.
pub const LAYER_NAME_MEMBER: &str = "fileName";

#[derive(Default)]
struct LayerFiles {
    shp: Option<Vec<u8>>,
    dbf: Option<Vec<u8>>,
}

/// Decodes zip archives containing one or more shapefile layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipShapefileDecoder;

impl ZipShapefileDecoder {
    pub fn new() -> Self {
        Self
    }

    fn collect_layers(data: &[u8]) -> Result<BTreeMap<String, LayerFiles>, ShapeDecodeError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let mut layers: BTreeMap<String, LayerFiles> = BTreeMap::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            if name.starts_with("__MACOSX/") || name.contains("/__MACOSX/") {
                continue;
            }

            let Some((stem, ext)) = name.rsplit_once('.') else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "shp" && ext != "dbf" {
                continue;
            }

            // The declared size comes from the archive and is not trusted.
            let mut buf = Vec::new();
            entry.read_to_end(&mut buf)?;
            if buf.len() as u64 != entry.size() {
                return Err(ShapeDecodeError::EntrySize {
                    name: name.clone(),
                    declared: entry.size(),
                    actual: buf.len() as u64,
                });
            }

            let layer = layers.entry(stem.to_string()).or_default();
            if ext == "shp" {
                layer.shp = Some(buf);
            } else {
                layer.dbf = Some(buf);
            }
        }

        Ok(layers)
    }

    fn build_layer(
        stem: &str,
        files: LayerFiles,
    ) -> Result<Option<FeatureCollection>, ShapeDecodeError> {
        let Some(shp) = files.shp else {
            warn!(layer = %stem, "Ignoring .dbf without matching .shp");
            return Ok(None);
        };

        let shapes = ShapeReader::new(Cursor::new(shp))
            .and_then(|mut reader| reader.read())
            .map_err(|e| ShapeDecodeError::InvalidShp(e.to_string()))?;

        let records = match files.dbf {
            Some(dbf) => {
                let records = attributes::read_attributes(&dbf, shapes.len())?;
                if records.len() < shapes.len() {
                    return Err(ShapeDecodeError::InvalidDbf(format!(
                        "{} records for {} shapes",
                        records.len(),
                        shapes.len()
                    )));
                }
                records
            }
            None => vec![JsonObject::new(); shapes.len()],
        };

        let features = shapes
            .iter()
            .zip(records)
            .map(|(shape, properties)| Feature {
                bbox: None,
                geometry: geometry::shape_to_geometry(shape),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            })
            .collect::<Vec<_>>();

        let file_name = stem.rsplit('/').next().unwrap_or(stem);
        let mut members = JsonObject::new();
        members.insert(
            LAYER_NAME_MEMBER.to_string(),
            Value::String(file_name.to_string()),
        );

        debug!(layer = %stem, features = features.len(), "Decoded shapefile layer");
        Ok(Some(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(members),
        }))
    }
}

impl ShapeDecoder for ZipShapefileDecoder {
    fn decode(&self, data: &[u8]) -> Result<DecodedShape, ShapeDecodeError> {
        let mut collections = Vec::new();
        for (stem, files) in Self::collect_layers(data)? {
            if let Some(collection) = Self::build_layer(&stem, files)? {
                collections.push(collection);
            }
        }

        match collections.len() {
            0 => Err(ShapeDecodeError::NoLayers),
            1 => Ok(DecodedShape::Collection(collections.remove(0))),
            _ => Ok(DecodedShape::Layers(collections)),
        }
    }

    fn name(&self) -> &'static str {
        "zip-shapefile"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_zip_bytes() {
        let err = ZipShapefileDecoder::new()
            .decode(b"Rar!\x1a\x07\x00 definitely not a zip")
            .unwrap_err();
        assert!(matches!(err, ShapeDecodeError::Archive(_)));
    }
}
