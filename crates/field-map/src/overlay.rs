//! Map commands sent to the browser.

use geojson::{Feature, Geometry};
use serde::Serialize;
use tracing::warn;

use field_common::StoredField;

use crate::popup::popup_html;
use crate::shape::{first_ring_bounds, parse_features};
use crate::viewport::{MapSize, MapViewport};

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// One feature to draw, with its popup when it has object properties.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayFeature {
    pub geometry: Option<Geometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,
}

impl From<&Feature> for OverlayFeature {
    fn from(feature: &Feature) -> Self {
        Self {
            geometry: feature.geometry.clone(),
            popup: feature.properties.as_ref().map(popup_html),
        }
    }
}

/// Base layer, viewport and overlay in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct MapCommand {
    pub tile_url: &'static str,
    pub attribution: &'static str,
    pub viewport: MapViewport,
    pub overlay: Vec<OverlayFeature>,
}

/// The map surface: holds the current viewport and produces commands.
#[derive(Debug, Clone, Default)]
pub struct MapSurface {
    size: MapSize,
    viewport: MapViewport,
}

impl MapSurface {
    pub fn new(size: MapSize) -> Self {
        Self {
            size,
            viewport: MapViewport::default(),
        }
    }

    pub fn viewport(&self) -> &MapViewport {
        &self.viewport
    }

    /// Fit to the field's first ring and overlay all of its features.
    ///
    /// A shape that cannot be parsed or has no ring keeps the current view.
    pub fn select(&mut self, field: &StoredField) -> MapCommand {
        let features = match parse_features(&field.field.shape) {
            Ok(features) => features,
            Err(e) => {
                warn!(field = %field.id, error = %e, "Unable to parse field shape");
                return self.command(Vec::new());
            }
        };

        match first_ring_bounds(&features) {
            Some(bounds) => self.viewport = MapViewport::fit_bounds(bounds, self.size),
            None => warn!(field = %field.id, "Field shape has no ring to fit"),
        }

        self.command(features.iter().map(OverlayFeature::from).collect())
    }

    /// Clear the overlay and return to the default view.
    pub fn deselect(&mut self) -> MapCommand {
        self.viewport.reset();
        self.command(Vec::new())
    }

    fn command(&self, overlay: Vec<OverlayFeature>) -> MapCommand {
        MapCommand {
            tile_url: TILE_URL,
            attribution: ATTRIBUTION,
            viewport: self.viewport,
            overlay,
        }
    }
}
