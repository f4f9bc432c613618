//! Presentation logic for field records.
//!
//! Everything the browser needs to draw a field is computed here: the map
//! viewport fitted to the field's shape, the overlay features with their
//! popups, and the visible window of the field's table. The browser shim
//! only applies the result.

pub mod overlay;
pub mod popup;
pub mod selection;
pub mod shape;
pub mod table;
pub mod viewport;

pub use overlay::{MapCommand, MapSurface, OverlayFeature, ATTRIBUTION, TILE_URL};
pub use popup::{escape_html, popup_html};
pub use selection::{SelectionState, ViewMode, MOBILE_BREAKPOINT_PX};
pub use shape::{first_ring, first_ring_bounds, parse_features};
pub use table::{cell_text, TableConfig, TableRow, TableView, TableWindow};
pub use viewport::{MapSize, MapViewport, DEFAULT_CENTER, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
