//! Mekong field catalog web service.
//!
//! Server-rendered pages for browsing fields on a map, a token-gated admin
//! area for uploading new fields, and a small JSON API the page shim uses
//! for table scrolling.

pub mod config;
pub mod error;
pub mod handlers;
pub mod html;
pub mod router;
pub mod state;
