//! Storage abstractions for the field catalog services.
//!
//! Provides unified interfaces for:
//! - The field catalog (PostgreSQL or in-memory)
//! - The persisted session token slot (local file or in-memory)

pub mod catalog;
pub mod memory;
pub mod token;

pub use catalog::{FieldCatalog, PgFieldCatalog};
pub use memory::MemoryFieldCatalog;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
