//! In-memory field catalog.
//!
//! Used when no database is configured and throughout the test suites.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use field_common::{Field, FieldId, FieldResult, StoredField};

use crate::catalog::FieldCatalog;

/// Field catalog held in process memory, in insertion order.
#[derive(Default)]
pub struct MemoryFieldCatalog {
    fields: RwLock<Vec<StoredField>>,
}

impl MemoryFieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.fields.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.fields.read().await.is_empty()
    }
}

#[async_trait]
impl FieldCatalog for MemoryFieldCatalog {
    async fn query_all(&self) -> FieldResult<Vec<StoredField>> {
        Ok(self.fields.read().await.clone())
    }

    async fn get(&self, id: FieldId) -> FieldResult<Option<StoredField>> {
        Ok(self
            .fields
            .read()
            .await
            .iter()
            .find(|stored| stored.id == id)
            .cloned())
    }

    async fn create(&self, field: &Field) -> FieldResult<FieldId> {
        let id = FieldId::new();
        self.fields.write().await.push(StoredField {
            id,
            created_at: Utc::now(),
            field: field.clone(),
        });
        Ok(id)
    }

    async fn ping(&self) -> FieldResult<()> {
        Ok(())
    }
}
