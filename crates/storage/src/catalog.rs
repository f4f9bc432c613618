//! Field catalog backed by PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use field_common::{Field, FieldError, FieldId, FieldResult, StoredField};

/// The remote collection of field records.
///
/// Records are created once and never mutated; the catalog has no update or
/// delete surface.
#[async_trait]
pub trait FieldCatalog: Send + Sync {
    /// Fetch every field record, oldest first.
    async fn query_all(&self) -> FieldResult<Vec<StoredField>>;

    /// Fetch a single field record.
    async fn get(&self, id: FieldId) -> FieldResult<Option<StoredField>>;

    /// Persist a new field record and return its id.
    async fn create(&self, field: &Field) -> FieldResult<FieldId>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> FieldResult<()>;
}

/// Database connection pool and catalog operations.
pub struct PgFieldCatalog {
    pool: PgPool,
}

impl PgFieldCatalog {
    /// Create a new catalog connection from database URL.
    pub async fn connect(database_url: &str) -> FieldResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| FieldError::DatabaseError(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> FieldResult<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| FieldError::DatabaseError(format!("Migration failed: {}", e)))?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl FieldCatalog for PgFieldCatalog {
    async fn query_all(&self) -> FieldResult<Vec<StoredField>> {
        let rows = sqlx::query_as::<_, FieldRow>(
            "SELECT id, title, shape, table_data, created_at FROM fields \
             ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| FieldError::DatabaseError(format!("Query failed: {}", e)))?;

        debug!(count = rows.len(), "Loaded field catalog");

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn get(&self, id: FieldId) -> FieldResult<Option<StoredField>> {
        let row = sqlx::query_as::<_, FieldRow>(
            "SELECT id, title, shape, table_data, created_at FROM fields WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| FieldError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, field: &Field) -> FieldResult<FieldId> {
        let id = FieldId::new();

        sqlx::query(
            r#"
            INSERT INTO fields (id, title, shape, table_data, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id.0)
        .bind(&field.title)
        .bind(&field.shape)
        .bind(&field.table)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| FieldError::DatabaseError(format!("Insert failed: {}", e)))?;

        Ok(id)
    }

    async fn ping(&self) -> FieldResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| FieldError::DatabaseError(format!("Ping failed: {}", e)))?;
        Ok(())
    }
}

/// Internal row type for database queries.
#[derive(FromRow)]
struct FieldRow {
    id: Uuid,
    title: String,
    shape: String,
    table_data: String,
    created_at: DateTime<Utc>,
}

impl From<FieldRow> for StoredField {
    fn from(row: FieldRow) -> Self {
        StoredField {
            id: FieldId(row.id),
            created_at: row.created_at,
            field: Field {
                title: row.title,
                shape: row.shape,
                table: row.table_data,
            },
        }
    }
}

/// Database schema SQL.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS fields (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    shape TEXT NOT NULL,
    table_data TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_fields_created_at ON fields(created_at);
"#;
