//! Application state for the field web service.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use field_map::{MapSize, TableConfig};
use ingestion::FieldIngester;
use metrics_exporter_prometheus::PrometheusHandle;
use session::SessionGate;
use storage::{FieldCatalog, FileTokenStore, MemoryFieldCatalog, PgFieldCatalog, TokenStore};

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// Field record store.
    pub catalog: Arc<dyn FieldCatalog>,

    /// Admin session, initialized in the background at startup.
    pub gate: Arc<SessionGate>,

    /// Upload pipeline writing into `catalog`.
    pub ingester: FieldIngester,

    pub config: Config,

    /// Table virtualization defaults.
    pub table: TableConfig,

    /// Map container size used for viewport fitting.
    pub map_size: MapSize,

    /// Prometheus exporter, absent in tests.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from configuration, connecting to the database when one
    /// is configured.
    pub async fn new(config: Config, metrics: Option<PrometheusHandle>) -> Result<Self> {
        let catalog: Arc<dyn FieldCatalog> = match &config.database_url {
            Some(url) => {
                let catalog = PgFieldCatalog::connect(url)
                    .await
                    .context("Failed to connect to field catalog")?;
                catalog
                    .migrate()
                    .await
                    .context("Failed to migrate field catalog")?;
                info!("Using PostgreSQL field catalog");
                Arc::new(catalog)
            }
            None => {
                warn!("DATABASE_URL not set, fields are kept in memory only");
                Arc::new(MemoryFieldCatalog::new())
            }
        };

        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| format!("Failed to create data dir {:?}", config.data_dir))?;
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.data_dir));

        Ok(Self::from_parts(config, catalog, tokens, metrics))
    }

    /// Assemble state from already-built backends.
    pub fn from_parts(
        config: Config,
        catalog: Arc<dyn FieldCatalog>,
        tokens: Arc<dyn TokenStore>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let gate = Arc::new(SessionGate::new(
            tokens,
            config.admin_secret.clone(),
            config.session_validation,
        ));
        let ingester = FieldIngester::new(catalog.clone());

        Self {
            catalog,
            gate,
            ingester,
            config,
            table: TableConfig::default(),
            map_size: MapSize::default(),
            metrics,
        }
    }
}
