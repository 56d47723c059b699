//! Database module - AppState and the read-only certificate store.
//!
//! - `certificate` - Postgres lookups for applications, village documents and templates

mod certificate;

pub use certificate::PgCertificateStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::certificate::model::{ApplicationRecord, VillageDocumentSet};
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the records a certificate is rendered from.
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Application joined with its village, only if it is approved.
    async fn find_approved_application(
        &self,
        id: &Uuid,
    ) -> Result<Option<ApplicationRecord>, StoreError>;

    async fn find_approved_by_number(
        &self,
        application_number: &str,
    ) -> Result<Option<ApplicationRecord>, StoreError>;

    async fn find_village_documents(
        &self,
        village_id: &Uuid,
    ) -> Result<Option<VillageDocumentSet>, StoreError>;

    async fn find_template(&self, village_id: &Uuid) -> Result<Option<String>, StoreError>;
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CertificateStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .idle_timeout(std::time::Duration::from_secs(900))
            .max_lifetime(std::time::Duration::from_secs(1800))
            .connect(&config.database_url)
            .await?;

        let store = PgCertificateStore::new(pool, config.template_cache_ttl);
        Ok(Self::with_store(Arc::new(store)))
    }

    pub fn with_store(store: Arc<dyn CertificateStore>) -> Self {
        Self { store }
    }
}
