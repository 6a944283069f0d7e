/// Application context and dependency injection
use crate::{
    account::AccountManager,
    booking::BookingStore,
    catalog::Catalog,
    config::ServerConfig,
    db,
    error::{ApiError, ApiResult},
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub account_manager: Arc<AccountManager>,
    pub booking_store: Arc<BookingStore>,
    pub catalog: Arc<Catalog>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        config.validate()?;

        Self::ensure_directories(&config).await?;

        let db = db::create_pool(&config.storage.database, db::DatabaseOptions::default()).await?;

        db::run_migrations(&db).await?;
        db::test_connection(&db).await?;

        let config = Arc::new(config);
        let account_manager = Arc::new(AccountManager::new(db.clone(), config.clone()));
        let booking_store = Arc::new(BookingStore::new(db.clone()));
        let catalog = Arc::new(Catalog::seeded());

        Ok(Self {
            config,
            db,
            account_manager,
            booking_store,
            catalog,
        })
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> ApiResult<()> {
        let dir = &config.storage.data_directory;
        if !dir.exists() {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                ApiError::Internal(format!("Failed to create directory {:?}: {}", dir, e))
            })?;
        }
        Ok(())
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
