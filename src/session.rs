//! Application session
//!
//! The session is the composition root: it opens the persistent medium and the
//! catalog, then builds and initializes both stores. Collaborators can also be
//! injected directly through [`AppSession::with_parts`].

use app_core::{Catalog, CatalogError, CatalogSource, SeedCatalog, SqliteCatalogSource};
use app_platform::DeviceInfo;
use app_state::{IdentityStore, InteractionStore, StorageKeys};
use std::sync::Arc;
use storage::{DatabaseConfig, DatabaseError, KeyValueMedium, KvConfig, KvError, KvStore, SqliteDatabase};
use thiserror::Error;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Key-value store could not be opened
    #[error("Key-value store error: {0}")]
    Kv(#[from] KvError),

    /// Catalog database could not be opened
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Catalog could not be loaded
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Where the static catalog comes from
#[derive(Debug, Clone, Default)]
pub enum CatalogConfig {
    /// Built-in sample catalog
    #[default]
    Seed,
    /// Pins and artists read from a SQLite database
    Sqlite(DatabaseConfig),
}

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Persistent key-value store
    pub kv: KvConfig,
    /// Keys under which state is persisted
    pub keys: StorageKeys,
    /// Catalog source
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Create a configuration storing state at `kv_path`
    pub fn new(kv_path: impl Into<String>) -> Self {
        Self { kv: KvConfig::new(kv_path), ..Default::default() }
    }

    /// Set the key-value store configuration
    pub fn kv(mut self, kv: KvConfig) -> Self {
        self.kv = kv;
        self
    }

    /// Set the storage keys
    pub fn keys(mut self, keys: StorageKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Set the catalog source
    pub fn catalog(mut self, catalog: CatalogConfig) -> Self {
        self.catalog = catalog;
        self
    }
}

/// A running application session
pub struct AppSession {
    identity: Arc<IdentityStore>,
    interactions: Arc<InteractionStore>,
    catalog: Arc<Catalog>,
    kv: Option<KvStore>,
}

impl AppSession {
    /// Open the configured stores and initialize them
    pub async fn open(config: AppConfig, device: Arc<dyn DeviceInfo>) -> Result<Self> {
        check_keys(&config.keys)?;

        let kv = KvStore::new(config.kv.clone())?;
        let catalog = Arc::new(load_catalog(&config.catalog).await?);

        let mut session = Self::with_parts(Arc::new(kv.clone()), device, catalog, config.keys)?;
        session.kv = Some(kv);
        session.initialize().await;

        tracing::info!("Session ready with {} catalog pins", session.catalog.len());
        Ok(session)
    }

    /// Build a session from injected collaborators
    ///
    /// The stores are constructed but not initialized; call
    /// [`AppSession::initialize`] before reading them. Fails when two stored
    /// values would share a key.
    pub fn with_parts(
        medium: Arc<dyn KeyValueMedium>,
        device: Arc<dyn DeviceInfo>,
        catalog: Arc<Catalog>,
        keys: StorageKeys,
    ) -> Result<Self> {
        check_keys(&keys)?;

        let identity = Arc::new(IdentityStore::new(medium.clone(), device, keys.clone()));
        let interactions = Arc::new(InteractionStore::new(medium, catalog.clone(), keys));

        Ok(Self { identity, interactions, catalog, kv: None })
    }

    /// Initialize both stores concurrently
    pub async fn initialize(&self) {
        tokio::join!(self.identity.initialize(), self.interactions.initialize());
    }

    /// Whether either store is still loading
    pub fn is_loading(&self) -> bool {
        self.identity.is_loading() || self.interactions.is_loading()
    }

    /// Identity store
    pub fn identity(&self) -> &Arc<IdentityStore> {
        &self.identity
    }

    /// Interaction store
    pub fn interactions(&self) -> &Arc<InteractionStore> {
        &self.interactions
    }

    /// Static catalog
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Flush pending writes of the on-disk store, if the session owns one
    pub fn flush(&self) -> Result<()> {
        if let Some(kv) = &self.kv {
            kv.flush()?;
        }
        Ok(())
    }
}

fn check_keys(keys: &StorageKeys) -> Result<()> {
    if keys.are_distinct() {
        Ok(())
    } else {
        Err(SessionError::Config(format!("storage keys must be distinct: {:?}", keys)))
    }
}

async fn load_catalog(config: &CatalogConfig) -> Result<Catalog> {
    let catalog = match config {
        CatalogConfig::Seed => SeedCatalog.load().await?,
        CatalogConfig::Sqlite(db_config) => {
            let db = SqliteDatabase::new(db_config.clone()).await?;
            let source = SqliteCatalogSource::new(db).await?;
            source.load().await?
        }
    };
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_platform::StaticDeviceInfo;
    use storage::MemoryMedium;

    fn parts() -> (Arc<MemoryMedium>, AppSession) {
        let medium = Arc::new(MemoryMedium::new());
        let session = AppSession::with_parts(
            medium.clone(),
            Arc::new(StaticDeviceInfo::new("Pixel-8")),
            Arc::new(app_core::seed::seed_catalog()),
            StorageKeys::default(),
        )
        .unwrap();
        (medium, session)
    }

    #[tokio::test]
    async fn test_loading_until_initialized() {
        let (_, session) = parts();
        assert!(session.is_loading());

        session.initialize().await;
        assert!(!session.is_loading());
        assert!(session.identity().user().is_some());
    }

    #[tokio::test]
    async fn test_stores_share_medium() {
        let (medium, session) = parts();
        session.initialize().await;

        session.interactions().toggle_like(1).await;

        assert_eq!(medium.get_item("@graffiti_likes").await.unwrap(), Some("[1]".to_string()));
        assert!(medium.get_item("@graffiti_maps_user").await.unwrap().is_some());
        assert_eq!(medium.get_item("DEVICE_ID").await.unwrap(), Some("Pixel-8".to_string()));
    }

    #[test]
    fn test_clashing_keys_rejected() {
        let result = AppSession::with_parts(
            Arc::new(MemoryMedium::new()),
            Arc::new(StaticDeviceInfo::new("Pixel-8")),
            Arc::new(app_core::seed::seed_catalog()),
            StorageKeys::default().saved("@graffiti_likes"),
        );
        assert!(matches!(result, Err(SessionError::Config(_))));
    }

    #[tokio::test]
    async fn test_open_rejects_clashing_keys_before_touching_disk() {
        let config = AppConfig::new("never-created.sled").keys(StorageKeys::default().user("DEVICE_ID"));

        let result = AppSession::open(config, Arc::new(StaticDeviceInfo::unknown())).await;
        assert!(matches!(result, Err(SessionError::Config(_))));
        assert!(!std::path::Path::new("never-created.sled").exists());
    }

    #[tokio::test]
    async fn test_without_owned_store_flush_is_noop() {
        let (_, session) = parts();
        assert!(session.flush().is_ok());
    }

    #[tokio::test]
    async fn test_load_seed_catalog() {
        let catalog = load_catalog(&CatalogConfig::Seed).await.unwrap();
        assert_eq!(catalog, app_core::seed::seed_catalog());
    }

    #[test]
    fn test_config_builder() {
        let config = AppConfig::new("state.db")
            .keys(StorageKeys::prefixed("test"))
            .catalog(CatalogConfig::Sqlite(DatabaseConfig::new("catalog.db")));

        assert_eq!(config.kv.path, "state.db");
        assert!(matches!(config.catalog, CatalogConfig::Sqlite(ref db) if db.path == "catalog.db"));
    }
}
