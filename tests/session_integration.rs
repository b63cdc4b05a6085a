//! Session Integration Tests
//!
//! End-to-end tests over on-disk storage: identity and interaction state must
//! survive a restart, and the catalog can come from the SQLite schema.

use app_core::seed::seed_catalog;
use app_core::SqliteCatalogSource;
use graffiti_maps::{
    AppConfig, AppSession, CatalogConfig, InteractionKind, ProfileTab, ProfileView, StaticDeviceInfo,
};
use std::path::Path;
use std::sync::Arc;
use storage::{DatabaseConfig, KvConfig, SqliteDatabase};
use tempfile::TempDir;

fn config(dir: &Path) -> AppConfig {
    AppConfig::new(dir.join("state").to_string_lossy().to_string())
}

fn device(id: &str) -> Arc<StaticDeviceInfo> {
    Arc::new(StaticDeviceInfo::new(id))
}

/// Fresh install: user created with defaults, empty sets
#[tokio::test]
async fn test_fresh_install() {
    let temp_dir = TempDir::new().unwrap();

    let session = AppSession::open(config(temp_dir.path()), device("SM-G991B")).await.unwrap();
    assert!(!session.is_loading());

    let user = session.identity().user().unwrap();
    assert_eq!(user.username, "Guest User");
    assert_eq!(user.device_id, "SM-G991B");
    assert!(user.id < 10_000);

    assert!(session.interactions().liked().is_empty());
    assert!(session.interactions().saved().is_empty());
    assert_eq!(session.catalog().len(), seed_catalog().len());
}

/// Identity and interactions survive a restart
#[tokio::test]
async fn test_state_persists_across_restart() {
    let temp_dir = TempDir::new().unwrap();

    // Phase 1: first launch, make some changes
    let first_user = {
        let session = AppSession::open(config(temp_dir.path()), device("Pixel-7")).await.unwrap();

        session.interactions().toggle_like(1).await;
        session.interactions().toggle_like(3).await;
        session.interactions().toggle_save(2).await;
        assert!(session.identity().change_username("Wall Watcher").await);

        assert!(!session.interactions().is_unsynced(InteractionKind::Liked));
        session.flush().unwrap();
        session.identity().user().unwrap()
    };

    // Phase 2: restart, with a device reporting a different model id
    {
        let session = AppSession::open(config(temp_dir.path()), device("Pixel-8")).await.unwrap();

        let user = session.identity().user().unwrap();
        assert_eq!(user, first_user);
        assert_eq!(user.username, "Wall Watcher");
        assert_eq!(user.device_id, "Pixel-7");

        assert_eq!(session.interactions().liked().ids(), &[1, 3]);
        assert_eq!(session.interactions().saved().ids(), &[2]);

        let view = ProfileView::build(session.identity(), session.interactions());
        assert_eq!(view.liked_count(), 2);
        assert_eq!(view.tab(ProfileTab::Saved)[0].id, 2);
        assert!(view.tab(ProfileTab::Submissions).is_empty());
    }
}

/// Sessions with prefixed keys in one store do not see each other
#[tokio::test]
async fn test_prefixed_keys_isolate_state() {
    let temp_dir = TempDir::new().unwrap();
    let kv = KvConfig::new(temp_dir.path().join("shared").to_string_lossy().to_string());

    {
        let config = AppConfig::default().kv(kv.clone()).keys(app_state::StorageKeys::prefixed("a:"));
        let session = AppSession::open(config, device("dev")).await.unwrap();
        session.interactions().toggle_like(4).await;
        session.flush().unwrap();
    }

    let config = AppConfig::default().kv(kv).keys(app_state::StorageKeys::prefixed("b:"));
    let session = AppSession::open(config, device("dev")).await.unwrap();
    assert!(session.interactions().liked().is_empty());
}

/// Catalog loaded from the SQLite schema
#[tokio::test]
async fn test_sqlite_catalog_session() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("catalog.db").to_string_lossy().to_string();

    {
        let db = SqliteDatabase::new(DatabaseConfig::new(db_path.clone())).await.unwrap();
        let source = SqliteCatalogSource::new(db.clone()).await.unwrap();
        source.import(&seed_catalog()).await.unwrap();
        db.close().await;
    }

    let config = config(temp_dir.path()).catalog(CatalogConfig::Sqlite(DatabaseConfig::new(db_path)));
    let session = AppSession::open(config, device("dev")).await.unwrap();

    assert_eq!(session.catalog().as_ref(), &seed_catalog());

    session.interactions().toggle_save(5).await;
    let saved = session.interactions().saved_pins();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].city.as_deref(), Some("Brooklyn"));
}
