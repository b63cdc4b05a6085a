//! Database abstraction layer
//!
//! SQLite connection pooling and versioned migrations for the relational side of
//! the catalog (users, artists, pins, likes, saved pins).

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Error as SqlxError, SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Database error types
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error
    #[error("Database error: {0}")]
    Sqlx(#[from] SqlxError),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for database operations
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file path
    pub path: String,
    /// Maximum number of connections in pool
    pub max_connections: u32,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Enable WAL mode
    pub wal_mode: bool,
    /// Synchronous mode
    pub synchronous: SynchronousMode,
}

/// SQLite synchronous mode
#[derive(Debug, Clone, Copy)]
pub enum SynchronousMode {
    /// Off - no synchronization
    Off,
    /// Normal - synchronize at critical moments
    Normal,
    /// Full - synchronize after each write
    Full,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "graffiti_maps.db".to_string(),
            max_connections: 4,
            connect_timeout: Duration::from_secs(30),
            wal_mode: true,
            synchronous: SynchronousMode::Normal,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable WAL mode
    pub fn wal_mode(mut self, enabled: bool) -> Self {
        self.wal_mode = enabled;
        self
    }

    /// Set synchronous mode
    pub fn synchronous(mut self, mode: SynchronousMode) -> Self {
        self.synchronous = mode;
        self
    }
}

/// SQLite database
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Open (creating if missing) a SQLite database with configuration
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let mut options = SqliteConnectOptions::from_str(&format!("sqlite://{}", config.path))
            .map_err(|e| DatabaseError::Config(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        if config.wal_mode {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        options = match config.synchronous {
            SynchronousMode::Off => options.synchronous(SqliteSynchronous::Off),
            SynchronousMode::Normal => options.synchronous(SqliteSynchronous::Normal),
            SynchronousMode::Full => options.synchronous(SqliteSynchronous::Full),
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (for testing)
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DatabaseError::Config(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run migrations
    ///
    /// Already-applied versions are skipped; a changed checksum for an applied
    /// version is rejected.
    pub async fn migrate(&self, migrations: &[MigrationDefinition]) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                checksum TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        let current_version = self.current_version().await?;

        for migration in migrations {
            if migration.version <= current_version {
                let recorded: Option<String> =
                    sqlx::query_scalar("SELECT checksum FROM _migrations WHERE version = ?")
                        .bind(migration.version)
                        .fetch_optional(&self.pool)
                        .await?;

                if let Some(checksum) = recorded {
                    if checksum != migration.checksum {
                        return Err(DatabaseError::Migration(format!(
                            "checksum mismatch for applied migration {}",
                            migration.version
                        )));
                    }
                }
                continue;
            }

            tracing::info!("Applying migration {} - {}", migration.version, migration.description);

            let mut tx = self.pool.begin().await?;

            sqlx::query(&migration.sql).execute(&mut *tx).await?;

            sqlx::query("INSERT INTO _migrations (version, description, checksum) VALUES (?, ?, ?)")
                .bind(migration.version)
                .bind(&migration.description)
                .bind(&migration.checksum)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            tracing::info!("Migration {} applied successfully", migration.version);
        }

        Ok(())
    }

    /// Get current migration version (0 before any migration)
    pub async fn current_version(&self) -> Result<i64> {
        let version = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(version) FROM _migrations")
            .fetch_optional(&self.pool)
            .await?
            .flatten();

        Ok(version.unwrap_or(0))
    }

    /// Check if the database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Close the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Migration definition
#[derive(Debug, Clone)]
pub struct MigrationDefinition {
    /// Migration version number
    pub version: i64,
    /// Migration description
    pub description: String,
    /// SQL to execute (a single statement)
    pub sql: String,
    /// Checksum for verification
    pub checksum: String,
}

impl MigrationDefinition {
    /// Create a new migration definition
    pub fn new(version: i64, description: impl Into<String>, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let checksum = format!("{:x}", md5::compute(&sql));

        Self { version, description: description.into(), sql, checksum }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_in_memory_is_healthy() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.health_check().await.unwrap();
        db.close().await;
        assert!(db.health_check().await.is_err());
    }

    fn artist_migrations() -> Vec<MigrationDefinition> {
        vec![
            MigrationDefinition::new(1, "Create artists", "CREATE TABLE artists (id INTEGER PRIMARY KEY, handle TEXT)"),
            MigrationDefinition::new(2, "Add artist bio", "ALTER TABLE artists ADD COLUMN bio TEXT"),
        ]
    }

    #[tokio::test]
    async fn test_migrations_apply_in_order() {
        let db = SqliteDatabase::in_memory().await.unwrap();

        db.migrate(&artist_migrations()).await.unwrap();
        assert_eq!(db.current_version().await.unwrap(), 2);

        sqlx::query("INSERT INTO artists (id, handle, bio) VALUES (1, 'lexi', 'murals')")
            .execute(db.pool())
            .await
            .unwrap();
        let bio: String = sqlx::query("SELECT bio FROM artists WHERE id = 1")
            .fetch_one(db.pool())
            .await
            .unwrap()
            .get("bio");
        assert_eq!(bio, "murals");
    }

    #[tokio::test]
    async fn test_rerun_skips_applied() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        let migrations = artist_migrations();

        db.migrate(&migrations[..1]).await.unwrap();
        assert_eq!(db.current_version().await.unwrap(), 1);

        // Only version 2 runs; re-running version 1 would fail on the existing table
        db.migrate(&migrations).await.unwrap();
        db.migrate(&migrations).await.unwrap();
        assert_eq!(db.current_version().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_in_memory_enforces_foreign_keys() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.migrate(&[
            MigrationDefinition::new(1, "Create artists", "CREATE TABLE artists (id INTEGER PRIMARY KEY)"),
            MigrationDefinition::new(
                2,
                "Create pins",
                "CREATE TABLE pins (id INTEGER PRIMARY KEY, artist_id INTEGER REFERENCES artists(id))",
            ),
        ])
        .await
        .unwrap();

        let result = sqlx::query("INSERT INTO pins (id, artist_id) VALUES (1, 99)")
            .execute(db.pool())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_changed_migration_rejected() {
        let db = SqliteDatabase::in_memory().await.unwrap();

        db.migrate(&[MigrationDefinition::new(1, "v1", "CREATE TABLE a (id INTEGER)")])
            .await
            .unwrap();

        let result = db
            .migrate(&[MigrationDefinition::new(1, "v1", "CREATE TABLE a (id TEXT)")])
            .await;
        assert!(matches!(result, Err(DatabaseError::Migration(_))));
    }

    #[tokio::test]
    async fn test_version_before_migrations() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.migrate(&[]).await.unwrap();
        assert_eq!(db.current_version().await.unwrap(), 0);
    }

    #[test]
    fn test_config_builder() {
        let config = DatabaseConfig::new("catalog.db")
            .max_connections(2)
            .connect_timeout(Duration::from_secs(3))
            .wal_mode(false)
            .synchronous(SynchronousMode::Full);

        assert_eq!(config.path, "catalog.db");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.wal_mode);
        assert!(matches!(config.synchronous, SynchronousMode::Full));
    }

    #[test]
    fn test_migration_checksum_stable() {
        let a = MigrationDefinition::new(1, "a", "SELECT 1");
        let b = MigrationDefinition::new(1, "b", "SELECT 1");
        assert_eq!(a.checksum, b.checksum);
    }
}
