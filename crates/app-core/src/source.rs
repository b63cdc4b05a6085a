//! Catalog sources
//!
//! A source is consulted once at process start; the resulting [`Catalog`] is
//! immutable afterwards.

use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};
use storage::{graffiti_migrations, DatabaseError, SqliteDatabase};
use thiserror::Error;

use crate::catalog::{Artist, Catalog, Pin, PinStatus, SocialLinks};
use crate::seed::seed_catalog;

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Database layer error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Query error
    #[error("Query error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// JSON column could not be parsed
    #[error("Malformed JSON column: {0}")]
    Json(#[from] serde_json::Error),

    /// Row holds a value the catalog cannot represent
    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Provider of the static catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the full catalog
    async fn load(&self) -> Result<Catalog>;
}

/// The built-in sample catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedCatalog;

#[async_trait]
impl CatalogSource for SeedCatalog {
    async fn load(&self) -> Result<Catalog> {
        Ok(seed_catalog())
    }
}

/// Catalog stored in the relational schema
pub struct SqliteCatalogSource {
    db: SqliteDatabase,
}

impl SqliteCatalogSource {
    /// Wrap a database, applying the schema migrations
    pub async fn new(db: SqliteDatabase) -> Result<Self> {
        db.migrate(&graffiti_migrations()).await?;
        Ok(Self { db })
    }

    /// Write every artist and pin of `catalog` into the tables
    ///
    /// Rows with an existing id are replaced. Pins referencing a submitting user
    /// require that user to exist in `users`.
    pub async fn import(&self, catalog: &Catalog) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        for artist in catalog.artists() {
            let social_links = artist.social_links.as_ref().map(serde_json::to_string).transpose()?;
            sqlx::query(
                "INSERT OR REPLACE INTO artists (id, handle, bio, avatar, social_links) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(artist.id)
            .bind(&artist.handle)
            .bind(&artist.bio)
            .bind(&artist.avatar)
            .bind(social_links)
            .execute(&mut *tx)
            .await?;
        }

        for pin in catalog.pins() {
            let images = serde_json::to_string(&pin.images)?;
            let style_tags = pin.style_tags.as_ref().map(serde_json::to_string).transpose()?;
            sqlx::query(
                "INSERT OR REPLACE INTO graffiti_pins
                    (id, name, latitude, longitude, images, style_tags, artist_id, status, city, description, submitted_by_user_id)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(pin.id)
            .bind(&pin.name)
            .bind(pin.latitude)
            .bind(pin.longitude)
            .bind(images)
            .bind(style_tags)
            .bind(pin.artist_id)
            .bind(pin.status.as_str())
            .bind(&pin.city)
            .bind(&pin.description)
            .bind(pin.submitted_by_user_id.map(i64::from))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(
            "Imported {} pins and {} artists into the catalog database",
            catalog.pins().len(),
            catalog.artists().len()
        );
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for SqliteCatalogSource {
    async fn load(&self) -> Result<Catalog> {
        let artist_rows = sqlx::query(
            "SELECT id, handle, bio, avatar, social_links FROM artists ORDER BY id",
        )
        .fetch_all(self.db.pool())
        .await?;

        let pin_rows = sqlx::query(
            "SELECT id, name, latitude, longitude, images, style_tags, artist_id, status, city, description, submitted_by_user_id
             FROM graffiti_pins ORDER BY id",
        )
        .fetch_all(self.db.pool())
        .await?;

        let artists = artist_rows.iter().map(artist_from_row).collect::<Result<Vec<_>>>()?;
        let pins = pin_rows.iter().map(pin_from_row).collect::<Result<Vec<_>>>()?;

        tracing::debug!("Loaded {} pins and {} artists from database", pins.len(), artists.len());
        Ok(Catalog::new(pins, artists))
    }
}

fn artist_from_row(row: &SqliteRow) -> Result<Artist> {
    let social_links: Option<String> = row.try_get("social_links")?;
    let social_links = social_links
        .map(|raw| serde_json::from_str::<SocialLinks>(&raw))
        .transpose()?;

    Ok(Artist {
        id: row.try_get("id")?,
        handle: row.try_get("handle")?,
        bio: row.try_get("bio")?,
        avatar: row.try_get("avatar")?,
        social_links,
    })
}

fn pin_from_row(row: &SqliteRow) -> Result<Pin> {
    let id: i64 = row.try_get("id")?;

    let images: String = row.try_get("images")?;
    let style_tags: Option<String> = row.try_get("style_tags")?;
    let status: String = row.try_get("status")?;

    let submitted_by: Option<i64> = row.try_get("submitted_by_user_id")?;
    let submitted_by_user_id = submitted_by
        .map(|uid| {
            u32::try_from(uid)
                .map_err(|_| CatalogError::InvalidRow(format!("pin {} has user id {}", id, uid)))
        })
        .transpose()?;

    Ok(Pin {
        id,
        name: row.try_get("name")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        images: serde_json::from_str(&images)?,
        style_tags: style_tags.map(|raw| serde_json::from_str(&raw)).transpose()?,
        artist_id: row.try_get("artist_id")?,
        status: PinStatus::parse(&status),
        city: row.try_get("city")?,
        description: row.try_get("description")?,
        submitted_by_user_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn source() -> SqliteCatalogSource {
        let db = SqliteDatabase::in_memory().await.unwrap();
        SqliteCatalogSource::new(db).await.unwrap()
    }

    #[tokio::test]
    async fn test_seed_source() {
        let catalog = SeedCatalog.load().await.unwrap();
        assert!(!catalog.is_empty());
    }

    #[tokio::test]
    async fn test_empty_database_loads_empty_catalog() {
        let catalog = source().await.load().await.unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.artists().is_empty());
    }

    #[tokio::test]
    async fn test_import_then_load_preserves_catalog() {
        let source = source().await;
        let seed = seed_catalog();

        source.import(&seed).await.unwrap();
        let loaded = source.load().await.unwrap();

        assert_eq!(loaded, seed);
    }

    #[tokio::test]
    async fn test_load_parses_nullable_columns() {
        let source = source().await;

        sqlx::query("INSERT INTO artists (id, handle) VALUES (4, 'quiet')")
            .execute(source.db.pool())
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO graffiti_pins (id, name, latitude, longitude, images, artist_id, status)
             VALUES (9, 'Underpass', 40.1, -73.2, '[\"a.jpg\",\"b.jpg\"]', 4, 'buffed')",
        )
        .execute(source.db.pool())
        .await
        .unwrap();

        let catalog = source.load().await.unwrap();
        let pin = catalog.pin(9).unwrap();
        assert_eq!(pin.thumbnail(), Some("a.jpg"));
        assert_eq!(pin.style_tags, None);
        assert_eq!(pin.status, PinStatus::Buffed);
        assert_eq!(pin.city, None);

        let artist = catalog.artist_by_id(pin.artist_id).unwrap();
        assert_eq!(artist.handle, "quiet");
        assert_eq!(artist.social_links, None);
    }

    #[tokio::test]
    async fn test_import_rejects_unknown_artist() {
        let source = source().await;
        let mut pin = Pin::new(1, "Orphan", 0.0, 0.0);
        pin.artist_id = Some(77);

        let result = source.import(&Catalog::new(vec![pin], Vec::new())).await;
        assert!(matches!(result, Err(CatalogError::Sqlx(_))));
        assert!(source.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_images_column() {
        let source = source().await;

        sqlx::query(
            "INSERT INTO graffiti_pins (id, name, latitude, longitude, images) VALUES (1, 'Bad', 0.0, 0.0, 'not json')",
        )
        .execute(source.db.pool())
        .await
        .unwrap();

        assert!(matches!(source.load().await, Err(CatalogError::Json(_))));
    }
}
