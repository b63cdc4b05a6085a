//! Relational schema for the graffiti catalog
//!
//! One table per migration; SQLite runs a single statement per query.

use crate::database::MigrationDefinition;

/// Table holding locally known users
pub const USERS_TABLE: &str = "users";
/// Table holding catalogued artists
pub const ARTISTS_TABLE: &str = "artists";
/// Table holding catalogued pins
pub const PINS_TABLE: &str = "graffiti_pins";
/// Join table of user likes
pub const LIKES_TABLE: &str = "likes";
/// Join table of user saved pins
pub const SAVED_PINS_TABLE: &str = "saved_pins";

/// All migrations for the graffiti catalog schema, in version order
pub fn graffiti_migrations() -> Vec<MigrationDefinition> {
    vec![
        MigrationDefinition::new(
            1,
            "Create users",
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device_id TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL DEFAULT 'Guest User',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        ),
        MigrationDefinition::new(
            2,
            "Create artists",
            "CREATE TABLE artists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                handle TEXT NOT NULL UNIQUE,
                bio TEXT,
                avatar TEXT,
                social_links TEXT,
                notion_id TEXT UNIQUE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        ),
        MigrationDefinition::new(
            3,
            "Create graffiti pins",
            "CREATE TABLE graffiti_pins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                images TEXT NOT NULL,
                style_tags TEXT,
                artist_id INTEGER REFERENCES artists(id),
                status TEXT NOT NULL DEFAULT 'active',
                city TEXT,
                description TEXT,
                notion_id TEXT UNIQUE,
                submitted_by_user_id INTEGER REFERENCES users(id),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        ),
        MigrationDefinition::new(
            4,
            "Create likes",
            "CREATE TABLE likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                pin_id INTEGER NOT NULL REFERENCES graffiti_pins(id),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        ),
        MigrationDefinition::new(
            5,
            "Create saved pins",
            "CREATE TABLE saved_pins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                pin_id INTEGER NOT NULL REFERENCES graffiti_pins(id),
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SqliteDatabase;

    async fn table_names(db: &SqliteDatabase) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap()
    }

    #[test]
    fn test_versions_are_sequential() {
        let versions: Vec<i64> = graffiti_migrations().iter().map(|m| m.version).collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_schema_applies() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.migrate(&graffiti_migrations()).await.unwrap();

        assert_eq!(db.current_version().await.unwrap(), 5);

        let tables = table_names(&db).await;
        for table in [USERS_TABLE, ARTISTS_TABLE, PINS_TABLE, LIKES_TABLE, SAVED_PINS_TABLE] {
            assert!(tables.contains(&table.to_string()), "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn test_user_defaults() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.migrate(&graffiti_migrations()).await.unwrap();

        sqlx::query("INSERT INTO users (device_id) VALUES ('device_1')")
            .execute(db.pool())
            .await
            .unwrap();

        let username: String = sqlx::query_scalar("SELECT username FROM users WHERE device_id = 'device_1'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(username, "Guest User");

        // device_id is unique
        let duplicate = sqlx::query("INSERT INTO users (device_id) VALUES ('device_1')")
            .execute(db.pool())
            .await;
        assert!(duplicate.is_err());
    }

    #[tokio::test]
    async fn test_pin_status_defaults_to_active() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.migrate(&graffiti_migrations()).await.unwrap();

        sqlx::query(
            "INSERT INTO graffiti_pins (name, latitude, longitude, images) VALUES ('Wall', 40.7, -73.9, '[]')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let status: String = sqlx::query_scalar("SELECT status FROM graffiti_pins")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(status, "active");
    }
}
