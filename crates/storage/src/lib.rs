//! Storage layer for Graffiti Maps
//!
//! This crate provides the local key-value medium the app stores persist through,
//! and the SQLite database holding the relational catalog schema.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod kv;
pub mod medium;
pub mod schema;

pub use database::{DatabaseConfig, DatabaseError, MigrationDefinition, SqliteDatabase, SynchronousMode};
pub use kv::{KvConfig, KvError, KvStore};
pub use medium::{load_json, store_json, KeyValueMedium, MediumError, MemoryMedium};
pub use schema::graffiti_migrations;
