//! Core application logic for Graffiti Maps
//!
//! This crate contains the street-art catalog: pins, artists, the sources the
//! catalog is loaded from, and derived views used by the map.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod seed;
pub mod source;
pub mod views;

pub use catalog::{Artist, ArtistId, Catalog, Pin, PinFilter, PinId, PinStatus, PinWithArtist, SocialLinks, UserId};
pub use source::{CatalogError, CatalogSource, SeedCatalog, SqliteCatalogSource};
pub use views::{map_pins, marker_summary, MapPin};
