//! Graffiti Maps
//!
//! Local-first core of a street-art discovery app: a static catalog of graffiti
//! pins, a persistent per-device identity, and the user's liked and saved pins.
//!
//! [`AppSession`] wires the workspace crates together:
//! - `storage`: key-value medium and SQLite schema
//! - `app-platform`: device information
//! - `app-core`: the pin catalog
//! - `app-state`: identity and interaction stores

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod logging;
pub mod profile;
pub mod session;

pub use app_core::{Artist, Catalog, Pin, PinFilter, PinId, PinStatus};
pub use app_platform::{DeviceInfo, HostDeviceInfo, StaticDeviceInfo};
pub use app_state::{IdentityStore, InteractionKind, InteractionStore, StorageKeys, User};
pub use profile::{username_edit, ProfileTab, ProfileView};
pub use session::{AppConfig, AppSession, CatalogConfig, SessionError};
