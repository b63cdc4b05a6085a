//! Application state for Graffiti Maps
//!
//! This crate owns the persisted per-device state: the local user identity and
//! the liked and saved pin sets. Stores are explicit objects with a
//! construct, initialize, ready lifecycle and receive their storage medium
//! through dependency injection.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod identity;
pub mod interactions;
pub mod keys;

#[cfg(test)]
mod test_utils;

pub use identity::{
    generate_device_id, generate_local_user_id, IdentityError, IdentityStore, User, DEFAULT_USERNAME,
    LOCAL_USER_ID_RANGE,
};
pub use interactions::{InteractionError, InteractionKind, InteractionSet, InteractionStore};
pub use keys::StorageKeys;
