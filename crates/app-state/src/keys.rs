//! Storage keys owned by the stores
//!
//! Each store owns its keys exclusively; no two stores read or write the same key.

use crate::interactions::InteractionKind;

/// Default key of the cached device identifier
pub const DEFAULT_DEVICE_ID_KEY: &str = "DEVICE_ID";
/// Default key of the serialized user record
pub const DEFAULT_USER_KEY: &str = "@graffiti_maps_user";
/// Default key of the liked-pin set
pub const DEFAULT_LIKES_KEY: &str = "@graffiti_likes";
/// Default key of the saved-pin set
pub const DEFAULT_SAVED_KEY: &str = "@graffiti_saved";

/// Keys under which the stores persist their state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Raw device identifier (identity store)
    pub device_id: String,
    /// Serialized user record (identity store)
    pub user: String,
    /// Liked pin identifiers (interaction store)
    pub likes: String,
    /// Saved pin identifiers (interaction store)
    pub saved: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            device_id: DEFAULT_DEVICE_ID_KEY.to_string(),
            user: DEFAULT_USER_KEY.to_string(),
            likes: DEFAULT_LIKES_KEY.to_string(),
            saved: DEFAULT_SAVED_KEY.to_string(),
        }
    }
}

impl StorageKeys {
    /// Default keys with every key prefixed, e.g. to keep test runs apart
    pub fn prefixed(prefix: &str) -> Self {
        let defaults = Self::default();
        Self {
            device_id: format!("{}{}", prefix, defaults.device_id),
            user: format!("{}{}", prefix, defaults.user),
            likes: format!("{}{}", prefix, defaults.likes),
            saved: format!("{}{}", prefix, defaults.saved),
        }
    }

    /// Set the device identifier key
    pub fn device_id(mut self, key: impl Into<String>) -> Self {
        self.device_id = key.into();
        self
    }

    /// Set the user record key
    pub fn user(mut self, key: impl Into<String>) -> Self {
        self.user = key.into();
        self
    }

    /// Set the liked-set key
    pub fn likes(mut self, key: impl Into<String>) -> Self {
        self.likes = key.into();
        self
    }

    /// Set the saved-set key
    pub fn saved(mut self, key: impl Into<String>) -> Self {
        self.saved = key.into();
        self
    }

    /// Key of an interaction set
    pub fn interaction(&self, kind: InteractionKind) -> &str {
        match kind {
            InteractionKind::Liked => &self.likes,
            InteractionKind::Saved => &self.saved,
        }
    }

    /// Whether all four keys are distinct
    pub fn are_distinct(&self) -> bool {
        let keys = [&self.device_id, &self.user, &self.likes, &self.saved];
        keys.iter().enumerate().all(|(i, a)| keys[i + 1..].iter().all(|b| a != b))
    }
}
