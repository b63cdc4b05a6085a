//! Local user identity
//!
//! The identity store establishes a single local user per installation and keeps
//! it across restarts. The device identifier is cached under its own key,
//! independently of the user record.
//!
//! Failures follow a fail-soft policy: they are logged and the store degrades to
//! "no user" instead of surfacing an error.

use app_core::catalog::UserId;
use app_platform::DeviceInfo;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::medium::{store_json, KeyValueMedium, MediumError};
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};

use crate::keys::StorageKeys;

/// Username given to a freshly created user
pub const DEFAULT_USERNAME: &str = "Guest User";

/// Locally generated user ids fall in `0..LOCAL_USER_ID_RANGE`
pub const LOCAL_USER_ID_RANGE: UserId = 10_000;

const DEVICE_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identity errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Persistent medium failed
    #[error("Storage error: {0}")]
    Medium(#[from] MediumError),

    /// No user has been loaded
    #[error("No user loaded")]
    NoUser,
}

/// Result type for identity operations
pub type Result<T> = std::result::Result<T, IdentityError>;

/// The local user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Locally generated numeric id, not globally unique
    pub id: UserId,
    /// Installation-stable device identifier
    pub device_id: String,
    /// Display username
    pub username: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Copy of this record with a different username
    pub fn with_username(&self, username: impl Into<String>) -> Self {
        Self { username: username.into(), ..self.clone() }
    }
}

/// Random local user id in `0..LOCAL_USER_ID_RANGE`
///
/// Collisions between installations are possible and not corrected; a
/// server-assigned id is a separate concern.
pub fn generate_local_user_id<R: Rng + ?Sized>(rng: &mut R) -> UserId {
    rng.gen_range(0..LOCAL_USER_ID_RANGE)
}

/// Device identifier from the platform model id, or synthesized when absent
pub fn generate_device_id(device: &dyn DeviceInfo) -> String {
    match device.model_id() {
        Some(model_id) => model_id,
        None => synthesize_device_id(Utc::now().timestamp_millis(), &mut rand::thread_rng()),
    }
}

/// `device_{millis}_{9 base36 chars}`
fn synthesize_device_id<R: Rng + ?Sized>(millis: i64, rng: &mut R) -> String {
    let suffix: String = (0..DEVICE_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("device_{}_{}", millis, suffix)
}

#[derive(Debug)]
struct IdentityState {
    user: Option<User>,
    loading: bool,
}

/// Store for the local user identity
pub struct IdentityStore {
    medium: Arc<dyn KeyValueMedium>,
    device: Arc<dyn DeviceInfo>,
    keys: StorageKeys,
    state: RwLock<IdentityState>,
    init: OnceCell<()>,
    writes: Mutex<()>,
}

impl IdentityStore {
    /// Create an uninitialized store
    pub fn new(
        medium: Arc<dyn KeyValueMedium>,
        device: Arc<dyn DeviceInfo>,
        keys: StorageKeys,
    ) -> Self {
        Self {
            medium,
            device,
            keys,
            state: RwLock::new(IdentityState { user: None, loading: true }),
            init: OnceCell::new(),
            writes: Mutex::new(()),
        }
    }

    /// Create and initialize a store
    pub async fn open(
        medium: Arc<dyn KeyValueMedium>,
        device: Arc<dyn DeviceInfo>,
        keys: StorageKeys,
    ) -> Self {
        let store = Self::new(medium, device, keys);
        store.initialize().await;
        store
    }

    /// Load or create the user
    ///
    /// Runs once per store; later calls return immediately. Failures are logged
    /// and leave the user absent, but initialization still completes.
    pub async fn initialize(&self) {
        self.init
            .get_or_init(|| async {
                let user = match self.load_or_create_user().await {
                    Ok(user) => {
                        tracing::info!("Identity ready for user {} ({})", user.id, user.username);
                        Some(user)
                    }
                    Err(e) => {
                        tracing::error!("Identity initialization failed: {}", e);
                        None
                    }
                };

                let mut state = self.state.write();
                state.user = user;
                state.loading = false;
            })
            .await;
    }

    /// The current user, absent until initialization succeeds
    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// Whether initialization is still in progress
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// Change the display username
    ///
    /// No-op when no user is loaded. A storage failure is logged and the change
    /// is dropped: the exposed user keeps its previous name. Returns whether the
    /// change was applied.
    pub async fn change_username(&self, new_username: &str) -> bool {
        match self.try_change_username(new_username).await {
            Ok(_) => true,
            Err(IdentityError::NoUser) => false,
            Err(e) => {
                tracing::error!("Update username error: {}", e);
                false
            }
        }
    }

    /// Change the display username, reporting failures
    ///
    /// The full record is overwritten in storage, then exposed once the write
    /// succeeds.
    pub async fn try_change_username(&self, new_username: &str) -> Result<User> {
        let _guard = self.writes.lock().await;

        let current = self.user().ok_or(IdentityError::NoUser)?;
        let updated = current.with_username(new_username);

        store_json(self.medium.as_ref(), &self.keys.user, &updated).await?;

        self.state.write().user = Some(updated.clone());
        tracing::debug!("Username changed to {}", updated.username);
        Ok(updated)
    }

    async fn load_or_create_user(&self) -> Result<User> {
        let device_id = self.resolve_device_id().await?;

        // An empty record counts as no record
        let stored = self.medium.get_item(&self.keys.user).await?;
        if let Some(raw) = stored.filter(|raw| !raw.is_empty()) {
            let user: User = serde_json::from_str(&raw).map_err(MediumError::from)?;
            return Ok(user);
        }

        let id = generate_local_user_id(&mut rand::thread_rng());
        let user = User {
            id,
            device_id,
            username: DEFAULT_USERNAME.to_string(),
            created_at: Utc::now(),
        };

        store_json(self.medium.as_ref(), &self.keys.user, &user).await?;
        tracing::info!("Created local user {}", user.id);
        Ok(user)
    }

    async fn resolve_device_id(&self) -> Result<String> {
        if let Some(stored) = self.medium.get_item(&self.keys.device_id).await? {
            if !stored.is_empty() {
                return Ok(stored);
            }
        }

        let device_id = generate_device_id(self.device.as_ref());
        self.medium
            .set_item(&self.keys.device_id, device_id.clone())
            .await?;
        tracing::debug!("Generated device id {}", device_id);
        Ok(device_id)
    }
}
