//! Liked and saved pins
//!
//! The interaction store tracks which catalog pins the local user has liked or
//! saved. Each set is persisted as a whole under its own key after every toggle.
//!
//! Toggles update the exposed state before the write completes. A failed write is
//! logged and not rolled back; instead the set is flagged as unsynced until its
//! next successful write.

use app_core::catalog::{Artist, ArtistId, Catalog, Pin, PinId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storage::medium::{load_json, store_json, KeyValueMedium, MediumError};
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};

use crate::keys::StorageKeys;

/// Interaction errors
#[derive(Debug, Error)]
pub enum InteractionError {
    /// Persistent medium failed
    #[error("Storage error: {0}")]
    Medium(#[from] MediumError),
}

/// Result type for interaction operations
pub type Result<T> = std::result::Result<T, InteractionError>;

/// Which interaction set an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Pins the user liked
    Liked,
    /// Pins the user saved for later
    Saved,
}

impl InteractionKind {
    /// Both kinds
    pub const ALL: [InteractionKind; 2] = [InteractionKind::Liked, InteractionKind::Saved];

    fn label(self) -> &'static str {
        match self {
            InteractionKind::Liked => "liked",
            InteractionKind::Saved => "saved",
        }
    }
}

/// A set of pin ids kept in insertion order
///
/// Persisted as a JSON array. Duplicates in stored data are dropped on load,
/// keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PinId>", into = "Vec<PinId>")]
pub struct InteractionSet {
    ids: Vec<PinId>,
}

impl InteractionSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is a member
    pub fn contains(&self, id: PinId) -> bool {
        self.ids.contains(&id)
    }

    /// Remove `id` if present, add it otherwise; returns the new membership
    pub fn toggle(&mut self, id: PinId) -> bool {
        if let Some(pos) = self.ids.iter().position(|&existing| existing == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Members in insertion order
    pub fn ids(&self) -> &[PinId] {
        &self.ids
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl From<Vec<PinId>> for InteractionSet {
    fn from(raw: Vec<PinId>) -> Self {
        let mut ids = Vec::with_capacity(raw.len());
        for id in raw {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids }
    }
}

impl From<InteractionSet> for Vec<PinId> {
    fn from(set: InteractionSet) -> Self {
        set.ids
    }
}

impl FromIterator<PinId> for InteractionSet {
    fn from_iter<I: IntoIterator<Item = PinId>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

#[derive(Debug, Default)]
struct SetState {
    set: InteractionSet,
    unsynced: bool,
}

#[derive(Debug)]
struct InteractionState {
    liked: SetState,
    saved: SetState,
    loading: bool,
}

impl InteractionState {
    fn get(&self, kind: InteractionKind) -> &SetState {
        match kind {
            InteractionKind::Liked => &self.liked,
            InteractionKind::Saved => &self.saved,
        }
    }

    fn get_mut(&mut self, kind: InteractionKind) -> &mut SetState {
        match kind {
            InteractionKind::Liked => &mut self.liked,
            InteractionKind::Saved => &mut self.saved,
        }
    }
}

/// Store for liked and saved pins, joined against the static catalog
pub struct InteractionStore {
    medium: Arc<dyn KeyValueMedium>,
    catalog: Arc<Catalog>,
    keys: StorageKeys,
    state: RwLock<InteractionState>,
    init: OnceCell<()>,
    liked_writes: Mutex<()>,
    saved_writes: Mutex<()>,
}

impl InteractionStore {
    /// Create an uninitialized store
    pub fn new(medium: Arc<dyn KeyValueMedium>, catalog: Arc<Catalog>, keys: StorageKeys) -> Self {
        Self {
            medium,
            catalog,
            keys,
            state: RwLock::new(InteractionState {
                liked: SetState::default(),
                saved: SetState::default(),
                loading: true,
            }),
            init: OnceCell::new(),
            liked_writes: Mutex::new(()),
            saved_writes: Mutex::new(()),
        }
    }

    /// Create and initialize a store
    pub async fn open(medium: Arc<dyn KeyValueMedium>, catalog: Arc<Catalog>, keys: StorageKeys) -> Self {
        let store = Self::new(medium, catalog, keys);
        store.initialize().await;
        store
    }

    /// Load both sets from storage
    ///
    /// Runs once per store. A missing or unreadable set starts empty; the
    /// loading flag clears once both reads have finished.
    pub async fn initialize(&self) {
        self.init
            .get_or_init(|| async {
                let (liked, saved) = tokio::join!(
                    self.load_or_default(InteractionKind::Liked),
                    self.load_or_default(InteractionKind::Saved)
                );

                let mut state = self.state.write();
                state.liked.set = liked;
                state.saved.set = saved;
                state.loading = false;
            })
            .await;
    }

    /// Whether the sets are still loading
    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// The static catalog
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// All catalog pins
    pub fn pins(&self) -> &[Pin] {
        self.catalog.pins()
    }

    /// All catalog artists
    pub fn artists(&self) -> &[Artist] {
        self.catalog.artists()
    }

    /// Snapshot of the liked set
    pub fn liked(&self) -> InteractionSet {
        self.set(InteractionKind::Liked)
    }

    /// Snapshot of the saved set
    pub fn saved(&self) -> InteractionSet {
        self.set(InteractionKind::Saved)
    }

    /// Snapshot of either set
    pub fn set(&self, kind: InteractionKind) -> InteractionSet {
        self.state.read().get(kind).set.clone()
    }

    /// Whether a pin is liked
    pub fn is_liked(&self, pin_id: PinId) -> bool {
        self.state.read().liked.set.contains(pin_id)
    }

    /// Whether a pin is saved
    pub fn is_saved(&self, pin_id: PinId) -> bool {
        self.state.read().saved.set.contains(pin_id)
    }

    /// Whether the in-memory set may differ from what storage holds
    pub fn is_unsynced(&self, kind: InteractionKind) -> bool {
        self.state.read().get(kind).unsynced
    }

    /// Toggle a like; returns whether the pin is now liked
    pub async fn toggle_like(&self, pin_id: PinId) -> bool {
        self.toggle(InteractionKind::Liked, pin_id).await
    }

    /// Toggle a save; returns whether the pin is now saved
    pub async fn toggle_save(&self, pin_id: PinId) -> bool {
        self.toggle(InteractionKind::Saved, pin_id).await
    }

    /// Toggle membership of `pin_id` in a set and persist the whole set
    ///
    /// Writes to the same set are serialized, so they land in call order.
    pub async fn toggle(&self, kind: InteractionKind, pin_id: PinId) -> bool {
        let _guard = self.write_lock(kind).lock().await;

        let (member, snapshot) = {
            let mut state = self.state.write();
            let entry = state.get_mut(kind);
            let member = entry.set.toggle(pin_id);
            (member, entry.set.clone())
        };

        let key = self.keys.interaction(kind);
        let synced = match store_json(self.medium.as_ref(), key, snapshot.ids()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to persist {} pins under {}: {}", kind.label(), key, e);
                false
            }
        };
        self.state.write().get_mut(kind).unsynced = !synced;

        member
    }

    /// Catalog pins whose id is in `ids`, in catalog order
    pub fn get_pins_by_ids(&self, ids: &[PinId]) -> Vec<Pin> {
        self.catalog.pins_by_ids(ids)
    }

    /// Catalog artist for an optional id; `None` when absent or unknown
    pub fn get_artist_by_id(&self, artist_id: Option<ArtistId>) -> Option<Artist> {
        self.catalog.artist_by_id(artist_id)
    }

    /// Liked pins joined with the catalog
    pub fn liked_pins(&self) -> Vec<Pin> {
        self.get_pins_by_ids(self.liked().ids())
    }

    /// Saved pins joined with the catalog
    pub fn saved_pins(&self) -> Vec<Pin> {
        self.get_pins_by_ids(self.saved().ids())
    }

    fn write_lock(&self, kind: InteractionKind) -> &Mutex<()> {
        match kind {
            InteractionKind::Liked => &self.liked_writes,
            InteractionKind::Saved => &self.saved_writes,
        }
    }

    async fn load_or_default(&self, kind: InteractionKind) -> InteractionSet {
        match self.load(kind).await {
            Ok(Some(set)) => {
                tracing::debug!("Loaded {} {} pins", set.len(), kind.label());
                set
            }
            Ok(None) => InteractionSet::new(),
            Err(e) => {
                tracing::error!("Error loading {} pins: {}", kind.label(), e);
                InteractionSet::new()
            }
        }
    }

    async fn load(&self, kind: InteractionKind) -> Result<Option<InteractionSet>> {
        let key = self.keys.interaction(kind);
        Ok(load_json(self.medium.as_ref(), key).await?)
    }
}
