//! Profile screen view model

use app_core::{Pin, UserId};
use app_state::{IdentityStore, InteractionStore, DEFAULT_USERNAME};

/// Tabs of the profile screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    /// Pins the user liked
    #[default]
    Liked,
    /// Pins the user saved
    Saved,
    /// Pins the user submitted
    Submissions,
}

impl ProfileTab {
    /// Text shown when the tab has no pins
    pub fn empty_message(self) -> &'static str {
        match self {
            ProfileTab::Liked => "No liked pins yet",
            ProfileTab::Saved => "No saved pins yet",
            ProfileTab::Submissions => "No submissions yet",
        }
    }

    /// Hint shown under the empty message
    pub fn empty_hint(self) -> &'static str {
        match self {
            ProfileTab::Submissions => "Tap the + button on the map to add your first graffiti pin!",
            ProfileTab::Liked | ProfileTab::Saved => "Explore the map to discover amazing street art",
        }
    }
}

/// Snapshot of everything the profile screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    /// Display name, the default name while no user is loaded
    pub username: String,
    /// Local user id, if a user is loaded
    pub user_id: Option<UserId>,
    /// Liked pins in catalog order
    pub liked: Vec<Pin>,
    /// Saved pins in catalog order
    pub saved: Vec<Pin>,
    /// Pins submitted by the user
    pub submissions: Vec<Pin>,
}

impl ProfileView {
    /// Build a snapshot from the current store state
    pub fn build(identity: &IdentityStore, interactions: &InteractionStore) -> Self {
        let user = identity.user();
        let submissions = match &user {
            Some(user) => interactions.catalog().pins_submitted_by(user.id),
            None => Vec::new(),
        };

        Self {
            username: user
                .as_ref()
                .map(|u| u.username.clone())
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            user_id: user.map(|u| u.id),
            liked: interactions.liked_pins(),
            saved: interactions.saved_pins(),
            submissions,
        }
    }

    /// Pins listed under `tab`
    pub fn tab(&self, tab: ProfileTab) -> &[Pin] {
        match tab {
            ProfileTab::Liked => &self.liked,
            ProfileTab::Saved => &self.saved,
            ProfileTab::Submissions => &self.submissions,
        }
    }

    /// Number of liked pins
    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    /// Number of saved pins
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    /// Number of submitted pins
    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }
}

/// Name to commit when the username field loses focus
///
/// `None` when the trimmed text is empty or equal to the current name.
pub fn username_edit(local: &str, current: Option<&str>) -> Option<String> {
    let trimmed = local.trim();
    if trimmed.is_empty() || Some(trimmed) == current {
        return None;
    }
    Some(trimmed.to_string())
}
