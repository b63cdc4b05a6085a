//! Street-art catalog
//!
//! Pins and artists are fixed for the lifetime of the process. Every lookup here
//! is a pure query over the catalog; nothing in this module mutates it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of a catalogued pin
pub type PinId = i64;

/// Identifier of a catalogued artist
pub type ArtistId = i64;

/// Identifier of a local user
pub type UserId = u32;

/// Lifecycle status of a pin
///
/// Known statuses are matched ignoring ASCII case, both when parsing stored
/// rows and when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PinStatus {
    /// The artwork is still on the wall
    #[default]
    Active,
    /// The artwork has been painted over
    Buffed,
    /// Any other status string found in the data
    Other(String),
}

impl From<String> for PinStatus {
    fn from(raw: String) -> Self {
        PinStatus::parse(&raw)
    }
}

impl From<PinStatus> for String {
    fn from(status: PinStatus) -> Self {
        status.as_str().to_string()
    }
}

impl PinStatus {
    /// Parse a stored status string
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "active" => PinStatus::Active,
            "buffed" => PinStatus::Buffed,
            _ => PinStatus::Other(raw.to_string()),
        }
    }

    /// Status string as stored
    pub fn as_str(&self) -> &str {
        match self {
            PinStatus::Active => "active",
            PinStatus::Buffed => "buffed",
            PinStatus::Other(s) => s,
        }
    }

    /// Whether the pin should be shown on the map
    pub fn is_active(&self) -> bool {
        matches!(self, PinStatus::Active)
    }
}

/// A catalogued street-art location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    /// Pin identifier
    pub id: PinId,
    /// Display name
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Image URLs, first one is the thumbnail
    #[serde(default)]
    pub images: Vec<String>,
    /// Style tags (e.g. "wildstyle", "mural")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_tags: Option<Vec<String>>,
    /// Associated artist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist_id: Option<ArtistId>,
    /// Lifecycle status
    #[serde(default)]
    pub status: PinStatus,
    /// City the pin is in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User who submitted the pin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by_user_id: Option<UserId>,
}

impl Pin {
    /// Create an active pin with only the required fields
    pub fn new(id: PinId, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name: name.into(),
            latitude,
            longitude,
            images: Vec::new(),
            style_tags: None,
            artist_id: None,
            status: PinStatus::Active,
            city: None,
            description: None,
            submitted_by_user_id: None,
        }
    }

    /// First image, used as the map thumbnail
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Style tags, empty when none are recorded
    pub fn style_tags(&self) -> &[String] {
        self.style_tags.as_deref().unwrap_or(&[])
    }

    /// Case-insensitive style tag check
    pub fn has_style(&self, style: &str) -> bool {
        self.style_tags().iter().any(|t| t.eq_ignore_ascii_case(style))
    }
}

/// Social links of an artist
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    /// Instagram handle or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// Twitter handle or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    /// Personal website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl SocialLinks {
    /// Whether no link is set
    pub fn is_empty(&self) -> bool {
        self.instagram.is_none() && self.twitter.is_none() && self.website.is_none()
    }
}

/// A catalogued creator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    /// Artist identifier
    pub id: ArtistId,
    /// Artist handle
    pub handle: String,
    /// Short biography
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Social links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
}

impl Artist {
    /// Create an artist with only a handle
    pub fn new(id: ArtistId, handle: impl Into<String>) -> Self {
        Self { id, handle: handle.into(), bio: None, avatar: None, social_links: None }
    }
}

/// Criteria for narrowing the pin list
///
/// Every criterion that is set must match. Text comparisons ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinFilter {
    /// Required style tag
    pub style: Option<String>,
    /// Required artist handle
    pub artist: Option<String>,
    /// Required city
    pub city: Option<String>,
    /// Required status
    pub status: Option<PinStatus>,
}

impl PinFilter {
    /// Filter that matches every pin
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a style tag
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Require an artist handle
    pub fn artist(mut self, handle: impl Into<String>) -> Self {
        self.artist = Some(handle.into());
        self
    }

    /// Require a city
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Require a status
    pub fn status(mut self, status: PinStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// A pin joined with its artist
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinWithArtist {
    /// The pin
    pub pin: Pin,
    /// The pin's artist, if linked and known
    pub artist: Option<Artist>,
}

/// Immutable catalog of pins and artists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pins: Vec<Pin>,
    artists: Vec<Artist>,
}

impl Catalog {
    /// Build a catalog; order of `pins` is the catalog order
    pub fn new(pins: Vec<Pin>, artists: Vec<Artist>) -> Self {
        Self { pins, artists }
    }

    /// All pins in catalog order
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    /// All artists
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Look up a single pin
    pub fn pin(&self, id: PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == id)
    }

    /// Pins whose id is in `ids`, in catalog order regardless of input order
    pub fn pins_by_ids(&self, ids: &[PinId]) -> Vec<Pin> {
        if ids.is_empty() {
            return Vec::new();
        }
        let wanted: HashSet<PinId> = ids.iter().copied().collect();
        self.pins.iter().filter(|p| wanted.contains(&p.id)).cloned().collect()
    }

    /// Artist with the given id; `None` for an absent or unknown id
    pub fn artist_by_id(&self, artist_id: Option<ArtistId>) -> Option<Artist> {
        let id = artist_id?;
        self.artists.iter().find(|a| a.id == id).cloned()
    }

    /// Artist by handle, ignoring ASCII case
    pub fn artist_by_handle(&self, handle: &str) -> Option<&Artist> {
        self.artists.iter().find(|a| a.handle.eq_ignore_ascii_case(handle))
    }

    /// Pins still on the wall
    pub fn active_pins(&self) -> Vec<&Pin> {
        self.pins.iter().filter(|p| p.status.is_active()).collect()
    }

    /// Pins matching every criterion of `filter`
    pub fn filter(&self, filter: &PinFilter) -> Vec<&Pin> {
        // An unknown artist handle matches nothing rather than everything
        let artist_id = match &filter.artist {
            Some(handle) => match self.artist_by_handle(handle) {
                Some(artist) => Some(artist.id),
                None => return Vec::new(),
            },
            None => None,
        };

        self.pins
            .iter()
            .filter(|p| filter.style.as_deref().map_or(true, |s| p.has_style(s)))
            .filter(|p| artist_id.map_or(true, |id| p.artist_id == Some(id)))
            .filter(|p| {
                filter.city.as_deref().map_or(true, |c| {
                    p.city.as_deref().is_some_and(|pc| pc.eq_ignore_ascii_case(c))
                })
            })
            .filter(|p| filter.status.as_ref().map_or(true, |s| &p.status == s))
            .collect()
    }

    /// Join a pin with its artist
    pub fn with_artist(&self, pin: &Pin) -> PinWithArtist {
        PinWithArtist { pin: pin.clone(), artist: self.artist_by_id(pin.artist_id) }
    }

    /// Pins submitted by a user, in catalog order
    pub fn pins_submitted_by(&self, user_id: UserId) -> Vec<Pin> {
        self.pins
            .iter()
            .filter(|p| p.submitted_by_user_id == Some(user_id))
            .cloned()
            .collect()
    }

    /// Number of pins
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether the catalog has no pins
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}
