//! Derived views over catalog pins for the map screen

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Pin, PinId};

/// Lightweight projection of a pin for map markers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPin {
    /// Pin identifier
    pub id: PinId,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Display name
    pub name: String,
    /// Thumbnail URL, empty when the pin has no image
    pub thumbnail: String,
    /// Style tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub style_tags: Vec<String>,
}

impl From<&Pin> for MapPin {
    fn from(pin: &Pin) -> Self {
        Self {
            id: pin.id,
            latitude: pin.latitude,
            longitude: pin.longitude,
            name: pin.name.clone(),
            thumbnail: pin.thumbnail().unwrap_or_default().to_string(),
            style_tags: pin.style_tags().to_vec(),
        }
    }
}

/// Markers for every active pin, in catalog order
pub fn map_pins(catalog: &Catalog) -> Vec<MapPin> {
    catalog.active_pins().into_iter().map(MapPin::from).collect()
}

/// Body text shown when a marker is tapped
pub fn marker_summary(pin: &Pin) -> String {
    let styles = if pin.style_tags().is_empty() {
        "None".to_string()
    } else {
        pin.style_tags().join(", ")
    };

    format!(
        "{}\n\nCity: {}\nStyles: {}",
        pin.description.as_deref().unwrap_or_default(),
        pin.city.as_deref().unwrap_or("Unknown"),
        styles
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PinStatus;

    #[test]
    fn test_map_pin_projection() {
        let mut pin = Pin::new(4, "Dock", 40.0, -74.0);
        pin.images = vec!["first.jpg".to_string(), "second.jpg".to_string()];

        let marker = MapPin::from(&pin);
        assert_eq!(marker.thumbnail, "first.jpg");
        assert!(marker.style_tags.is_empty());
    }

    #[test]
    fn test_map_pins_skip_withdrawn() {
        let mut gone = Pin::new(2, "Gone", 0.0, 0.0);
        gone.status = PinStatus::Buffed;
        let catalog = Catalog::new(vec![Pin::new(1, "Here", 0.0, 0.0), gone], vec![]);

        let ids: Vec<PinId> = map_pins(&catalog).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_marker_summary() {
        let mut pin = Pin::new(1, "Wall", 0.0, 0.0);
        pin.description = Some("Big piece".to_string());
        pin.city = Some("New York".to_string());
        pin.style_tags = Some(vec!["mural".to_string(), "stencil".to_string()]);

        assert_eq!(marker_summary(&pin), "Big piece\n\nCity: New York\nStyles: mural, stencil");
    }

    #[test]
    fn test_marker_summary_without_styles() {
        let pin = Pin::new(1, "Wall", 0.0, 0.0);
        assert_eq!(marker_summary(&pin), "\n\nCity: Unknown\nStyles: None");
    }
}
