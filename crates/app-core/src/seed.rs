//! Built-in sample catalog
//!
//! Ships with the app until a remote catalog is wired in.

use crate::catalog::{Artist, Catalog, Pin, PinStatus, SocialLinks};

fn pin(
    id: i64,
    name: &str,
    (latitude, longitude): (f64, f64),
    styles: &[&str],
    artist_id: Option<i64>,
    description: &str,
) -> Pin {
    Pin {
        id,
        name: name.to_string(),
        latitude,
        longitude,
        images: vec![format!("https://images.graffitimaps.app/pins/{}/0.jpg", id)],
        style_tags: if styles.is_empty() {
            None
        } else {
            Some(styles.iter().map(|s| s.to_string()).collect())
        },
        artist_id,
        status: PinStatus::Active,
        city: Some("New York".to_string()),
        description: Some(description.to_string()),
        submitted_by_user_id: None,
    }
}

/// The sample catalog: a handful of Manhattan and Brooklyn walls
pub fn seed_catalog() -> Catalog {
    let artists = vec![
        Artist {
            id: 1,
            handle: "lexi_paints".to_string(),
            bio: Some("Large-scale murals around the Lower East Side.".to_string()),
            avatar: Some("https://images.graffitimaps.app/artists/1.jpg".to_string()),
            social_links: Some(SocialLinks {
                instagram: Some("@lexi_paints".to_string()),
                twitter: None,
                website: Some("https://lexipaints.example".to_string()),
            }),
        },
        Artist {
            id: 2,
            handle: "crewkings".to_string(),
            bio: Some("Wildstyle crew active since the 90s.".to_string()),
            avatar: None,
            social_links: None,
        },
        Artist::new(3, "stencil_ghost"),
    ];

    let mut buffed = pin(
        6,
        "Chelsea Loading Dock",
        (40.7465, -74.0014),
        &["throwie"],
        Some(2),
        "Painted over in the spring cleanup.",
    );
    buffed.status = PinStatus::Buffed;

    let mut brooklyn = pin(
        5,
        "Bushwick Collective Corner",
        (40.7054, -73.9216),
        &["mural", "character"],
        None,
        "Rotating wall curated by the collective.",
    );
    brooklyn.city = Some("Brooklyn".to_string());

    let pins = vec![
        pin(
            1,
            "Bowery Mural Wall",
            (40.7246, -73.9925),
            &["mural"],
            Some(1),
            "Iconic rotating mural wall at Houston and Bowery.",
        ),
        pin(
            2,
            "Times Square Tag Alley",
            (40.7590, -73.9845),
            &["tag", "wildstyle"],
            Some(2),
            "Dense layers of tags behind the theatre district.",
        ),
        pin(
            3,
            "Hell's Kitchen Stencils",
            (40.7638, -73.9918),
            &["stencil"],
            Some(3),
            "Small stencil pieces scattered along 10th Ave.",
        ),
        pin(
            4,
            "Midtown Rooftop Piece",
            (40.7549, -73.9840),
            &[],
            None,
            "Visible from the High Line on clear days.",
        ),
        brooklyn,
        buffed,
    ];

    Catalog::new(pins, artists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_unique() {
        let catalog = seed_catalog();
        let ids: HashSet<i64> = catalog.pins().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_seed_artist_links_resolve() {
        let catalog = seed_catalog();
        for pin in catalog.pins() {
            if pin.artist_id.is_some() {
                assert!(catalog.artist_by_id(pin.artist_id).is_some(), "dangling artist on pin {}", pin.id);
            }
        }
    }

    #[test]
    fn test_seed_has_withdrawn_pin() {
        let catalog = seed_catalog();
        assert!(catalog.active_pins().len() < catalog.len());
    }
}
