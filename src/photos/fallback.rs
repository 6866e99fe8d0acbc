//! Placeholder pins served when the photo API is unreachable

use rand::Rng;
use uuid::Uuid;

use super::types::{PinImage, PinUser};

const THEMES: [&str; 7] = [
    "nature",
    "architecture",
    "food",
    "travel",
    "fashion",
    "art",
    "lifestyle",
];

/// Generate `count` placeholder pins.
///
/// Ids carry a per-batch tag so two batches blended into one feed never
/// collide.
pub fn fallback_images(count: usize) -> Vec<PinImage> {
    let batch = Uuid::new_v4().simple().to_string();
    let batch = &batch[..8];
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|i| PinImage {
            id: format!("fallback_{}_{}", batch, i),
            url: format!("https://picsum.photos/400/600?random={}{}", batch, i),
            title: format!("Beautiful {} inspiration", THEMES[i % THEMES.len()]),
            description: None,
            width: 400,
            height: 600,
            dominant_color: Some(format!("#{:06x}", rng.gen_range(0..=0xFF_FFFFu32))),
            user: Some(PinUser {
                name: format!("User {}", i + 1),
                username: format!("user{}", i + 1),
                profile_image: Some(format!("https://picsum.photos/100/100?random={}", i + 100)),
            }),
            likes: rng.gen_range(0..1000),
        })
        .collect()
}

/// Whether a pin was generated locally rather than fetched
pub fn is_fallback(pin: &PinImage) -> bool {
    pin.id.starts_with("fallback_")
}
