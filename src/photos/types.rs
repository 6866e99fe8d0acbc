//! Photo API payloads and the normalized display model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Title used when a photo has neither alt text nor a description
pub const DEFAULT_TITLE: &str = "Beautiful image";

/// Portrait placeholder ratio (height / width) for images without dimensions
pub const PLACEHOLDER_ASPECT_RATIO: f64 = 1.5;

/// A photo as returned by the Unsplash API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnsplashPhoto {
    pub id: String,
    pub urls: UnsplashUrls,
    #[serde(default)]
    pub alt_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub user: Option<UnsplashUser>,
    #[serde(default)]
    pub likes: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UnsplashUrls {
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub full: String,
    #[serde(default)]
    pub regular: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub thumb: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnsplashUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub profile_image: Option<UnsplashProfileImage>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UnsplashProfileImage {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

/// Body of `GET /search/photos`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<UnsplashPhoto>,
}

/// `GET /photos/random` answers with an object when `count` is omitted
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RandomResponse {
    Many(Vec<UnsplashPhoto>),
    One(Box<UnsplashPhoto>),
}

impl RandomResponse {
    pub fn into_vec(self) -> Vec<UnsplashPhoto> {
        match self {
            RandomResponse::Many(photos) => photos,
            RandomResponse::One(photo) => vec![*photo],
        }
    }
}

/// Author attribution shown under a pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinUser {
    pub name: String,
    pub username: String,
    pub profile_image: Option<String>,
}

/// A photo normalized for display as a pin card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinImage {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub width: u32,
    pub height: u32,
    pub dominant_color: Option<String>,
    pub user: Option<PinUser>,
    pub likes: u64,
}

impl PinImage {
    /// Height over width, or the portrait placeholder when dimensions are missing
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            PLACEHOLDER_ASPECT_RATIO
        } else {
            f64::from(self.height) / f64::from(self.width)
        }
    }

    /// Placeholder background while the image loads
    pub fn placeholder_color(&self) -> &str {
        self.dominant_color.as_deref().unwrap_or("#e9e9e9")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<UnsplashPhoto> for PinImage {
    fn from(photo: UnsplashPhoto) -> Self {
        let description = non_empty(photo.description);
        let title = non_empty(photo.alt_description)
            .or_else(|| description.clone())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let user = photo.user.map(|user| PinUser {
            name: user.name,
            username: user.username,
            profile_image: user.profile_image.and_then(|image| image.medium),
        });

        Self {
            id: photo.id,
            url: photo.urls.regular,
            title,
            description,
            width: photo.width,
            height: photo.height,
            dominant_color: non_empty(photo.color),
            user,
            likes: photo.likes,
        }
    }
}

/// Filters offered on the home feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// The blended random and trending feed
    #[default]
    All,
    Nature,
    Architecture,
    Food,
    Travel,
    Fashion,
    Art,
    Lifestyle,
}

impl Category {
    /// Every category in display order
    pub const ALL: [Category; 8] = [
        Category::All,
        Category::Nature,
        Category::Architecture,
        Category::Food,
        Category::Travel,
        Category::Fashion,
        Category::Art,
        Category::Lifestyle,
    ];

    /// Chip label
    pub fn label(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Nature => "Nature",
            Category::Architecture => "Architecture",
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Fashion => "Fashion",
            Category::Art => "Art",
            Category::Lifestyle => "Lifestyle",
        }
    }

    /// Search keyword sent to the photo API, `None` for the blended feed
    pub fn search_query(&self) -> Option<String> {
        match self {
            Category::All => None,
            other => Some(other.label().to_lowercase()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| Error::general(format!("Unknown category: {}", s)))
    }
}
