//! Configuration options for the pinboard client

use std::env;
use std::time::Duration;

use crate::error::Error;

/// Environment variable holding the backend API base URL
pub const API_URL_ENV: &str = "PINBOARD_API_URL";
/// Environment variable holding the identity provider's publishable key
pub const PUBLISHABLE_KEY_ENV: &str = "PINBOARD_PUBLISHABLE_KEY";
/// Environment variable holding the Unsplash access key
pub const UNSPLASH_ACCESS_KEY_ENV: &str = "PINBOARD_UNSPLASH_ACCESS_KEY";
/// Environment variable overriding the Unsplash base URL
pub const UNSPLASH_URL_ENV: &str = "PINBOARD_UNSPLASH_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_UNSPLASH_URL: &str = "https://api.unsplash.com";

/// Configuration options for the pinboard client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Replace photo API failures with generated placeholder images
    pub fallback_on_error: bool,

    /// Number of images requested per category page
    pub page_size: u32,

    /// Distance from the bottom of the feed, in points, that triggers the next page
    pub scroll_threshold: f64,

    /// Paginated lists kept in the query cache before the least recently
    /// fetched one is evicted
    pub max_cached_queries: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            fallback_on_error: true,
            page_size: 30,
            scroll_threshold: 500.0,
            max_cached_queries: crate::query::DEFAULT_CAPACITY,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether photo API failures degrade to placeholder images
    pub fn with_fallback_on_error(mut self, value: bool) -> Self {
        self.fallback_on_error = value;
        self
    }

    /// Set the number of images per category page
    pub fn with_page_size(mut self, value: u32) -> Self {
        self.page_size = value.max(1);
        self
    }

    /// Set the scroll distance that triggers loading the next page
    pub fn with_scroll_threshold(mut self, value: f64) -> Self {
        self.scroll_threshold = value.max(0.0);
        self
    }

    /// Set how many paginated lists the query cache keeps
    pub fn with_max_cached_queries(mut self, value: usize) -> Self {
        self.max_cached_queries = value.max(1);
        self
    }
}

/// Endpoints and keys the application boots with
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API
    pub api_url: String,

    /// Publishable key of the external identity provider
    pub publishable_key: String,

    /// Unsplash access key; empty means every photo request falls back
    pub unsplash_access_key: String,

    /// Base URL of the Unsplash API
    pub unsplash_url: String,
}

impl Config {
    pub fn new(api_url: &str, publishable_key: &str, unsplash_access_key: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            publishable_key: publishable_key.to_string(),
            unsplash_access_key: unsplash_access_key.to_string(),
            unsplash_url: DEFAULT_UNSPLASH_URL.to_string(),
        }
    }

    /// Point the photo service at a different Unsplash-compatible host
    pub fn with_unsplash_url(mut self, url: &str) -> Self {
        self.unsplash_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Read the configuration from the process environment.
    ///
    /// A missing publishable key is fatal. A missing Unsplash key is
    /// allowed; the feed then serves placeholder images.
    pub fn from_env() -> Result<Self, Error> {
        let publishable_key = env::var(PUBLISHABLE_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::config(format!("Missing {}", PUBLISHABLE_KEY_ENV)))?;

        let unsplash_access_key = env::var(UNSPLASH_ACCESS_KEY_ENV).unwrap_or_default();

        let api_url = env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let unsplash_url =
            env::var(UNSPLASH_URL_ENV).unwrap_or_else(|_| DEFAULT_UNSPLASH_URL.to_string());

        Ok(Self::new(&api_url, &publishable_key, &unsplash_access_key)
            .with_unsplash_url(&unsplash_url))
    }
}
