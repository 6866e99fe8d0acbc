//! Photo feed service backed by the Unsplash API
//!
//! Responses are normalized into [`PinImage`]s. By default every failure is
//! absorbed and replaced with locally generated placeholders, so a feed
//! never renders empty because of a transient outage. Turning
//! [`ClientOptions::fallback_on_error`] off propagates the error instead.

mod fallback;
mod types;

use futures_util::future;
use rand::seq::SliceRandom;
use reqwest::Client;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::ApiClient;

pub use fallback::*;
pub use types::*;

/// Images drawn from each source when composing the home feed
pub const FEED_SOURCE_SIZE: u32 = 15;

/// Keyword used for the trending half of the home feed
pub const TRENDING_QUERY: &str = "trending";

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the photo API
#[derive(Debug, Clone)]
pub struct PhotoService {
    api: ApiClient,
    fallback_on_error: bool,
    page_size: u32,
}

impl PhotoService {
    /// Create a new photo service.
    ///
    /// An empty access key is allowed: it is logged once here, and every
    /// request will then fail into placeholders (or errors).
    pub fn new(base_url: &str, access_key: &str, client: Client, options: &ClientOptions) -> Self {
        if access_key.is_empty() {
            log::warn!(
                "Unsplash access key not configured, the feed will use placeholder images"
            );
        }

        let api = ApiClient::new(base_url, client)
            .with_default_header("Authorization", &format!("Client-ID {}", access_key))
            .with_default_header("Accept-Version", "v1");

        Self {
            api,
            fallback_on_error: options.fallback_on_error,
            page_size: options.page_size,
        }
    }

    /// Images per category page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn recover(
        &self,
        result: Result<Vec<PinImage>>,
        count: usize,
        context: &str,
    ) -> Result<Vec<PinImage>> {
        match result {
            Ok(pins) => Ok(pins),
            Err(err) if self.fallback_on_error => {
                log::error!("Error fetching {}: {}, serving placeholders", context, err);
                Ok(fallback_images(count))
            }
            Err(err) => Err(err),
        }
    }

    /// Up to `count` random portrait photos
    pub async fn get_random_photos(&self, count: u32) -> Result<Vec<PinImage>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let result = self
            .api
            .get("/photos/random")
            .query("count", count)
            .query("orientation", "portrait")
            .execute::<RandomResponse>()
            .await
            .map(|data| data.into_vec().into_iter().map(PinImage::from).collect());

        self.recover(result, count as usize, "random photos")
    }

    /// One page of keyword search results
    pub async fn search_photos(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PinImage>> {
        if per_page == 0 {
            return Ok(Vec::new());
        }

        let result = self
            .api
            .get("/search/photos")
            .query("query", query)
            .query("page", page.max(1))
            .query("per_page", per_page)
            .query("orientation", "portrait")
            .execute::<SearchResponse>()
            .await
            .map(|data| data.results.into_iter().map(PinImage::from).collect());

        self.recover(result, per_page as usize, "search results")
    }

    /// One page of a category. [`Category::All`] is the blended home feed.
    pub async fn get_photos_by_category(
        &self,
        category: Category,
        page: u32,
    ) -> Result<Vec<PinImage>> {
        match category.search_query() {
            Some(query) => self.search_photos(&query, page, self.page_size).await,
            None => self.get_feed_images(page).await,
        }
    }

    /// Random and trending photos fetched together, then shuffled
    pub async fn get_feed_images(&self, page: u32) -> Result<Vec<PinImage>> {
        let (random, trending) = future::join(
            self.get_random_photos(FEED_SOURCE_SIZE),
            self.search_photos(TRENDING_QUERY, page, FEED_SOURCE_SIZE),
        )
        .await;

        let result = random.and_then(|mut pins| {
            pins.extend(trending?);
            pins.shuffle(&mut rand::thread_rng());
            Ok(pins)
        });

        self.recover(result, (FEED_SOURCE_SIZE * 2) as usize, "feed images")
    }
}
