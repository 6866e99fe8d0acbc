use crate::error::Error;
use crate::photos::{PhotoService, PinImage};
use crate::query::{QueryClient, QueryKey};

use super::home::feed_view;
use super::{FeedView, ScrollMetrics};

const SCOPE: &str = "search";
const MAX_RECENT: usize = 10;

/// A suggested topic tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendingTopic {
    pub name: &'static str,
    pub image: &'static str,
}

pub const TRENDING_TOPICS: [TrendingTopic; 4] = [
    TrendingTopic {
        name: "Interior Design",
        image: "https://picsum.photos/100/100?random=7",
    },
    TrendingTopic {
        name: "Travel",
        image: "https://picsum.photos/100/100?random=8",
    },
    TrendingTopic {
        name: "Food & Recipes",
        image: "https://picsum.photos/100/100?random=9",
    },
    TrendingTopic {
        name: "Fashion",
        image: "https://picsum.photos/100/100?random=10",
    },
];

pub const POPULAR_SEARCHES: [&str; 4] = [
    "Home decor",
    "DIY crafts",
    "Photography tips",
    "Fitness motivation",
];

/// Search tab: a query box, suggestions, and paginated results
pub struct SearchScreen {
    photos: PhotoService,
    queries: QueryClient<PinImage>,
    query: String,
    submitted: Option<String>,
    recent: Vec<String>,
    scroll_threshold: f64,
}

impl SearchScreen {
    pub fn new(
        photos: PhotoService,
        queries: QueryClient<PinImage>,
        scroll_threshold: f64,
    ) -> Self {
        Self {
            photos,
            queries,
            query: String::new(),
            submitted: None,
            recent: Vec::new(),
            scroll_threshold,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// The clear button is only shown while there is text
    pub fn can_clear(&self) -> bool {
        !self.query.is_empty()
    }

    /// Empty the box and go back to suggestions
    pub fn clear(&mut self) {
        self.query.clear();
        self.submitted = None;
    }

    /// Most recent first
    pub fn recent_searches(&self) -> &[String] {
        &self.recent
    }

    pub fn submitted(&self) -> Option<&str> {
        self.submitted.as_deref()
    }

    fn key_for(query: &str) -> QueryKey {
        QueryKey::new(SCOPE, &query.to_lowercase())
    }

    /// Queries that share a cache key count as the same recent search
    fn remember(&mut self, query: &str) {
        let folded = query.to_lowercase();
        self.recent.retain(|q| q.to_lowercase() != folded);
        self.recent.insert(0, query.to_string());
        self.recent.truncate(MAX_RECENT);
    }

    async fn fetch_next(&self, query: &str) -> Result<(), Error> {
        let photos = self.photos.clone();
        let keyword = query.to_string();
        let page_size = photos.page_size();
        self.queries
            .fetch_next_page(&Self::key_for(query), page_size as usize, move |page| async move {
                photos.search_photos(&keyword, page, page_size).await
            })
            .await
            .map(|_| ())
    }

    /// Run the typed query from its first page. Blank queries are ignored.
    pub async fn submit(&mut self) -> Result<(), Error> {
        let query = self.query.trim().to_string();
        if query.is_empty() {
            return Ok(());
        }

        self.remember(&query);
        self.submitted = Some(query.clone());
        self.queries.reset(&Self::key_for(&query));
        self.fetch_next(&query).await
    }

    /// Tap on a recent search, trending topic or popular search
    pub async fn search_for(&mut self, query: &str) -> Result<(), Error> {
        self.set_query(query);
        self.submit().await
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Result<bool, Error> {
        let query = match &self.submitted {
            Some(query) => query,
            None => return Ok(false),
        };
        if !metrics.is_near_bottom(self.scroll_threshold) {
            return Ok(false);
        }

        let snapshot = self.queries.snapshot(&Self::key_for(query));
        if snapshot.page_count() == 0 || !snapshot.has_next_page {
            return Ok(false);
        }

        self.fetch_next(query).await?;
        Ok(true)
    }

    /// Results of the submitted query, `None` while showing suggestions
    pub fn results(&self) -> Option<FeedView> {
        self.submitted
            .as_deref()
            .map(|query| feed_view(&self.queries.snapshot(&Self::key_for(query))))
    }
}
