use crate::error::Error;
use crate::layout::Masonry;
use crate::photos::{Category, PhotoService, PinImage, FEED_SOURCE_SIZE};
use crate::query::{QueryClient, QueryKey, QuerySnapshot};

use super::{FeedView, ScrollMetrics};

const SCOPE: &str = "feed";

/// Home tab: category chips over an infinite masonry feed
pub struct HomeScreen {
    photos: PhotoService,
    queries: QueryClient<PinImage>,
    category: Category,
    scroll_threshold: f64,
}

impl HomeScreen {
    pub fn new(
        photos: PhotoService,
        queries: QueryClient<PinImage>,
        scroll_threshold: f64,
    ) -> Self {
        Self {
            photos,
            queries,
            category: Category::default(),
            scroll_threshold,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::new(SCOPE, self.category.label())
    }

    fn page_size(&self) -> usize {
        match self.category {
            Category::All => (FEED_SOURCE_SIZE * 2) as usize,
            _ => self.photos.page_size() as usize,
        }
    }

    async fn fetch_next(&self) -> Result<QuerySnapshot<PinImage>, Error> {
        let photos = self.photos.clone();
        let category = self.category;
        self.queries
            .fetch_next_page(&self.query_key(), self.page_size(), move |page| async move {
                photos.get_photos_by_category(category, page).await
            })
            .await
    }

    /// Fetch the first page unless it is already cached
    pub async fn load(&self) -> Result<(), Error> {
        if self.queries.snapshot(&self.query_key()).page_count() > 0 {
            return Ok(());
        }
        self.fetch_next().await.map(|_| ())
    }

    /// Switch the filter and start its list over from page 1
    pub async fn select_category(&mut self, category: Category) -> Result<(), Error> {
        if category == self.category {
            return Ok(());
        }
        log::debug!("Category changed from {} to {}", self.category, category);
        self.category = category;
        self.queries.reset(&self.query_key());
        self.fetch_next().await.map(|_| ())
    }

    /// Load the next page when the list is scrolled close to its end.
    /// Returns whether a fetch was started or joined.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> Result<bool, Error> {
        if !metrics.is_near_bottom(self.scroll_threshold) {
            return Ok(false);
        }

        let snapshot = self.queries.snapshot(&self.query_key());
        if snapshot.page_count() == 0 || !snapshot.has_next_page {
            return Ok(false);
        }

        self.fetch_next().await?;
        Ok(true)
    }

    /// Run the failed fetch again
    pub async fn retry(&self) -> Result<(), Error> {
        self.fetch_next().await.map(|_| ())
    }

    /// Pull-to-refresh: drop the cached pages and fetch page 1 again
    pub async fn refresh(&self) -> Result<(), Error> {
        self.queries.reset(&self.query_key());
        self.fetch_next().await.map(|_| ())
    }

    pub fn view(&self) -> FeedView {
        feed_view(&self.queries.snapshot(&self.query_key()))
    }
}

pub(super) fn feed_view(snapshot: &QuerySnapshot<PinImage>) -> FeedView {
    if snapshot.page_count() == 0 {
        return match &snapshot.error {
            Some(failure) if !snapshot.is_fetching => FeedView::Error {
                message: failure.message.clone(),
            },
            _ => FeedView::Loading,
        };
    }

    FeedView::Ready {
        columns: Masonry::build(&snapshot.items()),
        loading_more: snapshot.is_fetching,
        end_reached: !snapshot.has_next_page,
    }
}
