//! Screen controllers: the state each screen renders and the actions it takes
//!
//! Nothing here draws. A UI layer reads the view state, forwards user input,
//! and shows [`Alert`]s and route changes.

mod home;
mod profile;
mod search;
mod sign_in;
mod sign_up;

use std::fmt;

use crate::error::Error;
use crate::forms::FormErrors;
use crate::layout::Masonry;

pub use home::HomeScreen;
pub use profile::ProfileScreen;
pub use search::{SearchScreen, TrendingTopic, POPULAR_SEARCHES, TRENDING_TOPICS};
pub use sign_in::SignInScreen;
pub use sign_up::SignUpScreen;

/// A blocking message box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: &str, message: &str) -> Self {
        Self {
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    /// Alert for a failed request, with `fallback` when the error has no text
    pub fn from_error(title: &str, err: &Error, fallback: &str) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::new(title, fallback)
        } else {
            Self::new(title, &message)
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Why a form submission did not go through
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// Client-side validation failed; nothing was sent
    Invalid(FormErrors),
    /// The request was sent and failed
    Alert(Alert),
}

/// Scroll position reported by a list view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset_y: f64,
    pub content_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(offset_y: f64, content_height: f64, viewport_height: f64) -> Self {
        Self {
            offset_y,
            content_height,
            viewport_height,
        }
    }

    pub fn distance_from_bottom(&self) -> f64 {
        (self.content_height - self.offset_y - self.viewport_height).max(0.0)
    }

    /// Within `threshold` points, or a fifth of the viewport, of the end
    pub fn is_near_bottom(&self, threshold: f64) -> bool {
        self.distance_from_bottom() <= threshold.max(self.viewport_height * 0.2)
    }
}

/// What a paginated image list shows
#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    /// The first page has not arrived yet
    Loading,
    /// The first page failed; the screen offers a retry
    Error { message: String },
    Ready {
        columns: Masonry,
        loading_more: bool,
        end_reached: bool,
    },
}

impl FeedView {
    pub fn item_count(&self) -> usize {
        match self {
            FeedView::Ready { columns, .. } => columns.len(),
            _ => 0,
        }
    }
}
