//! Pinboard Rust Client Library
//!
//! Client side of a Pinterest-style image browsing app: email/password
//! authentication with OTP verification against the pinboard backend, an
//! infinite masonry feed sourced from the Unsplash API, category filtering,
//! search, and the screen state that sits on top of those services.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod layout;
pub mod navigation;
pub mod photos;
pub mod query;
pub mod screens;

use reqwest::Client;

use crate::auth::{AccountUser, Auth, LocalSession, SessionProvider, SessionState};
use crate::config::{ClientOptions, Config};
use crate::error::Error;
use crate::navigation::Route;
use crate::photos::{PhotoService, PinImage};
use crate::query::QueryClient;
use crate::screens::{HomeScreen, ProfileScreen, SearchScreen, SignInScreen, SignUpScreen};

/// The application root. Owns the HTTP client, the services and the query
/// cache, and hands them to screens.
pub struct Pinboard {
    /// Endpoints and keys the client was built with
    pub config: Config,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    auth: Auth,
    photos: PhotoService,
    queries: QueryClient<PinImage>,
    session: LocalSession,
}

impl Pinboard {
    /// Create a new client
    ///
    /// # Example
    ///
    /// ```
    /// use pinboard::{Pinboard, config::Config};
    ///
    /// let config = Config::new("http://localhost:8000/api", "pk_test", "unsplash-key");
    /// let pinboard = Pinboard::new(config).unwrap();
    /// ```
    pub fn new(config: Config) -> Result<Self, Error> {
        Self::new_with_options(config, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use pinboard::{Pinboard, config::{ClientOptions, Config}};
    ///
    /// let options = ClientOptions::default().with_fallback_on_error(false);
    /// let config = Config::new("http://localhost:8000/api", "pk_test", "unsplash-key");
    /// let pinboard = Pinboard::new_with_options(config, options).unwrap();
    /// ```
    pub fn new_with_options(config: Config, options: ClientOptions) -> Result<Self, Error> {
        if config.publishable_key.trim().is_empty() {
            return Err(Error::config("Missing publishable key"));
        }

        let http_client = fetch::build_http_client(&options)?;
        let auth = Auth::new(&config.api_url, http_client.clone());
        let photos = PhotoService::new(
            &config.unsplash_url,
            &config.unsplash_access_key,
            http_client.clone(),
            &options,
        );
        let queries = QueryClient::with_capacity(options.max_cached_queries);

        Ok(Self {
            config,
            http_client,
            options,
            auth,
            photos,
            queries,
            session: LocalSession::default(),
        })
    }

    /// Build a client from the process environment
    pub fn from_env() -> Result<Self, Error> {
        Self::new(Config::from_env()?)
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Get a reference to the photo service
    pub fn photos(&self) -> &PhotoService {
        &self.photos
    }

    /// The query cache shared by every list screen
    pub fn queries(&self) -> &QueryClient<PinImage> {
        &self.queries
    }

    /// The session the screens report sign in and sign out to
    pub fn session(&self) -> &LocalSession {
        &self.session
    }

    /// Where the app should open for the given identity provider
    pub async fn initial_route(&self, provider: &dyn SessionProvider) -> Option<Route> {
        navigation::initial_route(provider.session_state().await)
    }

    /// Where the app should open for its own session
    pub fn current_route(&self) -> Option<Route> {
        navigation::initial_route(self.session.get())
    }

    pub fn home_screen(&self) -> HomeScreen {
        HomeScreen::new(
            self.photos.clone(),
            self.queries.clone(),
            self.options.scroll_threshold,
        )
    }

    pub fn search_screen(&self) -> SearchScreen {
        SearchScreen::new(
            self.photos.clone(),
            self.queries.clone(),
            self.options.scroll_threshold,
        )
    }

    pub fn profile_screen(&self, user: Option<AccountUser>) -> ProfileScreen {
        ProfileScreen::new(self.auth.clone(), self.queries.clone(), user)
            .with_session(self.session.clone())
    }

    pub fn sign_in_screen(&self) -> SignInScreen {
        SignInScreen::new(self.auth.clone()).with_session(self.session.clone())
    }

    pub fn sign_up_screen(&self) -> SignUpScreen {
        SignUpScreen::new(self.auth.clone())
    }

    /// Report the identity provider's state, e.g. once its token cache loaded
    pub fn set_session_state(&self, state: SessionState) {
        self.session.set(state);
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, Config};
    pub use crate::error::Error;
    pub use crate::navigation::{Route, Tab};
    pub use crate::photos::{Category, PinImage};
    pub use crate::Pinboard;
}
