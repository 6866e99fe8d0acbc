//! Routes of the app shell and where a session lands

use crate::auth::SessionState;

/// Bottom tab bar entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Home,
    Search,
    Profile,
}

impl Tab {
    /// Tabs in bar order
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::Search, Tab::Profile];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Search => "Search",
            Tab::Profile => "Profile",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tab::Home => "home-variant",
            Tab::Search => "search",
            Tab::Profile => "user",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Tab::Home => "/(tabs)/home",
            Tab::Search => "/(tabs)/search",
            Tab::Profile => "/(tabs)/profile",
        }
    }
}

/// Every screen the shell can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    SignUp,
    Tab(Tab),
}

impl Route {
    pub const HOME: Route = Route::Tab(Tab::Home);

    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/(auth)/sign-in",
            Route::SignUp => "/(auth)/sign-up",
            Route::Tab(tab) => tab.path(),
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Tab(_))
    }

    /// Parse a shell path back into a route
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        [Route::SignIn, Route::SignUp]
            .into_iter()
            .chain(Tab::ALL.into_iter().map(Route::Tab))
            .find(|route| route.path() == path)
    }
}

/// Where the app opens. `None` while the provider is still loading, which
/// the shell shows as a spinner.
pub fn initial_route(state: SessionState) -> Option<Route> {
    match state {
        SessionState::Loading => None,
        SessionState::SignedIn => Some(Route::HOME),
        SessionState::SignedOut => Some(Route::SignIn),
    }
}

/// Redirect a requested route according to the session
pub fn guard(requested: Route, state: SessionState) -> Option<Route> {
    match state {
        SessionState::Loading => None,
        SessionState::SignedOut if requested.requires_session() => Some(Route::SignIn),
        SessionState::SignedIn if !requested.requires_session() => Some(Route::HOME),
        _ => Some(requested),
    }
}

/// Which tab is focused, as the tab bar tracks it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabBar {
    focused: Tab,
}

impl Default for TabBar {
    fn default() -> Self {
        Self { focused: Tab::Home }
    }
}

impl TabBar {
    pub fn focused(&self) -> Tab {
        self.focused
    }

    pub fn is_focused(&self, tab: Tab) -> bool {
        self.focused == tab
    }

    pub fn navigate(&mut self, tab: Tab) -> Route {
        self.focused = tab;
        Route::Tab(tab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_route_follows_session() {
        assert_eq!(initial_route(SessionState::Loading), None);
        assert_eq!(initial_route(SessionState::SignedIn), Some(Route::HOME));
        assert_eq!(initial_route(SessionState::SignedOut), Some(Route::SignIn));
    }

    #[test]
    fn guard_redirects_between_stacks() {
        assert_eq!(
            guard(Route::Tab(Tab::Profile), SessionState::SignedOut),
            Some(Route::SignIn)
        );
        assert_eq!(guard(Route::SignUp, SessionState::SignedOut), Some(Route::SignUp));
        assert_eq!(guard(Route::SignIn, SessionState::SignedIn), Some(Route::HOME));
        assert_eq!(
            guard(Route::Tab(Tab::Search), SessionState::SignedIn),
            Some(Route::Tab(Tab::Search))
        );
    }

    #[test]
    fn paths_round_trip() {
        assert_eq!(Route::from_path("/(tabs)/search"), Some(Route::Tab(Tab::Search)));
        assert_eq!(Route::from_path("/(auth)/sign-in/"), Some(Route::SignIn));
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn tab_bar_tracks_focus() {
        let mut bar = TabBar::default();
        assert!(bar.is_focused(Tab::Home));
        assert_eq!(bar.navigate(Tab::Profile), Route::Tab(Tab::Profile));
        assert_eq!(bar.focused(), Tab::Profile);
        assert_eq!(Tab::Search.icon(), "search");
    }
}
