//! Hash router with unlock gating
//!
//! Routes are static and built from the catalog. `navigate` never fails:
//! unknown paths resolve to the root route and locked games resolve to the
//! games list, with the missing prerequisite reported in the result.

use crate::catalog::GameId;

pub const ROOT_PATH: &str = "/";
pub const GAMES_PATH: &str = "/games";
pub const SLIDESHOW_PATH: &str = "/slideshow";
pub const GALLERY_PATH: &str = "/gallery";

const ROOT_INDEX: usize = 0;
const GAMES_INDEX: usize = 1;

/// Screen a route displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    GameSelection,
    Game(GameId),
    Slideshow,
    Gallery,
}

impl Screen {
    /// DOM id of the screen element
    pub fn dom_id(&self) -> &'static str {
        match self {
            Screen::Welcome => "welcome-screen",
            Screen::GameSelection => "game-selection",
            Screen::Game(id) => id.screen_id(),
            Screen::Slideshow => "final-slideshow",
            Screen::Gallery => "photo-gallery-screen",
        }
    }
}

/// One entry of the route table
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub title: String,
    pub screen: Screen,
    /// Game that must be completed first
    pub unlock_after: Option<GameId>,
}

impl Route {
    fn new(path: &str, title: &str, screen: Screen) -> Self {
        Self {
            path: path.to_string(),
            title: title.to_string(),
            screen,
            unlock_after: None,
        }
    }

    pub fn requires_unlock(&self) -> bool {
        self.unlock_after.is_some()
    }
}

/// Where a navigation request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Clicks, shortcuts and engine redirects; the hash must be updated
    Program,
    /// Hash changes (back/forward, typed URLs, initial load); never re-pushed
    History,
}

/// What the unlock predicate needs to know
#[derive(Debug, Clone, Copy)]
pub struct Access<'a> {
    pub completed: &'a [String],
    pub test_mode: bool,
}

impl Access<'_> {
    pub fn allows(&self, route: &Route) -> bool {
        match route.unlock_after {
            None => true,
            Some(_) if self.test_mode => true,
            Some(required) => self.completed.iter().any(|g| g == required.as_str()),
        }
    }
}

/// Result of resolving a navigation request
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    /// Path actually shown
    pub path: String,
    /// Normalized path that was asked for
    pub requested: String,
    pub title: String,
    pub screen: Screen,
    /// Set when a locked game was requested: the game to complete first
    pub denied: Option<GameId>,
    /// Whether the shell must write `path` into the location hash
    pub push_history: bool,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        self.path != self.requested
    }
}

/// Breadcrumb entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub text: String,
    pub path: String,
}

impl Crumb {
    fn new(text: &str, path: &str) -> Self {
        Self {
            text: text.to_string(),
            path: path.to_string(),
        }
    }
}

/// Normalize a raw hash or path: `#/games/` -> `/games`, `` -> `/`
pub fn normalize_path(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.strip_prefix('#').unwrap_or(raw);
    let raw = raw.split(['?', '#']).next().unwrap_or_default();
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

pub struct Router {
    routes: Vec<Route>,
    current: Option<String>,
    loading: bool,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        let mut routes = vec![
            Route::new(ROOT_PATH, "Memory Lane 💕", Screen::Welcome),
            Route::new(GAMES_PATH, "Choose Your Memory Game", Screen::GameSelection),
            Route::new(SLIDESHOW_PATH, "Our Beautiful Journey", Screen::Slideshow),
            Route::new(GALLERY_PATH, "Memory Gallery", Screen::Gallery),
        ];
        for id in GameId::CATALOG {
            routes.push(Route {
                path: id.route_path(),
                title: format!("{} - Memory Lane", id.title()),
                screen: Screen::Game(id),
                unlock_after: id.prerequisite(),
            });
        }
        Self {
            routes,
            current: None,
            loading: true,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.path == path)
    }

    pub fn current_route(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_current(&self, path: &str) -> bool {
        self.current.as_deref() == Some(path)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Resolve `path` and make the result the current route
    pub fn navigate(&mut self, path: &str, origin: Origin, access: Access<'_>) -> Navigation {
        let requested = normalize_path(path);
        let (route, denied) = match self.route(&requested) {
            None => {
                log::warn!("Unknown route {}, redirecting home", requested);
                (&self.routes[ROOT_INDEX], None)
            }
            Some(route) if !access.allows(route) => {
                log::info!(
                    "Route {} is locked until {} is completed",
                    requested,
                    route.unlock_after.map(|g| g.as_str()).unwrap_or_default()
                );
                (&self.routes[GAMES_INDEX], route.unlock_after)
            }
            Some(route) => (route, None),
        };

        let nav = Navigation {
            path: route.path.clone(),
            title: route.title.clone(),
            screen: route.screen,
            denied,
            push_history: origin == Origin::Program || route.path != requested,
            requested,
        };
        self.current = Some(nav.path.clone());
        nav
    }

    /// React to a location hash change. `None` while the loading gate is up
    /// or when the hash already names the current route.
    pub fn handle_location(&mut self, hash: &str, access: Access<'_>) -> Option<Navigation> {
        if self.loading {
            return None;
        }
        let path = normalize_path(hash);
        if self.is_current(&path) {
            return None;
        }
        Some(self.navigate(&path, Origin::History, access))
    }

    /// Lift the loading gate and resolve the initial location
    pub fn finish_loading(&mut self, hash: &str, access: Access<'_>) -> Navigation {
        self.loading = false;
        self.navigate(hash, Origin::History, access)
    }

    pub fn breadcrumbs(&self, path: &str) -> Vec<Crumb> {
        let home = Crumb::new("Home", ROOT_PATH);
        match path {
            ROOT_PATH => Vec::new(),
            GAMES_PATH => vec![home, Crumb::new("Games", GAMES_PATH)],
            SLIDESHOW_PATH => vec![home, Crumb::new("Slideshow", SLIDESHOW_PATH)],
            GALLERY_PATH => vec![home, Crumb::new("Gallery", GALLERY_PATH)],
            _ => match path.strip_prefix("/games/") {
                Some(game) => {
                    let text = GameId::from_str(game).map(|g| g.title()).unwrap_or(game);
                    vec![home, Crumb::new("Games", GAMES_PATH), Crumb::new(text, path)]
                }
                None => Vec::new(),
            },
        }
    }

    /// Keyboard shortcut target: Escape backs out one level, Alt+H goes home,
    /// Alt+G opens the games list
    pub fn shortcut(&self, key: &str, alt: bool) -> Option<&'static str> {
        if alt {
            return match key {
                "h" | "H" => Some(ROOT_PATH),
                "g" | "G" => Some(GAMES_PATH),
                _ => None,
            };
        }
        if key != "Escape" {
            return None;
        }
        match self.current.as_deref() {
            Some(GAMES_PATH) => Some(ROOT_PATH),
            Some(path) if path.starts_with("/games/") => Some(GAMES_PATH),
            _ => None,
        }
    }
}
