//! Game engine: ties progress, routing, timers and the mini-games together
//!
//! The engine is platform independent. The browser shell feeds it hash
//! changes, clicks, key presses and frame timestamps, then drains
//! [`EngineEvent`]s to update the page and play sounds.

use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::catalog::{GameId, TOTAL_GAMES, catalog_ids};
use crate::content::{Photo, token_message, token_photo};
use crate::games::{self, GameView, MiniGame, Step};
use crate::persistence::Storage;
use crate::progress::ProgressState;
use crate::router::{
    Access, Crumb, GALLERY_PATH, GAMES_PATH, Navigation, Origin, ROOT_PATH, Router, SLIDESHOW_PATH,
    Screen,
};
use crate::schedule::Scheduler;
use crate::settings::{DevOptions, Settings};

/// Sound cue requested by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Accepted input
    Click,
    /// Input that starts a feedback pause (pair check, answer reveal)
    Reveal,
    /// Navigation refused because a game is locked
    Locked,
    /// A run finished without a new token
    Finish,
    /// A new memory token
    Success,
}

/// Something the shell has to reflect
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Navigated(Navigation),
    UnlockDenied {
        required: GameId,
        message: String,
    },
    GameStarted(GameId),
    GameUpdated(GameId),
    GameFinished {
        game: GameId,
        summary: String,
    },
    TokenUnlocked {
        game: GameId,
        token: u32,
        message: &'static str,
        photo: &'static Photo,
    },
    ProgressSaved {
        tokens: u32,
        love_percentage: u32,
    },
    Cue(Cue),
    TestModeChanged(bool),
    ProgressReset,
}

/// Unlock state of a game card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Locked,
    Unlocked,
    /// Playable only because test mode bypasses the lock
    TestMode,
    Completed,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Locked => "locked",
            CardStatus::Unlocked => "unlocked",
            CardStatus::TestMode => "test-mode",
            CardStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardStatus::Locked => "🔒 Locked",
            CardStatus::Unlocked => "Unlocked",
            CardStatus::TestMode => "Test Mode",
            CardStatus::Completed => "✅ Completed",
        }
    }

    pub fn playable(&self) -> bool {
        !matches!(self, CardStatus::Locked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCard {
    pub id: GameId,
    pub title: &'static str,
    pub status: CardStatus,
}

/// Deferred work owned by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Resume(GameId),
}

pub struct GameEngine {
    progress: ProgressState,
    router: Router,
    dev: DevOptions,
    settings: Settings,
    storage: Rc<dyn Storage>,
    games: Vec<Box<dyn MiniGame>>,
    active: Option<GameId>,
    scheduler: Scheduler<Transition>,
    rng: Pcg32,
    events: Vec<EngineEvent>,
}

impl GameEngine {
    /// Build an engine over `storage`, restoring any saved progress
    pub fn new(storage: Rc<dyn Storage>, dev: DevOptions, seed: u64) -> Self {
        let progress = ProgressState::load(storage.clone(), TOTAL_GAMES);
        let settings = Settings::load(storage.as_ref());
        if dev.test_mode {
            log::info!("Test mode active: every game is unlocked");
        }
        Self {
            progress,
            router: Router::new(),
            dev,
            settings,
            storage,
            games: games::controllers(),
            active: None,
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn dev_options(&self) -> DevOptions {
        self.dev
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn active_game(&self) -> Option<GameId> {
        self.active
    }

    /// View of the running game, if any
    pub fn view(&self) -> Option<GameView> {
        self.active.map(|id| self.games[id.index()].view())
    }

    pub fn pending_transitions(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    // === Navigation ===

    /// End of the loading screen: resolve the initial hash
    pub fn finish_loading(&mut self, hash: &str) {
        let access = Access {
            completed: self.progress.completed_games(),
            test_mode: self.dev.test_mode,
        };
        let nav = self.router.finish_loading(hash, access);
        self.apply(nav);
    }

    /// Browser `hashchange`
    pub fn on_hash_change(&mut self, hash: &str) {
        let access = Access {
            completed: self.progress.completed_games(),
            test_mode: self.dev.test_mode,
        };
        if let Some(nav) = self.router.handle_location(hash, access) {
            self.apply(nav);
        }
    }

    pub fn navigate(&mut self, path: &str) {
        let access = Access {
            completed: self.progress.completed_games(),
            test_mode: self.dev.test_mode,
        };
        let nav = self.router.navigate(path, Origin::Program, access);
        self.apply(nav);
    }

    pub fn go_home(&mut self) {
        self.navigate(ROOT_PATH);
    }

    pub fn go_to_games(&mut self) {
        self.navigate(GAMES_PATH);
    }

    pub fn go_to_game(&mut self, id: GameId) {
        self.navigate(&id.route_path());
    }

    pub fn go_to_slideshow(&mut self) {
        self.navigate(SLIDESHOW_PATH);
    }

    pub fn go_to_gallery(&mut self) {
        self.navigate(GALLERY_PATH);
    }

    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        self.router
            .current_route()
            .map(|path| self.router.breadcrumbs(path))
            .unwrap_or_default()
    }

    fn leave_screen(&mut self) {
        self.scheduler.leave_screen();
        if let Some(id) = self.active.take() {
            self.games[id.index()].reset();
        }
    }

    fn apply(&mut self, nav: Navigation) {
        self.leave_screen();
        if let Some(required) = nav.denied {
            log::info!("{} is locked, showing the games list", nav.requested);
            self.emit(EngineEvent::Cue(Cue::Locked));
            self.emit(EngineEvent::UnlockDenied {
                required,
                message: format!(
                    "Complete \"{}\" first to unlock this game!",
                    required.title()
                ),
            });
        }
        let screen = nav.screen;
        self.emit(EngineEvent::Navigated(nav));
        if let Screen::Game(id) = screen {
            self.select_game(id);
        }
    }

    // === Games ===

    /// Start `id` if it is unlocked (or test mode is on). Locked games are
    /// refused without any event.
    pub fn select_game(&mut self, id: GameId) -> bool {
        let ids = catalog_ids();
        if !self.dev.test_mode && !self.progress.is_unlocked(id.index(), &ids) {
            log::info!("Game {} is locked", id.as_str());
            return false;
        }
        self.leave_screen();
        self.progress.set_current_game(Some(id.as_str()));
        self.emit(EngineEvent::Cue(Cue::Click));
        self.games[id.index()].start(&mut self.rng);
        self.active = Some(id);
        log::info!("Started {}", id.title());
        self.emit(EngineEvent::GameStarted(id));
        true
    }

    /// Player clicked choice `index` of the active game
    pub fn choose(&mut self, index: usize) {
        let Some(id) = self.active else {
            return;
        };
        let step = self.games[id.index()].choose(index);
        match step {
            Step::Ignored => {}
            Step::Wait { .. } => self.emit(EngineEvent::Cue(Cue::Reveal)),
            _ => self.emit(EngineEvent::Cue(Cue::Click)),
        }
        self.handle_step(id, step);
    }

    /// Advance the clock (milliseconds, monotonic) and resume games whose
    /// timers came due
    pub fn tick(&mut self, now_ms: f64) {
        for transition in self.scheduler.advance(now_ms) {
            match transition {
                Transition::Resume(id) if self.active == Some(id) => {
                    let step = self.games[id.index()].resume();
                    self.handle_step(id, step);
                }
                Transition::Resume(id) => {
                    log::debug!("Dropping stale transition for {}", id.as_str());
                }
            }
        }
    }

    fn handle_step(&mut self, id: GameId, step: Step) {
        match step {
            Step::Ignored => {}
            Step::Updated => self.emit(EngineEvent::GameUpdated(id)),
            Step::Wait { delay_ms } => {
                self.scheduler.schedule(delay_ms, Transition::Resume(id));
                self.emit(EngineEvent::GameUpdated(id));
            }
            Step::Finished { summary } => {
                log::info!("{} finished: {}", id.title(), summary);
                self.emit(EngineEvent::GameUpdated(id));
                self.emit(EngineEvent::GameFinished { game: id, summary });
                if !self.complete_game(id) {
                    self.emit(EngineEvent::Cue(Cue::Finish));
                }
            }
        }
    }

    /// Record a completion. Only a first completion plays the success cue and
    /// awards a token.
    pub fn complete_game(&mut self, id: GameId) -> bool {
        if !self.progress.complete(id.as_str()) {
            return false;
        }
        let token = self.progress.memory_tokens();
        log::info!(
            "Memory token {}/{} unlocked by {}",
            token,
            TOTAL_GAMES,
            id.title()
        );
        self.emit(EngineEvent::Cue(Cue::Success));
        self.emit(EngineEvent::TokenUnlocked {
            game: id,
            token,
            message: token_message(token as usize),
            photo: token_photo(token as usize),
        });
        let love_percentage = self.progress.love_percentage();
        self.emit(EngineEvent::ProgressSaved {
            tokens: token,
            love_percentage,
        });
        true
    }

    pub fn close_token_modal(&mut self) {
        self.go_to_games();
    }

    /// Wipe all progress and return to the welcome screen
    pub fn restart(&mut self) {
        self.scheduler.leave_screen();
        for game in &mut self.games {
            game.reset();
        }
        self.active = None;
        self.progress.clear_storage();
        self.progress.reset();
        log::info!("Progress reset");
        self.emit(EngineEvent::ProgressReset);
        self.go_home();
    }

    // === Dev tools and preferences ===

    /// Flip test mode and persist it. Only available in a dev environment.
    pub fn toggle_test_mode(&mut self) -> bool {
        if !self.dev.toggle() {
            return false;
        }
        self.dev.save(self.storage.as_ref());
        let enabled = self.dev.test_mode;
        self.emit(EngineEvent::TestModeChanged(enabled));
        true
    }

    /// Returns the new muted state
    pub fn toggle_mute(&mut self) -> bool {
        self.settings.muted = !self.settings.muted;
        self.settings.save(self.storage.as_ref());
        self.settings.muted
    }

    /// Keyboard shortcuts. Returns true when the key was handled.
    pub fn key_down(&mut self, key: &str, alt: bool, shift: bool) -> bool {
        if shift && !alt && (key == "T" || key == "t") {
            return self.toggle_test_mode();
        }
        match self.router.shortcut(key, alt) {
            Some(path) => {
                self.navigate(path);
                true
            }
            None => false,
        }
    }

    // === Queries for the shell ===

    pub fn game_cards(&self) -> Vec<GameCard> {
        let ids = catalog_ids();
        GameId::CATALOG
            .into_iter()
            .map(|id| {
                let status = if self.progress.is_completed(id.as_str()) {
                    CardStatus::Completed
                } else if self.progress.is_unlocked(id.index(), &ids) {
                    CardStatus::Unlocked
                } else if self.dev.test_mode {
                    CardStatus::TestMode
                } else {
                    CardStatus::Locked
                };
                GameCard {
                    id,
                    title: id.title(),
                    status,
                }
            })
            .collect()
    }

    pub fn slideshow_available(&self) -> bool {
        self.progress.all_completed()
    }

    pub fn gallery_available(&self) -> bool {
        self.progress.all_completed() || self.dev.test_mode
    }

    /// Greeting for a returning player with restored progress
    pub fn welcome_back(&self) -> Option<String> {
        let tokens = self.progress.memory_tokens();
        (tokens > 0).then(|| {
            format!(
                "Welcome back! Progress restored ({}/{} games completed)",
                tokens, TOTAL_GAMES
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::progress::PROGRESS_KEY;

    fn engine_with(storage: Rc<MemoryStorage>, dev: DevOptions) -> GameEngine {
        let mut engine = GameEngine::new(storage, dev, 7);
        engine.finish_loading("");
        engine.drain_events();
        engine
    }

    fn engine() -> GameEngine {
        engine_with(Rc::new(MemoryStorage::new()), DevOptions::production())
    }

    fn dev_engine() -> GameEngine {
        let dev = DevOptions {
            dev_environment: true,
            test_mode: false,
        };
        engine_with(Rc::new(MemoryStorage::new()), dev)
    }

    fn navigated(events: &[EngineEvent]) -> Option<&Navigation> {
        events.iter().rev().find_map(|e| match e {
            EngineEvent::Navigated(nav) => Some(nav),
            _ => None,
        })
    }

    #[test]
    fn test_locked_route_redirects_with_notice() {
        let mut engine = engine();
        engine.navigate("/games/timeline");
        let events = engine.drain_events();

        let nav = navigated(&events).unwrap();
        assert_eq!(nav.path, GAMES_PATH);
        assert_eq!(nav.denied, Some(GameId::TriviaQuiz));
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::UnlockDenied { required: GameId::TriviaQuiz, .. }
        )));
        assert!(events.contains(&EngineEvent::Cue(Cue::Locked)));
        assert_eq!(engine.active_game(), None);
    }

    #[test]
    fn test_unknown_route_goes_home() {
        let mut engine = engine();
        engine.navigate("/unknown/path");
        let events = engine.drain_events();
        assert_eq!(navigated(&events).unwrap().path, ROOT_PATH);
    }

    #[test]
    fn test_first_game_route_starts_game() {
        let mut engine = engine();
        engine.go_to_game(GameId::MemoryMatch);
        let events = engine.drain_events();
        assert!(events.contains(&EngineEvent::GameStarted(GameId::MemoryMatch)));
        assert_eq!(engine.active_game(), Some(GameId::MemoryMatch));
        assert_eq!(engine.progress().current_game(), Some("memory-match"));
        assert!(!engine.view().unwrap().choices.is_empty());
    }

    #[test]
    fn test_select_locked_game_refused_silently() {
        let mut engine = engine();
        assert!(!engine.select_game(GameId::PhotoPuzzle));
        assert!(engine.drain_events().is_empty());
        assert_eq!(engine.active_game(), None);
    }

    #[test]
    fn test_complete_game_awards_once() {
        let mut engine = engine();
        assert!(engine.complete_game(GameId::MemoryMatch));
        let events = engine.drain_events();
        assert!(events.contains(&EngineEvent::Cue(Cue::Success)));
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::TokenUnlocked { token: 1, game: GameId::MemoryMatch, .. }
        )));

        assert!(!engine.complete_game(GameId::MemoryMatch));
        assert!(engine.drain_events().is_empty());
        assert_eq!(engine.progress().memory_tokens(), 1);
        assert_eq!(engine.game_cards()[1].status, CardStatus::Unlocked);
    }

    #[test]
    fn test_leaving_screen_cancels_timers() {
        let mut engine = engine();
        engine.go_to_game(GameId::MemoryMatch);
        engine.tick(0.0);
        engine.choose(0);
        engine.choose(1);
        assert_eq!(engine.pending_transitions(), 1);

        engine.go_to_games();
        assert_eq!(engine.pending_transitions(), 0);
        assert_eq!(engine.active_game(), None);
        engine.drain_events();

        engine.tick(10_000.0);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_finished_run_unlocks_next_game() {
        let mut engine = engine();
        engine.go_to_game(GameId::MoodMatch);
        assert_eq!(engine.active_game(), None);

        // Mood match cannot be lost; unlock it through the chain first
        for id in &GameId::CATALOG[..5] {
            engine.complete_game(*id);
        }
        engine.go_to_game(GameId::MoodMatch);
        engine.drain_events();
        let photos = crate::games::mood_match::PAIRINGS;
        for i in 0..photos {
            engine.choose(i);
            engine.choose(photos + i);
        }
        assert_eq!(engine.pending_transitions(), 1);
        engine.tick(crate::games::mood_match::FINISH_DELAY_MS as f64);

        let events = engine.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::GameFinished { game: GameId::MoodMatch, .. }
        )));
        assert!(events.iter().any(|e| matches!(e, EngineEvent::TokenUnlocked { token: 6, .. })));
        assert_eq!(engine.game_cards()[6].status, CardStatus::Unlocked);

        engine.close_token_modal();
        let events = engine.drain_events();
        assert_eq!(navigated(&events).unwrap().screen, Screen::GameSelection);
    }

    #[test]
    fn test_restart_clears_everything() {
        let storage = Rc::new(MemoryStorage::new());
        let mut engine = engine_with(storage.clone(), DevOptions::production());
        engine.complete_game(GameId::MemoryMatch);
        engine.go_to_game(GameId::PhotoPuzzle);
        engine.drain_events();

        engine.restart();
        let events = engine.drain_events();
        assert!(events.contains(&EngineEvent::ProgressReset));
        assert_eq!(navigated(&events).unwrap().path, ROOT_PATH);
        assert_eq!(engine.progress().memory_tokens(), 0);
        assert_eq!(engine.active_game(), None);

        let reloaded = GameEngine::new(storage, DevOptions::production(), 1);
        assert_eq!(reloaded.progress().memory_tokens(), 0);
        assert!(reloaded.welcome_back().is_none());
    }

    #[test]
    fn test_progress_survives_reload() {
        let storage = Rc::new(MemoryStorage::new());
        let mut engine = engine_with(storage.clone(), DevOptions::production());
        engine.complete_game(GameId::MemoryMatch);
        engine.complete_game(GameId::PhotoPuzzle);
        assert!(storage.contains(PROGRESS_KEY));

        let reloaded = GameEngine::new(storage, DevOptions::production(), 2);
        assert_eq!(
            reloaded.progress().completed_games(),
            ["memory-match", "photo-puzzle"]
        );
        assert!(reloaded.welcome_back().unwrap().contains("2/8"));
    }

    #[test]
    fn test_test_mode_only_in_dev() {
        let mut engine = engine();
        assert!(!engine.key_down("T", false, true));
        assert!(!engine.dev_options().test_mode);

        let mut engine = dev_engine();
        assert!(engine.key_down("T", false, true));
        assert!(engine.dev_options().test_mode);
        assert!(engine.drain_events().contains(&EngineEvent::TestModeChanged(true)));
        assert_eq!(engine.game_cards()[7].status, CardStatus::TestMode);
        assert!(engine.gallery_available());
        assert!(!engine.slideshow_available());

        engine.go_to_game(GameId::ScavengerHunt);
        assert_eq!(engine.active_game(), Some(GameId::ScavengerHunt));
    }

    #[test]
    fn test_escape_backs_out() {
        let mut engine = engine();
        engine.go_to_game(GameId::MemoryMatch);
        assert!(engine.key_down("Escape", false, false));
        assert_eq!(engine.router().current_route(), Some(GAMES_PATH));
        assert!(engine.key_down("Escape", false, false));
        assert_eq!(engine.router().current_route(), Some(ROOT_PATH));
        assert!(!engine.key_down("Escape", false, false));
        assert!(engine.key_down("g", true, false));
        assert_eq!(engine.router().current_route(), Some(GAMES_PATH));
    }

    #[test]
    fn test_hash_change_for_current_route_is_noop() {
        let mut engine = engine();
        engine.go_to_games();
        engine.drain_events();
        engine.on_hash_change("#/games");
        assert!(engine.drain_events().is_empty());
        engine.on_hash_change("#/");
        assert_eq!(engine.router().current_route(), Some(ROOT_PATH));
    }

    #[test]
    fn test_hash_ignored_while_loading() {
        let mut engine = GameEngine::new(Rc::new(MemoryStorage::new()), DevOptions::production(), 3);
        engine.on_hash_change("#/games");
        assert!(engine.drain_events().is_empty());
        engine.finish_loading("#/games");
        assert_eq!(engine.router().current_route(), Some(GAMES_PATH));
    }

    #[test]
    fn test_mute_persists() {
        let storage = Rc::new(MemoryStorage::new());
        let mut engine = engine_with(storage.clone(), DevOptions::production());
        assert!(engine.toggle_mute());
        let reloaded = GameEngine::new(storage, DevOptions::production(), 4);
        assert!(reloaded.settings().muted);
    }
}
