//! Memory Lane - a photo memory game with a chain of unlockable mini-games
//!
//! Core modules:
//! - `catalog`: The ordered list of games and their unlock chain
//! - `content`: Photos, token messages and quiz text
//! - `progress`: Completion tracking persisted to storage
//! - `router`: Hash routes with unlock gating
//! - `schedule`: Screen-scoped delayed transitions
//! - `games`: The mini-game state machines
//! - `engine`: Orchestration consumed by the browser shell
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `platform`: Browser DOM helpers

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod catalog;
pub mod content;
pub mod engine;
pub mod games;
pub mod persistence;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod progress;
pub mod router;
pub mod schedule;
pub mod settings;

pub use catalog::{GameId, TOTAL_GAMES};
pub use engine::{CardStatus, Cue, EngineEvent, GameCard, GameEngine};
pub use progress::{ProgressRecord, ProgressState};
pub use router::{Navigation, Router, Screen};
pub use settings::{DevOptions, Settings};

/// Page timing constants
pub mod consts {
    /// How long the loading screen stays up before the first route resolves
    pub const LOADING_DELAY_MS: i32 = 3000;
    /// Lifetime of toast notifications (unlock notices, welcome back)
    pub const NOTICE_MS: i32 = 4000;
    /// Lifetime of the "progress saved" indicator
    pub const SAVE_INDICATOR_MS: i32 = 2000;
}
