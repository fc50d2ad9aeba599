//! Game catalog and unlock chain
//!
//! The order of [`GameId::CATALOG`] is the unlock order: completing game `i`
//! unlocks game `i + 1`.

use serde::{Deserialize, Serialize};

/// Identifier of one mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    MemoryMatch,
    PhotoPuzzle,
    GuessMoment,
    TriviaQuiz,
    Timeline,
    MoodMatch,
    HiddenMessage,
    ScavengerHunt,
}

impl GameId {
    /// Unlock chain, first to last
    pub const CATALOG: [GameId; 8] = [
        GameId::MemoryMatch,
        GameId::PhotoPuzzle,
        GameId::GuessMoment,
        GameId::TriviaQuiz,
        GameId::Timeline,
        GameId::MoodMatch,
        GameId::HiddenMessage,
        GameId::ScavengerHunt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::MemoryMatch => "memory-match",
            GameId::PhotoPuzzle => "photo-puzzle",
            GameId::GuessMoment => "guess-moment",
            GameId::TriviaQuiz => "trivia-quiz",
            GameId::Timeline => "timeline",
            GameId::MoodMatch => "mood-match",
            GameId::HiddenMessage => "hidden-message",
            GameId::ScavengerHunt => "scavenger-hunt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::CATALOG.into_iter().find(|id| id.as_str() == s)
    }

    /// Position in the unlock chain
    pub fn index(&self) -> usize {
        Self::CATALOG
            .iter()
            .position(|id| id == self)
            .unwrap_or_default()
    }

    /// Game that must be completed before this one (None for the first game)
    pub fn prerequisite(&self) -> Option<GameId> {
        self.index()
            .checked_sub(1)
            .map(|prev| Self::CATALOG[prev])
    }

    /// Human-readable name
    pub fn title(&self) -> &'static str {
        match self {
            GameId::MemoryMatch => "Memory Match",
            GameId::PhotoPuzzle => "Photo Puzzle",
            GameId::GuessMoment => "Guess the Moment",
            GameId::TriviaQuiz => "Trivia Quiz",
            GameId::Timeline => "Timeline Challenge",
            GameId::MoodMatch => "Mood Match",
            GameId::HiddenMessage => "Hidden Messages",
            GameId::ScavengerHunt => "Scavenger Hunt",
        }
    }

    /// DOM id of the screen hosting this game
    pub fn screen_id(&self) -> &'static str {
        match self {
            GameId::MemoryMatch => "memory-match-game",
            GameId::PhotoPuzzle => "photo-puzzle-game",
            GameId::GuessMoment => "guess-moment-game",
            GameId::TriviaQuiz => "trivia-game",
            GameId::Timeline => "timeline-game",
            GameId::MoodMatch => "mood-match-game",
            GameId::HiddenMessage => "hidden-message-game",
            GameId::ScavengerHunt => "scavenger-game",
        }
    }

    /// Router path, e.g. `/games/memory-match`
    pub fn route_path(&self) -> String {
        format!("/games/{}", self.as_str())
    }
}

/// The unlock chain as plain identifiers
pub fn catalog_ids() -> [&'static str; 8] {
    GameId::CATALOG.map(|id| id.as_str())
}

/// Number of games in the chain
pub const TOTAL_GAMES: usize = GameId::CATALOG.len();
