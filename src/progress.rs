//! Persisted progress through the unlock chain
//!
//! Every mutation writes the whole record back to storage. Write failures are
//! logged and otherwise ignored: the in-memory state stays authoritative for
//! the rest of the session.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};

/// Storage key of the progress record
pub const PROGRESS_KEY: &str = "memory-lane-progress";

/// Unlocked-content entries granted once every game is completed
pub const SLIDESHOW_CONTENT: &str = "final-slideshow";
pub const GALLERY_CONTENT: &str = "photo-gallery";

/// On-disk shape of the progress record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    /// Completion order, no duplicates
    pub completed_games: Vec<String>,
    /// Always equal to `completed_games.len()`
    pub memory_tokens: u32,
    /// Percentage shown on the progress bar
    pub love_level: f32,
    pub unlocked_content: Vec<String>,
    /// Last selected game (display hint)
    pub current_game: Option<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// Drop duplicate completions and recompute the token count
    fn normalize(&mut self) {
        let mut seen = Vec::with_capacity(self.completed_games.len());
        self.completed_games.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(id.clone());
                true
            }
        });
        let tokens = self.completed_games.len() as u32;
        if tokens != self.memory_tokens {
            log::warn!(
                "Stored token count {} disagrees with {} completed games, using {}",
                self.memory_tokens,
                tokens,
                tokens
            );
            self.memory_tokens = tokens;
        }
    }
}

/// Progress manager backed by durable storage
pub struct ProgressState {
    record: ProgressRecord,
    total_games: usize,
    storage: Rc<dyn Storage>,
}

impl ProgressState {
    /// Fresh, unsaved progress
    pub fn new(storage: Rc<dyn Storage>, total_games: usize) -> Self {
        Self {
            record: ProgressRecord::default(),
            total_games,
            storage,
        }
    }

    /// Load progress from storage, falling back to a fresh state
    pub fn load(storage: Rc<dyn Storage>, total_games: usize) -> Self {
        let record = match load_json::<ProgressRecord>(storage.as_ref(), PROGRESS_KEY) {
            Ok(Some(mut record)) => {
                record.normalize();
                log::info!(
                    "Progress restored: {} of {} games completed",
                    record.memory_tokens,
                    total_games
                );
                record
            }
            Ok(None) => {
                log::info!("No saved progress, starting fresh");
                ProgressRecord::default()
            }
            Err(err) => {
                log::error!("Failed to load progress: {}", err);
                ProgressRecord::default()
            }
        };
        Self {
            record,
            total_games,
            storage,
        }
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn completed_games(&self) -> &[String] {
        &self.record.completed_games
    }

    pub fn memory_tokens(&self) -> u32 {
        self.record.memory_tokens
    }

    pub fn current_game(&self) -> Option<&str> {
        self.record.current_game.as_deref()
    }

    pub fn unlocked_content(&self) -> &[String] {
        &self.record.unlocked_content
    }

    pub fn total_games(&self) -> usize {
        self.total_games
    }

    pub fn is_completed(&self, game_id: &str) -> bool {
        self.record.completed_games.iter().any(|g| g == game_id)
    }

    pub fn all_completed(&self) -> bool {
        self.total_games > 0 && self.record.completed_games.len() >= self.total_games
    }

    /// Game `index` of `catalog` is playable when it is first in the chain or
    /// its predecessor has been completed. Indices past the end are locked.
    pub fn is_unlocked<S: AsRef<str>>(&self, index: usize, catalog: &[S]) -> bool {
        if index >= catalog.len() {
            return false;
        }
        index == 0 || self.is_completed(catalog[index - 1].as_ref())
    }

    /// Record a completion. Returns true only the first time a game completes.
    pub fn complete(&mut self, game_id: &str) -> bool {
        if self.is_completed(game_id) {
            return false;
        }
        self.record.completed_games.push(game_id.to_string());
        self.record.memory_tokens += 1;
        if self.all_completed() {
            for content in [SLIDESHOW_CONTENT, GALLERY_CONTENT] {
                if !self.record.unlocked_content.iter().any(|c| c == content) {
                    self.record.unlocked_content.push(content.to_string());
                }
            }
        }
        self.save();
        true
    }

    pub fn set_current_game(&mut self, game_id: Option<&str>) {
        self.record.current_game = game_id.map(str::to_string);
        self.save();
    }

    /// Forget all progress and persist the empty state
    pub fn reset(&mut self) {
        self.record = ProgressRecord::default();
        self.save();
    }

    /// Completed fraction of the catalog (0.0 - 1.0)
    pub fn love_level(&self) -> f32 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.record.memory_tokens as f32 / self.total_games as f32
    }

    /// Completed percentage, rounded for display
    pub fn love_percentage(&self) -> u32 {
        (self.love_level() * 100.0).round() as u32
    }

    /// Write the record. Returns false (after logging) if the write failed.
    pub fn save(&mut self) -> bool {
        self.record.love_level = self.love_level() * 100.0;
        self.record.saved_at = Some(Utc::now());
        match save_json(self.storage.as_ref(), PROGRESS_KEY, &self.record) {
            Ok(()) => {
                log::info!("Progress saved ({} tokens)", self.record.memory_tokens);
                true
            }
            Err(err) => {
                log::error!("Failed to save progress: {}", err);
                false
            }
        }
    }

    /// Remove the stored record
    pub fn clear_storage(&self) {
        match self.storage.remove_item(PROGRESS_KEY) {
            Ok(()) => log::info!("Saved progress cleared"),
            Err(err) => log::error!("Failed to clear saved progress: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TOTAL_GAMES, catalog_ids};
    use crate::persistence::MemoryStorage;
    use proptest::prelude::*;

    fn fresh(total: usize) -> (Rc<MemoryStorage>, ProgressState) {
        let storage = Rc::new(MemoryStorage::new());
        let progress = ProgressState::new(storage.clone(), total);
        (storage, progress)
    }

    #[test]
    fn test_unlock_scenario_abc() {
        let catalog = ["A", "B", "C"];
        let (_, mut progress) = fresh(catalog.len());

        assert!(progress.is_unlocked(0, &catalog));
        assert!(!progress.is_unlocked(1, &catalog));
        assert!(!progress.is_unlocked(2, &catalog));

        assert!(progress.complete("A"));
        assert!(progress.is_unlocked(1, &catalog));
        assert!(!progress.is_unlocked(2, &catalog));

        assert!(progress.complete("B"));
        assert!(progress.is_unlocked(2, &catalog));
    }

    #[test]
    fn test_index_past_catalog_is_locked() {
        let (_, progress) = fresh(2);
        assert!(!progress.is_unlocked(2, &["A", "B"]));
    }

    #[test]
    fn test_complete_twice_awards_once() {
        let (_, mut progress) = fresh(TOTAL_GAMES);
        assert!(progress.complete("memory-match"));
        assert!(!progress.complete("memory-match"));
        assert_eq!(progress.memory_tokens(), 1);
        assert_eq!(progress.completed_games(), ["memory-match"]);
    }

    #[test]
    fn test_reset_relocks_chain() {
        let catalog = catalog_ids();
        let (storage, mut progress) = fresh(TOTAL_GAMES);
        for id in &catalog[..4] {
            progress.complete(id);
        }
        progress.set_current_game(Some("timeline"));

        progress.reset();
        assert!(progress.is_unlocked(0, &catalog));
        for i in 1..catalog.len() {
            assert!(!progress.is_unlocked(i, &catalog));
        }
        assert_eq!(progress.memory_tokens(), 0);
        assert_eq!(progress.current_game(), None);

        // The empty state is what got persisted
        let reloaded = ProgressState::load(storage, TOTAL_GAMES);
        assert!(reloaded.completed_games().is_empty());
    }

    #[test]
    fn test_reload_preserves_order_and_count() {
        let (storage, mut progress) = fresh(TOTAL_GAMES);
        progress.complete("photo-puzzle");
        progress.complete("memory-match");
        progress.complete("timeline");

        let reloaded = ProgressState::load(storage, TOTAL_GAMES);
        assert_eq!(
            reloaded.completed_games(),
            ["photo-puzzle", "memory-match", "timeline"]
        );
        assert_eq!(reloaded.memory_tokens(), 3);
        assert!(reloaded.record().saved_at.is_some());
    }

    #[test]
    fn test_record_uses_camel_case_fields() {
        let (storage, mut progress) = fresh(TOTAL_GAMES);
        progress.complete("memory-match");
        let json = storage.get_item(PROGRESS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["completedGames"][0], "memory-match");
        assert_eq!(value["memoryTokens"], 1);
        assert_eq!(value["loveLevel"], 12.5);
        assert!(value["currentGame"].is_null());
        assert!(value["unlockedContent"].as_array().unwrap().is_empty());
        assert!(value["savedAt"].is_string());
    }

    #[test]
    fn test_load_repairs_inconsistent_record() {
        let storage = Rc::new(MemoryStorage::new());
        storage
            .set_item(
                PROGRESS_KEY,
                r#"{"completedGames":["memory-match","memory-match","photo-puzzle"],"memoryTokens":7}"#,
            )
            .unwrap();
        let progress = ProgressState::load(storage, TOTAL_GAMES);
        assert_eq!(progress.completed_games(), ["memory-match", "photo-puzzle"]);
        assert_eq!(progress.memory_tokens(), 2);
    }

    #[test]
    fn test_malformed_record_starts_fresh() {
        let storage = Rc::new(MemoryStorage::new());
        storage.set_item(PROGRESS_KEY, "][").unwrap();
        let progress = ProgressState::load(storage.clone(), TOTAL_GAMES);
        assert_eq!(progress.memory_tokens(), 0);
        // Nothing written back until the next mutation
        assert_eq!(storage.get_item(PROGRESS_KEY).unwrap().as_deref(), Some("]["));
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let (storage, mut progress) = fresh(TOTAL_GAMES);
        storage.set_fail_writes(true);
        assert!(progress.complete("memory-match"));
        assert_eq!(progress.memory_tokens(), 1);
        assert!(!storage.contains(PROGRESS_KEY));
    }

    #[test]
    fn test_finishing_catalog_unlocks_content() {
        let (_, mut progress) = fresh(TOTAL_GAMES);
        for id in catalog_ids() {
            assert!(progress.unlocked_content().is_empty());
            progress.complete(id);
        }
        assert!(progress.all_completed());
        assert_eq!(
            progress.unlocked_content(),
            [SLIDESHOW_CONTENT, GALLERY_CONTENT]
        );
        assert_eq!(progress.love_percentage(), 100);
    }

    #[test]
    fn test_love_level_fraction() {
        let (_, mut progress) = fresh(4);
        assert_eq!(progress.love_level(), 0.0);
        progress.complete("a");
        assert_eq!(progress.love_level(), 0.25);
        let (_, empty) = fresh(0);
        assert_eq!(empty.love_level(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_unlock_iff_predecessor_completed(
            picks in proptest::collection::vec(0usize..TOTAL_GAMES, 0..20)
        ) {
            let catalog = catalog_ids();
            let (_, mut progress) = fresh(TOTAL_GAMES);
            for &i in &picks {
                progress.complete(catalog[i]);
            }
            prop_assert!(progress.is_unlocked(0, &catalog));
            for i in 1..catalog.len() {
                prop_assert_eq!(
                    progress.is_unlocked(i, &catalog),
                    picks.contains(&(i - 1))
                );
            }
            prop_assert_eq!(
                progress.memory_tokens() as usize,
                progress.completed_games().len()
            );
        }
    }
}
