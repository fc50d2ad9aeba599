//! Mini-game controllers
//!
//! Each game is a small state machine behind the [`MiniGame`] trait. Games
//! never touch the DOM or the clock: they describe themselves through
//! [`GameView`] and ask for delayed follow-ups with [`Step::Wait`]. The engine
//! owns the timers and calls [`MiniGame::resume`] when one fires.
//!
//! Several games are deliberately generous (mood match, scavenger hunt): any
//! answer counts.

pub mod guess_moment;
pub mod hidden_message;
pub mod memory_match;
pub mod mood_match;
pub mod photo_puzzle;
pub mod scavenger_hunt;
pub mod timeline;
pub mod trivia_quiz;

pub use guess_moment::GuessMoment;
pub use hidden_message::HiddenMessage;
pub use memory_match::MemoryMatch;
pub use mood_match::MoodMatch;
pub use photo_puzzle::PhotoPuzzle;
pub use scavenger_hunt::ScavengerHunt;
pub use timeline::Timeline;
pub use trivia_quiz::TriviaQuiz;

use chrono::{Datelike, Utc};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::catalog::GameId;
use crate::content::{PHOTOS, Photo};

/// Common contract of every mini-game
pub trait MiniGame {
    fn id(&self) -> GameId;
    /// Begin a fresh run, replacing any run in progress
    fn start(&mut self, rng: &mut Pcg32);
    /// Abandon the current run
    fn reset(&mut self);
    fn view(&self) -> GameView;
    /// Player picked choice `index` of the current view
    fn choose(&mut self, index: usize) -> Step;
    /// A delay requested with `Step::Wait` has elapsed
    fn resume(&mut self) -> Step;
}

/// Outcome of feeding input (or a timer) to a game
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Input not accepted in the current state
    Ignored,
    /// State changed; re-render
    Updated,
    /// Re-render, then call `resume` after the delay. Input is locked until then.
    Wait { delay_ms: u32 },
    /// Run complete
    Finished { summary: String },
}

/// How a choice should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Plain,
    /// Face down / not yet revealed
    Hidden,
    Selected,
    Correct,
    Wrong,
    /// Already used up (matched, placed, found)
    Done,
    Disabled,
}

impl Mark {
    /// CSS class for the shell
    pub fn css_class(&self) -> &'static str {
        match self {
            Mark::Plain => "choice",
            Mark::Hidden => "choice hidden-face",
            Mark::Selected => "choice selected",
            Mark::Correct => "choice correct",
            Mark::Wrong => "choice incorrect",
            Mark::Done => "choice done",
            Mark::Disabled => "choice disabled",
        }
    }
}

/// One clickable element of a game view
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    pub image: Option<&'static str>,
    pub mark: Mark,
    /// Placement in percent of the stage (hotspots), or the image offset of a tile
    pub position: Option<(f32, f32)>,
}

impl Choice {
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            image: None,
            mark: Mark::Plain,
            position: None,
        }
    }

    pub fn photo(photo: &'static Photo, label: impl Into<String>) -> Self {
        Self {
            image: Some(photo.src),
            ..Self::text(label)
        }
    }

    pub fn marked(mut self, mark: Mark) -> Self {
        self.mark = mark;
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Some((x, y));
        self
    }
}

/// Everything the shell needs to draw a game screen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameView {
    pub prompt: String,
    pub image: Option<&'static str>,
    pub status: String,
    pub feedback: Option<String>,
    pub choices: Vec<Choice>,
}

/// One controller per catalog entry, in unlock order
pub fn controllers() -> Vec<Box<dyn MiniGame>> {
    GameId::CATALOG.into_iter().map(controller).collect()
}

pub fn controller(id: GameId) -> Box<dyn MiniGame> {
    match id {
        GameId::MemoryMatch => Box::new(MemoryMatch::new()),
        GameId::PhotoPuzzle => Box::new(PhotoPuzzle::new()),
        GameId::GuessMoment => Box::new(GuessMoment::new()),
        GameId::TriviaQuiz => Box::new(TriviaQuiz::new()),
        GameId::Timeline => Box::new(Timeline::new()),
        GameId::MoodMatch => Box::new(MoodMatch::new()),
        GameId::HiddenMessage => Box::new(HiddenMessage::new()),
        GameId::ScavengerHunt => Box::new(ScavengerHunt::new()),
    }
}

/// Per-run generator split off the engine's RNG
pub(crate) fn fork_rng(rng: &mut Pcg32) -> Pcg32 {
    Pcg32::seed_from_u64(rng.random())
}

/// `count` distinct photos in random order
pub(crate) fn pick_photos(rng: &mut Pcg32, count: usize) -> Vec<&'static Photo> {
    let mut picked: Vec<_> = PHOTOS.choose_multiple(rng, count).collect();
    picked.shuffle(rng);
    picked
}

/// Calendar year of an ISO date
pub(crate) fn year_of(date: &str) -> Option<i32> {
    date.get(..4)?.parse().ok()
}

/// Years run from the first photo to the last
pub(crate) fn photo_years() -> Option<(i32, i32)> {
    let years = PHOTOS.iter().filter_map(|p| year_of(p.date));
    let first = years.clone().min()?;
    let last = years.max()?;
    Some((first, last))
}

/// Up to `count` distinct years within `spread` of `year`, never in the future
pub(crate) fn nearby_years(rng: &mut Pcg32, year: i32, spread: i32, count: usize) -> Vec<i32> {
    let newest = photo_years().map_or(year, |(_, last)| last);
    let latest = Utc::now().year().max(newest);
    let candidates: Vec<i32> = (year - spread..=year + spread)
        .filter(|y| *y != year && *y > 2000 && *y <= latest)
        .collect();
    candidates.choose_multiple(rng, count).copied().collect()
}

/// Up to `count` distinct entries of `pool` other than `answer`
pub(crate) fn decoys(
    rng: &mut Pcg32,
    pool: impl IntoIterator<Item = &'static str>,
    answer: &str,
    count: usize,
) -> Vec<&'static str> {
    let mut unique: Vec<&'static str> = Vec::new();
    for item in pool {
        if !item.is_empty() && item != answer && !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique.choose_multiple(rng, count).copied().collect()
}

/// Answer mixed in with its decoys; returns the options and the answer's index
pub(crate) fn shuffled_options(
    rng: &mut Pcg32,
    answer: String,
    decoys: impl IntoIterator<Item = String>,
) -> (Vec<String>, usize) {
    let mut options: Vec<String> = decoys.into_iter().filter(|d| *d != answer).collect();
    options.push(answer.clone());
    options.shuffle(rng);
    let correct = options.iter().position(|o| *o == answer).unwrap_or_default();
    (options, correct)
}

/// `2020-08-13` -> `August 13, 2020`
pub fn format_date(date: &str) -> String {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    let mut parts = date.splitn(3, '-');
    let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
        return date.to_string();
    };
    let month = month
        .parse::<usize>()
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|m| MONTHS.get(m));
    match (month, day.parse::<u32>()) {
        (Some(month), Ok(day)) => format!("{} {}, {}", month, day, year),
        _ => date.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controllers_follow_catalog() {
        let ids: Vec<_> = controllers().iter().map(|g| g.id()).collect();
        assert_eq!(ids, GameId::CATALOG);
    }

    #[test]
    fn test_pick_photos_distinct() {
        let mut rng = testing::rng();
        let photos = pick_photos(&mut rng, 6);
        assert_eq!(photos.len(), 6);
        for (i, a) in photos.iter().enumerate() {
            for b in &photos[i + 1..] {
                assert_ne!(a.src, b.src);
            }
        }
    }

    #[test]
    fn test_nearby_years_stay_close_and_distinct() {
        let mut rng = testing::rng();
        for _ in 0..20 {
            let years = nearby_years(&mut rng, 2019, 3, 3);
            assert_eq!(years.len(), 3);
            assert!(years.iter().all(|y| *y != 2019 && (2016..=2022).contains(y)));
            assert!(years[0] != years[1] && years[1] != years[2] && years[0] != years[2]);
        }
    }

    #[test]
    fn test_decoys_skip_answer_and_duplicates() {
        let mut rng = testing::rng();
        let picked = decoys(&mut rng, ["a", "b", "b", "c", ""], "a", 3);
        let mut sorted = picked.clone();
        sorted.sort();
        assert_eq!(sorted, ["b", "c"]);
    }

    #[test]
    fn test_shuffled_options_track_answer() {
        let mut seen = Vec::new();
        for seed in 0..16 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let decoys = ["x", "y", "z"].map(String::from);
            let (options, correct) = shuffled_options(&mut rng, "answer".to_string(), decoys);
            assert_eq!(options.len(), 4);
            assert_eq!(options[correct], "answer");
            seen.push(correct);
        }
        seen.sort();
        seen.dedup();
        assert!(seen.len() > 1, "answer always lands at {:?}", seen);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2020-08-13"), "August 13, 2020");
        assert_eq!(format_date("2018-01-02"), "January 2, 2018");
        assert_eq!(format_date("someday"), "someday");
    }

    #[test]
    fn test_every_game_starts_with_choices() {
        let mut rng = testing::rng();
        for mut game in controllers() {
            assert!(game.view().choices.is_empty(), "{:?}", game.id());
            game.start(&mut rng);
            assert!(!game.view().choices.is_empty(), "{:?}", game.id());
            game.reset();
            assert!(game.view().choices.is_empty(), "{:?}", game.id());
        }
    }
}
