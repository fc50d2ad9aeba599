//! Mood match: pair each of five photos with a mood.
//!
//! Every pairing is a "perfect match"; the game cannot be lost.

use rand_pcg::Pcg32;

use super::{Choice, GameView, Mark, MiniGame, Step, pick_photos};
use crate::catalog::GameId;
use crate::content::{MOODS, Photo};

pub const PAIRINGS: usize = 5;
pub const FINISH_DELAY_MS: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Playing,
    Finishing,
    Done,
}

#[derive(Debug)]
pub struct MoodMatch {
    photos: Vec<&'static Photo>,
    selected_photo: Option<usize>,
    selected_mood: Option<usize>,
    /// (photo, mood) pairs made so far
    pairs: Vec<(usize, usize)>,
    last_message: Option<String>,
    phase: Phase,
}

impl Default for MoodMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl MoodMatch {
    pub fn new() -> Self {
        Self {
            photos: Vec::new(),
            selected_photo: None,
            selected_mood: None,
            pairs: Vec::with_capacity(PAIRINGS),
            last_message: None,
            phase: Phase::Idle,
        }
    }

    pub fn pairs_made(&self) -> usize {
        self.pairs.len()
    }

    fn photo_paired(&self, photo: usize) -> bool {
        self.pairs.iter().any(|&(p, _)| p == photo)
    }

    fn mood_paired(&self, mood: usize) -> bool {
        self.pairs.iter().any(|&(_, m)| m == mood)
    }

    fn try_pair(&mut self) -> Step {
        let (Some(photo), Some(mood)) = (self.selected_photo, self.selected_mood) else {
            return Step::Updated;
        };
        self.pairs.push((photo, mood));
        self.selected_photo = None;
        self.selected_mood = None;
        self.last_message = Some(format!(
            "Perfect match! \"{}\" really captures {}!",
            self.photos[photo].moment,
            MOODS[mood]
        ));
        if self.pairs.len() < self.photos.len() {
            return Step::Updated;
        }
        self.phase = Phase::Finishing;
        Step::Wait {
            delay_ms: FINISH_DELAY_MS,
        }
    }
}

impl MiniGame for MoodMatch {
    fn id(&self) -> GameId {
        GameId::MoodMatch
    }

    fn start(&mut self, rng: &mut Pcg32) {
        *self = Self::new();
        self.photos = pick_photos(rng, PAIRINGS);
        self.phase = Phase::Playing;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    /// Photos come first, then moods
    fn view(&self) -> GameView {
        if self.phase == Phase::Idle {
            return GameView::default();
        }
        let photos = self.photos.iter().enumerate().map(|(i, &photo)| {
            let mark = if self.photo_paired(i) {
                Mark::Done
            } else if self.selected_photo == Some(i) {
                Mark::Selected
            } else {
                Mark::Plain
            };
            Choice::photo(photo, photo.moment).marked(mark)
        });
        let moods = MOODS.iter().enumerate().map(|(i, &mood)| {
            let mark = if self.mood_paired(i) {
                Mark::Done
            } else if self.selected_mood == Some(i) {
                Mark::Selected
            } else {
                Mark::Plain
            };
            Choice::text(mood).marked(mark)
        });
        GameView {
            prompt: "Match each photo with the feeling it captures".to_string(),
            image: None,
            status: format!("Matches: {}/{}", self.pairs.len(), self.photos.len()),
            feedback: self.last_message.clone(),
            choices: photos.chain(moods).collect(),
        }
    }

    fn choose(&mut self, index: usize) -> Step {
        if self.phase != Phase::Playing {
            return Step::Ignored;
        }
        let photo_count = self.photos.len();
        if index < photo_count {
            if self.photo_paired(index) {
                return Step::Ignored;
            }
            self.selected_photo = Some(index);
        } else if index - photo_count < MOODS.len() {
            let mood = index - photo_count;
            if self.mood_paired(mood) {
                return Step::Ignored;
            }
            self.selected_mood = Some(mood);
        } else {
            return Step::Ignored;
        }
        self.try_pair()
    }

    fn resume(&mut self) -> Step {
        if self.phase != Phase::Finishing {
            return Step::Ignored;
        }
        self.phase = Phase::Done;
        Step::Finished {
            summary: format!(
                "You matched all {} photos with emotions! Amazing emotional intelligence! 💕",
                self.pairs.len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::rng;

    fn started() -> MoodMatch {
        let mut game = MoodMatch::new();
        game.start(&mut rng());
        game
    }

    #[test]
    fn test_view_lists_photos_then_moods() {
        let game = started();
        let view = game.view();
        assert_eq!(view.choices.len(), PAIRINGS + MOODS.len());
        assert!(view.choices[..PAIRINGS].iter().all(|c| c.image.is_some()));
        assert!(view.choices[PAIRINGS..].iter().all(|c| c.image.is_none()));
    }

    #[test]
    fn test_any_pairing_accepted() {
        let mut game = started();
        assert_eq!(game.choose(PAIRINGS + 4), Step::Updated);
        assert_eq!(game.choose(0), Step::Updated);
        assert_eq!(game.pairs_made(), 1);
        assert!(game.view().feedback.unwrap().starts_with("Perfect match!"));
        // Paired items cannot be picked again
        assert_eq!(game.choose(0), Step::Ignored);
        assert_eq!(game.choose(PAIRINGS + 4), Step::Ignored);
    }

    #[test]
    fn test_reselecting_photo_switches_selection() {
        let mut game = started();
        game.choose(1);
        game.choose(2);
        assert_eq!(game.selected_photo, Some(2));
        assert_eq!(game.pairs_made(), 0);
    }

    #[test]
    fn test_fifth_pair_finishes() {
        let mut game = started();
        let mut step = Step::Ignored;
        for i in 0..PAIRINGS {
            game.choose(i);
            step = game.choose(PAIRINGS + (PAIRINGS - 1 - i));
        }
        assert_eq!(step, Step::Wait { delay_ms: FINISH_DELAY_MS });
        assert_eq!(game.choose(0), Step::Ignored);
        assert!(matches!(game.resume(), Step::Finished { .. }));

        let view = game.view();
        assert_eq!(view.choices.len(), PAIRINGS + MOODS.len());
        assert!(view.choices[..PAIRINGS].iter().all(|c| c.mark == Mark::Done));
        assert_eq!(game.choose(1), Step::Ignored);
    }
}
