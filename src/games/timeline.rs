//! Timeline challenge: put four photos in the order they were taken.
//!
//! Clicking a photo places it in the next slot, clicking a placed photo takes
//! it back out. Once every slot is filled the round is scored.

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::{Choice, GameView, Mark, MiniGame, Step, fork_rng, format_date};
use crate::catalog::GameId;
use crate::content::{PHOTOS, Photo};

pub const ROUNDS: usize = 3;
pub const PHOTOS_PER_ROUND: usize = 4;
pub const FEEDBACK_DELAY_MS: u32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Placing,
    Feedback,
    Done,
}

#[derive(Debug)]
pub struct Timeline {
    rng: Option<Pcg32>,
    /// Photos of the current round in display order
    photos: Vec<&'static Photo>,
    /// Indices into `photos`, in the order the player placed them
    placed: Vec<usize>,
    round: usize,
    correct_rounds: usize,
    phase: Phase,
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Photos with pairwise distinct dates, shuffled
fn pick_round(rng: &mut Pcg32) -> Vec<&'static Photo> {
    let mut pool: Vec<&'static Photo> = PHOTOS.iter().collect();
    pool.shuffle(rng);
    let mut picked: Vec<&'static Photo> = Vec::with_capacity(PHOTOS_PER_ROUND);
    for photo in pool {
        if picked.len() == PHOTOS_PER_ROUND {
            break;
        }
        if picked.iter().all(|p| p.date != photo.date) {
            picked.push(photo);
        }
    }
    picked
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            rng: None,
            photos: Vec::new(),
            placed: Vec::with_capacity(PHOTOS_PER_ROUND),
            round: 0,
            correct_rounds: 0,
            phase: Phase::Idle,
        }
    }

    pub fn correct_rounds(&self) -> usize {
        self.correct_rounds
    }

    fn deal(&mut self) {
        let Some(rng) = self.rng.as_mut() else {
            return;
        };
        self.photos = pick_round(rng);
        self.placed.clear();
        self.phase = Phase::Placing;
    }

    /// Indices into `photos` sorted oldest first
    fn correct_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.photos.len()).collect();
        order.sort_by_key(|&i| self.photos[i].date);
        order
    }

    fn placed_correctly(&self) -> bool {
        self.placed == self.correct_order()
    }

    fn explanation(&self) -> String {
        let mut out = String::from("The correct chronological order:");
        for (n, &i) in self.correct_order().iter().enumerate() {
            let photo = self.photos[i];
            out.push_str(&format!("\n{}. {} ({})", n + 1, photo.moment, format_date(photo.date)));
        }
        out
    }
}

fn closing_message(percentage: usize) -> &'static str {
    match percentage {
        100.. => "Perfect! You have our timeline memorized! 💕",
        67.. => "Excellent! You know our story really well! 😍",
        34.. => "Good effort! Our timeline has many precious moments! 😊",
        _ => "Every moment in our timeline is special, keep exploring! 💫",
    }
}

impl MiniGame for Timeline {
    fn id(&self) -> GameId {
        GameId::Timeline
    }

    fn start(&mut self, rng: &mut Pcg32) {
        *self = Self::new();
        self.rng = Some(fork_rng(rng));
        self.deal();
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn view(&self) -> GameView {
        if self.phase == Phase::Idle {
            return GameView::default();
        }
        let correct = self.correct_order();
        let choices = self
            .photos
            .iter()
            .enumerate()
            .map(|(i, &photo)| {
                let Some(slot) = self.placed.iter().position(|&p| p == i) else {
                    return Choice::photo(photo, photo.moment);
                };
                let mark = if !matches!(self.phase, Phase::Feedback | Phase::Done) {
                    Mark::Selected
                } else if correct[slot] == i {
                    Mark::Correct
                } else {
                    Mark::Wrong
                };
                Choice::photo(photo, format!("#{} {}", slot + 1, photo.moment)).marked(mark)
            })
            .collect();
        let feedback = (self.phase == Phase::Feedback).then(|| {
            let verdict = if self.placed_correctly() {
                "🎉 Perfect Timeline!"
            } else {
                "📅 Learning Opportunity!"
            };
            format!("{}\n{}", verdict, self.explanation())
        });
        GameView {
            prompt: "Click the photos from oldest to newest".to_string(),
            image: None,
            status: format!(
                "Round {}/{} · Correct: {}",
                self.round.min(ROUNDS - 1) + 1,
                ROUNDS,
                self.correct_rounds
            ),
            feedback,
            choices,
        }
    }

    fn choose(&mut self, index: usize) -> Step {
        if self.phase != Phase::Placing || index >= self.photos.len() {
            return Step::Ignored;
        }
        if let Some(slot) = self.placed.iter().position(|&p| p == index) {
            self.placed.remove(slot);
            return Step::Updated;
        }
        self.placed.push(index);
        if self.placed.len() < self.photos.len() {
            return Step::Updated;
        }
        if self.placed_correctly() {
            self.correct_rounds += 1;
        }
        self.phase = Phase::Feedback;
        Step::Wait {
            delay_ms: FEEDBACK_DELAY_MS,
        }
    }

    fn resume(&mut self) -> Step {
        if self.phase != Phase::Feedback {
            return Step::Ignored;
        }
        self.round += 1;
        if self.round < ROUNDS {
            self.deal();
            return Step::Updated;
        }
        self.phase = Phase::Done;
        let percentage = (self.correct_rounds * 100 + ROUNDS / 2) / ROUNDS;
        Step::Finished {
            summary: format!(
                "You got {} out of {} rounds correct ({}%)! {}",
                self.correct_rounds,
                ROUNDS,
                percentage,
                closing_message(percentage)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::rng;

    fn started() -> Timeline {
        let mut game = Timeline::new();
        game.start(&mut rng());
        game
    }

    #[test]
    fn test_round_photos_have_distinct_dates() {
        let game = started();
        assert_eq!(game.photos.len(), PHOTOS_PER_ROUND);
        let mut dates: Vec<_> = game.photos.iter().map(|p| p.date).collect();
        dates.sort();
        dates.dedup();
        assert_eq!(dates.len(), PHOTOS_PER_ROUND);
    }

    #[test]
    fn test_click_again_removes() {
        let mut game = started();
        assert_eq!(game.choose(2), Step::Updated);
        assert_eq!(game.view().choices[2].mark, Mark::Selected);
        assert_eq!(game.choose(2), Step::Updated);
        assert!(game.placed.is_empty());
        assert_eq!(game.choose(PHOTOS_PER_ROUND), Step::Ignored);
    }

    #[test]
    fn test_correct_order_scores() {
        let mut game = started();
        let order = game.correct_order();
        let mut step = Step::Ignored;
        for i in order {
            step = game.choose(i);
        }
        assert_eq!(step, Step::Wait { delay_ms: FEEDBACK_DELAY_MS });
        assert_eq!(game.correct_rounds(), 1);
        assert!(game.view().choices.iter().all(|c| c.mark == Mark::Correct));
        assert_eq!(game.choose(0), Step::Ignored);
    }

    #[test]
    fn test_wrong_orders_still_finish() {
        let mut game = started();
        for round in 0..ROUNDS {
            let mut order = game.correct_order();
            order.reverse();
            for i in order {
                game.choose(i);
            }
            let step = game.resume();
            if round + 1 < ROUNDS {
                assert_eq!(step, Step::Updated);
                assert!(game.placed.is_empty());
            } else {
                assert!(matches!(step, Step::Finished { .. }));
            }
        }
        assert_eq!(game.correct_rounds(), 0);

        // Last board stays up, scored and locked
        let view = game.view();
        assert_eq!(view.choices.len(), PHOTOS_PER_ROUND);
        assert!(view.choices.iter().all(|c| c.mark == Mark::Wrong));
        assert!(view.status.starts_with("Round 3/3"));
        assert_eq!(game.choose(0), Step::Ignored);
    }
}
