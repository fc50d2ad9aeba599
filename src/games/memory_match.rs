//! Memory match: flip two cards at a time to find the six photo pairs.

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::{Choice, GameView, Mark, MiniGame, Step, pick_photos};
use crate::catalog::GameId;
use crate::content::Photo;

pub const PAIRS: usize = 6;
/// How long a non-matching pair stays face up
pub const CHECK_DELAY_MS: u32 = 1000;
pub const FINISH_DELAY_MS: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Playing,
    Checking,
    Finishing,
    Done,
}

#[derive(Debug, Clone)]
struct Card {
    photo: &'static Photo,
    face_up: bool,
    matched: bool,
}

#[derive(Debug)]
pub struct MemoryMatch {
    cards: Vec<Card>,
    flipped: Vec<usize>,
    matches: usize,
    moves: u32,
    phase: Phase,
}

impl Default for MemoryMatch {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryMatch {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            flipped: Vec::with_capacity(2),
            matches: 0,
            moves: 0,
            phase: Phase::Idle,
        }
    }

    pub fn matches(&self) -> usize {
        self.matches
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    fn check_pair(&mut self) -> Step {
        if let [a, b] = self.flipped[..] {
            if self.cards[a].photo.src == self.cards[b].photo.src {
                self.cards[a].matched = true;
                self.cards[b].matched = true;
                self.matches += 1;
            } else {
                self.cards[a].face_up = false;
                self.cards[b].face_up = false;
            }
        }
        self.flipped.clear();

        if self.matches == PAIRS {
            self.phase = Phase::Finishing;
            Step::Wait {
                delay_ms: FINISH_DELAY_MS,
            }
        } else {
            self.phase = Phase::Playing;
            Step::Updated
        }
    }
}

impl MiniGame for MemoryMatch {
    fn id(&self) -> GameId {
        GameId::MemoryMatch
    }

    fn start(&mut self, rng: &mut Pcg32) {
        let photos = pick_photos(rng, PAIRS);
        self.cards = photos
            .iter()
            .chain(photos.iter())
            .map(|&photo| Card {
                photo,
                face_up: false,
                matched: false,
            })
            .collect();
        self.cards.shuffle(rng);
        self.flipped.clear();
        self.matches = 0;
        self.moves = 0;
        self.phase = Phase::Playing;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn view(&self) -> GameView {
        if self.phase == Phase::Idle {
            return GameView::default();
        }
        let choices = self
            .cards
            .iter()
            .map(|card| {
                if card.matched {
                    Choice::photo(card.photo, card.photo.moment).marked(Mark::Done)
                } else if card.face_up {
                    Choice::photo(card.photo, card.photo.moment).marked(Mark::Selected)
                } else {
                    Choice::text("💕").marked(Mark::Hidden)
                }
            })
            .collect();
        GameView {
            prompt: "Find the matching pairs of our memories".to_string(),
            image: None,
            status: format!("Matches: {}/{} · Moves: {}", self.matches, PAIRS, self.moves),
            feedback: (self.phase == Phase::Done || self.phase == Phase::Finishing)
                .then(|| "Every pair found! 💕".to_string()),
            choices,
        }
    }

    fn choose(&mut self, index: usize) -> Step {
        if self.phase != Phase::Playing {
            return Step::Ignored;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return Step::Ignored;
        };
        if card.face_up || card.matched {
            return Step::Ignored;
        }
        card.face_up = true;
        self.flipped.push(index);

        if self.flipped.len() == 2 {
            self.moves += 1;
            self.phase = Phase::Checking;
            Step::Wait {
                delay_ms: CHECK_DELAY_MS,
            }
        } else {
            Step::Updated
        }
    }

    fn resume(&mut self) -> Step {
        match self.phase {
            Phase::Checking => self.check_pair(),
            Phase::Finishing => {
                self.phase = Phase::Done;
                Step::Finished {
                    summary: format!("All {} pairs found in {} moves", PAIRS, self.moves),
                }
            }
            _ => Step::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::{rng, settle};

    fn started() -> MemoryMatch {
        let mut game = MemoryMatch::new();
        game.start(&mut rng());
        game
    }

    /// Index of the other card showing the same photo
    fn partner(game: &MemoryMatch, index: usize) -> usize {
        let src = game.cards[index].photo.src;
        (0..game.cards.len())
            .find(|&j| j != index && game.cards[j].photo.src == src)
            .unwrap()
    }

    #[test]
    fn test_deck_has_every_photo_twice() {
        let game = started();
        assert_eq!(game.cards.len(), PAIRS * 2);
        for i in 0..game.cards.len() {
            partner(&game, i);
        }
    }

    #[test]
    fn test_mismatch_flips_back() {
        let mut game = started();
        let a = 0;
        let b = (1..game.cards.len()).find(|&j| j != partner(&game, a)).unwrap();

        assert_eq!(game.choose(a), Step::Updated);
        assert_eq!(game.choose(b), Step::Wait { delay_ms: CHECK_DELAY_MS });
        // Locked while the pair is showing
        assert_eq!(game.choose(partner(&game, a)), Step::Ignored);

        assert_eq!(game.resume(), Step::Updated);
        assert!(!game.cards[a].face_up && !game.cards[b].face_up);
        assert_eq!(game.matches(), 0);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let mut game = started();
        game.choose(3);
        assert_eq!(game.choose(3), Step::Ignored);
        assert_eq!(game.choose(99), Step::Ignored);
    }

    #[test]
    fn test_clearing_board_finishes() {
        let mut game = started();
        let mut step = Step::Ignored;
        for i in 0..game.cards.len() {
            if game.cards[i].matched {
                continue;
            }
            let j = partner(&game, i);
            game.choose(i);
            step = game.choose(j);
            step = settle(&mut game, step);
            if matches!(step, Step::Finished { .. }) {
                break;
            }
        }
        assert!(matches!(step, Step::Finished { .. }));
        assert_eq!(game.matches(), PAIRS);
        assert_eq!(game.moves(), PAIRS as u32);
        assert_eq!(game.choose(0), Step::Ignored);
    }

    #[test]
    fn test_hidden_cards_do_not_leak_photos() {
        let game = started();
        let view = game.view();
        assert!(view.choices.iter().all(|c| c.image.is_none() && c.mark == Mark::Hidden));
    }
}
