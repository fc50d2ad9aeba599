//! Hidden messages: a love note is tucked somewhere in each of five photos.

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::{Choice, GameView, Mark, MiniGame, Step, fork_rng, pick_photos};
use crate::catalog::GameId;
use crate::content::{HIDDEN_MESSAGES, Photo};

pub const PHOTO_COUNT: usize = 5;
pub const REVEAL_DELAY_MS: u32 = 2000;

#[derive(Debug, Clone)]
struct Hideout {
    photo: &'static Photo,
    message: &'static str,
    /// Spot position in percent of the photo, kept 10-80% from each edge
    spot: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Searching,
    Revealed,
    Done,
}

#[derive(Debug)]
pub struct HiddenMessage {
    hideouts: Vec<Hideout>,
    current: usize,
    found: usize,
    phase: Phase,
}

impl Default for HiddenMessage {
    fn default() -> Self {
        Self::new()
    }
}

impl HiddenMessage {
    pub fn new() -> Self {
        Self {
            hideouts: Vec::new(),
            current: 0,
            found: 0,
            phase: Phase::Idle,
        }
    }

    pub fn found(&self) -> usize {
        self.found
    }
}

impl MiniGame for HiddenMessage {
    fn id(&self) -> GameId {
        GameId::HiddenMessage
    }

    fn start(&mut self, rng: &mut Pcg32) {
        let mut rng = fork_rng(rng);
        *self = Self::new();
        let photos = pick_photos(&mut rng, PHOTO_COUNT);
        let messages: Vec<&'static str> = HIDDEN_MESSAGES
            .choose_multiple(&mut rng, PHOTO_COUNT)
            .copied()
            .collect();
        self.hideouts = photos
            .into_iter()
            .zip(messages)
            .map(|(photo, message)| Hideout {
                photo,
                message,
                spot: (
                    rng.random_range(10.0..80.0),
                    rng.random_range(10.0..80.0),
                ),
            })
            .collect();
        self.phase = Phase::Searching;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn view(&self) -> GameView {
        if matches!(self.phase, Phase::Idle | Phase::Done) {
            return GameView::default();
        }
        let Some(hideout) = self.hideouts.get(self.current) else {
            return GameView::default();
        };
        let revealed = self.phase == Phase::Revealed;
        let (x, y) = hideout.spot;
        let spot = Choice::text("💌")
            .marked(if revealed { Mark::Done } else { Mark::Hidden })
            .at(x, y);
        GameView {
            prompt: format!("Search \"{}\" for a hidden message", hideout.photo.moment),
            image: Some(hideout.photo.src),
            status: format!("Messages found: {}/{}", self.found, self.hideouts.len()),
            feedback: revealed.then(|| {
                format!(
                    "💌 {} (hidden in \"{}\")",
                    hideout.message, hideout.photo.moment
                )
            }),
            choices: vec![spot],
        }
    }

    fn choose(&mut self, index: usize) -> Step {
        if self.phase != Phase::Searching || index != 0 {
            return Step::Ignored;
        }
        self.found += 1;
        self.phase = Phase::Revealed;
        Step::Wait {
            delay_ms: REVEAL_DELAY_MS,
        }
    }

    fn resume(&mut self) -> Step {
        if self.phase != Phase::Revealed {
            return Step::Ignored;
        }
        self.current += 1;
        if self.current < self.hideouts.len() {
            self.phase = Phase::Searching;
            return Step::Updated;
        }
        self.phase = Phase::Done;
        let collection: Vec<String> = self
            .hideouts
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{}. \"{}\" - {}", i + 1, h.message, h.photo.moment))
            .collect();
        Step::Finished {
            summary: format!(
                "You discovered all {} hidden messages!\n{}",
                self.found,
                collection.join("\n")
            ),
        }
    }
}
