//! Guess the moment: each round shows a photo and asks for its year, the
//! moment it belongs to, or the emotion it carries.
//!
//! Two correct answers out of five pass; otherwise a fresh set of photos is
//! dealt and the player tries again.

use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::{
    Choice, GameView, Mark, MiniGame, Step, decoys, fork_rng, format_date, nearby_years,
    pick_photos, shuffled_options, year_of,
};
use crate::catalog::GameId;
use crate::content::{PHOTOS, Photo};

pub const ROUNDS: usize = 5;
pub const OPTIONS: usize = 4;
pub const PASS_MARK: usize = 2;
pub const FEEDBACK_DELAY_MS: u32 = 3000;

/// What a round asks about its photo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Year,
    Moment,
    Emotion,
}

impl Kind {
    const ALL: [Kind; 3] = [Kind::Year, Kind::Moment, Kind::Emotion];

    fn prompt(&self) -> &'static str {
        match self {
            Kind::Year => "When was this photo taken?",
            Kind::Moment => "What moment does this photo represent?",
            Kind::Emotion => "What emotion best describes this moment?",
        }
    }
}

#[derive(Debug, Clone)]
struct Round {
    photo: &'static Photo,
    kind: Kind,
    options: Vec<String>,
    correct: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Asking,
    Feedback { chosen: usize },
    Done,
}

#[derive(Debug)]
pub struct GuessMoment {
    rng: Option<Pcg32>,
    rounds: Vec<Round>,
    current: usize,
    correct_answers: usize,
    attempt: u32,
    phase: Phase,
}

impl Default for GuessMoment {
    fn default() -> Self {
        Self::new()
    }
}

fn build_round(rng: &mut Pcg32, photo: &'static Photo) -> Round {
    let kind = Kind::ALL.choose(rng).copied().unwrap_or(Kind::Year);
    let (answer, others): (String, Vec<String>) = match kind {
        Kind::Year => {
            let year = year_of(photo.date).unwrap_or_default();
            let near = nearby_years(rng, year, 3, OPTIONS - 1);
            (year.to_string(), near.iter().map(|y| y.to_string()).collect())
        }
        Kind::Moment => {
            let others = decoys(rng, PHOTOS.iter().map(|p| p.moment), photo.moment, OPTIONS - 1);
            (photo.moment.to_string(), others.into_iter().map(String::from).collect())
        }
        Kind::Emotion => {
            let others = decoys(rng, PHOTOS.iter().map(|p| p.emotion), photo.emotion, OPTIONS - 1);
            (photo.emotion.to_string(), others.into_iter().map(String::from).collect())
        }
    };
    let (options, correct) = shuffled_options(rng, answer, others);
    Round {
        photo,
        kind,
        options,
        correct,
    }
}

impl GuessMoment {
    pub fn new() -> Self {
        Self {
            rng: None,
            rounds: Vec::new(),
            current: 0,
            correct_answers: 0,
            attempt: 0,
            phase: Phase::Idle,
        }
    }

    pub fn correct_answers(&self) -> usize {
        self.correct_answers
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    fn deal(&mut self) {
        let Some(rng) = self.rng.as_mut() else {
            return;
        };
        self.rounds = pick_photos(rng, ROUNDS)
            .into_iter()
            .map(|photo| build_round(rng, photo))
            .collect();
        self.current = 0;
        self.correct_answers = 0;
        self.attempt += 1;
        self.phase = Phase::Asking;
    }
}

impl MiniGame for GuessMoment {
    fn id(&self) -> GameId {
        GameId::GuessMoment
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
        let Some(round) = self.rounds.get(self.current) else {
            return GameView::default();
        };
        if self.phase == Phase::Idle {
            return GameView::default();
        }
        let chosen = match self.phase {
            Phase::Feedback { chosen } => Some(chosen),
            _ => None,
        };
        let choices = round
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let mark = match chosen {
                    Some(_) if i == round.correct => Mark::Correct,
                    Some(c) if c == i => Mark::Wrong,
                    Some(_) => Mark::Disabled,
                    None => Mark::Plain,
                };
                Choice::text(option.as_str()).marked(mark)
            })
            .collect();
        let feedback = chosen.map(|c| {
            let verdict = if c == round.correct {
                "✅ Correct!"
            } else {
                "❌ Not quite..."
            };
            let detail = match round.kind {
                Kind::Year => format!(
                    "This beautiful moment was captured on {}.",
                    format_date(round.photo.date)
                ),
                Kind::Moment => format!(
                    "This photo captures our \"{}\" - such a special time! 💕",
                    round.photo.moment
                ),
                Kind::Emotion => format!(
                    "This moment was filled with {} feelings! 💝",
                    round.photo.emotion.to_lowercase()
                ),
            };
            format!("{} {}", verdict, detail)
        });
        let feedback = match (feedback, self.attempt > 1 && self.current == 0) {
            (None, true) => Some(format!(
                "Try again! You need at least {} correct answers to continue 💝",
                PASS_MARK
            )),
            (feedback, _) => feedback,
        };
        GameView {
            prompt: round.kind.prompt().to_string(),
            image: Some(round.photo.src),
            status: format!(
                "Question {}/{} · Score: {}",
                self.current + 1,
                ROUNDS,
                self.correct_answers
            ),
            feedback,
            choices,
        }
    }

    fn choose(&mut self, index: usize) -> Step {
        if self.phase != Phase::Asking {
            return Step::Ignored;
        }
        let Some(round) = self.rounds.get(self.current) else {
            return Step::Ignored;
        };
        if index >= round.options.len() {
            return Step::Ignored;
        }
        if index == round.correct {
            self.correct_answers += 1;
        }
        self.phase = Phase::Feedback { chosen: index };
        Step::Wait {
            delay_ms: FEEDBACK_DELAY_MS,
        }
    }

    fn resume(&mut self) -> Step {
        if !matches!(self.phase, Phase::Feedback { .. }) {
            return Step::Ignored;
        }
        self.current += 1;
        if self.current < self.rounds.len() {
            self.phase = Phase::Asking;
            return Step::Updated;
        }
        if self.correct_answers >= PASS_MARK {
            self.phase = Phase::Done;
            Step::Finished {
                summary: format!(
                    "You got {} out of {} moments right",
                    self.correct_answers, ROUNDS
                ),
            }
        } else {
            log::info!(
                "Guess the moment: {} correct, dealing attempt {}",
                self.correct_answers,
                self.attempt + 1
            );
            self.deal();
            Step::Updated
        }
    }
}
