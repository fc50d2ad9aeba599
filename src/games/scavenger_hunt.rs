//! Photo scavenger hunt: five "find a ..." tasks, one photo each.
//!
//! A task has three to five hotspots. Only the first is the real find, but
//! any hotspot counts; a miss just gets a gentler message.

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::{Choice, GameView, Mark, MiniGame, Step, fork_rng, pick_photos};
use crate::catalog::GameId;
use crate::content::{Photo, SCAVENGER_TASKS, ScavengerTask};

pub const TASKS: usize = 5;
pub const FEEDBACK_DELAY_MS: u32 = 1500;
const MIN_HOTSPOTS: usize = 3;
const MAX_HOTSPOTS: usize = 5;

#[derive(Debug, Clone)]
struct Hunt {
    task: &'static ScavengerTask,
    photo: &'static Photo,
    /// Percent positions; index 0 is the real find
    hotspots: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Searching,
    Feedback { clicked: usize },
    Done,
}

#[derive(Debug)]
pub struct ScavengerHunt {
    hunts: Vec<Hunt>,
    current: usize,
    found: usize,
    phase: Phase,
}

impl Default for ScavengerHunt {
    fn default() -> Self {
        Self::new()
    }
}

impl ScavengerHunt {
    pub fn new() -> Self {
        Self {
            hunts: Vec::new(),
            current: 0,
            found: 0,
            phase: Phase::Idle,
        }
    }

    pub fn found(&self) -> usize {
        self.found
    }
}

impl MiniGame for ScavengerHunt {
    fn id(&self) -> GameId {
        GameId::ScavengerHunt
    }

    fn start(&mut self, rng: &mut Pcg32) {
        let mut rng = fork_rng(rng);
        *self = Self::new();
        let tasks: Vec<&'static ScavengerTask> =
            SCAVENGER_TASKS.choose_multiple(&mut rng, TASKS).collect();
        let photos = pick_photos(&mut rng, TASKS);
        self.hunts = tasks
            .into_iter()
            .zip(photos)
            .map(|(task, photo)| {
                let count = rng.random_range(MIN_HOTSPOTS..=MAX_HOTSPOTS);
                let hotspots = (0..count)
                    .map(|_| (rng.random_range(10.0..90.0), rng.random_range(10.0..90.0)))
                    .collect();
                Hunt {
                    task,
                    photo,
                    hotspots,
                }
            })
            .collect();
        self.phase = Phase::Searching;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn view(&self) -> GameView {
        let clicked = match self.phase {
            Phase::Searching => None,
            Phase::Feedback { clicked } => Some(clicked),
            Phase::Idle | Phase::Done => return GameView::default(),
        };
        let Some(hunt) = self.hunts.get(self.current) else {
            return GameView::default();
        };
        let choices = hunt
            .hotspots
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let mark = match clicked {
                    None => Mark::Hidden,
                    Some(c) if c == i && i == 0 => Mark::Correct,
                    Some(c) if c == i => Mark::Wrong,
                    Some(_) => Mark::Disabled,
                };
                Choice::text("🔍").marked(mark).at(x, y)
            })
            .collect();
        let feedback = clicked.map(|c| {
            if c == 0 {
                format!(
                    "Great find! {} You found \"{}\" in \"{}\"!",
                    hunt.task.emoji, hunt.task.question, hunt.photo.moment
                )
            } else {
                format!(
                    "Nice try! {} You're exploring the photo like a true detective! ✨",
                    hunt.task.emoji
                )
            }
        });
        GameView {
            prompt: format!("{} {}", hunt.task.emoji, hunt.task.question),
            image: Some(hunt.photo.src),
            status: format!("Found: {}/{}", self.found, self.hunts.len()),
            feedback,
            choices,
        }
    }

    fn choose(&mut self, index: usize) -> Step {
        if self.phase != Phase::Searching {
            return Step::Ignored;
        }
        let Some(hunt) = self.hunts.get(self.current) else {
            return Step::Ignored;
        };
        if index >= hunt.hotspots.len() {
            return Step::Ignored;
        }
        self.found += 1;
        self.phase = Phase::Feedback { clicked: index };
        Step::Wait {
            delay_ms: FEEDBACK_DELAY_MS,
        }
    }

    fn resume(&mut self) -> Step {
        if !matches!(self.phase, Phase::Feedback { .. }) {
            return Step::Ignored;
        }
        self.current += 1;
        if self.current < self.hunts.len() {
            self.phase = Phase::Searching;
            return Step::Updated;
        }
        self.phase = Phase::Done;
        let discoveries: Vec<String> = self
            .hunts
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{}. {} {} in \"{}\"", i + 1, h.task.emoji, h.task.question, h.photo.moment))
            .collect();
        Step::Finished {
            summary: format!(
                "You found all {} items!\n{}",
                self.found,
                discoveries.join("\n")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::rng;

    fn started() -> ScavengerHunt {
        let mut game = ScavengerHunt::new();
        game.start(&mut rng());
        game
    }

    #[test]
    fn test_tasks_distinct_with_hotspot_range() {
        let game = started();
        assert_eq!(game.hunts.len(), TASKS);
        for (i, hunt) in game.hunts.iter().enumerate() {
            assert!((MIN_HOTSPOTS..=MAX_HOTSPOTS).contains(&hunt.hotspots.len()));
            for other in &game.hunts[i + 1..] {
                assert_ne!(hunt.task.question, other.task.question);
            }
        }
    }

    #[test]
    fn test_decoy_hotspot_still_counts() {
        let mut game = started();
        assert_eq!(game.choose(1), Step::Wait { delay_ms: FEEDBACK_DELAY_MS });
        assert_eq!(game.found(), 1);
        let view = game.view();
        assert_eq!(view.choices[1].mark, Mark::Wrong);
        assert!(view.feedback.unwrap().starts_with("Nice try!"));
        assert_eq!(game.choose(0), Step::Ignored);
    }

    #[test]
    fn test_every_task_found_finishes() {
        let mut game = started();
        let mut step = Step::Ignored;
        for i in 0..TASKS {
            game.choose(i % MIN_HOTSPOTS);
            step = game.resume();
        }
        assert!(matches!(step, Step::Finished { .. }));
        assert_eq!(game.found(), TASKS);
        assert!(game.view().choices.is_empty());
    }
}
