//! Trivia quiz about shared history. Every run finishes; the score only
//! changes the closing message.
//!
//! A run draws from the fixed questions plus a few built from the photo
//! collection (first year, years together, a moment, the photo count).

use rand::seq::{IndexedRandom, SliceRandom};
use rand_pcg::Pcg32;

use super::{
    Choice, GameView, Mark, MiniGame, Step, decoys, fork_rng, nearby_years, photo_years,
    shuffled_options,
};
use crate::catalog::GameId;
use crate::content::{PHOTOS, TRIVIA_QUESTIONS};

pub const FEEDBACK_DELAY_MS: u32 = 3500;
/// Questions asked per run
pub const QUESTIONS_PER_RUN: usize = 8;

#[derive(Debug, Clone)]
struct Question {
    text: String,
    options: Vec<String>,
    correct: usize,
    explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Asking,
    Feedback { chosen: usize },
    Done,
}

#[derive(Debug)]
pub struct TriviaQuiz {
    questions: Vec<Question>,
    current: usize,
    score: usize,
    phase: Phase,
}

impl Default for TriviaQuiz {
    fn default() -> Self {
        Self::new()
    }
}

impl Question {
    fn new(
        rng: &mut Pcg32,
        text: &str,
        answer: String,
        decoys: impl IntoIterator<Item = String>,
        explanation: String,
    ) -> Self {
        let (options, correct) = shuffled_options(rng, answer, decoys);
        Self {
            text: text.to_string(),
            options,
            correct,
            explanation,
        }
    }
}

/// Close neighbours of a count, never below one
fn count_decoys(count: usize) -> Vec<String> {
    [count.wrapping_sub(2), count.wrapping_sub(1), count + 1, count + 2]
        .into_iter()
        .filter(|n| (1..=count + 2).contains(n) && *n != count)
        .take(3)
        .map(|n| n.to_string())
        .collect()
}

/// Questions derived from the photo collection
fn photo_questions(rng: &mut Pcg32) -> Vec<Question> {
    let mut questions = Vec::new();

    if let Some((first, last)) = photo_years() {
        let near = nearby_years(rng, first, 3, 3);
        questions.push(Question::new(
            rng,
            "In which year did we first meet?",
            first.to_string(),
            near.into_iter().map(|y| y.to_string()),
            format!("Our beautiful journey began in {}! 💕", first),
        ));
        if last > first {
            let years = (last - first + 1) as usize;
            questions.push(Question::new(
                rng,
                "How many years have we been creating memories together?",
                years.to_string(),
                count_decoys(years),
                format!("We've been making beautiful memories for {} amazing years! ✨", years),
            ));
        }
    }

    questions.push(Question::new(
        rng,
        "Where did we take our first photo together?",
        "At home".to_string(),
        ["In a park", "At a restaurant", "On a trip"].map(String::from),
        "Our first captured moment was in the comfort of home! 🏠".to_string(),
    ));

    if let Some(moment) = PHOTOS.choose(rng).map(|p| p.moment) {
        let others = decoys(rng, PHOTOS.iter().map(|p| p.moment), moment, 3);
        if others.len() == 3 {
            questions.push(Question::new(
                rng,
                "Which of these was one of our special moments?",
                moment.to_string(),
                others.into_iter().map(String::from),
                format!("\"{}\" - such a precious memory! 💖", moment),
            ));
        }
    }

    let count = PHOTOS.len();
    questions.push(Question::new(
        rng,
        "How many photos do we have in our love story collection?",
        count.to_string(),
        count_decoys(count),
        format!("We have {} beautiful photos capturing our journey! 📸", count),
    ));

    questions
}

/// Fixed trivia plus photo questions, shuffled and cut to one run
fn build_questions(rng: &mut Pcg32) -> Vec<Question> {
    let mut questions: Vec<Question> = TRIVIA_QUESTIONS
        .iter()
        .map(|q| {
            let answer = q.options[q.correct];
            Question::new(
                rng,
                q.question,
                answer.to_string(),
                q.options
                    .iter()
                    .filter(|o| **o != answer)
                    .map(|o| o.to_string()),
                format!("The answer is \"{}\" 💕", answer),
            )
        })
        .collect();
    questions.extend(photo_questions(rng));
    questions.shuffle(rng);
    questions.truncate(QUESTIONS_PER_RUN);
    questions
}

fn closing_message(percentage: usize) -> &'static str {
    match percentage {
        90.. => "Outstanding! You're a true expert on our story! 💕",
        75.. => "Excellent! You know us so well! 😍",
        60.. => "Great job! You've been paying attention to our journey! 😊",
        40.. => "Not bad! There's still more to learn about our story! 💫",
        _ => "We have so many wonderful stories to share with you! 💝",
    }
}

impl TriviaQuiz {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            current: 0,
            score: 0,
            phase: Phase::Idle,
        }
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

impl MiniGame for TriviaQuiz {
    fn id(&self) -> GameId {
        GameId::TriviaQuiz
    }

    fn start(&mut self, rng: &mut Pcg32) {
        *self = Self::new();
        self.questions = build_questions(&mut fork_rng(rng));
        self.phase = Phase::Asking;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn view(&self) -> GameView {
        let Some(q) = self.questions.get(self.current) else {
            return GameView::default();
        };
        let chosen = match self.phase {
            Phase::Feedback { chosen } => Some(chosen),
            Phase::Asking => None,
            Phase::Idle | Phase::Done => return GameView::default(),
        };
        let choices = q
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let mark = match chosen {
                    None => Mark::Plain,
                    Some(_) if i == q.correct => Mark::Correct,
                    Some(c) if c == i => Mark::Wrong,
                    Some(_) => Mark::Disabled,
                };
                Choice::text(option.as_str()).marked(mark)
            })
            .collect();
        GameView {
            prompt: q.text.clone(),
            image: None,
            status: format!(
                "Question {}/{} · Score: {}",
                self.current + 1,
                self.questions.len(),
                self.score
            ),
            feedback: chosen.map(|c| {
                let verdict = if c == q.correct {
                    "🎉 Correct!"
                } else {
                    "💡 Good try!"
                };
                format!("{} {}", verdict, q.explanation)
            }),
            choices,
        }
    }

    fn choose(&mut self, index: usize) -> Step {
        if self.phase != Phase::Asking {
            return Step::Ignored;
        }
        let Some(q) = self.questions.get(self.current) else {
            return Step::Ignored;
        };
        if index >= q.options.len() {
            return Step::Ignored;
        }
        if index == q.correct {
            self.score += 1;
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
        if self.current < self.questions.len() {
            self.phase = Phase::Asking;
            return Step::Updated;
        }
        self.phase = Phase::Done;
        let total = self.questions.len().max(1);
        let percentage = self.score * 100 / total;
        Step::Finished {
            summary: format!(
                "You scored {}/{} ({}%)! {}",
                self.score,
                self.questions.len(),
                percentage,
                closing_message(percentage)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::games::testing::rng;

    fn texts(game: &TriviaQuiz) -> Vec<&str> {
        game.questions.iter().map(|q| q.text.as_str()).collect()
    }

    #[test]
    fn test_photo_questions_answer_from_collection() {
        let questions = photo_questions(&mut rng());
        let answer = |text: &str| {
            let q = questions.iter().find(|q| q.text == text).unwrap();
            q.options[q.correct].clone()
        };
        assert_eq!(answer("In which year did we first meet?"), "2018");
        assert_eq!(
            answer("How many years have we been creating memories together?"),
            "8"
        );
        assert_eq!(
            answer("How many photos do we have in our love story collection?"),
            PHOTOS.len().to_string()
        );
        let moment = answer("Which of these was one of our special moments?");
        assert!(PHOTOS.iter().any(|p| p.moment == moment));
        for q in &questions {
            let mut options = q.options.clone();
            options.sort();
            options.dedup();
            assert_eq!(options.len(), q.options.len(), "{}", q.text);
            assert!(q.options.len() >= 3, "{}", q.text);
        }
    }

    #[test]
    fn test_run_is_cut_to_question_limit() {
        let mut game = TriviaQuiz::new();
        game.start(&mut rng());
        assert_eq!(game.question_count(), QUESTIONS_PER_RUN);
        let mut unique = texts(&game);
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), QUESTIONS_PER_RUN);
    }

    #[test]
    fn test_seeds_change_order_and_answer_position() {
        let mut orders = Vec::new();
        let mut year_slots = Vec::new();
        for seed in 0..20 {
            let mut game = TriviaQuiz::new();
            game.start(&mut Pcg32::seed_from_u64(seed));
            orders.push(texts(&game).join("|"));
            let q = photo_questions(&mut Pcg32::seed_from_u64(seed))
                .into_iter()
                .find(|q| q.text == "In which year did we first meet?")
                .unwrap();
            assert_eq!(q.options[q.correct], "2018");
            year_slots.push(q.correct);
        }
        orders.sort();
        orders.dedup();
        assert!(orders.len() > 1);
        year_slots.sort();
        year_slots.dedup();
        assert!(year_slots.len() > 1, "answer always at {:?}", year_slots);
    }

    #[test]
    fn test_count_decoys_stay_positive() {
        assert_eq!(count_decoys(1), ["2", "3"]);
        assert_eq!(count_decoys(41), ["39", "40", "42"]);
    }

    #[test]
    fn test_all_wrong_still_finishes() {
        let mut game = TriviaQuiz::new();
        game.start(&mut rng());
        let total = game.question_count();
        for i in 0..total {
            let q = &game.questions[i];
            let wrong = (q.correct + 1) % q.options.len();
            assert!(matches!(game.choose(wrong), Step::Wait { .. }));
            let step = game.resume();
            if i + 1 < total {
                assert_eq!(step, Step::Updated);
            } else {
                match step {
                    Step::Finished { summary } => assert!(summary.contains("0/")),
                    other => panic!("expected finish, got {:?}", other),
                }
            }
        }
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_out_of_range_choice_ignored() {
        let mut game = TriviaQuiz::new();
        game.start(&mut rng());
        let options = game.questions[0].options.len();
        assert_eq!(game.choose(options), Step::Ignored);
        assert_eq!(game.resume(), Step::Ignored);
    }

    #[test]
    fn test_closing_message_bands() {
        assert!(closing_message(100).starts_with("Outstanding"));
        assert!(closing_message(60).starts_with("Great job"));
        assert!(closing_message(0).starts_with("We have"));
    }
}
