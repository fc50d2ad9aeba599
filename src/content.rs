//! Static game content: the photo collection and the text the games draw on.

/// One photo in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Photo {
    pub src: &'static str,
    /// ISO date (YYYY-MM-DD); lexicographic order is chronological order
    pub date: &'static str,
    pub moment: &'static str,
    pub emotion: &'static str,
}

const fn photo(
    src: &'static str,
    date: &'static str,
    moment: &'static str,
    emotion: &'static str,
) -> Photo {
    Photo {
        src,
        date,
        moment,
        emotion,
    }
}

pub const PHOTOS: &[Photo] = &[
    // 2018-2019
    photo("assets/photos/Screenshot_20181012-001213_Messenger.jpg", "2018-10-12", "First Messages", "Nervous"),
    photo("assets/photos/20190205_103221.jpg", "2019-02-05", "Early Days", "Excited"),
    photo("assets/photos/20190207_132906.jpg", "2019-02-07", "First Adventure", "Happy"),
    // 2020
    photo("assets/photos/20200308_150822.jpg", "2020-03-08", "Spring Together", "Peaceful"),
    photo("assets/photos/20200502_150640.jpg", "2020-05-02", "Quarantine Love", "Cozy"),
    photo("assets/photos/20200516_133559.jpg", "2020-05-16", "Nature Walk", "Adventurous"),
    photo("assets/photos/20200531_151333.jpg", "2020-05-31", "Weekend Fun", "Playful"),
    photo("assets/photos/20200614_152857.jpg", "2020-06-14", "Summer Vibes", "Joyful"),
    photo("assets/photos/20200728_164237.jpg", "2020-07-28", "Beach Day", "Relaxed"),
    photo("assets/photos/20200809_155240.jpg", "2020-08-09", "City Exploration", "Curious"),
    photo("assets/photos/20200809_164023.jpg", "2020-08-09", "Evening Walk", "Content"),
    photo("assets/photos/20200813_142756.jpg", "2020-08-13", "Romantic Dinner", "Romantic"),
    photo("assets/photos/20200903_171445.jpg", "2020-09-03", "September Joy", "Cheerful"),
    photo("assets/photos/20200904_185940.jpg", "2020-09-04", "Golden Hour", "Dreamy"),
    photo("assets/photos/20200912_155629.jpg", "2020-09-12", "Weekend Bliss", "Carefree"),
    photo("assets/photos/IMG-20201116-WA0020.jpg", "2020-11-16", "Candid Moment", "Natural"),
    photo("assets/photos/20201220_133225.jpg", "2020-12-20", "Holiday Magic", "Magical"),
    // 2021
    photo("assets/photos/20211016_142756.jpg", "2021-10-16", "Autumn Love", "Warm"),
    photo("assets/photos/20211217_135936.jpg", "2021-12-17", "Winter Together", "Intimate"),
    photo("assets/photos/20211224_225150.jpg", "2021-12-24", "Christmas Eve", "Festive"),
    // 2022
    photo("assets/photos/20220129_154103.jpg", "2022-01-29", "New Year Together", "Hopeful"),
    photo("assets/photos/20220921_183900.jpg", "2022-09-21", "Autumn Memories", "Nostalgic"),
    // 2023
    photo("assets/photos/20230217_140251.jpg", "2023-02-17", "Valentine's Special", "Loving"),
    photo("assets/photos/20231005_210616.jpg", "2023-10-05", "Evening Date", "Romantic"),
    photo("assets/photos/20231223_220128.jpg", "2023-12-23", "Holiday Spirit", "Joyful"),
    // 2024
    photo("assets/photos/20240531_094710.jpg", "2024-05-31", "Adventure Continues", "Excited"),
    photo("assets/photos/20240531_122749.jpg", "2024-05-31", "Same Day Magic", "Blissful"),
    photo("assets/photos/20241030_181747.jpg", "2024-10-30", "Recent Fun", "Happy"),
    // 2025
    photo("assets/photos/20250214_192530.jpg", "2025-02-14", "Valentine's 2025", "Passionate"),
    photo("assets/photos/20250425_181231.jpg", "2025-04-25", "Spring Adventures", "Energetic"),
    photo("assets/photos/PXL_20250819_143827778.jpg", "2025-08-19", "Summer Love", "Grateful"),
    photo("assets/photos/PXL_20250828_071558656.PORTRAIT.jpg", "2025-08-28", "Portrait Perfect", "Beautiful"),
    photo("assets/photos/PXL_20250911_065521786.jpg", "2025-09-11", "Morning Light", "Serene"),
    photo("assets/photos/PXL_20250912_110349029.jpg", "2025-09-12", "Recent Memories", "Cherished"),
    // Dates inferred
    photo("assets/photos/FACE_RC_1545220878374.jpg", "2018-12-19", "First Selfie", "Sweet"),
    photo("assets/photos/FACE_SC_1548767691867.jpg", "2019-01-29", "Silly Faces", "Playful"),
    photo("assets/photos/FWP030814173_1327.jpg", "2020-08-03", "Professional Shot", "Elegant"),
    photo("assets/photos/Duv long50.JPG", "2021-06-15", "Portrait Session", "Sophisticated"),
    photo("assets/photos/HAVA0453 (1).jpg", "2022-03-20", "Special Occasion", "Glamorous"),
    photo("assets/photos/HAVA0536 (1).jpg", "2022-03-20", "Same Event", "Radiant"),
    photo("assets/photos/rtc-snapshot-852595009696049486.jpg", "2023-05-10", "Video Call", "Connected"),
];

/// Shown when token `n` (1-based) is awarded; indexed by `n - 1`
pub const TOKEN_MESSAGES: &[&str] = &[
    "Remember our first messages? From that moment, I knew you were special! 💕",
    "The way you laugh at my terrible jokes still makes my heart skip a beat! 😍",
    "Thank you for being my adventure buddy through all of life's journeys! 🌟",
    "Your kindness and compassion inspire me every single day! ❤️",
    "I love how we can be completely silly together and it feels so natural! 🤪",
    "You make even the ordinary moments feel extraordinary! ✨",
    "Your strength and determination motivate me to be a better person! 💪",
    "To the most amazing person in my life: thank you for every memory! 🌸",
];

/// A multiple-choice trivia question
#[derive(Debug, Clone, Copy)]
pub struct TriviaQuestion {
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub correct: usize,
}

pub const TRIVIA_QUESTIONS: &[TriviaQuestion] = &[
    TriviaQuestion {
        question: "Where did we go on our first official date?",
        options: ["Coffee shop", "Restaurant", "Park", "Movies"],
        correct: 0,
    },
    TriviaQuestion {
        question: "What's my favorite thing about you?",
        options: ["Your smile", "Your laugh", "Your kindness", "Everything!"],
        correct: 3,
    },
    TriviaQuestion {
        question: "What was the first movie we watched together?",
        options: ["Romantic Comedy", "Action Movie", "Horror Film", "Disney Movie"],
        correct: 0,
    },
    TriviaQuestion {
        question: "What's our song?",
        options: ["Love Story", "Perfect", "All of Me", "A Thousand Years"],
        correct: 1,
    },
    TriviaQuestion {
        question: "What do I love most about our relationship?",
        options: [
            "We never fight",
            "We laugh together",
            "We grow together",
            "All of the above",
        ],
        correct: 3,
    },
];

pub const HIDDEN_MESSAGES: &[&str] = &[
    "You make every moment magical ✨",
    "Forever grateful for your love 💕",
    "You're my favorite adventure 🌟",
    "Home is wherever you are 🏠",
    "Every day with you is a gift 🎁",
    "You complete my heart 💝",
    "Together we can conquer anything 💪",
    "Your smile lights up my world 🌞",
    "You're my happily ever after 👑",
    "Love you to the moon and back 🌙",
    "You make ordinary moments extraordinary ✨",
    "My heart belongs to you forever 💖",
];

/// Something to spot in a photo
#[derive(Debug, Clone, Copy)]
pub struct ScavengerTask {
    pub question: &'static str,
    pub emoji: &'static str,
}

pub const SCAVENGER_TASKS: &[ScavengerTask] = &[
    ScavengerTask { question: "Find a genuine smile", emoji: "😊" },
    ScavengerTask { question: "Find hands holding something", emoji: "👋" },
    ScavengerTask { question: "Find something from nature", emoji: "🌸" },
    ScavengerTask { question: "Find food or drinks", emoji: "🍽️" },
    ScavengerTask { question: "Find an interesting background detail", emoji: "🏞️" },
    ScavengerTask { question: "Find a special piece of clothing or accessory", emoji: "👗" },
    ScavengerTask { question: "Find an expression of love or joy", emoji: "💕" },
    ScavengerTask { question: "Find someone doing an activity", emoji: "🎯" },
];

/// Mood labels offered by the mood-match game
pub const MOODS: &[&str] = &[
    "😊 Joy & Happiness",
    "💕 Love & Romance",
    "🎯 Adventure & Fun",
    "🌸 Peaceful & Calm",
    "🎉 Celebration",
];

/// Photo shown alongside token `n` (1-based)
pub fn token_photo(token: usize) -> &'static Photo {
    &PHOTOS[token.saturating_sub(1) % PHOTOS.len()]
}

/// Message shown alongside token `n` (1-based)
pub fn token_message(token: usize) -> &'static str {
    TOKEN_MESSAGES[token.saturating_sub(1) % TOKEN_MESSAGES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TOTAL_GAMES;

    #[test]
    fn test_one_message_per_token() {
        assert_eq!(TOKEN_MESSAGES.len(), TOTAL_GAMES);
        assert_eq!(token_message(1), TOKEN_MESSAGES[0]);
        assert_eq!(token_message(TOTAL_GAMES), TOKEN_MESSAGES[TOTAL_GAMES - 1]);
    }

    #[test]
    fn test_trivia_answers_in_range() {
        for q in TRIVIA_QUESTIONS {
            assert!(q.correct < q.options.len(), "{}", q.question);
        }
    }

    #[test]
    fn test_photo_dates_are_iso() {
        for p in PHOTOS {
            assert_eq!(p.date.len(), 10, "{}", p.src);
            assert_eq!(&p.date[4..5], "-");
        }
    }
}
