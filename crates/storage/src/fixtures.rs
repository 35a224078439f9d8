//! Built-in quiz catalog used by the app and tests.

use quiz_core::Error;
use quiz_core::model::{
    Difficulty, Popularity, Question, QuestionId, Quiz, QuizDraft, QuizId,
};

fn question(
    id: u64,
    prompt: &str,
    options: &[&str],
    correct: usize,
    explanation: &str,
) -> Result<Question, Error> {
    Ok(Question::new(
        QuestionId::new(id),
        prompt,
        options.iter().map(|o| (*o).to_string()).collect(),
        correct,
        Some(explanation.to_string()),
    )?)
}

struct Listing<'a> {
    id: u64,
    title: &'a str,
    description: &'a str,
    category: &'a str,
    difficulty: Difficulty,
    duration_minutes: u32,
    attempts: u32,
    rating: f32,
    tags: &'a [&'a str],
}

fn quiz(listing: &Listing<'_>, questions: Vec<Question>) -> Result<Quiz, Error> {
    let mut draft = QuizDraft::new(
        QuizId::new(listing.id),
        listing.title,
        listing.duration_minutes,
    );
    draft.description = listing.description.to_string();
    draft.category = listing.category.to_string();
    draft.difficulty = Some(listing.difficulty);
    draft.questions = questions;
    draft.tags = listing.tags.iter().map(|t| (*t).to_string()).collect();
    draft.popularity = Popularity {
        attempts: listing.attempts,
        rating: listing.rating,
    };
    Ok(draft.validate()?)
}

/// The six catalog quizzes, in id order.
///
/// # Errors
///
/// Returns `Error` if any fixture fails domain validation.
pub fn sample_catalog() -> Result<Vec<Quiz>, Error> {
    Ok(vec![
        world_history()?,
        advanced_physics()?,
        javascript_fundamentals()?,
        classical_composers()?,
        olympic_trivia()?,
        modern_art()?,
    ])
}

/// "World History Basics": five questions, fifteen minutes.
///
/// # Errors
///
/// Returns `Error` if the fixture fails validation.
pub fn world_history() -> Result<Quiz, Error> {
    quiz(
        &Listing {
            id: 1,
            title: "World History Basics",
            description: "Test your knowledge of major historical events and figures throughout world history.",
            category: "History",
            difficulty: Difficulty::Easy,
            duration_minutes: 15,
            attempts: 1250,
            rating: 4.5,
            tags: &["ancient", "modern", "civilizations"],
        },
        vec![
            question(
                1,
                "Which ancient wonder of the world was located in Alexandria?",
                &[
                    "The Hanging Gardens",
                    "The Lighthouse of Alexandria",
                    "The Colossus of Rhodes",
                    "The Temple of Artemis",
                ],
                1,
                "The Lighthouse of Alexandria was one of the Seven Wonders of the Ancient World and served as a landmark for sailors.",
            )?,
            question(
                2,
                "In which year did World War II end?",
                &["1944", "1945", "1946", "1947"],
                1,
                "World War II ended in 1945 with the surrender of Japan in September.",
            )?,
            question(
                3,
                "Who was the first person to walk on the moon?",
                &["Buzz Aldrin", "Neil Armstrong", "John Glenn", "Alan Shepard"],
                1,
                "Neil Armstrong was the first person to walk on the moon during the Apollo 11 mission on July 20, 1969.",
            )?,
            question(
                4,
                "Which empire was ruled by Julius Caesar?",
                &["Greek Empire", "Roman Empire", "Persian Empire", "Byzantine Empire"],
                1,
                "Julius Caesar was a Roman general and statesman who played a critical role in the Roman Republic.",
            )?,
            question(
                5,
                "The Berlin Wall fell in which year?",
                &["1987", "1988", "1989", "1990"],
                2,
                "The Berlin Wall fell on November 9, 1989, marking the beginning of German reunification.",
            )?,
        ],
    )
}

fn advanced_physics() -> Result<Quiz, Error> {
    quiz(
        &Listing {
            id: 2,
            title: "Advanced Physics",
            description: "Challenge yourself with complex physics problems covering mechanics, thermodynamics, and quantum theory.",
            category: "Science",
            difficulty: Difficulty::Hard,
            duration_minutes: 30,
            attempts: 890,
            rating: 4.8,
            tags: &["mechanics", "quantum", "thermodynamics"],
        },
        vec![
            question(
                1,
                "Which law states that entropy of an isolated system never decreases?",
                &["First law", "Second law", "Third law", "Zeroth law"],
                1,
                "The second law of thermodynamics forbids a spontaneous decrease of entropy.",
            )?,
            question(
                2,
                "What is the SI unit of momentum?",
                &["kg·m/s", "N/s", "J·s", "kg·m/s²"],
                0,
                "Momentum is mass times velocity, so its unit is kg·m/s.",
            )?,
            question(
                3,
                "Which principle limits simultaneous knowledge of position and momentum?",
                &["Pauli exclusion", "Superposition", "Uncertainty principle", "Correspondence"],
                2,
                "Heisenberg's uncertainty principle bounds the product of their uncertainties.",
            )?,
        ],
    )
}

fn javascript_fundamentals() -> Result<Quiz, Error> {
    quiz(
        &Listing {
            id: 3,
            title: "JavaScript Fundamentals",
            description: "Master the basics of JavaScript programming language including ES6+ features.",
            category: "Technology",
            difficulty: Difficulty::Medium,
            duration_minutes: 20,
            attempts: 2100,
            rating: 4.6,
            tags: &["programming", "web", "javascript"],
        },
        vec![
            question(
                1,
                "Which keyword declares a block-scoped constant?",
                &["var", "let", "const", "static"],
                2,
                "`const` declares a block-scoped binding that cannot be reassigned.",
            )?,
            question(
                2,
                "What does `typeof null` evaluate to?",
                &["\"null\"", "\"object\"", "\"undefined\"", "\"number\""],
                1,
                "A long-standing quirk: `typeof null` is \"object\".",
            )?,
        ],
    )
}

fn classical_composers() -> Result<Quiz, Error> {
    quiz(
        &Listing {
            id: 4,
            title: "Classical Music Composers",
            description: "Explore the world of classical composers and their most famous masterpieces.",
            category: "Music",
            difficulty: Difficulty::Medium,
            duration_minutes: 12,
            attempts: 650,
            rating: 4.3,
            tags: &["classical", "composers", "symphony"],
        },
        vec![
            question(
                1,
                "Who composed the 'Moonlight' Sonata?",
                &["Mozart", "Beethoven", "Chopin", "Bach"],
                1,
                "Beethoven's Piano Sonata No. 14 is known as the Moonlight Sonata.",
            )?,
            question(
                2,
                "How many symphonies did Beethoven complete?",
                &["Seven", "Nine", "Ten", "Twelve"],
                1,
                "Beethoven completed nine symphonies.",
            )?,
        ],
    )
}

fn olympic_trivia() -> Result<Quiz, Error> {
    quiz(
        &Listing {
            id: 5,
            title: "Olympic Sports Trivia",
            description: "Test your knowledge about Olympic games, sports history, and record holders.",
            category: "Sports",
            difficulty: Difficulty::Easy,
            duration_minutes: 10,
            attempts: 1800,
            rating: 4.4,
            tags: &["olympics", "sports", "records"],
        },
        vec![
            question(
                1,
                "Where were the first modern Olympic Games held?",
                &["Paris", "London", "Athens", "Rome"],
                2,
                "The first modern Olympics took place in Athens in 1896.",
            )?,
            question(
                2,
                "How many rings are on the Olympic flag?",
                &["Four", "Five", "Six", "Seven"],
                1,
                "The five rings represent the participating continents.",
            )?,
        ],
    )
}

fn modern_art() -> Result<Quiz, Error> {
    quiz(
        &Listing {
            id: 6,
            title: "Modern Art Movements",
            description: "Discover various art movements from impressionism to contemporary art.",
            category: "Arts & Culture",
            difficulty: Difficulty::Medium,
            duration_minutes: 18,
            attempts: 420,
            rating: 4.7,
            tags: &["art", "movements", "contemporary"],
        },
        vec![
            question(
                1,
                "Which artist co-founded Cubism with Georges Braque?",
                &["Salvador Dalí", "Pablo Picasso", "Claude Monet", "Andy Warhol"],
                1,
                "Picasso and Braque developed Cubism together around 1907.",
            )?,
            question(
                2,
                "Impressionism originated in which country?",
                &["Italy", "Spain", "France", "Netherlands"],
                2,
                "Impressionism emerged in 1860s Paris.",
            )?,
        ],
    )
}
