mod ids;
mod outcome;
mod policy;
mod question;
mod quiz;
mod result;

pub use ids::{AttemptId, ParseIdError, QuestionId, QuizId, ResultId};

pub use outcome::Outcome;
pub use policy::{PolicyError, SessionPolicy};
pub use question::{Question, QuestionError};
pub use quiz::{Difficulty, Popularity, Quiz, QuizDraft, QuizError};
pub use result::{QuestionReview, QuizResult, ScoreBand};
