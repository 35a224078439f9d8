use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an attempt ended. Every variant is a normal terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    UserSubmitted,
    TimeExpired,
    ProctoringViolation,
    UserAborted,
}

impl Outcome {
    /// Aborted attempts are discarded without scoring.
    #[must_use]
    pub fn is_scored(self) -> bool {
        !matches!(self, Outcome::UserAborted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::UserSubmitted => "submitted",
            Outcome::TimeExpired => "time expired",
            Outcome::ProctoringViolation => "terminated for malpractice",
            Outcome::UserAborted => "aborted",
        };
        f.write_str(label)
    }
}
