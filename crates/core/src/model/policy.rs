use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PolicyError {
    #[error("maximum violations must be > 0")]
    ZeroMaxViolations,

    #[error("maximum start attempts must be > 0")]
    ZeroStartAttempts,
}

/// Proctoring and start-up rules applied to every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPolicy")]
pub struct SessionPolicy {
    max_violations: u32,
    max_start_attempts: u32,
}

#[derive(Deserialize)]
struct RawPolicy {
    #[serde(default = "default_max_violations")]
    max_violations: u32,
    #[serde(default = "default_max_start_attempts")]
    max_start_attempts: u32,
}

impl TryFrom<RawPolicy> for SessionPolicy {
    type Error = PolicyError;

    fn try_from(raw: RawPolicy) -> Result<Self, Self::Error> {
        Self::new(raw.max_violations, raw.max_start_attempts)
    }
}

fn default_max_violations() -> u32 {
    SessionPolicy::DEFAULT_MAX_VIOLATIONS
}

fn default_max_start_attempts() -> u32 {
    SessionPolicy::DEFAULT_MAX_START_ATTEMPTS
}

impl SessionPolicy {
    pub const DEFAULT_MAX_VIOLATIONS: u32 = 3;
    pub const DEFAULT_MAX_START_ATTEMPTS: u32 = 3;

    /// # Errors
    ///
    /// Returns `PolicyError` if either limit is zero.
    pub fn new(max_violations: u32, max_start_attempts: u32) -> Result<Self, PolicyError> {
        if max_violations == 0 {
            return Err(PolicyError::ZeroMaxViolations);
        }
        if max_start_attempts == 0 {
            return Err(PolicyError::ZeroStartAttempts);
        }
        Ok(Self {
            max_violations,
            max_start_attempts,
        })
    }

    /// Number of violations that terminates the attempt.
    #[must_use]
    pub fn max_violations(&self) -> u32 {
        self.max_violations
    }

    /// How many times acquiring presentation mode may fail before `start` gives up.
    #[must_use]
    pub fn max_start_attempts(&self) -> u32 {
        self.max_start_attempts
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            max_violations: Self::DEFAULT_MAX_VIOLATIONS,
            max_start_attempts: Self::DEFAULT_MAX_START_ATTEMPTS,
        }
    }
}
