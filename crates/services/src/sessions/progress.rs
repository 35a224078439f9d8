use std::fmt;

use super::controller::SessionState;

/// Aggregated view of an attempt, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub current: usize,
    pub total: usize,
    pub answered: usize,
    pub remaining_secs: u32,
    pub violations: u32,
    pub max_violations: u32,
    pub state: SessionState,
}

impl SessionProgress {
    /// Position through the quiz as a percentage, counting the current question.
    #[must_use]
    pub fn percent_through(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.current + 1) * 100 / self.total
    }

    #[must_use]
    pub fn timer(&self) -> TimerView {
        TimerView::from_secs(self.remaining_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUrgency {
    Normal,
    /// Five minutes or less.
    Low,
    /// One minute or less.
    Critical,
}

/// Countdown rendered as `MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerView {
    pub minutes: u32,
    pub seconds: u32,
    pub urgency: TimeUrgency,
}

impl TimerView {
    #[must_use]
    pub fn from_secs(remaining: u32) -> Self {
        let urgency = match remaining {
            0..=60 => TimeUrgency::Critical,
            61..=300 => TimeUrgency::Low,
            _ => TimeUrgency::Normal,
        };
        Self {
            minutes: remaining / 60,
            seconds: remaining % 60,
            urgency,
        }
    }
}

impl fmt::Display for TimerView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}
