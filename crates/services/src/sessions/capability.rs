use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PresentationError {
    #[error("presentation mode request was denied: {0}")]
    Denied(String),
    #[error("presentation mode is not supported by this host")]
    Unsupported,
}

/// Host capability granting exclusive presentation (fullscreen) mode.
///
/// The controller calls `acquire` on start and when the user returns to the
/// exam after a warning, and `release` exactly once when the attempt ends.
pub trait PresentationMode: Send {
    /// Request exclusive presentation mode.
    ///
    /// # Errors
    ///
    /// Returns `PresentationError` if the host refuses or cannot comply.
    fn acquire(&mut self) -> Result<(), PresentationError>;

    /// Leave exclusive presentation mode.
    ///
    /// # Errors
    ///
    /// Returns `PresentationError` if the host fails to leave the mode.
    fn release(&mut self) -> Result<(), PresentationError>;
}

/// Discrete proctoring events emitted by the host.
///
/// Detection is the host's business; the controller only counts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProctoringSignal {
    FocusLost,
    PresentationModeLost,
    RestrictedInput,
}

impl ProctoringSignal {
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            ProctoringSignal::FocusLost => "Switched tabs or minimized window",
            ProctoringSignal::PresentationModeLost => "Exited fullscreen mode",
            ProctoringSignal::RestrictedInput => "Attempted to use developer tools",
        }
    }
}

impl fmt::Display for ProctoringSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}
