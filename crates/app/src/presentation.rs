use std::io::IsTerminal;

use services::{PresentationError, PresentationMode};

/// Exam mode for a terminal: only granted on an interactive stdout.
pub struct TerminalPresentation {
    allow_headless: bool,
    active: bool,
}

impl TerminalPresentation {
    pub fn new(allow_headless: bool) -> Self {
        Self {
            allow_headless,
            active: false,
        }
    }
}

impl PresentationMode for TerminalPresentation {
    fn acquire(&mut self) -> Result<(), PresentationError> {
        if !self.allow_headless && !std::io::stdout().is_terminal() {
            return Err(PresentationError::Unsupported);
        }
        if !self.active {
            println!("── exam mode on ──");
        }
        self.active = true;
        Ok(())
    }

    fn release(&mut self) -> Result<(), PresentationError> {
        if self.active {
            println!("── exam mode off ──");
        }
        self.active = false;
        Ok(())
    }
}
