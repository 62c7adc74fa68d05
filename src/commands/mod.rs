//! Command implementations

pub mod evaluate;
pub mod solve;
pub mod suggest;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use crate::solver::CancelToken;

pub use evaluate::{EvaluateConfig, EvaluateResult, evaluate_word, run_evaluate, write_snapshot};
pub use solve::{GuessStep, SolveConfig, SolveResult, solve_word};
pub use suggest::{
    SuggestCommand, SuggestConfig, Suggestions, parse_command, run_suggest, think, think_with,
};

/// A token that cancels itself once `limit` has passed
///
/// Without a limit the token is only cancelled by its holders.
#[must_use]
pub fn deadline_token(limit: Option<Duration>) -> CancelToken {
    let token = CancelToken::new();
    if let Some(limit) = limit {
        let deadline = token.clone();
        thread::spawn(move || {
            thread::sleep(limit);
            deadline.cancel();
        });
    }
    token
}

/// Routes Ctrl-C to whichever search is currently running
///
/// Each search arms a fresh token; an interrupt cancels it so the search
/// stops early and keeps what it finished. With nothing armed, or on a
/// second interrupt of the same search, the process exits.
#[derive(Debug, Clone, Default)]
pub struct Interrupter {
    current: Arc<Mutex<Option<CancelToken>>>,
}

impl Interrupter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the process-wide Ctrl-C handler
    ///
    /// # Errors
    /// Returns an error if a handler is already installed or the signal
    /// cannot be hooked.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let interrupter = self.clone();
        ctrlc::set_handler(move || {
            if !interrupter.interrupt() {
                std::process::exit(130);
            }
        })
    }

    /// Start a search: a token cancelled by an interrupt or after `limit`
    #[must_use]
    pub fn arm(&self, limit: Option<Duration>) -> CancelToken {
        let token = deadline_token(limit);
        *self.slot() = Some(token.clone());
        token
    }

    /// End the current search
    pub fn disarm(&self) {
        *self.slot() = None;
    }

    /// Cancel the armed search; false if none is running or it was
    /// already cancelled
    #[must_use]
    pub fn interrupt(&self) -> bool {
        match self.slot().as_ref() {
            Some(token) if !token.is_cancelled() => {
                token.cancel();
                true
            }
            _ => false,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<CancelToken>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
