//! Cooperative cancellation shared between workers

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag telling long-running work to stop starting new steps
///
/// Clones share the same flag. Workers only read it, at the boundaries
/// between top-level candidates and between search depths; work already in
/// progress runs to completion and keeps its result.
///
/// # Examples
/// ```
/// use wordle_minimax::solver::CancelToken;
///
/// let token = CancelToken::new();
/// let worker = token.clone();
/// assert!(!worker.is_cancelled());
///
/// token.cancel();
/// assert!(worker.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_visible_across_threads() {
        let token = CancelToken::new();
        let worker = token.clone();

        let handle = std::thread::spawn(move || {
            while !worker.is_cancelled() {
                std::thread::yield_now();
            }
            true
        });

        token.cancel();
        assert!(handle.join().unwrap());
    }

    #[test]
    fn independent_tokens_do_not_interfere() {
        let a = CancelToken::new();
        let b = CancelToken::new();
        a.cancel();

        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
    }
}
