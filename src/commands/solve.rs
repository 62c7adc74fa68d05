//! Word solving command
//!
//! Plays the engine's strategy against a known secret and returns the
//! solution path.

use crate::core::Pattern;
use crate::session::Session;
use crate::solver::{CancelToken, Engine, GameState, SearchResult};

/// Configuration for solving a word
pub struct SolveConfig {
    pub target: String,
    pub max_guesses: usize,
    /// Deepest search tried for each guess
    pub max_depth: usize,
    pub verbose: bool,
}

impl SolveConfig {
    #[must_use]
    pub const fn new(target: String) -> Self {
        Self {
            target,
            max_guesses: 10,
            max_depth: 15,
            verbose: false,
        }
    }
}

/// Result of solving a word
pub struct SolveResult {
    pub success: bool,
    pub guesses: Vec<GuessStep>,
    pub target: String,
}

/// A single guess step in the solution
pub struct GuessStep {
    pub word: String,
    pub pattern: Pattern,
    pub candidates_before: usize,
    pub candidates_after: usize,
    /// Guesses the engine needs in the worst case from this position
    pub worst_case: i32,
    pub is_optimal: bool,
    /// Depth of the search that picked the guess
    pub depth: usize,
}

/// Solve a specific word from the session's current position
///
/// Each turn deepens the search until the engine proves its choice optimal
/// or runs out of depth, then plays the chosen guess against the target.
///
/// # Errors
///
/// Returns an error if:
/// - The target word is not one of the remaining secrets
/// - The engine cannot provide a valid guess
pub fn solve_word(
    session: &mut Session,
    config: SolveConfig,
    cancel: &CancelToken,
) -> Result<SolveResult, String> {
    let target = config.target.to_lowercase();
    let target_id = session
        .interner()
        .lookup(&target)
        .ok_or_else(|| format!("Invalid target word: {target} is not in the dictionary"))?;
    if !session.state().possible_secrets().contains(&target_id) {
        return Err(format!("Invalid target word: {target} is not a possible secret"));
    }

    let mut guesses: Vec<GuessStep> = Vec::new();

    for _ in 0..config.max_guesses {
        let candidates_before = session.state().possible_secrets().len();

        let (result, depth) = {
            let mut engine = session.engine(config.verbose);
            deepen(&mut engine, session.state(), config.max_depth, cancel)?
        };
        if result.best_guess.is_empty() {
            return Err("No valid guesses available".to_string());
        }
        let word = session.interner().text(result.best_guess).to_string();

        let pattern = session
            .make_guess_against(&word, &target)
            .map_err(|e| e.to_string())?;

        guesses.push(GuessStep {
            word,
            pattern,
            candidates_before,
            candidates_after: session.state().possible_secrets().len(),
            worst_case: result.num_guesses,
            is_optimal: result.is_optimal,
            depth,
        });

        if pattern.is_perfect() {
            return Ok(SolveResult {
                success: true,
                guesses,
                target,
            });
        }
    }

    Ok(SolveResult {
        success: false,
        guesses,
        target,
    })
}

/// Search ever deeper until the result is optimal
///
/// Cancellation stops deepening but always keeps the first search.
fn deepen(
    engine: &mut Engine<'_>,
    state: &GameState,
    max_depth: usize,
    cancel: &CancelToken,
) -> Result<(SearchResult, usize), String> {
    let mut depth = 1;
    loop {
        let result = engine
            .search(state, depth)
            .map_err(|e| format!("Search failed: {e}"))?;
        if result.is_optimal || depth >= max_depth || cancel.is_cancelled() {
            return Ok((result, depth));
        }
        depth += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::CacheConfig;

    const ILLS: [&str; 10] = [
        "bills", "fills", "gills", "hills", "kills", "mills", "pills", "sills", "tills", "wills",
    ];

    fn session(allowed: &[&str], secrets: &[&str]) -> Session {
        Session::load(allowed, secrets, false, CacheConfig::small()).unwrap()
    }

    #[test]
    fn solve_word_succeeds() {
        let mut session = session(&["abcde", "bacde", "cabde", "acbde"], &[]);
        let config = SolveConfig::new("cabde".to_string());

        let result = solve_word(&mut session, config, &CancelToken::new()).unwrap();
        assert!(result.success);
        assert!(result.guesses.len() <= 2);
        assert_eq!(result.guesses.last().unwrap().word, "cabde");
    }

    #[test]
    fn solve_records_history() {
        let mut allowed = ILLS.to_vec();
        allowed.push("fmpst");
        let mut session = session(&allowed, &ILLS);
        let config = SolveConfig::new("wills".to_string());

        let result = solve_word(&mut session, config, &CancelToken::new()).unwrap();
        assert!(result.success);
        assert_eq!(result.guesses[0].word, "fmpst");
        assert_eq!(result.guesses[0].worst_case, 7);

        for step in &result.guesses {
            assert!(step.candidates_after <= step.candidates_before);
        }
        assert_eq!(session.history_len(), result.guesses.len());
    }

    #[test]
    fn solve_invalid_target_returns_error() {
        let mut session = session(&ILLS, &ILLS[..5]);

        let cancel = CancelToken::new();
        let unknown = solve_word(&mut session, SolveConfig::new("zzzzz".to_string()), &cancel);
        assert!(unknown.is_err());

        let not_secret = solve_word(&mut session, SolveConfig::new("wills".to_string()), &cancel);
        assert!(not_secret.is_err());
    }

    #[test]
    fn solve_with_max_guesses_limit() {
        let mut session = session(&ILLS, &[]);
        let mut config = SolveConfig::new("wills".to_string());
        config.max_guesses = 3;

        let result = solve_word(&mut session, config, &CancelToken::new()).unwrap();
        assert!(result.guesses.len() <= 3);
        if !result.success {
            assert_eq!(result.guesses.len(), 3);
        }
    }

    #[test]
    fn solve_single_secret_in_one() {
        let mut session = session(&["crane", "slate", "trace"], &["slate"]);
        let config = SolveConfig::new("slate".to_string());
        let result = solve_word(&mut session, config, &CancelToken::new()).unwrap();

        assert!(result.success);
        assert_eq!(result.guesses.len(), 1);
        assert!(result.guesses[0].is_optimal);
        assert_eq!(result.guesses[0].depth, 1);
    }
}
