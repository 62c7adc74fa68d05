//! A dictionary session: interned words, pattern table, caches and game
//!
//! Everything derived from a dictionary lives here and is replaced together,
//! so ids from one dictionary can never meet a table or cache built for
//! another.

use crate::core::{Interner, MatchTable, Pattern, PatternError, Word, WordError, WordId};
use crate::solver::{
    CacheConfig, CachePair, Engine, EngineError, GameState, Simulator, StateError, WordInfo,
};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

/// First guesses kept in flight by `compute_next_suggestion`
const THINKING_WORDS: usize = 100;

/// Deepest search `compute_next_suggestion` tries for one word
const MAX_THINKING_DEPTH: usize = 16;

/// At or below this many secrets, guesses that may win go first
const SECRETS_FIRST_THRESHOLD: usize = 20;

/// Error type for session operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Word(WordError),
    Pattern(PatternError),
    UnknownWord(String),
    GuessNotAllowed(String),
    SecretNotAllowed(String),
    NoRemainingSecrets,
    Engine(EngineError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(e) => write!(f, "{e}"),
            Self::Pattern(e) => write!(f, "{e}"),
            Self::UnknownWord(w) => write!(f, "The word {w} is not in the dictionary"),
            Self::GuessNotAllowed(w) => write!(f, "The word {w} is not an allowed guess"),
            Self::SecretNotAllowed(w) => {
                write!(f, "Secret missing from set of allowed guesses: {w}")
            }
            Self::NoRemainingSecrets => {
                write!(f, "There would be no remaining secrets with this guess")
            }
            Self::Engine(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Word(e) => Some(e),
            Self::Pattern(e) => Some(e),
            Self::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WordError> for SessionError {
    fn from(e: WordError) -> Self {
        Self::Word(e)
    }
}

impl From<PatternError> for SessionError {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}

impl From<EngineError> for SessionError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

/// A first guess being simulated at increasing depth
#[derive(Debug, Clone, Copy)]
struct ThinkingWord {
    word: WordId,
    max_depth: usize,
    best_avg_guess: f64,
}

// Max-heap order: the lowest average so far comes out first
impl Ord for ThinkingWord {
    fn cmp(&self, other: &Self) -> Ordering {
        other.best_avg_guess.total_cmp(&self.best_avg_guess)
    }
}

impl PartialOrd for ThinkingWord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ThinkingWord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ThinkingWord {}

#[derive(Debug, Default)]
struct Thinking {
    queue: BinaryHeap<ThinkingWord>,
    next_word: usize,
    added_last: bool,
}

/// One loaded dictionary and the game played on it
pub struct Session {
    interner: Interner,
    table: MatchTable,
    caches: CachePair,
    cache_config: CacheConfig,
    state: GameState,
    history: Vec<GameState>,
    thinking: Thinking,
}

impl Session {
    /// Intern a dictionary and build everything the search needs
    ///
    /// An empty secret list means every allowed guess may be the secret.
    ///
    /// # Errors
    /// Returns `SessionError::Word` for a malformed word and
    /// `SessionError::SecretNotAllowed` for a secret that is not an allowed
    /// guess.
    ///
    /// # Examples
    /// ```
    /// use wordle_minimax::session::Session;
    /// use wordle_minimax::solver::CacheConfig;
    ///
    /// let words = ["crane", "crate", "grate"];
    /// let mut session = Session::load(&words, &[], false, CacheConfig::small()).unwrap();
    /// session.make_guess_against("crane", "grate").unwrap();
    /// assert_eq!(session.state().possible_secrets().len(), 1);
    /// ```
    pub fn load<S: AsRef<str>>(
        allowed_guesses: &[S],
        possible_secrets: &[S],
        hard_mode: bool,
        cache_config: CacheConfig,
    ) -> Result<Self, SessionError> {
        let mut interner = Interner::new();
        let allowed = interner.intern_all(allowed_guesses)?;
        let secrets = interner.intern_all(possible_secrets)?;

        let state = GameState::new(allowed, secrets, hard_mode);
        if let Err(StateError::SecretNotAllowed(id)) = state.validate() {
            return Err(SessionError::SecretNotAllowed(interner.text(id).to_string()));
        }

        let table = MatchTable::build(&interner);
        let caches = CachePair::new(cache_config, interner.max_id());
        let mut session = Self {
            interner,
            table,
            caches,
            cache_config,
            state,
            history: Vec::new(),
            thinking: Thinking::default(),
        };
        session.sort_guesses();
        Ok(session)
    }

    /// Replace the dictionary, invalidating every id, table and cache entry
    ///
    /// On error the session is left as it was.
    ///
    /// # Errors
    /// Same as `Session::load`.
    pub fn reset<S: AsRef<str>>(
        &mut self,
        allowed_guesses: &[S],
        possible_secrets: &[S],
        hard_mode: bool,
    ) -> Result<(), SessionError> {
        *self = Self::load(allowed_guesses, possible_secrets, hard_mode, self.cache_config)?;
        Ok(())
    }

    /// Apply feedback received for a guess
    ///
    /// # Errors
    /// Returns `SessionError::UnknownWord`, `SessionError::GuessNotAllowed`
    /// or `SessionError::NoRemainingSecrets`; the game is unchanged on error.
    pub fn make_guess(&mut self, guess: &str, pattern: Pattern) -> Result<(), SessionError> {
        let id = self
            .interner
            .lookup(guess)
            .ok_or_else(|| SessionError::UnknownWord(guess.to_lowercase()))?;

        let previous = self.state.clone();
        self.state
            .make_guess(&self.table, id, pattern)
            .map_err(|e| match e {
                StateError::GuessNotAllowed(_) => {
                    SessionError::GuessNotAllowed(guess.to_lowercase())
                }
                StateError::SecretNotAllowed(w) => {
                    SessionError::SecretNotAllowed(self.interner.text(w).to_string())
                }
                StateError::NoRemainingSecrets => SessionError::NoRemainingSecrets,
            })?;

        self.history.push(previous);
        self.sort_guesses();
        self.reset_thinking();
        Ok(())
    }

    /// Apply the feedback `guess` would receive against a known secret
    ///
    /// # Errors
    /// Returns `SessionError::Word` if either word is malformed, otherwise as
    /// `make_guess`.
    pub fn make_guess_against(
        &mut self,
        guess: &str,
        secret: &str,
    ) -> Result<Pattern, SessionError> {
        let pattern = Pattern::calculate(&Word::new(guess)?, &Word::new(secret)?);
        self.make_guess(guess, pattern)?;
        Ok(pattern)
    }

    /// Undo the last guess; false when there is nothing to undo
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                self.reset_thinking();
                true
            }
            None => false,
        }
    }

    /// Simulate one more step of the background evaluation
    ///
    /// Up to a hundred first guesses are in flight at once, each deepened
    /// until its strategy is proven or the depth limit is reached. The word
    /// with the lowest average so far is advanced first. Returns `None` once
    /// every allowed guess is settled.
    ///
    /// # Errors
    /// Propagates simulation failures.
    pub fn compute_next_suggestion(&mut self) -> Result<Option<WordInfo>, SessionError> {
        let thinking = &mut self.thinking;
        let allowed = self.state.allowed_guesses();

        if thinking.queue.len() < THINKING_WORDS
            && thinking.next_word < allowed.len()
            && (!thinking.added_last || thinking.queue.is_empty())
        {
            thinking.queue.push(ThinkingWord {
                word: allowed[thinking.next_word],
                max_depth: 1,
                best_avg_guess: 0.0,
            });
            thinking.next_word += 1;
            thinking.added_last = true;
        } else {
            thinking.added_last = false;
        }

        let Some(mut word) = thinking.queue.pop() else {
            return Ok(None);
        };

        let mut engine = Engine::new(&self.interner, &self.table, &self.caches, false);
        let info = Simulator::new(&mut engine).simulate(&self.state, word.word, word.max_depth)?;

        if !info.can_stop && word.max_depth < MAX_THINKING_DEPTH {
            word.max_depth += 1;
            word.best_avg_guess = word.best_avg_guess.max(info.avg_guesses);
            thinking.queue.push(word);
        }
        Ok(Some(info))
    }

    /// A search engine over this session's table and caches
    #[must_use]
    pub const fn engine(&self, verbose: bool) -> Engine<'_> {
        Engine::new(&self.interner, &self.table, &self.caches, verbose)
    }

    /// Fingerprint of the current game, for naming stored results
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.state.fingerprint(&self.interner)
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn interner(&self) -> &Interner {
        &self.interner
    }

    #[must_use]
    pub const fn table(&self) -> &MatchTable {
        &self.table
    }

    #[must_use]
    pub const fn caches(&self) -> &CachePair {
        &self.caches
    }

    /// Guesses that can be undone
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn sort_guesses(&mut self) {
        let secrets_first = self.state.possible_secrets().len() <= SECRETS_FIRST_THRESHOLD;
        self.state.sort_guesses_by_greedy(&self.table, secrets_first);
    }

    fn reset_thinking(&mut self) {
        self.thinking.queue.clear();
        self.thinking.next_word = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    fn session(words: &[&str]) -> Session {
        Session::load(words, &NONE, false, CacheConfig::small()).unwrap()
    }

    #[test]
    fn load_rejects_malformed_word() {
        let result = Session::load(&["crane", "abc"], &NONE, false, CacheConfig::small());
        assert!(matches!(
            result,
            Err(SessionError::Word(WordError::InvalidLength(3)))
        ));
    }

    #[test]
    fn load_rejects_unguessable_secret() {
        let result = Session::load(&["crane", "slate"], &["trace"], false, CacheConfig::small());
        assert!(matches!(result, Err(SessionError::SecretNotAllowed(w)) if w == "trace"));
    }

    #[test]
    fn load_sorts_guesses_best_first() {
        let s = Session::load(
            &["bills", "fills", "mills", "pills", "sills", "fmpst"],
            &["bills", "fills", "mills", "pills", "sills"],
            false,
            CacheConfig::small(),
        )
        .unwrap();

        // Few secrets left, so possible winners come first
        let last = *s.state().allowed_guesses().last().unwrap();
        assert_eq!(s.interner().text(last), "fmpst");
    }

    #[test]
    fn make_guess_rejects_unknown_word() {
        let mut s = session(&["crane", "crate"]);
        let result = s.make_guess("zzzzz", Pattern::PERFECT);
        assert_eq!(result, Err(SessionError::UnknownWord("zzzzz".to_string())));
    }

    #[test]
    fn make_guess_rejects_inconsistent_feedback() {
        let mut s = session(&["crane", "crate", "grate"]);
        let before = s.state().clone();

        let result = s.make_guess("crane", Pattern::parse("-----").unwrap());
        assert_eq!(result, Err(SessionError::NoRemainingSecrets));
        assert_eq!(s.state(), &before);
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn guesses_can_be_undone() {
        let mut s = session(&["crane", "crate", "grate", "irate"]);
        let key = s.cache_key();
        assert!(!s.back());

        let pattern = s.make_guess_against("crane", "irate").unwrap();
        assert_eq!(pattern.code(), "-GG-G");
        assert_eq!(s.state().possible_secrets().len(), 2);
        assert_ne!(s.cache_key(), key);

        assert!(s.back());
        assert_eq!(s.state().possible_secrets().len(), 4);
        assert_eq!(s.cache_key(), key);
        assert_eq!(s.history_len(), 0);
    }

    #[test]
    fn reset_replaces_everything() {
        let mut s = session(&["crane", "crate", "grate"]);
        s.make_guess_against("crane", "grate").unwrap();
        let _ = s.engine(false).search(&GameState::new(
            s.state().allowed_guesses().to_vec(),
            Vec::new(),
            false,
        ), 2);

        s.reset(&["abcde", "fghij"], &NONE, true).unwrap();
        assert_eq!(s.interner().lookup("crane"), None);
        assert_eq!(s.interner().len(), 2);
        assert_eq!(s.table().size(), 3);
        assert!(s.caches().is_empty());
        assert_eq!(s.history_len(), 0);
        assert!(s.state().is_hard_mode());
    }

    #[test]
    fn failed_reset_keeps_session() {
        let mut s = session(&["crane", "crate"]);
        let key = s.cache_key();

        assert!(s.reset(&["crane", "toolong"], &NONE, false).is_err());
        assert_eq!(s.cache_key(), key);
        assert!(s.interner().lookup("crate").is_some());
    }

    #[test]
    fn suggestions_run_until_settled() {
        let mut s = session(&["abcde", "fghij"]);

        let mut seen = Vec::new();
        while let Some(info) = s.compute_next_suggestion().unwrap() {
            assert!(info.can_stop);
            seen.push(s.interner().text(info.first_guess).to_string());
        }
        seen.sort();
        assert_eq!(seen, vec!["abcde", "fghij"]);
    }

    #[test]
    fn suggestions_restart_after_guess() {
        let mut s = session(&["abcde", "bacde", "cabde", "acbde"]);
        assert!(s.compute_next_suggestion().unwrap().is_some());

        s.make_guess_against("abcde", "bacde").unwrap();
        let info = s.compute_next_suggestion().unwrap().unwrap();
        assert_eq!(s.interner().text(info.first_guess), "bacde");
        assert_eq!(info.worst_num_guesses, 1);
    }

    #[test]
    fn thinking_prefers_lowest_average() {
        let mut heap = BinaryHeap::new();
        for (i, avg) in [3.5, 2.5, 4.0].into_iter().enumerate() {
            heap.push(ThinkingWord {
                word: WordId::from_raw(u16::try_from(i + 1).unwrap()),
                max_depth: 1,
                best_avg_guess: avg,
            });
        }
        assert_eq!(heap.pop().unwrap().word, WordId::from_raw(2));
        assert_eq!(heap.pop().unwrap().word, WordId::from_raw(1));
    }
}
