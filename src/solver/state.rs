//! Puzzle state: the guesses still allowed and the secrets still possible

use super::greedy::worst_remaining_after_one_guess;
use crate::core::{Interner, MatchTable, Pattern, WordId};
use rustc_hash::FxHashSet;
use sha2::{Digest, Sha256};
use std::fmt;

/// Error type for rejected state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    GuessNotAllowed(WordId),
    NoRemainingSecrets,
    SecretNotAllowed(WordId),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GuessNotAllowed(id) => {
                write!(f, "Word #{} is not an allowed guess", id.index())
            }
            Self::NoRemainingSecrets => {
                write!(f, "There would be no remaining secrets with this guess")
            }
            Self::SecretNotAllowed(id) => {
                write!(f, "Secret #{} is missing from the allowed guesses", id.index())
            }
        }
    }
}

impl std::error::Error for StateError {}

/// Secrets (and, in hard mode, allowed guesses) sharing one feedback pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pattern: Pattern,
    possible_secrets: Vec<WordId>,
    allowed_guesses: Vec<WordId>,
}

impl Partition {
    #[must_use]
    pub const fn pattern(&self) -> Pattern {
        self.pattern
    }

    #[must_use]
    pub fn possible_secrets(&self) -> &[WordId] {
        &self.possible_secrets
    }

    /// Guesses consistent with the pattern; empty outside hard mode
    #[must_use]
    pub fn allowed_guesses(&self) -> &[WordId] {
        &self.allowed_guesses
    }
}

/// Where a game stands between two guesses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    allowed_guesses: Vec<WordId>,
    possible_secrets: Vec<WordId>,
    hard_mode: bool,
}

impl GameState {
    /// Create a state; an empty secret list means every allowed guess may be
    /// the secret
    #[must_use]
    pub fn new(
        allowed_guesses: Vec<WordId>,
        possible_secrets: Vec<WordId>,
        hard_mode: bool,
    ) -> Self {
        let possible_secrets = if possible_secrets.is_empty() {
            allowed_guesses.clone()
        } else {
            possible_secrets
        };
        Self {
            allowed_guesses,
            possible_secrets,
            hard_mode,
        }
    }

    #[must_use]
    pub fn allowed_guesses(&self) -> &[WordId] {
        &self.allowed_guesses
    }

    #[must_use]
    pub fn possible_secrets(&self) -> &[WordId] {
        &self.possible_secrets
    }

    #[must_use]
    pub const fn is_hard_mode(&self) -> bool {
        self.hard_mode
    }

    /// Check that every secret can also be guessed
    ///
    /// # Errors
    /// Returns `StateError::SecretNotAllowed` for the first secret missing
    /// from the allowed guesses.
    pub fn validate(&self) -> Result<(), StateError> {
        let allowed: FxHashSet<WordId> = self.allowed_guesses.iter().copied().collect();
        match self.possible_secrets.iter().find(|s| !allowed.contains(s)) {
            Some(&missing) => Err(StateError::SecretNotAllowed(missing)),
            None => Ok(()),
        }
    }

    /// Apply the feedback `pattern` received for `guess`
    ///
    /// The state is left untouched when the guess is rejected.
    ///
    /// # Errors
    /// Returns `StateError::GuessNotAllowed` if `guess` is not an allowed
    /// guess, or `StateError::NoRemainingSecrets` if no secret is consistent
    /// with the feedback.
    pub fn make_guess(
        &mut self,
        table: &MatchTable,
        guess: WordId,
        pattern: Pattern,
    ) -> Result<(), StateError> {
        if !self.allowed_guesses.contains(&guess) {
            return Err(StateError::GuessNotAllowed(guess));
        }

        let possible_secrets = table.eliminate(&self.possible_secrets, guess, pattern);
        if possible_secrets.is_empty() {
            return Err(StateError::NoRemainingSecrets);
        }

        self.possible_secrets = possible_secrets;
        if self.hard_mode {
            self.allowed_guesses = table.eliminate(&self.allowed_guesses, guess, pattern);
        }
        self.drop_useless_guesses(table);
        Ok(())
    }

    /// Keep one guess of each group that splits the secrets identically
    ///
    /// No-op in hard mode. A secret is never dropped: only the secret itself
    /// scores perfect against it.
    pub fn drop_useless_guesses(&mut self, table: &MatchTable) {
        if self.hard_mode {
            return;
        }

        let mut seen = FxHashSet::default();
        let secrets = &self.possible_secrets;
        self.allowed_guesses.retain(|&guess| {
            let signature: Vec<u8> = secrets
                .iter()
                .map(|&s| table.get(guess, s).value())
                .collect();
            seen.insert(signature)
        });
    }

    /// Split the secrets by the feedback `guess` would receive
    ///
    /// Only non-empty partitions are returned, in pattern order. In hard mode
    /// each partition also carries the allowed guesses consistent with its
    /// pattern.
    #[must_use]
    pub fn partition_by_pattern(&self, table: &MatchTable, guess: WordId) -> Vec<Partition> {
        let mut secrets = vec![Vec::new(); Pattern::BUCKETS];
        for &secret in &self.possible_secrets {
            secrets[table.get(guess, secret).index()].push(secret);
        }

        let mut allowed = vec![Vec::new(); Pattern::BUCKETS];
        if self.hard_mode {
            for &word in &self.allowed_guesses {
                allowed[table.get(guess, word).index()].push(word);
            }
        }

        secrets
            .into_iter()
            .zip(allowed)
            .enumerate()
            .filter(|(_, (s, _))| !s.is_empty())
            .filter_map(|(code, (possible_secrets, allowed_guesses))| {
                Some(Partition {
                    pattern: Pattern::new(u8::try_from(code).ok()?),
                    possible_secrets,
                    allowed_guesses,
                })
            })
            .collect()
    }

    /// The state reached when the feedback lands in `partition`
    #[must_use]
    pub fn state_from_partition(&self, table: &MatchTable, partition: &Partition) -> Self {
        let allowed_guesses = if self.hard_mode {
            partition.allowed_guesses.clone()
        } else {
            self.allowed_guesses.clone()
        };
        let mut state = Self::new(
            allowed_guesses,
            partition.possible_secrets.clone(),
            self.hard_mode,
        );
        state.drop_useless_guesses(table);
        state
    }

    /// Order allowed guesses by greedy score, best first
    ///
    /// The sort is stable. With `possible_secrets_first` every guess that may
    /// be the secret goes ahead of every guess that may not.
    pub fn sort_guesses_by_greedy(&mut self, table: &MatchTable, possible_secrets_first: bool) {
        let secrets: FxHashSet<WordId> = self.possible_secrets.iter().copied().collect();
        let beta = self.possible_secrets.len();

        let mut scored: Vec<(i64, WordId)> = self
            .allowed_guesses
            .iter()
            .map(|&guess| {
                let (worst, _) =
                    worst_remaining_after_one_guess(table, guess, &self.possible_secrets, beta);
                let mut score = i64::try_from(worst).unwrap_or(i64::MAX);
                if possible_secrets_first && secrets.contains(&guess) {
                    score -= 1_000_000;
                }
                (score, guess)
            })
            .collect();
        scored.sort_by_key(|&(score, _)| score);

        self.allowed_guesses = scored.into_iter().map(|(_, guess)| guess).collect();
    }

    /// Order-independent SHA-256 hex fingerprint of the word sets and mode
    ///
    /// Used to name persisted results, so it depends on word text rather
    /// than on ids.
    #[must_use]
    pub fn fingerprint(&self, interner: &Interner) -> String {
        let mut hasher = Sha256::new();
        for words in [&self.allowed_guesses, &self.possible_secrets] {
            let mut texts: Vec<&str> = words.iter().map(|&id| interner.text(id)).collect();
            texts.sort_unstable();
            hasher.update(texts.join("|").as_bytes());
            hasher.update(b"#");
        }
        hasher.update(if self.hard_mode { b"h" } else { b"e" });
        hex::encode(hasher.finalize())
    }
}
