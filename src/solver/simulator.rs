//! Strategy simulator
//!
//! Plays a first guess against every possible secret, letting the engine
//! choose each following guess, and aggregates how many guesses each secret
//! took.

use super::cache::MAX_CACHE_DEPTH;
use super::engine::{Engine, EngineError};
use super::state::GameState;
use crate::core::{Interner, Pattern, WordId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of playing one first guess against every secret
#[derive(Debug, Clone, PartialEq)]
pub struct WordInfo {
    pub first_guess: WordId,
    pub sum_num_guesses: usize,
    pub avg_guesses: f64,
    pub worst_num_guesses: usize,
    /// Secrets solved in each number of guesses
    pub guess_distribution: BTreeMap<usize, usize>,
    /// Secrets solved in at most each number of guesses
    pub cumulative_guess_distribution: BTreeMap<usize, usize>,
    pub most_difficult_secret: WordId,
    pub max_depth: usize,
    /// Feedback patterns the first guess can receive, in pattern order
    pub all_matches: Vec<Pattern>,
    /// False if any guess along the way was not proven optimal
    pub can_stop: bool,
}

impl WordInfo {
    /// Rank two strategies: lower average, then lower worst case, then
    /// deeper search, then alphabetical first guess
    #[must_use]
    pub fn ordering(&self, other: &Self, interner: &Interner) -> Ordering {
        self.avg_guesses
            .total_cmp(&other.avg_guesses)
            .then(self.worst_num_guesses.cmp(&other.worst_num_guesses))
            .then(other.max_depth.cmp(&self.max_depth))
            .then_with(|| {
                interner
                    .text(self.first_guess)
                    .cmp(interner.text(other.first_guess))
            })
    }

    /// Whether this strategy ranks strictly ahead of `other`
    #[must_use]
    pub fn is_better_than(&self, other: &Self, interner: &Interner) -> bool {
        self.ordering(other, interner) == Ordering::Less
    }

    /// Export record with words spelled out
    #[must_use]
    pub fn report(&self, interner: &Interner) -> WordReport {
        WordReport {
            guess: interner.text(self.first_guess).to_string(),
            avg_guesses: self.avg_guesses,
            worst_num_guesses: self.worst_num_guesses,
            sum_num_guesses: self.sum_num_guesses,
            guess_distribution: self.guess_distribution.clone(),
            cumulative_guess_distribution: self.cumulative_guess_distribution.clone(),
            most_difficult_secret: interner.text(self.most_difficult_secret).to_string(),
            max_depth: self.max_depth,
            all_matches: self.all_matches.iter().map(|p| p.code()).collect(),
            can_stop: self.can_stop,
        }
    }
}

/// Serializable form of `WordInfo`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordReport {
    pub guess: String,
    pub avg_guesses: f64,
    pub worst_num_guesses: usize,
    pub sum_num_guesses: usize,
    pub guess_distribution: BTreeMap<usize, usize>,
    pub cumulative_guess_distribution: BTreeMap<usize, usize>,
    pub most_difficult_secret: String,
    pub max_depth: usize,
    pub all_matches: Vec<String>,
    pub can_stop: bool,
}

#[derive(Debug, Default)]
struct Replay {
    solved: Vec<(WordId, usize)>,
    first_patterns: BTreeSet<Pattern>,
    can_stop: bool,
}

/// Replays engine strategies to score first guesses
pub struct Simulator<'e, 'a> {
    engine: &'e mut Engine<'a>,
}

impl<'e, 'a> Simulator<'e, 'a> {
    pub const fn new(engine: &'e mut Engine<'a>) -> Self {
        Self { engine }
    }

    /// Play `first_guess` against every secret of `state`
    ///
    /// Every later guess comes from a search of depth `max_depth`.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDepth` for a depth the engine cannot
    /// search, `EngineError::NoSecrets` for a state without secrets, and
    /// propagates any search failure.
    ///
    /// # Examples
    /// ```
    /// use wordle_minimax::core::{Interner, MatchTable};
    /// use wordle_minimax::solver::{CacheConfig, CachePair, Engine, GameState, Simulator};
    ///
    /// let mut interner = Interner::new();
    /// let ids = interner.intern_all(&["abcde", "fghij"]).unwrap();
    /// let table = MatchTable::build(&interner);
    /// let caches = CachePair::new(CacheConfig::small(), interner.max_id());
    /// let mut engine = Engine::new(&interner, &table, &caches, false);
    ///
    /// let state = GameState::new(ids.clone(), Vec::new(), false);
    /// let info = Simulator::new(&mut engine).simulate(&state, ids[0], 1).unwrap();
    /// assert_eq!(info.worst_num_guesses, 2);
    /// assert_eq!(info.sum_num_guesses, 3);
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn simulate(
        &mut self,
        state: &GameState,
        first_guess: WordId,
        max_depth: usize,
    ) -> Result<WordInfo, EngineError> {
        if max_depth == 0 || max_depth >= MAX_CACHE_DEPTH {
            return Err(EngineError::InvalidDepth(max_depth));
        }
        let secret_count = state.possible_secrets().len();
        if secret_count == 0 {
            return Err(EngineError::NoSecrets);
        }

        let mut replay = Replay {
            can_stop: true,
            ..Replay::default()
        };
        self.replay(&mut replay, state, first_guess, 0, max_depth)?;

        let mut worst_num_guesses = 0;
        let mut most_difficult_secret = WordId::EMPTY;
        let mut sum_num_guesses = 0;
        let mut guess_distribution = BTreeMap::new();
        for &(secret, num_guesses) in &replay.solved {
            if num_guesses > worst_num_guesses {
                worst_num_guesses = num_guesses;
                most_difficult_secret = secret;
            }
            sum_num_guesses += num_guesses;
            *guess_distribution.entry(num_guesses).or_insert(0) += 1;
        }

        let mut solved = 0;
        let cumulative_guess_distribution = guess_distribution
            .iter()
            .map(|(&num_guesses, &n)| {
                solved += n;
                (num_guesses, solved)
            })
            .collect();

        Ok(WordInfo {
            first_guess,
            sum_num_guesses,
            avg_guesses: sum_num_guesses as f64 / secret_count as f64,
            worst_num_guesses,
            guess_distribution,
            cumulative_guess_distribution,
            most_difficult_secret,
            max_depth,
            all_matches: replay.first_patterns.into_iter().collect(),
            can_stop: replay.can_stop,
        })
    }

    fn replay(
        &mut self,
        replay: &mut Replay,
        state: &GameState,
        guess: WordId,
        guesses_so_far: usize,
        max_depth: usize,
    ) -> Result<(), EngineError> {
        let num_guesses = guesses_so_far + 1;
        let table = self.engine.table();

        for partition in state.partition_by_pattern(table, guess) {
            if num_guesses == 1 {
                replay.first_patterns.insert(partition.pattern());
            }

            let next = state.state_from_partition(table, &partition);
            if let [only] = next.possible_secrets() {
                let total = if *only == guess {
                    num_guesses
                } else {
                    num_guesses + 1
                };
                replay.solved.push((*only, total));
                continue;
            }

            let result = self.engine.search(&next, max_depth)?;
            if !result.is_optimal {
                replay.can_stop = false;
            }
            self.replay(replay, &next, result.best_guess, num_guesses, max_depth)?;
        }
        Ok(())
    }
}
