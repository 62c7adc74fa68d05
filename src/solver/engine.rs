//! Adversarial alpha-beta search over guess strategies
//!
//! `min_search` picks the guess minimizing the worst-case number of guesses,
//! `max_search` evaluates one guess against the worst feedback it can
//! receive. Both are staged: trivial answers first, then cached bounds, then
//! real work, and both record what they learn in the shared caches.
//!
//! Results carry an `is_optimal` flag. A non-optimal result is a valid
//! strategy whose guess count might improve with a deeper search.

use super::cache::{CacheEntry, CacheKey, CachePair, MAX_CACHE_DEPTH};
use super::greedy::{pick_greedy_guess, worst_remaining_after_one_guess};
use super::state::GameState;
use crate::core::{Interner, MatchTable, Pattern, WordId};
use colored::Colorize;
use std::collections::BinaryHeap;
use std::fmt;

/// Candidates tried per node in normal mode
const CANDIDATE_LIMIT: usize = 100;

/// Score that forces the previous depth's best guess to the front
const FORCED_FIRST_SCORE: i32 = -10;

/// Best guess found for a set of secrets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_guess: WordId,
    /// Guesses needed in the worst case, this one included
    pub num_guesses: i32,
    /// Whether `num_guesses` is proven rather than an upper bound
    pub is_optimal: bool,
}

impl SearchResult {
    #[must_use]
    pub const fn new(best_guess: WordId, num_guesses: i32, is_optimal: bool) -> Self {
        Self {
            best_guess,
            num_guesses,
            is_optimal,
        }
    }
}

/// Error type for failed searches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidDepth(usize),
    NoSecrets,
    NoGuessFound,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDepth(depth) => write!(
                f,
                "Search depth must be between 1 and {}, got {depth}",
                MAX_CACHE_DEPTH - 1
            ),
            Self::NoSecrets => write!(f, "There are no possible secrets to search"),
            Self::NoGuessFound => write!(f, "Engine failed to find a guess"),
        }
    }
}

impl std::error::Error for EngineError {}

/// One row of the chosen-candidate rank histogram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankSummary {
    /// 1-based position of the chosen guess in the tried order
    pub rank: usize,
    pub count: u64,
    /// Share of searches that chose a guess at this rank or better
    pub cumulative_percent: f64,
}

/// Worst-case value of one guess
#[derive(Debug, Clone, Copy)]
struct MaxSearchResult {
    num_guesses: i32,
    is_optimal: bool,
}

impl MaxSearchResult {
    const fn new(num_guesses: i32, is_optimal: bool) -> Self {
        Self {
            num_guesses,
            is_optimal,
        }
    }
}

#[derive(Debug, Default)]
struct Bucket {
    possible_secrets: Vec<WordId>,
    allowed_guesses: Vec<WordId>,
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Search engine for one worker
///
/// The pattern table and caches are shared between workers; the mode flag
/// and rank histogram belong to this engine alone.
///
/// # Examples
/// ```
/// use wordle_minimax::core::{Interner, MatchTable};
/// use wordle_minimax::solver::{CacheConfig, CachePair, Engine, GameState};
///
/// let mut interner = Interner::new();
/// let ids = interner.intern_all(&["abcde", "fghij"]).unwrap();
/// let table = MatchTable::build(&interner);
/// let caches = CachePair::new(CacheConfig::small(), interner.max_id());
///
/// let state = GameState::new(ids.clone(), ids.clone(), false);
/// let mut engine = Engine::new(&interner, &table, &caches, false);
/// let result = engine.search(&state, 3).unwrap();
///
/// assert_eq!(result.num_guesses, 2);
/// assert!(result.is_optimal);
/// ```
pub struct Engine<'a> {
    interner: &'a Interner,
    table: &'a MatchTable,
    caches: &'a CachePair,
    verbose: bool,
    hard_mode: bool,
    rank_distribution: Vec<u64>,
}

impl<'a> Engine<'a> {
    #[must_use]
    pub const fn new(
        interner: &'a Interner,
        table: &'a MatchTable,
        caches: &'a CachePair,
        verbose: bool,
    ) -> Self {
        Self {
            interner,
            table,
            caches,
            verbose,
            hard_mode: false,
            rank_distribution: Vec::new(),
        }
    }

    /// Pattern table the engine searches over
    #[must_use]
    pub const fn table(&self) -> &'a MatchTable {
        self.table
    }

    #[must_use]
    pub const fn interner(&self) -> &'a Interner {
        self.interner
    }

    pub const fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Find the best next guess for `state`, looking `max_depth` guesses ahead
    ///
    /// # Errors
    /// Returns `EngineError::InvalidDepth` unless
    /// `1 <= max_depth < MAX_CACHE_DEPTH`, `EngineError::NoSecrets` for a
    /// state without secrets, and `EngineError::NoGuessFound` if the search
    /// produced no guess.
    pub fn search(
        &mut self,
        state: &GameState,
        max_depth: usize,
    ) -> Result<SearchResult, EngineError> {
        if max_depth == 0 || max_depth >= MAX_CACHE_DEPTH {
            return Err(EngineError::InvalidDepth(max_depth));
        }
        let secrets = state.possible_secrets();
        if secrets.is_empty() {
            return Err(EngineError::NoSecrets);
        }

        self.hard_mode = state.is_hard_mode();
        let result = self.min_search(
            state.allowed_guesses(),
            secrets,
            max_depth,
            0,
            count(secrets.len()),
            true,
        );

        if result.best_guess.is_empty() {
            return Err(EngineError::NoGuessFound);
        }
        Ok(result)
    }

    /// Choose the guess minimizing the worst case, within window (alpha, beta)
    ///
    /// `possible_secrets` must not be empty.
    pub fn min_search(
        &mut self,
        allowed_guesses: &[WordId],
        possible_secrets: &[WordId],
        max_depth: usize,
        alpha: i32,
        beta: i32,
        is_root: bool,
    ) -> SearchResult {
        if let Some(result) = Self::trivial_result(possible_secrets, max_depth, alpha, beta) {
            return result;
        }

        let cache = &self.caches.min_cache;
        let key = cache.min_search_key(possible_secrets);
        let entry = cache.find(max_depth, key);
        if let Some(result) = Self::cached_result(&entry, alpha, beta, is_root) {
            return result;
        }

        let result = self.choose_guess(
            allowed_guesses,
            possible_secrets,
            max_depth,
            (alpha, beta),
            key,
            is_root,
        );

        self.caches.min_cache.update(
            max_depth,
            key,
            result.num_guesses,
            alpha,
            beta,
            result.best_guess,
            result.is_optimal,
        );
        result
    }

    fn trivial_result(
        possible_secrets: &[WordId],
        max_depth: usize,
        alpha: i32,
        beta: i32,
    ) -> Option<SearchResult> {
        let Some(&first) = possible_secrets.first() else {
            return Some(SearchResult::new(WordId::EMPTY, 0, true));
        };
        let size = count(possible_secrets.len());

        if size <= 2 || beta <= 2 {
            return Some(SearchResult::new(first, size.min(2), true));
        }
        if alpha >= size {
            return Some(SearchResult::new(first, alpha, true));
        }
        if max_depth == 0 {
            return Some(SearchResult::new(first, size, false));
        }
        None
    }

    fn cached_result(
        entry: &CacheEntry,
        alpha: i32,
        beta: i32,
        is_root: bool,
    ) -> Option<SearchResult> {
        // The root must hand back a real guess, a bare bound is not enough
        if entry.lower_bound >= beta && (!is_root || !entry.lower_bound_word.is_empty()) {
            return Some(SearchResult::new(
                entry.lower_bound_word,
                entry.lower_bound,
                entry.lower_bound_optimal,
            ));
        }
        if (entry.upper_bound <= alpha || entry.is_exact()) && !entry.upper_bound_word.is_empty() {
            return Some(SearchResult::new(
                entry.upper_bound_word,
                entry.upper_bound,
                entry.upper_bound_optimal,
            ));
        }
        None
    }

    fn choose_guess(
        &mut self,
        allowed_guesses: &[WordId],
        possible_secrets: &[WordId],
        max_depth: usize,
        (alpha, beta): (i32, i32),
        key: CacheKey,
        is_root: bool,
    ) -> SearchResult {
        // Iterative deepening: the shallower search may already be exact
        let shallow = self.caches.min_cache.find(max_depth - 1, key);
        if shallow.is_exact() && shallow.lower_bound_optimal {
            return SearchResult::new(shallow.lower_bound_word, shallow.lower_bound, true);
        }

        if max_depth <= 1 {
            return pick_greedy_guess(self.table, allowed_guesses, possible_secrets, beta);
        }

        let candidates =
            self.rank_candidates(allowed_guesses, possible_secrets, shallow.upper_bound_word);

        let mut best = SearchResult::new(WordId::EMPTY, count(possible_secrets.len()), true);
        let mut best_rank = None;
        for (tried, &candidate) in candidates.iter().enumerate() {
            let res = self.max_search(
                allowed_guesses,
                possible_secrets,
                candidate,
                max_depth,
                (alpha - 1).max(1),
                (best.num_guesses - 1).max(1),
            );
            let num_guesses = res.num_guesses + 1;

            if num_guesses < best.num_guesses || best.best_guess.is_empty() {
                best = SearchResult::new(candidate, num_guesses, res.is_optimal);
                best_rank = Some(tried + 1);
                if is_root && self.verbose {
                    println!(
                        "{} {} {} {} {} {}",
                        "guess:".dimmed(),
                        self.interner.text(candidate).bright_green().bold(),
                        "best_num_guesses:".dimmed(),
                        num_guesses.to_string().bright_cyan(),
                        "rank:".dimmed(),
                        tried + 1
                    );
                }
                if best.num_guesses <= alpha || best.num_guesses <= 2 {
                    break;
                }
            }
        }

        if let Some(rank) = best_rank {
            self.add_rank(rank);
        }
        best
    }

    /// The guesses worth a full evaluation, best greedy score first
    ///
    /// `previous_best` is always tried first when it is an allowed guess.
    fn rank_candidates(
        &self,
        allowed_guesses: &[WordId],
        possible_secrets: &[WordId],
        previous_best: WordId,
    ) -> Vec<WordId> {
        let limit = self.candidate_limit(allowed_guesses.len());
        let mut heap = BinaryHeap::with_capacity(limit + 1);
        let mut beta_remaining = count(possible_secrets.len());
        let mut min_score = i32::MAX;

        for &guess in allowed_guesses {
            let (worst, _) = worst_remaining_after_one_guess(
                self.table,
                guess,
                possible_secrets,
                usize::try_from(beta_remaining).unwrap_or(0),
            );
            let worst = count(worst);
            let score = if guess == previous_best {
                FORCED_FIRST_SCORE
            } else {
                worst
            };
            if score >= beta_remaining {
                continue;
            }

            min_score = min_score.min(worst);
            heap.push((score, guess));
            if heap.len() > limit {
                if let Some((dropped, _)) = heap.pop() {
                    beta_remaining = beta_remaining.min(dropped);
                }
            }
            if min_score <= 1 {
                break;
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|(_, guess)| guess)
            .collect()
    }

    fn candidate_limit(&self, allowed: usize) -> usize {
        if self.hard_mode {
            (20 + (allowed + 1) / 2).clamp(20, 80)
        } else {
            CANDIDATE_LIMIT
        }
    }

    /// Worst case over every feedback `guess_candidate` can receive
    fn max_search(
        &mut self,
        allowed_guesses: &[WordId],
        possible_secrets: &[WordId],
        guess_candidate: WordId,
        max_depth: usize,
        alpha: i32,
        beta: i32,
    ) -> MaxSearchResult {
        let cache = &self.caches.max_cache;
        let key = cache.max_search_key(guess_candidate, possible_secrets);
        let entry = cache.find(max_depth, key);
        if entry.lower_bound >= beta {
            return MaxSearchResult::new(entry.lower_bound, entry.lower_bound_optimal);
        }
        if entry.upper_bound <= alpha {
            return MaxSearchResult::new(entry.upper_bound, entry.upper_bound_optimal);
        }

        let result = self.split_and_recurse(
            allowed_guesses,
            possible_secrets,
            guess_candidate,
            max_depth,
            alpha,
            beta,
        );

        self.caches.max_cache.update(
            max_depth,
            key,
            result.num_guesses,
            alpha,
            beta,
            WordId::EMPTY,
            result.is_optimal,
        );
        result
    }

    fn split_and_recurse(
        &mut self,
        allowed_guesses: &[WordId],
        possible_secrets: &[WordId],
        guess_candidate: WordId,
        max_depth: usize,
        alpha: i32,
        beta: i32,
    ) -> MaxSearchResult {
        let mut buckets: Vec<Bucket> = (0..Pattern::BUCKETS).map(|_| Bucket::default()).collect();
        let mut largest = 0;
        for &secret in possible_secrets {
            let bucket = &mut buckets[self.table.get(guess_candidate, secret).index()];
            bucket.possible_secrets.push(secret);
            largest = largest.max(bucket.possible_secrets.len());
        }
        if self.hard_mode {
            for &guess in allowed_guesses {
                buckets[self.table.get(guess_candidate, guess).index()]
                    .allowed_guesses
                    .push(guess);
            }
        }

        let largest_count = count(largest);
        if largest == possible_secrets.len() {
            // Learns nothing
            return MaxSearchResult::new(beta, true);
        }
        if largest_count <= alpha {
            return MaxSearchResult::new(alpha, true);
        }
        if largest <= 2 {
            return MaxSearchResult::new(largest_count, true);
        }
        if beta <= 2 {
            return MaxSearchResult::new(beta, true);
        }

        buckets.sort_by_key(|b| std::cmp::Reverse(b.possible_secrets.len()));

        let mut worst = -1;
        let mut is_optimal = true;
        for bucket in &buckets {
            let size = count(bucket.possible_secrets.len());
            if size == 0 || size <= worst {
                break;
            }

            let next_allowed = if self.hard_mode {
                bucket.allowed_guesses.as_slice()
            } else {
                allowed_guesses
            };
            let res = self.min_search(
                next_allowed,
                &bucket.possible_secrets,
                max_depth - 1,
                worst,
                beta,
                false,
            );
            if res.num_guesses > worst {
                worst = res.num_guesses;
                is_optimal = res.is_optimal;
                if worst >= beta {
                    return MaxSearchResult::new(beta, is_optimal);
                }
            }
        }

        MaxSearchResult::new(worst, is_optimal)
    }

    fn add_rank(&mut self, rank: usize) {
        if self.rank_distribution.len() <= rank {
            self.rank_distribution.resize(rank + 1, 0);
        }
        self.rank_distribution[rank] += 1;
    }

    /// How often the chosen guess sat at each rank, indexed by rank
    #[must_use]
    pub fn rank_distribution(&self) -> &[u64] {
        &self.rank_distribution
    }

    /// Fold another engine's histogram into this one
    pub fn merge_ranks(&mut self, other: &[u64]) {
        for (rank, &n) in other.iter().enumerate().filter(|&(_, &n)| n > 0) {
            if self.rank_distribution.len() <= rank {
                self.rank_distribution.resize(rank + 1, 0);
            }
            self.rank_distribution[rank] += n;
        }
    }

    /// Non-empty ranks with their counts and cumulative percentages
    #[must_use]
    pub fn rank_summary(&self) -> Vec<RankSummary> {
        summarize_ranks(&self.rank_distribution)
    }
}

/// Summarize a rank histogram indexed by rank
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_ranks(distribution: &[u64]) -> Vec<RankSummary> {
    let total: u64 = distribution.iter().sum();
    let mut acc = 0;

    distribution
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .map(|(rank, &n)| {
            acc += n;
            RankSummary {
                rank,
                count: n,
                cumulative_percent: acc as f64 * 100.0 / total as f64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::cache::CacheConfig;
    use rustc_hash::FxHashMap;

    struct Fixture {
        interner: Interner,
        ids: Vec<WordId>,
        table: MatchTable,
        caches: CachePair,
    }

    impl Fixture {
        fn new(words: &[&str]) -> Self {
            let mut interner = Interner::new();
            let ids = interner.intern_all(words).unwrap();
            let table = MatchTable::build(&interner);
            let caches = CachePair::new(CacheConfig::small(), interner.max_id());
            Self {
                interner,
                ids,
                table,
                caches,
            }
        }

        fn engine(&self) -> Engine<'_> {
            Engine::new(&self.interner, &self.table, &self.caches, false)
        }
    }

    const ILLS: [&str; 10] = [
        "bills", "fills", "gills", "hills", "kills", "mills", "pills", "sills", "tills", "wills",
    ];

    fn ills_with_helper() -> Fixture {
        let mut words = ILLS.to_vec();
        words.push("fmpst");
        Fixture::new(&words)
    }

    #[test]
    fn rejects_invalid_depth() {
        let fx = Fixture::new(&["abcde", "fghij"]);
        let state = GameState::new(fx.ids.clone(), Vec::new(), false);
        let mut engine = fx.engine();

        assert_eq!(engine.search(&state, 0), Err(EngineError::InvalidDepth(0)));
        assert_eq!(
            engine.search(&state, MAX_CACHE_DEPTH),
            Err(EngineError::InvalidDepth(MAX_CACHE_DEPTH))
        );
    }

    #[test]
    fn rejects_empty_state() {
        let fx = Fixture::new(&["abcde"]);
        let state = GameState::new(Vec::new(), Vec::new(), false);

        assert_eq!(fx.engine().search(&state, 2), Err(EngineError::NoSecrets));
    }

    #[test]
    fn two_secrets_take_two_guesses() {
        let fx = Fixture::new(&["abcde", "fghij"]);
        let state = GameState::new(fx.ids.clone(), fx.ids.clone(), false);

        for depth in 1..5 {
            let result = fx.engine().search(&state, depth).unwrap();
            assert_eq!(result.num_guesses, 2);
            assert!(result.is_optimal);
            assert!(fx.ids.contains(&result.best_guess));
        }
    }

    #[test]
    fn single_secret_is_guessed_directly() {
        let fx = Fixture::new(&["crane", "slate", "trace"]);
        let state = GameState::new(fx.ids.clone(), vec![fx.ids[1]], false);

        for depth in [1, 3, 10] {
            let result = fx.engine().search(&state, depth).unwrap();
            assert_eq!(result, SearchResult::new(fx.ids[1], 1, true));
        }
    }

    #[test]
    fn distinguishing_guess_is_optimal() {
        let fx = Fixture::new(&["abcde", "bacde", "cabde", "acbde"]);
        let state = GameState::new(fx.ids.clone(), Vec::new(), false);

        let result = fx.engine().search(&state, 2).unwrap();
        assert_eq!(result, SearchResult::new(fx.ids[0], 2, true));
    }

    #[test]
    fn depth_one_falls_back_to_greedy() {
        let fx = ills_with_helper();
        let state = GameState::new(fx.ids.clone(), fx.ids[..10].to_vec(), false);

        let result = fx.engine().search(&state, 1).unwrap();
        assert_eq!(result, SearchResult::new(fx.ids[10], 7, false));
    }

    #[test]
    fn deeper_search_uses_helper_word() {
        let fx = ills_with_helper();
        let state = GameState::new(fx.ids.clone(), fx.ids[..10].to_vec(), false);

        let result = fx.engine().search(&state, 3).unwrap();
        assert_eq!(result.best_guess, fx.ids[10]);
        assert_eq!(result.num_guesses, 7);
    }

    #[test]
    fn hard_mode_search_uses_helper_word() {
        let fx = ills_with_helper();
        let state = GameState::new(fx.ids.clone(), fx.ids[..10].to_vec(), true);

        let result = fx.engine().search(&state, 3).unwrap();
        assert_eq!(result.best_guess, fx.ids[10]);
        assert_eq!(result.num_guesses, 7);
    }

    #[test]
    fn without_helper_every_word_is_tried_in_turn() {
        let fx = Fixture::new(&ILLS);
        let state = GameState::new(fx.ids.clone(), Vec::new(), false);

        let result = fx.engine().search(&state, 3).unwrap();
        assert_eq!(result.num_guesses, 10);
        assert!(fx.ids.contains(&result.best_guess));
    }

    #[test]
    fn deeper_search_never_gets_worse() {
        let fx = ills_with_helper();
        let state = GameState::new(fx.ids.clone(), fx.ids[..10].to_vec(), false);
        let mut engine = fx.engine();

        let mut previous = i32::MAX;
        let mut was_optimal = false;
        for depth in 1..=5 {
            let result = engine.search(&state, depth).unwrap();
            assert!(result.num_guesses <= previous);
            assert!(!was_optimal || result.is_optimal);
            previous = result.num_guesses;
            was_optimal = result.is_optimal;
        }
    }

    #[test]
    fn results_are_admissible() {
        let words = [
            "crane", "crate", "grate", "irate", "slate", "trace", "react", "caret", "cater",
            "plate", "blame", "flame",
        ];
        let fx = Fixture::new(&words);

        for hard_mode in [false, true] {
            let state = GameState::new(fx.ids.clone(), fx.ids[..9].to_vec(), hard_mode);
            for depth in 1..4 {
                let caches = CachePair::new(CacheConfig::small(), fx.interner.max_id());
                let mut engine = Engine::new(&fx.interner, &fx.table, &caches, false);
                let result = engine.search(&state, depth).unwrap();

                assert!(state.allowed_guesses().contains(&result.best_guess));
                assert!(result.num_guesses >= 1);
                if result.is_optimal {
                    assert!(result.num_guesses <= 9);
                }
            }
        }
    }

    /// Exhaustive worst-case guess count, memoized on (secrets, allowed)
    fn brute_force(
        table: &MatchTable,
        secrets: &[WordId],
        allowed: &[WordId],
        hard_mode: bool,
        memo: &mut FxHashMap<(Vec<WordId>, Vec<WordId>), i32>,
    ) -> i32 {
        if secrets.len() == 1 {
            return 1;
        }
        let key = (secrets.to_vec(), allowed.to_vec());
        if let Some(&known) = memo.get(&key) {
            return known;
        }

        let mut best = i32::MAX;
        for &guess in allowed {
            let mut buckets: FxHashMap<Pattern, Vec<WordId>> = FxHashMap::default();
            for &secret in secrets {
                buckets.entry(table.get(guess, secret)).or_default().push(secret);
            }
            // A guess that learns nothing can never beat one that does
            if buckets.len() == 1 && !buckets.contains_key(&Pattern::PERFECT) {
                continue;
            }

            let mut worst = 1;
            for (pattern, bucket) in &buckets {
                if pattern.is_perfect() {
                    continue;
                }
                let next: Vec<WordId> = if hard_mode {
                    table.eliminate(allowed, guess, *pattern)
                } else {
                    allowed.to_vec()
                };
                worst = worst.max(1 + brute_force(table, bucket, &next, hard_mode, memo));
                if worst >= best {
                    break;
                }
            }
            best = best.min(worst);
        }

        memo.insert(key, best);
        best
    }

    #[test]
    fn optimal_results_match_brute_force() {
        let mut ills = ILLS.to_vec();
        ills.push("fmpst");
        let dictionaries: [(Vec<&str>, usize); 3] = [
            (ills, 10),
            (
                vec![
                    "crane", "crate", "grate", "irate", "slate", "trace", "react", "caret",
                    "cater", "plate", "blame", "flame",
                ],
                9,
            ),
            (
                vec![
                    "batch", "catch", "hatch", "latch", "match", "patch", "watch", "bound",
                    "found", "hound", "mound", "pound", "round", "sound", "wound",
                ],
                15,
            ),
        ];

        let mut optimal_seen = 0;
        for (words, secret_count) in &dictionaries {
            let fx = Fixture::new(words);
            let secrets = fx.ids[..*secret_count].to_vec();

            for hard_mode in [false, true] {
                let state = GameState::new(fx.ids.clone(), secrets.clone(), hard_mode);
                let mut memo = FxHashMap::default();
                let expected = brute_force(
                    &fx.table,
                    state.possible_secrets(),
                    state.allowed_guesses(),
                    hard_mode,
                    &mut memo,
                );

                for depth in 1..=8 {
                    let caches = CachePair::new(CacheConfig::small(), fx.interner.max_id());
                    let mut engine = Engine::new(&fx.interner, &fx.table, &caches, false);
                    let result = engine.search(&state, depth).unwrap();

                    if result.is_optimal {
                        assert_eq!(result.num_guesses, expected, "{words:?} depth {depth}");
                        optimal_seen += 1;
                    }
                }
            }
        }
        assert!(optimal_seen > 0);
    }

    #[test]
    fn search_records_rank_histogram() {
        let fx = ills_with_helper();
        let state = GameState::new(fx.ids.clone(), fx.ids[..10].to_vec(), false);
        let mut engine = fx.engine();
        engine.search(&state, 3).unwrap();

        let summary = engine.rank_summary();
        assert!(!summary.is_empty());
        assert!(summary.iter().all(|row| row.rank >= 1 && row.count > 0));
        let last = summary.last().unwrap();
        assert!((last.cumulative_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn summary_is_cumulative() {
        let summary = summarize_ranks(&[0, 2, 1, 0, 1]);
        let ranks: Vec<usize> = summary.iter().map(|r| r.rank).collect();

        assert_eq!(ranks, vec![1, 2, 4]);
        assert!((summary[0].cumulative_percent - 50.0).abs() < 1e-9);
        assert!((summary[1].cumulative_percent - 75.0).abs() < 1e-9);
        assert!(summarize_ranks(&[]).is_empty());
    }

    #[test]
    fn merge_ranks_adds_histograms() {
        let fx = Fixture::new(&["abcde"]);
        let mut engine = fx.engine();
        engine.merge_ranks(&[0, 2, 0, 1]);
        engine.merge_ranks(&[0, 1]);

        assert_eq!(engine.rank_distribution(), &[0, 3, 0, 1]);
        assert_eq!(engine.rank_summary().len(), 2);
    }
}
