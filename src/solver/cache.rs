//! Transposition cache for the alpha-beta search
//!
//! Word sets are fingerprinted with 128-bit XOR hashes, so a key is
//! independent of the order the set was built in and adding then removing a
//! word is a no-op. Entries hold alpha-beta bounds on the number of guesses
//! needed, refined as the search revisits the same subproblem.
//!
//! Storage is split into many independently locked segments selected by the
//! low bits of the key. A full segment drops every other entry in iteration
//! order; dropped entries only cost recomputation.

use crate::core::WordId;
use rand_mt::Mt64;
use rustc_hash::FxHashMap;
use std::ops::{BitXor, BitXorAssign};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Number of distinct search depths the cache can separate
pub const MAX_CACHE_DEPTH: usize = 40;

const WORD_SEED: u64 = 1;
const FIRST_WORD_SEED: u64 = 2;
const DEPTH_SEED: u64 = 42;

/// 128-bit fingerprint of a word set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CacheKey {
    lower: u64,
    upper: u64,
}

impl CacheKey {
    fn random(rng: &mut Mt64) -> Self {
        let lower = rng.next_u64();
        let upper = rng.next_u64();
        Self { lower, upper }
    }

    #[must_use]
    pub const fn lower(self) -> u64 {
        self.lower
    }

    #[must_use]
    pub const fn upper(self) -> u64 {
        self.upper
    }
}

impl BitXor for CacheKey {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self {
            lower: self.lower ^ rhs.lower,
            upper: self.upper ^ rhs.upper,
        }
    }
}

impl BitXorAssign for CacheKey {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.lower ^= rhs.lower;
        self.upper ^= rhs.upper;
    }
}

/// Best known bounds on the guesses needed for one subproblem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub lower_bound: i32,
    pub upper_bound: i32,
    pub lower_bound_word: WordId,
    pub upper_bound_word: WordId,
    pub lower_bound_optimal: bool,
    pub upper_bound_optimal: bool,
}

impl CacheEntry {
    /// Upper bound of an entry nothing is known about
    pub const UNBOUNDED: i32 = i32::MAX;

    /// Record the result of a search run with window (alpha, beta)
    ///
    /// A result clipped by beta only proves a lower bound, one clipped by
    /// alpha only an upper bound. Inside the window the value is exact.
    pub fn update(&mut self, num_guesses: i32, alpha: i32, beta: i32, word: WordId, optimal: bool) {
        if num_guesses >= beta {
            self.lower_bound = self.lower_bound.max(beta);
            self.lower_bound_word = word;
            self.lower_bound_optimal = optimal;
        } else if num_guesses <= alpha {
            self.upper_bound = self.upper_bound.min(alpha);
            self.upper_bound_word = word;
            self.upper_bound_optimal = optimal;
        } else {
            self.lower_bound = num_guesses;
            self.upper_bound = num_guesses;
            self.lower_bound_word = word;
            self.upper_bound_word = word;
            self.lower_bound_optimal = optimal;
            self.upper_bound_optimal = optimal;
        }
    }

    /// Whether the exact value is known
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.lower_bound == self.upper_bound
    }
}

impl Default for CacheEntry {
    fn default() -> Self {
        Self {
            lower_bound: 0,
            upper_bound: Self::UNBOUNDED,
            lower_bound_word: WordId::EMPTY,
            upper_bound_word: WordId::EMPTY,
            lower_bound_optimal: false,
            upper_bound_optimal: false,
        }
    }
}

/// Memory limits of a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Total entries kept across all segments
    pub max_entries: usize,
    /// Number of independently locked segments (rounded up to a power of two)
    pub segments: usize,
}

impl CacheConfig {
    #[must_use]
    pub const fn new(max_entries: usize, segments: usize) -> Self {
        Self {
            max_entries,
            segments,
        }
    }

    /// A few thousand entries, for tests and short interactive sessions
    #[must_use]
    pub const fn small() -> Self {
        Self::new(1 << 14, 1 << 4)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(1 << 24, 1 << 16)
    }
}

/// Fixed random values the fingerprints are built from
///
/// Drawn from 64-bit Mersenne Twister streams so the keys of a given id
/// never change between builds.
#[derive(Debug, Clone)]
struct KeyHashes {
    words: Vec<CacheKey>,
    first_words: Vec<CacheKey>,
    depths: [CacheKey; MAX_CACHE_DEPTH],
}

impl KeyHashes {
    fn new(max_id: usize) -> Self {
        let table = |seed: u64| {
            let mut rng = Mt64::new(seed);
            (0..max_id)
                .map(|_| CacheKey::random(&mut rng))
                .collect::<Vec<_>>()
        };

        let mut depth_rng = Mt64::new(DEPTH_SEED);
        Self {
            words: table(WORD_SEED),
            first_words: table(FIRST_WORD_SEED),
            depths: std::array::from_fn(|_| CacheKey::random(&mut depth_rng)),
        }
    }
}

type Segment = FxHashMap<CacheKey, CacheEntry>;

/// Sharded, bounded memo table of search bounds
pub struct Cache {
    hashes: KeyHashes,
    segments: Vec<Mutex<Segment>>,
    segment_capacity: usize,
}

impl Cache {
    /// Create a cache able to fingerprint sets of ids below `max_id`
    #[must_use]
    pub fn new(config: CacheConfig, max_id: usize) -> Self {
        let segment_count = config.segments.max(1).next_power_of_two();
        Self {
            hashes: KeyHashes::new(max_id),
            segments: (0..segment_count)
                .map(|_| Mutex::new(Segment::default()))
                .collect(),
            segment_capacity: (config.max_entries / segment_count).max(1),
        }
    }

    /// Order-independent fingerprint of a word set
    ///
    /// # Panics
    /// Panics if a word id is not below the `max_id` the cache was built for.
    #[must_use]
    pub fn min_search_key(&self, words: &[WordId]) -> CacheKey {
        words.iter().fold(CacheKey::default(), |key, w| {
            key ^ self.hashes.words[w.index()]
        })
    }

    /// Fingerprint of a word set evaluated under a fixed next guess
    ///
    /// # Panics
    /// Panics if a word id is not below the `max_id` the cache was built for.
    #[must_use]
    pub fn max_search_key(&self, first_word: WordId, words: &[WordId]) -> CacheKey {
        self.min_search_key(words) ^ self.hashes.first_words[first_word.index()]
    }

    /// Current bounds for `key` at `depth`, inserting an empty entry on a miss
    ///
    /// # Panics
    /// Panics if `depth >= MAX_CACHE_DEPTH`.
    #[must_use]
    pub fn find(&self, depth: usize, key: CacheKey) -> CacheEntry {
        let key = key ^ self.hashes.depths[depth];
        let mut segment = self.segment(key);
        *Self::slot(&mut segment, key, self.segment_capacity)
    }

    /// Refine the bounds for `key` at `depth` with a search result
    ///
    /// # Panics
    /// Panics if `depth >= MAX_CACHE_DEPTH`.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &self,
        depth: usize,
        key: CacheKey,
        num_guesses: i32,
        alpha: i32,
        beta: i32,
        word: WordId,
        optimal: bool,
    ) {
        let key = key ^ self.hashes.depths[depth];
        let mut segment = self.segment(key);
        Self::slot(&mut segment, key, self.segment_capacity)
            .update(num_guesses, alpha, beta, word, optimal);
    }

    /// Entries currently stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        for segment in &self.segments {
            segment
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }

    fn segment(&self, key: CacheKey) -> MutexGuard<'_, Segment> {
        let index = (key.lower as usize) & (self.segments.len() - 1);
        // Entries are plain bounds, a panicking holder cannot leave one torn
        self.segments[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(segment: &mut Segment, key: CacheKey, capacity: usize) -> &mut CacheEntry {
        if segment.len() >= capacity && !segment.contains_key(&key) {
            let mut counter = 0usize;
            segment.retain(|_, _| {
                counter += 1;
                counter % 2 == 0
            });
        }
        segment.entry(key).or_default()
    }
}

/// The two caches of one search session
///
/// `min_search` and `max_search` results live in separate tables because
/// their keys describe different subproblems.
pub struct CachePair {
    pub min_cache: Cache,
    pub max_cache: Cache,
}

impl CachePair {
    #[must_use]
    pub fn new(config: CacheConfig, max_id: usize) -> Self {
        Self {
            min_cache: Cache::new(config, max_id),
            max_cache: Cache::new(config, max_id),
        }
    }

    /// Entries stored across both caches
    #[must_use]
    pub fn len(&self) -> usize {
        self.min_cache.len() + self.max_cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.min_cache.clear();
        self.max_cache.clear();
    }
}
