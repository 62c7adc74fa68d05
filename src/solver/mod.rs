//! Wordle search algorithms
//!
//! The adversarial search engine and everything it runs on: puzzle state,
//! the greedy heuristic, the transposition cache, and the simulator that
//! scores whole strategies.

mod cache;
mod cancel;
mod engine;
mod greedy;
mod simulator;
mod state;

pub use cache::{Cache, CacheConfig, CacheEntry, CacheKey, CachePair, MAX_CACHE_DEPTH};
pub use cancel::CancelToken;
pub use engine::{Engine, EngineError, RankSummary, SearchResult, summarize_ranks};
pub use greedy::{pick_greedy_guess, worst_remaining_after_one_guess};
pub use simulator::{Simulator, WordInfo, WordReport};
pub use state::{GameState, Partition, StateError};
