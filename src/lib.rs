//! Wordle Minimax
//!
//! An adversarial Wordle solver: a depth-limited alpha-beta search over
//! guesses and the secrets they cannot tell apart, backed by a precomputed
//! pattern table and shared transposition caches.
//!
//! # Quick Start
//!
//! ```rust
//! use wordle_minimax::session::Session;
//! use wordle_minimax::solver::CacheConfig;
//!
//! let words = ["crane", "crate", "grate", "irate", "slate"];
//! let session = Session::load(&words, &[], false, CacheConfig::small()).unwrap();
//!
//! let mut engine = session.engine(false);
//! let best = engine.search(session.state(), 3).unwrap();
//! println!(
//!     "{} solves every secret within {} guesses",
//!     session.interner().text(best.best_guess),
//!     best.num_guesses
//! );
//! ```

// Core domain types
pub mod core;

// Search engine, caches and simulation
pub mod solver;

// Loaded dictionary and game history
pub mod session;

// Word lists
pub mod wordlists;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;
