//! Core domain types for Wordle
//!
//! Words and their interned ids, feedback patterns, and the precomputed
//! pattern table the search runs on.

mod matrix;
mod pattern;
mod word;

pub use matrix::MatchTable;
pub use pattern::{LetterResult, Pattern, PatternError};
pub use word::{Interner, Word, WordError, WordId};
