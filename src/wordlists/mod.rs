//! Dictionaries for Wordle solving
//!
//! Word lists are read from text files at runtime.

pub mod loader;

pub use loader::{DictionaryError, load_words, parse_words, words_from_slice};
