//! Dictionary loading
//!
//! Dictionaries are plain text files of whitespace separated words. Every
//! word must be a valid five-letter word; the first bad one fails the load.

use crate::core::{Word, WordError};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for dictionary loading
#[derive(Debug)]
pub enum DictionaryError {
    Io { path: PathBuf, source: io::Error },
    InvalidWord {
        position: usize,
        word: String,
        source: WordError,
    },
}

impl fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
            Self::InvalidWord {
                position,
                word,
                source,
            } => write!(f, "Invalid word '{word}' at position {position}: {source}"),
        }
    }
}

impl std::error::Error for DictionaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidWord { source, .. } => Some(source),
        }
    }
}

/// Load a dictionary file
///
/// # Errors
///
/// Returns `DictionaryError::Io` if the file cannot be read and
/// `DictionaryError::InvalidWord` for the first word that is not exactly five
/// letters.
///
/// # Examples
/// ```no_run
/// use wordle_minimax::wordlists::loader::load_words;
///
/// let words = load_words("data/allowed.txt").unwrap();
/// println!("Loaded {} words", words.len());
/// ```
pub fn load_words<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DictionaryError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_words(&content)
}

/// Split dictionary text into validated, lowercased words
///
/// # Errors
///
/// Returns `DictionaryError::InvalidWord` for the first malformed word,
/// with its 1-based position.
pub fn parse_words(content: &str) -> Result<Vec<String>, DictionaryError> {
    content
        .split_whitespace()
        .enumerate()
        .map(|(i, raw)| {
            Word::new(raw)
                .map(|w| w.text().to_string())
                .map_err(|source| DictionaryError::InvalidWord {
                    position: i + 1,
                    word: raw.to_string(),
                    source,
                })
        })
        .collect()
}

/// Validate an in-memory word list
///
/// # Errors
///
/// Same as `parse_words`.
///
/// # Examples
/// ```
/// use wordle_minimax::wordlists::loader::words_from_slice;
///
/// let words = words_from_slice(&["CRANE", "slate"]).unwrap();
/// assert_eq!(words, vec!["crane", "slate"]);
/// assert!(words_from_slice(&["crane", "toolong"]).is_err());
/// ```
pub fn words_from_slice(slice: &[&str]) -> Result<Vec<String>, DictionaryError> {
    parse_words(&slice.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_any_whitespace() {
        let words = parse_words("crane slate\n irate\t\ttrace\r\n").unwrap();
        assert_eq!(words, vec!["crane", "slate", "irate", "trace"]);
    }

    #[test]
    fn parse_lowercases() {
        assert_eq!(parse_words("CrAnE").unwrap(), vec!["crane"]);
    }

    #[test]
    fn parse_reports_bad_word_position() {
        let err = parse_words("crane slate abc irate").unwrap_err();
        assert!(matches!(
            err,
            DictionaryError::InvalidWord {
                position: 3,
                ref word,
                source: WordError::InvalidLength(3),
            } if word == "abc"
        ));
        assert!(err.to_string().contains("position 3"));
    }

    #[test]
    fn parse_rejects_non_letters() {
        assert!(matches!(
            parse_words("cran3"),
            Err(DictionaryError::InvalidWord { position: 1, .. })
        ));
    }

    #[test]
    fn parse_empty() {
        assert!(parse_words("  \n ").unwrap().is_empty());
    }

    #[test]
    fn load_missing_file() {
        let err = load_words("/nonexistent/dictionary.txt").unwrap_err();
        assert!(matches!(err, DictionaryError::Io { .. }));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("wordle_minimax_{}.txt", std::process::id()));
        fs::write(&path, "crane\nslate\n").unwrap();

        let words = load_words(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(words, vec!["crane", "slate"]);
    }
}
