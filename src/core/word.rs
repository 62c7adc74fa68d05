//! Wordle word representation and interning
//!
//! A `Word` is a validated 5-letter lowercase word. The `Interner` maps word
//! text to small dense `WordId`s that the search uses as array indices and
//! hash keys.

use rustc_hash::FxHashMap;
use std::fmt;

/// A validated 5-letter Wordle word
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word {
    text: String,
    chars: [u8; 5],
}

/// Error type for invalid words
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    InvalidLength(usize),
    NonAscii,
    InvalidCharacters,
    TooManyWords,
}

impl fmt::Display for WordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "Word must be exactly 5 letters, got {len}")
            }
            Self::NonAscii => write!(f, "Word must contain only ASCII letters"),
            Self::InvalidCharacters => write!(f, "Word contains invalid characters"),
            Self::TooManyWords => write!(f, "Too many distinct words to intern"),
        }
    }
}

impl std::error::Error for WordError {}

impl Word {
    /// Create a new Word from a string
    ///
    /// # Errors
    /// Returns `WordError` if:
    /// - Length is not exactly 5
    /// - Contains non-ASCII characters
    /// - Contains non-alphabetic characters
    ///
    /// # Examples
    /// ```
    /// use wordle_minimax::core::Word;
    ///
    /// let word = Word::new("crane").unwrap();
    /// assert_eq!(word.text(), "crane");
    ///
    /// assert!(Word::new("too long").is_err());
    /// assert!(Word::new("sh0rt").is_err());
    /// ```
    pub fn new(text: impl Into<String>) -> Result<Self, WordError> {
        let text: String = text.into().to_lowercase();

        if !text.is_ascii() {
            return Err(WordError::NonAscii);
        }

        let chars: [u8; 5] = text
            .as_bytes()
            .try_into()
            .map_err(|_| WordError::InvalidLength(text.len()))?;

        if !chars.iter().all(u8::is_ascii_lowercase) {
            return Err(WordError::InvalidCharacters);
        }

        Ok(Self { text, chars })
    }

    /// Get the word as a string slice
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the word as a byte array
    #[inline]
    #[must_use]
    pub const fn chars(&self) -> &[u8; 5] {
        &self.chars
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Dense identifier of an interned word
///
/// Id 0 is reserved for the empty word. Ids are only meaningful for the
/// `Interner` that issued them, and only until that interner is reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(u16);

impl WordId {
    /// The reserved empty/invalid word
    pub const EMPTY: Self = Self(0);

    #[inline]
    #[must_use]
    pub(crate) const fn from_raw(id: u16) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Position of this id in dense per-word tables
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Bidirectional word text <-> `WordId` mapping
///
/// # Examples
/// ```
/// use wordle_minimax::core::Interner;
///
/// let mut interner = Interner::new();
/// let crane = interner.intern("crane").unwrap();
/// assert_eq!(interner.intern("CRANE").unwrap(), crane);
/// assert_eq!(interner.text(crane), "crane");
/// assert_eq!(interner.max_id(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interner {
    ids: FxHashMap<String, WordId>,
    // words[i] holds the word with id i + 1
    words: Vec<Word>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `text`, assigning the next free id on first sight
    ///
    /// # Errors
    /// Returns `WordError` if the text is not a valid word or the id space
    /// is exhausted.
    pub fn intern(&mut self, text: &str) -> Result<WordId, WordError> {
        let word = Word::new(text)?;
        if let Some(&id) = self.ids.get(word.text()) {
            return Ok(id);
        }

        let next = u16::try_from(self.words.len() + 1).map_err(|_| WordError::TooManyWords)?;
        let id = WordId(next);
        self.ids.insert(word.text().to_string(), id);
        self.words.push(word);
        Ok(id)
    }

    /// Look up an already interned word without inserting
    #[must_use]
    pub fn lookup(&self, text: &str) -> Option<WordId> {
        self.ids.get(text.to_lowercase().as_str()).copied()
    }

    #[must_use]
    pub fn word(&self, id: WordId) -> Option<&Word> {
        id.index().checked_sub(1).and_then(|i| self.words.get(i))
    }

    /// Text of an interned word; empty for `WordId::EMPTY` or unknown ids
    #[must_use]
    pub fn text(&self, id: WordId) -> &str {
        self.word(id).map_or("", Word::text)
    }

    /// One past the largest issued id (the reserved empty id included)
    #[must_use]
    pub fn max_id(&self) -> usize {
        self.words.len() + 1
    }

    /// Number of interned words
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Start a new epoch; every previously issued id becomes invalid
    pub fn reset(&mut self) {
        self.ids.clear();
        self.words.clear();
    }

    /// Intern every word of a list, preserving order
    ///
    /// # Errors
    /// Fails on the first invalid word.
    pub fn intern_all<S: AsRef<str>>(&mut self, words: &[S]) -> Result<Vec<WordId>, WordError> {
        words.iter().map(|w| self.intern(w.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_creation_valid() {
        let word = Word::new("crane").unwrap();
        assert_eq!(word.text(), "crane");
        assert_eq!(word.chars(), b"crane");
    }

    #[test]
    fn word_creation_uppercase_normalized() {
        let word = Word::new("CRANE").unwrap();
        assert_eq!(word.text(), "crane");

        let word2 = Word::new("CrAnE").unwrap();
        assert_eq!(word2.text(), "crane");
    }

    #[test]
    fn word_creation_invalid_length() {
        assert!(matches!(
            Word::new("too long"),
            Err(WordError::InvalidLength(8))
        ));
        assert!(matches!(
            Word::new("shrt"),
            Err(WordError::InvalidLength(4))
        ));
        assert!(matches!(Word::new(""), Err(WordError::InvalidLength(0))));
    }

    #[test]
    fn word_creation_invalid_characters() {
        assert!(Word::new("cran3").is_err());
        assert!(Word::new("cran ").is_err());
        assert!(Word::new("cran!").is_err());
        assert!(matches!(Word::new("cranë"), Err(WordError::NonAscii)));
    }

    #[test]
    fn word_display() {
        let word = Word::new("crane").unwrap();
        assert_eq!(format!("{word}"), "crane");
    }

    #[test]
    fn interner_assigns_dense_ids() {
        let mut interner = Interner::new();
        let a = interner.intern("crane").unwrap();
        let b = interner.intern("slate").unwrap();

        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 2);
        assert_eq!(interner.max_id(), 3);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn interner_is_idempotent() {
        let mut interner = Interner::new();
        let a = interner.intern("crane").unwrap();
        let again = interner.intern("Crane").unwrap();

        assert_eq!(a, again);
        assert_eq!(interner.len(), 1);
        assert_eq!(interner.lookup("CRANE"), Some(a));
        assert_eq!(interner.lookup("slate"), None);
    }

    #[test]
    fn interner_rejects_bad_words() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern("abc"), Err(WordError::InvalidLength(3)));
        assert!(interner.is_empty());
    }

    #[test]
    fn empty_id_has_no_text() {
        let mut interner = Interner::new();
        interner.intern("crane").unwrap();

        assert!(WordId::EMPTY.is_empty());
        assert_eq!(interner.text(WordId::EMPTY), "");
        assert!(interner.word(WordId::EMPTY).is_none());
    }

    #[test]
    fn interner_reset_starts_new_epoch() {
        let mut interner = Interner::new();
        interner.intern("crane").unwrap();
        interner.intern("slate").unwrap();

        interner.reset();
        assert!(interner.is_empty());
        assert_eq!(interner.lookup("crane"), None);

        let id = interner.intern("slate").unwrap();
        assert_eq!(id.index(), 1);
    }

    #[test]
    fn intern_all_preserves_order() {
        let mut interner = Interner::new();
        let ids = interner.intern_all(&["slate", "crane", "slate"]).unwrap();

        assert_eq!(ids[0], ids[2]);
        assert_eq!(interner.text(ids[1]), "crane");
    }
}
