//! Wordle feedback pattern calculation and representation
//!
//! A pattern encodes the feedback from a guess using base-3 encoding:
//! - 0 = Miss (letter not matched anywhere)
//! - 1 = `WrongPlace` (letter present at an unclaimed position)
//! - 2 = Hit (letter in the correct position)
//!
//! The pattern is stored as a single u8 value (0-242), where each position
//! contributes digit × 3^position to the total.

use super::Word;
use std::fmt;

/// Feedback for a single letter of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterResult {
    Miss,
    WrongPlace,
    Hit,
}

impl LetterResult {
    const fn digit(self) -> u8 {
        match self {
            Self::Miss => 0,
            Self::WrongPlace => 1,
            Self::Hit => 2,
        }
    }

    const fn from_digit(digit: u8) -> Self {
        match digit {
            2 => Self::Hit,
            1 => Self::WrongPlace,
            _ => Self::Miss,
        }
    }

    const fn symbol(self) -> char {
        match self {
            Self::Hit => 'G',
            Self::WrongPlace => 'Y',
            Self::Miss => '-',
        }
    }

    fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            'G' | 'g' | '🟩' | '!' => Some(Self::Hit),
            'Y' | 'y' | '🟨' | '?' => Some(Self::WrongPlace),
            '-' | '_' | '⬜' | 'X' | 'x' => Some(Self::Miss),
            _ => None,
        }
    }
}

/// Error returned when parsing a feedback code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    InvalidLength(usize),
    InvalidSymbol(char),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "Feedback must have exactly 5 symbols, got {len}")
            }
            Self::InvalidSymbol(ch) => write!(
                f,
                "Invalid feedback symbol '{ch}' (use G/!/🟩, Y/?/🟨 or -/X/⬜)"
            ),
        }
    }
}

impl std::error::Error for PatternError {}

/// Feedback pattern for a Wordle guess
///
/// Represents the colored feedback as a single byte value.
/// Value range: 0-242 (3^5 - 1 = 243 possible patterns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern(u8);

impl Pattern {
    /// All hits (perfect match)
    pub const PERFECT: Self = Self(242); // 2 + 2×3 + 2×9 + 2×27 + 2×81

    /// Number of bucket slots needed to partition by pattern code
    pub const BUCKETS: usize = 256;

    /// Create a new pattern from a raw value
    ///
    /// # Panics
    /// Panics in debug mode if value >= 243
    #[inline]
    #[must_use]
    pub const fn new(value: u8) -> Self {
        debug_assert!(value < 243, "Pattern value must be < 243");
        Self(value)
    }

    /// Get the raw pattern value (0-242)
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_perfect(self) -> bool {
        self.0 == Self::PERFECT.0
    }

    /// Calculate the pattern when `guess` is played against `secret`
    ///
    /// Position i is a Hit if the letters match. Otherwise it is
    /// `WrongPlace` if the guess letter occurs at some secret position j
    /// that is neither a Hit nor already claimed by an earlier
    /// `WrongPlace`, and claims j. Everything else is a Miss.
    ///
    /// # Examples
    /// ```
    /// use wordle_minimax::core::{Word, Pattern};
    ///
    /// let guess = Word::new("crane").unwrap();
    /// let secret = Word::new("slate").unwrap();
    /// let pattern = Pattern::calculate(&guess, &secret);
    ///
    /// // C(miss) R(miss) A(hit) N(miss) E(hit)
    /// // 0 + 0×3 + 2×9 + 0×27 + 2×81 = 180
    /// assert_eq!(pattern.value(), 180);
    /// ```
    #[must_use]
    pub fn calculate(guess: &Word, secret: &Word) -> Self {
        let guess = guess.chars();
        let secret = secret.chars();
        let mut claimed = [false; 5];
        let mut letters = [LetterResult::Miss; 5];

        // Allow: i and j index guess, secret and claimed together
        #[allow(clippy::needless_range_loop)]
        for i in 0..5 {
            if guess[i] == secret[i] {
                letters[i] = LetterResult::Hit;
                continue;
            }
            let spot =
                (0..5).find(|&j| !claimed[j] && guess[j] != secret[j] && guess[i] == secret[j]);
            if let Some(j) = spot {
                claimed[j] = true;
                letters[i] = LetterResult::WrongPlace;
            }
        }

        Self::from_letters(&letters)
    }

    /// Encode per-letter feedback as a pattern
    #[must_use]
    pub fn from_letters(letters: &[LetterResult; 5]) -> Self {
        let mut pattern = 0u8;
        let mut multiplier = 1u8;
        for letter in letters {
            pattern += letter.digit() * multiplier;
            multiplier = multiplier.saturating_mul(3);
        }
        Self(pattern)
    }

    /// Decode into per-letter feedback
    #[must_use]
    pub fn letters(self) -> [LetterResult; 5] {
        let mut result = [LetterResult::Miss; 5];
        let mut val = self.0;
        for letter in &mut result {
            *letter = LetterResult::from_digit(val % 3);
            val /= 3;
        }
        result
    }

    #[must_use]
    pub fn count_hits(self) -> usize {
        self.letters()
            .iter()
            .filter(|&&l| l == LetterResult::Hit)
            .count()
    }

    #[must_use]
    pub fn count_wrong_place(self) -> usize {
        self.letters()
            .iter()
            .filter(|&&l| l == LetterResult::WrongPlace)
            .count()
    }

    /// Parse a feedback code like "GY-G-", "!?X!X" or "🟩🟨⬜🟩⬜"
    ///
    /// # Errors
    /// Returns `PatternError` on any length other than 5 or an unknown symbol.
    ///
    /// # Examples
    /// ```
    /// use wordle_minimax::core::Pattern;
    ///
    /// let p1 = Pattern::parse("GY-GY").unwrap();
    /// let p2 = Pattern::parse("!?X!?").unwrap();
    /// assert_eq!(p1, p2);
    /// assert!(Pattern::parse("GYG").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 5 {
            return Err(PatternError::InvalidLength(chars.len()));
        }

        let mut letters = [LetterResult::Miss; 5];
        for (letter, &ch) in letters.iter_mut().zip(&chars) {
            *letter = LetterResult::from_symbol(ch).ok_or(PatternError::InvalidSymbol(ch))?;
        }
        Ok(Self::from_letters(&letters))
    }

    /// Text code using G/Y/-
    #[must_use]
    pub fn code(self) -> String {
        self.letters().iter().map(|l| l.symbol()).collect()
    }

    #[must_use]
    pub fn to_emoji(self) -> String {
        self.letters()
            .iter()
            .map(|l| match l {
                LetterResult::Hit => '🟩',
                LetterResult::WrongPlace => '🟨',
                LetterResult::Miss => '⬜',
            })
            .collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl std::str::FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
