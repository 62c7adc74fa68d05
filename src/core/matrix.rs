//! Precomputed guess × secret pattern table
//!
//! The search looks up patterns millions of times, so every pair of interned
//! words is computed once up front. The table is read-only afterwards and is
//! only valid for the interner epoch it was built from.

use super::{Interner, Pattern, WordId};
use rayon::prelude::*;

/// Dense pattern matrix indexed by `WordId`
#[derive(Debug, Clone)]
pub struct MatchTable {
    size: usize,
    cells: Vec<Pattern>,
}

impl MatchTable {
    /// Compute the pattern of every (guess, secret) pair of interned words
    ///
    /// Rows involving the reserved empty id hold pattern 0.
    ///
    /// # Examples
    /// ```
    /// use wordle_minimax::core::{Interner, MatchTable, Pattern};
    ///
    /// let mut interner = Interner::new();
    /// let crane = interner.intern("crane").unwrap();
    /// let slate = interner.intern("slate").unwrap();
    /// let table = MatchTable::build(&interner);
    ///
    /// assert_eq!(table.get(crane, crane), Pattern::PERFECT);
    /// assert_eq!(table.get(crane, slate).value(), 180);
    /// ```
    #[must_use]
    pub fn build(interner: &Interner) -> Self {
        let size = interner.max_id();
        let words: Vec<_> = (0..size)
            .map(|i| {
                u16::try_from(i)
                    .ok()
                    .and_then(|id| interner.word(WordId::from_raw(id)))
            })
            .collect();

        let cells = words
            .par_iter()
            .flat_map_iter(|guess| {
                words.iter().map(move |secret| match (guess, secret) {
                    (Some(g), Some(s)) => Pattern::calculate(g, s),
                    _ => Pattern::new(0),
                })
            })
            .collect();

        Self { size, cells }
    }

    /// Pattern produced by `guess` against `secret`
    ///
    /// # Panics
    /// Panics if either id was not issued by the interner the table was
    /// built from.
    #[inline]
    #[must_use]
    pub fn get(&self, guess: WordId, secret: WordId) -> Pattern {
        self.cells[guess.index() * self.size + secret.index()]
    }

    /// Candidates that would produce `pattern` against `guess`, in order
    #[must_use]
    pub fn eliminate(&self, candidates: &[WordId], guess: WordId, pattern: Pattern) -> Vec<WordId> {
        candidates
            .iter()
            .copied()
            .filter(|&c| self.get(guess, c) == pattern)
            .collect()
    }

    /// Number of ids covered (the interner's `max_id` at build time)
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Word;

    fn setup(words: &[&str]) -> (Interner, Vec<WordId>, MatchTable) {
        let mut interner = Interner::new();
        let ids = interner.intern_all(words).unwrap();
        let table = MatchTable::build(&interner);
        (interner, ids, table)
    }

    #[test]
    fn table_matches_direct_calculation() {
        let words = ["crane", "slate", "speed", "erase", "robot", "floor"];
        let (interner, ids, table) = setup(&words);

        for &g in &ids {
            for &s in &ids {
                let expected = Pattern::calculate(
                    &Word::new(interner.text(g)).unwrap(),
                    &Word::new(interner.text(s)).unwrap(),
                );
                assert_eq!(table.get(g, s), expected);
            }
        }
    }

    #[test]
    fn table_size_covers_empty_id() {
        let (_, _, table) = setup(&["crane", "slate"]);
        assert_eq!(table.size(), 3);
        assert_eq!(table.get(WordId::EMPTY, WordId::EMPTY), Pattern::new(0));
    }

    #[test]
    fn eliminate_is_sound() {
        let words = ["crane", "crate", "grate", "irate", "slate", "trace"];
        let (_, ids, table) = setup(&words);
        let guess = ids[0];

        for &secret in &ids {
            let pattern = table.get(guess, secret);
            let kept = table.eliminate(&ids, guess, pattern);

            assert!(kept.contains(&secret));
            for &c in &ids {
                assert_eq!(kept.contains(&c), table.get(guess, c) == pattern);
            }
        }
    }

    #[test]
    fn eliminate_perfect_keeps_only_guess() {
        let (_, ids, table) = setup(&["crane", "crate", "grate"]);
        assert_eq!(table.eliminate(&ids, ids[1], Pattern::PERFECT), vec![ids[1]]);
    }
}
