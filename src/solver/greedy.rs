//! Greedy worst-case heuristic
//!
//! Scores a guess by the largest group of secrets it leaves together. Used
//! as the search's leaf evaluation and to order candidates before the
//! expensive recursive evaluation.

use super::engine::SearchResult;
use crate::core::{MatchTable, Pattern, WordId};

/// Size of the largest group `candidate` leaves, plus one secret in it
///
/// The secret equal to the candidate is ignored since guessing it ends the
/// game. Scanning stops as soon as the running worst reaches `beta`, so the
/// count is exact only below `beta`. The witness is `None` only when every
/// secret equals the candidate.
///
/// # Examples
/// ```
/// use wordle_minimax::core::{Interner, MatchTable};
/// use wordle_minimax::solver::worst_remaining_after_one_guess;
///
/// let mut interner = Interner::new();
/// let ids = interner.intern_all(&["crane", "crate", "grate", "irate"]).unwrap();
/// let table = MatchTable::build(&interner);
///
/// // "crane" tells crate apart, grate and irate stay together
/// let (worst, witness) = worst_remaining_after_one_guess(&table, ids[0], &ids, 10);
/// assert_eq!(worst, 2);
/// assert!(witness.is_some());
/// ```
#[must_use]
pub fn worst_remaining_after_one_guess(
    table: &MatchTable,
    candidate: WordId,
    secrets: &[WordId],
    beta: usize,
) -> (usize, Option<WordId>) {
    let mut buckets = [0usize; Pattern::BUCKETS];
    let mut worst = 0;
    let mut witness = None;

    for &secret in secrets {
        if secret == candidate {
            continue;
        }
        let count = &mut buckets[table.get(candidate, secret).index()];
        *count += 1;
        if *count > worst {
            worst = *count;
            witness = Some(secret);
            if worst >= beta {
                break;
            }
        }
    }

    (worst, witness)
}

/// Pick the guess with the smallest worst-case group
///
/// Only guesses strictly better than `beta` are considered; ties go to the
/// first one found. The result counts this guess plus one more per secret
/// left in the worst group, and is optimal only when that total is at most
/// two. If nothing beats `beta` the guess is `WordId::EMPTY` and the count
/// is `beta + 1`, a bound rather than a strategy.
///
/// # Examples
/// ```
/// use wordle_minimax::core::{Interner, MatchTable};
/// use wordle_minimax::solver::pick_greedy_guess;
///
/// let mut interner = Interner::new();
/// let ids = interner.intern_all(&["abcde", "fghij"]).unwrap();
/// let table = MatchTable::build(&interner);
///
/// let result = pick_greedy_guess(&table, &ids, &ids, 10);
/// assert_eq!(result.best_guess, ids[0]);
/// assert_eq!(result.num_guesses, 2);
/// assert!(result.is_optimal);
/// ```
#[must_use]
pub fn pick_greedy_guess(
    table: &MatchTable,
    allowed: &[WordId],
    secrets: &[WordId],
    beta: i32,
) -> SearchResult {
    if let [only] = secrets {
        return SearchResult::new(*only, 1, true);
    }

    let mut best_guess = WordId::EMPTY;
    let mut best_worst = usize::try_from(beta).unwrap_or(0);

    for &candidate in allowed {
        let (worst, _) = worst_remaining_after_one_guess(table, candidate, secrets, best_worst);
        if worst < best_worst {
            best_guess = candidate;
            best_worst = worst;
            if best_worst <= 1 {
                break;
            }
        }
    }

    let num_guesses = i32::try_from(best_worst).map_or(i32::MAX, |w| w.saturating_add(1));
    SearchResult::new(best_guess, num_guesses, num_guesses <= 2)
}
