//! First-guess evaluation command
//!
//! Scores the most promising first guesses of a game by replaying the
//! engine's strategy against every secret, deepening each word's search
//! until its strategy is proven.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::core::{Interner, WordId};
use crate::session::Session;
use crate::solver::{CancelToken, Engine, EngineError, GameState, Simulator, WordInfo, WordReport};

/// Configuration for an evaluation run
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    /// First guesses to evaluate, taken in greedy order
    pub max_words: usize,
    /// Deepest search tried for each word
    pub max_depth: usize,
    /// Directory for the JSON snapshot, none to skip writing it
    pub solutions_dir: Option<PathBuf>,
    /// Strategies kept in the snapshot
    pub solutions_max_words: usize,
    /// Minimum time between snapshots written while words are running
    pub snapshot_interval: Duration,
    /// Print the engine's root decisions
    pub verbose: bool,
    pub show_progress: bool,
}

impl Default for EvaluateConfig {
    fn default() -> Self {
        Self {
            max_words: 100,
            max_depth: 15,
            solutions_dir: None,
            solutions_max_words: 100,
            snapshot_interval: Duration::from_secs(60),
            verbose: false,
            show_progress: true,
        }
    }
}

/// Evaluated first guesses, best first
pub struct EvaluateResult {
    pub fingerprint: String,
    pub strategies: Vec<WordInfo>,
    /// Words that were queued for evaluation
    pub requested: usize,
    /// Words whose search failed, skipped in `strategies`
    pub failed: Vec<String>,
    pub cancelled: bool,
    /// Root choice ranks merged over every worker
    pub rank_distribution: Vec<u64>,
    pub snapshot: Option<PathBuf>,
    /// Snapshots written during the run, the final one included
    pub snapshots_written: usize,
}

/// Evaluate the best first guesses of the session's current game
///
/// Words run in parallel, each on its own engine sharing the session's
/// caches. Finished strategies are snapshotted at most once per
/// `snapshot_interval` and once more at the end. A word whose search fails
/// is reported and skipped. A cancelled run still returns and stores
/// whatever finished.
///
/// # Errors
///
/// Returns an error if:
/// - The game has no remaining secrets
/// - The final snapshot cannot be written
pub fn run_evaluate(
    session: &Session,
    config: &EvaluateConfig,
    cancel: &CancelToken,
) -> Result<EvaluateResult, String> {
    let depths = 1..=config.max_depth;
    evaluate_each(session, config, cancel, |engine, state, word| {
        evaluate_word(engine, state, word, depths.clone(), cancel)
    })
}

fn evaluate_each<F>(
    session: &Session,
    config: &EvaluateConfig,
    cancel: &CancelToken,
    evaluate: F,
) -> Result<EvaluateResult, String>
where
    F: Fn(&mut Engine<'_>, &GameState, WordId) -> Result<Option<WordInfo>, EngineError> + Sync,
{
    let interner = session.interner();
    let mut state = session.state().clone();
    if state.possible_secrets().is_empty() {
        return Err("No remaining secrets to evaluate".to_string());
    }
    state.sort_guesses_by_greedy(session.table(), false);

    let words: Vec<WordId> = state
        .allowed_guesses()
        .iter()
        .copied()
        .take(config.max_words)
        .collect();

    let fingerprint = session.cache_key();
    let snapshots = Snapshots::new(config, &fingerprint);
    let finished = Mutex::new(Vec::with_capacity(words.len()));
    let progress = create_progress_bar(words.len() as u64, config.show_progress);

    let outcomes: Vec<Result<Vec<u64>, String>> = words
        .par_iter()
        .map(|&word| {
            let mut engine = session.engine(config.verbose);
            let outcome = evaluate(&mut engine, &state, word);
            progress.inc(1);
            match outcome {
                Ok(Some(info)) => {
                    progress.set_message(format!(
                        "{} {:.4}",
                        interner.text(info.first_guess),
                        info.avg_guesses
                    ));
                    let mut done = lock(&finished);
                    done.push(info);
                    snapshots.write_if_due(&mut done, interner, &progress);
                }
                Ok(None) => {}
                Err(e) => {
                    let text = interner.text(word);
                    progress.suspend(|| eprintln!("{} {text}: {e}", "Word failed:".red()));
                    return Err(text.to_string());
                }
            }
            Ok(engine.rank_distribution().to_vec())
        })
        .collect();

    progress.finish_and_clear();

    let mut failed = Vec::new();
    let mut totals = session.engine(false);
    for outcome in outcomes {
        match outcome {
            Ok(ranks) => totals.merge_ranks(&ranks),
            Err(word) => failed.push(word),
        }
    }

    let mut strategies = finished.into_inner().unwrap_or_else(PoisonError::into_inner);
    strategies.sort_by(|a, b| a.ordering(b, interner));
    let snapshot = snapshots.write(&strategies, interner)?;
    let snapshots_written = snapshots.written.load(Ordering::Relaxed);

    Ok(EvaluateResult {
        fingerprint,
        strategies,
        requested: words.len(),
        failed,
        cancelled: cancel.is_cancelled(),
        rank_distribution: totals.rank_distribution().to_vec(),
        snapshot,
        snapshots_written,
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Snapshot writer shared by the workers of one run
struct Snapshots<'a> {
    dir: Option<&'a Path>,
    fingerprint: &'a str,
    max_words: usize,
    interval: Duration,
    last: Mutex<Instant>,
    written: AtomicUsize,
}

impl<'a> Snapshots<'a> {
    fn new(config: &'a EvaluateConfig, fingerprint: &'a str) -> Self {
        Self {
            dir: config.solutions_dir.as_deref(),
            fingerprint,
            max_words: config.solutions_max_words,
            interval: config.snapshot_interval,
            last: Mutex::new(Instant::now()),
            written: AtomicUsize::new(0),
        }
    }

    /// Rewrite the snapshot if `interval` has passed since the last one
    ///
    /// A failed write is reported and the run carries on.
    fn write_if_due(
        &self,
        strategies: &mut [WordInfo],
        interner: &Interner,
        progress: &ProgressBar,
    ) {
        if self.dir.is_none() {
            return;
        }
        {
            let mut last = lock(&self.last);
            if last.elapsed() < self.interval {
                return;
            }
            *last = Instant::now();
        }
        strategies.sort_by(|a, b| a.ordering(b, interner));
        if let Err(e) = self.write(strategies, interner) {
            progress.suspend(|| eprintln!("{} {e}", "Snapshot failed:".yellow()));
        }
    }

    /// Write the best `max_words` of `strategies`, which must be sorted
    fn write(
        &self,
        strategies: &[WordInfo],
        interner: &Interner,
    ) -> Result<Option<PathBuf>, String> {
        let Some(dir) = self.dir else {
            return Ok(None);
        };
        let kept = &strategies[..strategies.len().min(self.max_words)];
        let path = write_snapshot(dir, self.fingerprint, kept, interner)?;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(Some(path))
    }
}

/// Deepen one first guess through `depths` until its strategy is proven
///
/// Returns the best simulation seen, or `None` when cancelled before the
/// first one finished.
///
/// # Errors
/// Propagates simulation failures.
pub fn evaluate_word(
    engine: &mut Engine<'_>,
    state: &GameState,
    word: WordId,
    depths: RangeInclusive<usize>,
    cancel: &CancelToken,
) -> Result<Option<WordInfo>, EngineError> {
    let interner = engine.interner();
    let mut best: Option<WordInfo> = None;

    for depth in depths {
        if cancel.is_cancelled() {
            break;
        }
        let info = Simulator::new(engine).simulate(state, word, depth)?;
        let can_stop = info.can_stop;
        if best.as_ref().is_none_or(|b| info.is_better_than(b, interner)) {
            best = Some(info);
        }
        if can_stop {
            break;
        }
    }

    Ok(best)
}

/// Write strategies as `<dir>/<fingerprint>.json`
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn write_snapshot(
    dir: &Path,
    fingerprint: &str,
    strategies: &[WordInfo],
    interner: &Interner,
) -> Result<PathBuf, String> {
    fs::create_dir_all(dir).map_err(|e| format!("Cannot create {}: {e}", dir.display()))?;

    let reports: Vec<WordReport> = strategies.iter().map(|s| s.report(interner)).collect();
    let json = serde_json::to_string_pretty(&reports)
        .map_err(|e| format!("Cannot serialize strategies: {e}"))?;

    let path = dir.join(format!("{fingerprint}.json"));
    fs::write(&path, json).map_err(|e| format!("Cannot write {}: {e}", path.display()))?;
    Ok(path)
}

pub(crate) fn create_progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::CacheConfig;

    const ILLS: [&str; 10] = [
        "bills", "fills", "gills", "hills", "kills", "mills", "pills", "sills", "tills", "wills",
    ];

    fn quiet() -> EvaluateConfig {
        EvaluateConfig {
            show_progress: false,
            ..EvaluateConfig::default()
        }
    }

    fn session(words: &[&str]) -> Session {
        Session::load(words, &[], false, CacheConfig::small()).unwrap()
    }

    #[test]
    fn evaluates_every_word_best_first() {
        let session = session(&["abcde", "bacde", "cabde", "acbde"]);
        let result = run_evaluate(&session, &quiet(), &CancelToken::new()).unwrap();

        assert_eq!(result.requested, 4);
        assert_eq!(result.strategies.len(), 4);
        assert!(!result.cancelled);
        for pair in result.strategies.windows(2) {
            assert!(pair[0].avg_guesses <= pair[1].avg_guesses);
        }
        assert_eq!(result.strategies[0].sum_num_guesses, 7);
        assert!(result.strategies.iter().all(|s| s.can_stop));
    }

    #[test]
    fn max_words_limits_evaluation() {
        let session = session(&ILLS);
        let config = EvaluateConfig {
            max_words: 3,
            ..quiet()
        };
        let result = run_evaluate(&session, &config, &CancelToken::new()).unwrap();

        assert_eq!(result.requested, 3);
        assert_eq!(result.strategies.len(), 3);
    }

    #[test]
    fn cancelled_run_returns_nothing() {
        let session = session(&ILLS);
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = run_evaluate(&session, &quiet(), &cancel).unwrap();
        assert!(result.cancelled);
        assert!(result.strategies.is_empty());
    }

    #[test]
    fn deepening_stops_once_proven() {
        let session = session(&["abcde", "fghij"]);
        let mut engine = session.engine(false);
        let word = session.state().allowed_guesses()[0];

        let info = evaluate_word(&mut engine, session.state(), word, 1..=10, &CancelToken::new())
            .unwrap()
            .unwrap();
        assert_eq!(info.max_depth, 1);
        assert!(info.can_stop);
    }

    #[test]
    fn snapshot_is_truncated_json() {
        let session = session(&["abcde", "bacde", "cabde", "acbde"]);
        let dir = std::env::temp_dir().join(format!("wordle_minimax_eval_{}", std::process::id()));
        let config = EvaluateConfig {
            solutions_dir: Some(dir.clone()),
            solutions_max_words: 2,
            ..quiet()
        };

        let result = run_evaluate(&session, &config, &CancelToken::new()).unwrap();
        let path = result.snapshot.unwrap();
        assert_eq!(path, dir.join(format!("{}.json", result.fingerprint)));

        let text = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(
            json[0]["guess"],
            session.interner().text(result.strategies[0].first_guess)
        );

        assert_eq!(result.snapshots_written, 1);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn zero_interval_snapshots_every_finished_word() {
        let session = session(&ILLS);
        let dir =
            std::env::temp_dir().join(format!("wordle_minimax_interval_{}", std::process::id()));
        let config = EvaluateConfig {
            max_words: 4,
            solutions_dir: Some(dir.clone()),
            snapshot_interval: Duration::ZERO,
            ..quiet()
        };

        let result = run_evaluate(&session, &config, &CancelToken::new()).unwrap();
        assert_eq!(result.strategies.len(), 4);
        assert_eq!(result.snapshots_written, 5);
        assert!(result.snapshot.unwrap().exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_word_is_skipped() {
        let session = session(&ILLS);
        let broken = session.interner().lookup("mills").unwrap();

        let result = evaluate_each(&session, &quiet(), &CancelToken::new(), |engine, state, word| {
            if word == broken {
                return Err(EngineError::NoGuessFound);
            }
            evaluate_word(engine, state, word, 1..=15, &CancelToken::new())
        })
        .unwrap();

        assert_eq!(result.requested, 10);
        assert_eq!(result.failed, vec!["mills".to_string()]);
        assert_eq!(result.strategies.len(), 9);
        assert!(result.strategies.iter().all(|s| s.first_guess != broken));
    }
}
