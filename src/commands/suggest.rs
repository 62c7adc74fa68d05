//! Suggestion command
//!
//! Replays a game from `guess pattern` lines, read from a file or typed in,
//! and on `go` ranks every allowed guess of the current position.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use rayon::prelude::*;

use super::Interrupter;
use super::evaluate::{create_progress_bar, evaluate_word};
use crate::core::{Pattern, WordId};
use crate::output::{print_remaining, print_suggestions};
use crate::session::Session;
use crate::solver::{CancelToken, EngineError, WordInfo};

/// Configuration for thinking about the current position
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    pub initial_depth: usize,
    pub max_depth: usize,
    /// Words shown after thinking
    pub top: usize,
    /// Stop deepening after this long
    pub time_limit: Option<Duration>,
    pub show_progress: bool,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            initial_depth: 1,
            max_depth: 15,
            top: 32,
            time_limit: None,
            show_progress: true,
        }
    }
}

/// One line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestCommand {
    Guess { word: String, pattern: Pattern },
    Undo,
    Go,
    Quit,
}

/// Ranked guesses for one position
pub struct Suggestions {
    /// Lowest average first, ties by word
    pub ranked: Vec<WordInfo>,
    pub total: usize,
    pub cancelled: bool,
}

/// Parse one input line; blank lines and `#` comments yield `None`
///
/// # Errors
/// Returns an error for an unknown command or a malformed pattern.
///
/// # Examples
/// ```
/// use wordle_minimax::commands::{SuggestCommand, parse_command};
///
/// assert_eq!(parse_command("go").unwrap(), Some(SuggestCommand::Go));
/// assert!(matches!(
///     parse_command("crane G-Y--").unwrap(),
///     Some(SuggestCommand::Guess { .. })
/// ));
/// assert_eq!(parse_command("  # note").unwrap(), None);
/// ```
pub fn parse_command(line: &str) -> Result<Option<SuggestCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [cmd] => match cmd.to_lowercase().as_str() {
            "go" | "g" => Ok(Some(SuggestCommand::Go)),
            "undo" | "u" | "back" => Ok(Some(SuggestCommand::Undo)),
            "quit" | "q" | "exit" => Ok(Some(SuggestCommand::Quit)),
            _ => Err(format!("Unknown command '{cmd}'")),
        },
        [word, pattern] => {
            let pattern = Pattern::parse(pattern).map_err(|e| format!("Invalid pattern: {e}"))?;
            Ok(Some(SuggestCommand::Guess {
                word: word.to_lowercase(),
                pattern,
            }))
        }
        _ => Err(format!("Expected 'guess pattern', got '{line}'")),
    }
}

/// Rank every allowed guess of the session's current position
///
/// Each word is deepened in parallel from `initial_depth` until its strategy
/// is proven or `max_depth` is reached, keeping its best simulation. Words not
/// started before cancellation are left out.
///
/// # Errors
/// Returns an error if the position has no secrets or a search fails.
pub fn think(
    session: &Session,
    config: &SuggestConfig,
    cancel: &CancelToken,
) -> Result<Suggestions, String> {
    think_with(session, config, cancel, |_| {})
}

/// [`think`], calling `on_finish` as each word's strategy is settled
///
/// # Errors
/// Returns an error if the position has no secrets or a search fails.
pub fn think_with<F>(
    session: &Session,
    config: &SuggestConfig,
    cancel: &CancelToken,
    on_finish: F,
) -> Result<Suggestions, String>
where
    F: Fn(&WordInfo) + Sync,
{
    let state = session.state();
    if state.possible_secrets().is_empty() {
        return Err("No remaining secrets".to_string());
    }
    let interner = session.interner();
    let words: &[WordId] = state.allowed_guesses();
    let depths = config.initial_depth.max(1)..=config.max_depth;

    let progress = create_progress_bar(words.len() as u64, config.show_progress);

    let outcomes: Vec<Result<Option<WordInfo>, EngineError>> = words
        .par_iter()
        .map(|&word| {
            let mut engine = session.engine(false);
            let best = evaluate_word(&mut engine, state, word, depths.clone(), cancel);
            progress.inc(1);
            if let Ok(Some(info)) = &best {
                on_finish(info);
            }
            best
        })
        .collect();

    progress.finish_and_clear();

    let mut ranked = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        ranked.extend(outcome.map_err(|e| format!("Search failed: {e}"))?);
    }
    ranked.sort_by(|a, b| {
        a.avg_guesses
            .total_cmp(&b.avg_guesses)
            .then_with(|| interner.text(a.first_guess).cmp(interner.text(b.first_guess)))
    });

    Ok(Suggestions {
        ranked,
        total: words.len(),
        cancelled: cancel.is_cancelled(),
    })
}

/// Run the suggestion command
///
/// With `guesses_file`, its lines are replayed and the command exits at the
/// end of the file; otherwise lines are read interactively. Each `go` arms
/// `interrupter`, so Ctrl-C stops thinking and shows the partial ranking.
///
/// # Errors
///
/// Returns an error if:
/// - The guesses file cannot be read or holds an invalid line
/// - Reading standard input fails
/// - Thinking fails
pub fn run_suggest(
    session: &mut Session,
    config: &SuggestConfig,
    guesses_file: Option<&Path>,
    interrupter: &Interrupter,
) -> Result<(), String> {
    match guesses_file {
        Some(path) => replay_file(session, config, path, interrupter),
        None => run_interactive(session, config, interrupter),
    }
}

fn replay_file(
    session: &mut Session,
    config: &SuggestConfig,
    path: &Path,
    interrupter: &Interrupter,
) -> Result<(), String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("Cannot read {}: {e}", path.display()))?;

    for (i, line) in text.lines().enumerate() {
        let command = parse_command(line).map_err(|e| format!("Line {}: {e}", i + 1))?;
        match command {
            Some(SuggestCommand::Quit) => break,
            Some(command) => {
                apply(session, config, command, interrupter)
                    .map_err(|e| format!("Line {}: {e}", i + 1))?;
            }
            None => {}
        }
    }
    Ok(())
}

fn run_interactive(
    session: &mut Session,
    config: &SuggestConfig,
    interrupter: &Interrupter,
) -> Result<(), String> {
    println!("\n{}", "─".repeat(60).cyan());
    println!("{}", "Wordle Minimax - Suggestions".bright_yellow().bold());
    println!("{}", "─".repeat(60).cyan());
    println!("Enter 'guess pattern' (e.g. 'crane G-Y--'), 'go' to think,");
    println!("'undo' to take back a guess, 'quit' to exit.\n");
    print_remaining(session);

    while let Some(line) = get_user_input("Command")? {
        match parse_command(&line) {
            Ok(Some(SuggestCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = apply(session, config, command, interrupter) {
                    println!("{} {e}\n", "Error:".red().bold());
                }
            }
            Ok(None) => {}
            Err(e) => println!("{} {e}\n", "Error:".red().bold()),
        }
    }
    Ok(())
}

fn apply(
    session: &mut Session,
    config: &SuggestConfig,
    command: SuggestCommand,
    interrupter: &Interrupter,
) -> Result<(), String> {
    match command {
        SuggestCommand::Guess { word, pattern } => {
            session.make_guess(&word, pattern).map_err(|e| e.to_string())?;
            println!("{} {}", word.to_uppercase().bold(), pattern.to_emoji());
            print_remaining(session);
        }
        SuggestCommand::Undo => {
            if session.back() {
                println!("Undone.");
                print_remaining(session);
            } else {
                println!("Nothing to undo!\n");
            }
        }
        SuggestCommand::Go => {
            let cancel = interrupter.arm(config.time_limit);
            let suggestions = think(session, config, &cancel);
            interrupter.disarm();
            let suggestions = suggestions?;
            if suggestions.cancelled {
                println!("{}", "Thinking interrupted".yellow());
            }
            print_suggestions(&suggestions, session.interner(), config.top);
        }
        SuggestCommand::Quit => {}
    }
    Ok(())
}

/// Read one trimmed line, `None` at end of input
fn get_user_input(prompt: &str) -> Result<Option<String>, String> {
    print!("{prompt}: ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .map_err(|e| e.to_string())?;

    Ok((read > 0).then(|| input.trim().to_string()))
}
