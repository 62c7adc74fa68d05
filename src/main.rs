//! Wordle Minimax - CLI
//!
//! Adversarial Wordle search: suggest guesses, evaluate first guesses and
//! solve known secrets with a depth-limited alpha-beta engine.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use wordle_minimax::{
    commands::{
        EvaluateConfig, Interrupter, SolveConfig, SuggestConfig, run_evaluate, run_suggest,
        solve_word,
    },
    output::{print_evaluate_result, print_solve_result},
    session::Session,
    solver::CacheConfig,
    wordlists::load_words,
};

#[derive(Parser)]
#[command(
    name = "wordle_minimax",
    about = "Adversarial Wordle solver using alpha-beta search over guess/secret space",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// File of allowed guesses, whitespace separated
    #[arg(long)]
    allowed_guesses_file: PathBuf,

    /// File of possible secrets (default: every allowed guess)
    #[arg(long)]
    possible_secrets_file: Option<PathBuf>,

    /// Hard mode: every guess must be consistent with the feedback so far
    #[arg(long)]
    hard: bool,

    /// Maximum entries per search cache
    #[arg(long, default_value_t = 1 << 24)]
    cache_max_size: usize,

    /// Lock segments per search cache
    #[arg(long, default_value_t = 1 << 16)]
    cache_segments: usize,

    /// Stop deepening after this many seconds (Ctrl-C also stops early)
    #[arg(long)]
    time_limit: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay guesses and rank the next guess on 'go'
    Suggest {
        /// File of 'guess pattern' lines (default: read interactively)
        #[arg(short, long)]
        guesses_file: Option<PathBuf>,

        /// First search depth tried for each word
        #[arg(long, default_value = "1")]
        initial_depth: usize,

        /// Deepest search tried for each word
        #[arg(long, default_value = "15")]
        max_depth: usize,

        /// Words shown after thinking
        #[arg(short = 'n', long, default_value = "32")]
        top: usize,
    },

    /// Evaluate the most promising first guesses
    Evaluate {
        /// First guesses to evaluate
        #[arg(short = 'n', long, default_value = "100")]
        max_words: usize,

        /// Deepest search tried for each word
        #[arg(long, default_value = "15")]
        max_depth: usize,

        /// Directory for the JSON strategy snapshot
        #[arg(long)]
        solutions_dir: Option<PathBuf>,

        /// Strategies kept in the snapshot
        #[arg(long, default_value = "100")]
        solutions_max_words: usize,

        /// Strategies printed
        #[arg(long, default_value = "6")]
        top: usize,

        /// Print the engine's root decisions
        #[arg(short, long)]
        verbose: bool,
    },

    /// Solve a specific target word
    Solve {
        /// The target word to solve
        word: String,

        /// Give up after this many guesses
        #[arg(long, default_value = "10")]
        max_guesses: usize,

        /// Deepest search tried for each guess
        #[arg(long, default_value = "15")]
        max_depth: usize,

        /// Show verbose output with candidate counts
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Load the dictionary and build a session from the top-level options
fn load_session(cli: &Cli) -> Result<Session> {
    let allowed = load_words(&cli.allowed_guesses_file)?;
    let secrets = match &cli.possible_secrets_file {
        Some(path) => load_words(path)?,
        None => Vec::new(),
    };

    let cache_config = CacheConfig::new(cli.cache_max_size, cli.cache_segments);
    let session = Session::load(&allowed, &secrets, cli.hard, cache_config)?;
    println!(
        "Loaded {} allowed guesses and {} possible secrets{}",
        session.state().allowed_guesses().len(),
        session.state().possible_secrets().len(),
        if cli.hard { " (hard mode)" } else { "" }
    );
    Ok(session)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let time_limit = cli
        .time_limit
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("--time-limit must be a non-negative number of seconds")?;

    let mut session = load_session(&cli)?;
    let interrupter = Interrupter::new();
    interrupter.install().context("Cannot install the Ctrl-C handler")?;

    match cli.command {
        Commands::Suggest {
            guesses_file,
            initial_depth,
            max_depth,
            top,
        } => {
            let config = SuggestConfig {
                initial_depth,
                max_depth,
                top,
                time_limit,
                ..SuggestConfig::default()
            };
            run_suggest(&mut session, &config, guesses_file.as_deref(), &interrupter)
                .map_err(|e| anyhow::anyhow!(e))
        }
        Commands::Evaluate {
            max_words,
            max_depth,
            solutions_dir,
            solutions_max_words,
            top,
            verbose,
        } => {
            let config = EvaluateConfig {
                max_words,
                max_depth,
                solutions_dir,
                solutions_max_words,
                verbose,
                ..EvaluateConfig::default()
            };
            run_evaluate_command(&session, &config, &interrupter, time_limit, top)
        }
        Commands::Solve {
            word,
            max_guesses,
            max_depth,
            verbose,
        } => {
            let mut config = SolveConfig::new(word);
            config.max_guesses = max_guesses;
            config.max_depth = max_depth;
            config.verbose = verbose;
            run_solve_command(&mut session, config, &interrupter, time_limit)
        }
    }
}

fn run_evaluate_command(
    session: &Session,
    config: &EvaluateConfig,
    interrupter: &Interrupter,
    time_limit: Option<Duration>,
    top: usize,
) -> Result<()> {
    let cancel = interrupter.arm(time_limit);
    let result = run_evaluate(session, config, &cancel);
    interrupter.disarm();
    let result = result.map_err(|e| anyhow::anyhow!(e))?;
    print_evaluate_result(&result, session.interner(), top);
    Ok(())
}

fn run_solve_command(
    session: &mut Session,
    config: SolveConfig,
    interrupter: &Interrupter,
    time_limit: Option<Duration>,
) -> Result<()> {
    let verbose = config.verbose;
    let cancel = interrupter.arm(time_limit);
    let result = solve_word(session, config, &cancel);
    interrupter.disarm();
    let result = result.map_err(|e| anyhow::anyhow!(e))?;
    print_solve_result(&result, verbose);
    Ok(())
}
