//! Display functions for command results

use colored::Colorize;

use super::formatters::{create_progress_bar, format_distribution};
use crate::commands::{EvaluateResult, SolveResult, Suggestions};
use crate::core::Interner;
use crate::session::Session;
use crate::solver::{RankSummary, WordInfo, summarize_ranks};

const REMAINING_SHOWN: usize = 32;

/// Print one evaluated first guess on a line
pub fn print_word_info(index: usize, info: &WordInfo, interner: &Interner) {
    let proven = if info.can_stop {
        "proven".green()
    } else {
        "bound".yellow()
    };
    println!(
        "{:>3}. {} avg {} worst {} depth {:>2} {} [{}] hardest {}",
        index + 1,
        interner.text(info.first_guess).to_uppercase().bright_white().bold(),
        format!("{:.4}", info.avg_guesses).bright_yellow(),
        info.worst_num_guesses,
        info.max_depth,
        proven,
        format_distribution(&info.guess_distribution),
        interner.text(info.most_difficult_secret).to_uppercase(),
    );
}

/// Print the best strategies, at most `limit` of them
pub fn print_top_strategies(strategies: &[WordInfo], interner: &Interner, limit: usize) {
    for (i, info) in strategies.iter().take(limit).enumerate() {
        print_word_info(i, info, interner);
    }
}

/// Print the result of an evaluation run
pub fn print_evaluate_result(result: &EvaluateResult, interner: &Interner, limit: usize) {
    println!("\n{}", "═".repeat(60).cyan());
    println!(
        " {} {} ",
        "EVALUATION".bright_cyan().bold(),
        result.fingerprint.bright_black()
    );
    println!("{}", "═".repeat(60).cyan());

    println!(
        "\nEvaluated {} of {} first guesses",
        result.strategies.len(),
        result.requested
    );
    if result.cancelled {
        println!("{}", "Stopped early: interrupted or out of time".yellow());
    }
    if !result.failed.is_empty() {
        println!(
            "{} {}",
            "Failed words:".red(),
            result.failed.join(" ").to_uppercase()
        );
    }
    println!();
    print_top_strategies(&result.strategies, interner, limit);

    if let Some(path) = &result.snapshot {
        println!("\nSaved strategies to {}", path.display().to_string().bright_white());
    }

    print_rank_summary(&summarize_ranks(&result.rank_distribution));
}

/// Print ranked suggestions for the current position
pub fn print_suggestions(suggestions: &Suggestions, interner: &Interner, limit: usize) {
    println!("\n{}", "─".repeat(60).cyan());
    println!(
        "Ranked {} of {} guesses",
        suggestions.ranked.len(),
        suggestions.total
    );
    if suggestions.cancelled {
        println!("{}", "Interrupted: results are partial".yellow());
    }
    println!("{}", "─".repeat(60).cyan());
    print_top_strategies(&suggestions.ranked, interner, limit);
    println!();
}

/// Print how many secrets remain, listing them when few are left
pub fn print_remaining(session: &Session) {
    let secrets = session.state().possible_secrets();
    let interner = session.interner();

    println!(
        "{} possible secrets, {} allowed guesses",
        secrets.len().to_string().bright_cyan().bold(),
        session.state().allowed_guesses().len()
    );
    if secrets.len() <= REMAINING_SHOWN {
        let words: Vec<String> = secrets
            .iter()
            .map(|&s| interner.text(s).to_uppercase())
            .collect();
        println!("  {}", words.join(" "));
    }
    println!();
}

/// Print the result of solving a word
pub fn print_solve_result(result: &SolveResult, verbose: bool) {
    println!("\n{}", "─".repeat(60).cyan());
    println!(
        "Solving: {}",
        result.target.to_uppercase().bright_yellow().bold()
    );
    println!("{}", "─".repeat(60).cyan());

    for (i, step) in result.guesses.iter().enumerate() {
        println!(
            "\nTurn {}: {} {}",
            i + 1,
            step.word.to_uppercase(),
            step.pattern.to_emoji()
        );

        if verbose {
            println!(
                "  Candidates: {} → {}",
                step.candidates_before, step.candidates_after
            );
            let bound = if step.is_optimal {
                "optimal".green()
            } else {
                "upper bound".yellow()
            };
            println!(
                "  Worst case: {} more guesses ({bound}, depth {})",
                step.worst_case, step.depth
            );
        }
    }

    println!();
    if result.success {
        println!(
            "{}",
            format!("✅ Solved in {} guesses!", result.guesses.len())
                .green()
                .bold()
        );
    } else {
        println!(
            "{}",
            format!("❌ Failed to solve in {} guesses", result.guesses.len())
                .red()
                .bold()
        );
    }
}

/// Print how often the chosen guess came from each candidate rank
pub fn print_rank_summary(summary: &[RankSummary]) {
    if summary.is_empty() {
        return;
    }
    println!("\n📈 {}", "Chosen candidate rank:".bright_cyan().bold());
    for row in summary {
        let bar = create_progress_bar(row.cumulative_percent, 100.0, 30);
        println!(
            "   {:>3}: {} {:>8} ({:5.1}%)",
            row.rank,
            bar.green(),
            row.count,
            row.cumulative_percent
        );
    }
}
