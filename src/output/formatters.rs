//! Formatting utilities for terminal output

use std::collections::BTreeMap;

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    let filled = if max > 0.0 {
        ((value / max) * width as f64) as usize
    } else {
        0
    };
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a guess count histogram as `count:secrets` pairs
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use wordle_minimax::output::formatters::format_distribution;
///
/// let dist = BTreeMap::from([(1, 1), (2, 3)]);
/// assert_eq!(format_distribution(&dist), "1:1 2:3");
/// ```
#[must_use]
pub fn format_distribution(distribution: &BTreeMap<usize, usize>) -> String {
    distribution
        .iter()
        .map(|(guesses, secrets)| format!("{guesses}:{secrets}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_empty() {
        assert_eq!(create_progress_bar(0.0, 100.0, 10), "░".repeat(10));
    }

    #[test]
    fn progress_bar_full() {
        assert_eq!(create_progress_bar(100.0, 100.0, 10), "█".repeat(10));
    }

    #[test]
    fn progress_bar_half() {
        let bar = create_progress_bar(50.0, 100.0, 10);
        assert_eq!(bar, format!("{}{}", "█".repeat(5), "░".repeat(5)));
    }

    #[test]
    fn progress_bar_zero_max() {
        assert_eq!(create_progress_bar(3.0, 0.0, 4), "░".repeat(4));
    }

    #[test]
    fn empty_distribution() {
        assert_eq!(format_distribution(&BTreeMap::new()), "");
    }
}
