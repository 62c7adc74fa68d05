//! Terminal output formatting
//!
//! Display utilities for CLI results and pretty-printing.

pub mod display;
pub mod formatters;

pub use display::{
    print_evaluate_result, print_rank_summary, print_remaining, print_solve_result,
    print_suggestions, print_top_strategies, print_word_info,
};
