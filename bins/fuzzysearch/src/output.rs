//! Terminal output utilities

use fuzzysearch::{Match, QueryStats};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }
}

/// Format a duration for display
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        format!("{}µs", duration.as_micros())
    } else if secs < 1.0 {
        format!("{:.1}ms", secs * 1000.0)
    } else {
        format!("{:.2}s", secs)
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Print ranked matches, one per line
pub fn print_matches(matches: &[Match]) {
    if matches.is_empty() {
        println!("{}", "No matches".dimmed());
        return;
    }

    let id_width = matches.iter().map(|m| m.id.to_string().len()).max().unwrap_or(1);
    for (rank, m) in matches.iter().enumerate() {
        println!(
            "{:>3}. {} {:>width$}  {}",
            rank + 1,
            format!("{:.3}", m.score).cyan(),
            m.id.dimmed(),
            m.text,
            width = id_width
        );
    }
}

/// Print pipeline counters
pub fn print_stats(stats: &QueryStats) {
    println!(
        "{}",
        format!(
            "{} → {} shortlisted → {} scored → {} returned",
            format_count(stats.query_grams, "gram", "grams"),
            stats.shortlisted,
            stats.scored,
            stats.returned
        )
        .dimmed()
    );
}
