//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;

use crate::domain::{EliteBonus, Tier};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print labelled value, label padded for alignment
pub fn metric(label: &str, value: &(impl std::fmt::Display + ?Sized)) {
    println!("  {:<18} {}", format!("{label}:").dimmed(), value);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Tier name in its accent color.
pub fn tier_name(tier: &Tier) -> String {
    tier.name.color(tier.accent).bold().to_string()
}

/// Rate as a percentage with one decimal, e.g. `7.0%`.
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Amount with two decimals.
pub fn amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Per-generation bonuses as `G1=40.00, G2=24.00`.
pub fn generation_bonuses(bonus: &EliteBonus) -> String {
    if bonus.is_empty() {
        return "none".to_string();
    }
    bonus
        .generation_bonuses
        .iter()
        .enumerate()
        .map(|(i, b)| format!("G{}={}", i + 1, amount(*b)))
        .join(", ")
}
