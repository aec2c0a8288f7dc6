//! Output formatting for CLI

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::tictactoe::Coord;

/// Create a spinner for long-running setup steps
pub fn create_spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Render a move distribution as a 3x3 grid of percentages.
///
/// Occupied cells show as `--`.
pub fn format_distribution(distribution: &[(Coord, f64)]) -> Vec<String> {
    let mut grid: [[String; 3]; 3] = Default::default();
    for row in grid.iter_mut() {
        for cell in row.iter_mut() {
            *cell = format!("{:>7}", "--");
        }
    }
    for (coord, p) in distribution {
        grid[coord.row as usize][coord.col as usize] = format!("{:6.2}%", p * 100.0);
    }
    grid.iter().map(|row| row.join(" |")).collect()
}

pub fn print_distribution(distribution: &[(Coord, f64)]) {
    for line in format_distribution(distribution) {
        println!("  {line}");
    }
}
