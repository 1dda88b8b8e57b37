//! CLI output formatting utilities for human-readable and JSON output modes.

use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use colored::Colorize;
use is_terminal::IsTerminal;
use std::io;
use tabled::{builder::Builder, settings::Style};
use uuid::Uuid;

use crate::models::score::Score;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with tables, colors, and formatting.
    Human,
    /// Machine-readable JSON output.
    Json,
}

impl OutputFormat {
    /// Determine the output format based on CLI flag and TTY detection.
    ///
    /// - If `format` is Some("json"), return Json
    /// - If `format` is Some("human"), return Human
    /// - If `format` is None, auto-detect based on stdout being a TTY
    pub fn from_flag(format: Option<&str>) -> Result<Self, String> {
        match format {
            Some("json") => Ok(OutputFormat::Json),
            Some("human") => Ok(OutputFormat::Human),
            Some(other) => Err(format!(
                "Invalid format '{}'. Use 'json' or 'human'.",
                other
            )),
            None => {
                if io::stdout().is_terminal() {
                    Ok(OutputFormat::Human)
                } else {
                    Ok(OutputFormat::Json)
                }
            }
        }
    }
}

/// Format a timestamp as relative time (e.g., "2 minutes ago").
pub fn format_relative_time(dt: DateTime<Utc>) -> String {
    HumanTime::from(dt).to_string()
}

pub fn format_uuid_short(id: Uuid) -> String {
    let s = id.to_string();
    if s.len() > 8 {
        format!("{}...", &s[..8])
    } else {
        s
    }
}

/// Podium places get medal colours.
pub fn rank_colored(rank: usize) -> String {
    let label = format!("#{rank}");
    match rank {
        1 => label.yellow().bold().to_string(),
        2 => label.white().bold().to_string(),
        3 => label.red().to_string(),
        _ => label.dimmed().to_string(),
    }
}

/// Table rows for a leaderboard, in the order given.
pub fn leaderboard_rows(scores: &[Score]) -> Vec<Vec<String>> {
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            vec![
                rank_colored(i + 1),
                score.player_name.clone(),
                score.score.to_string(),
                format_relative_time(score.created_at),
                format_uuid_short(score.score_id),
            ]
        })
        .collect()
}

pub fn print_leaderboard(scores: &[Score], format: OutputFormat) -> color_eyre::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(scores)?),
        OutputFormat::Human if scores.is_empty() => println!("No scores yet."),
        OutputFormat::Human => print_table(
            vec!["RANK", "PLAYER", "SCORE", "WHEN", "ID"],
            leaderboard_rows(scores),
        ),
    }
    Ok(())
}

/// Build and print a table from headers and rows.
pub fn print_table(headers: Vec<&str>, rows: Vec<Vec<String>>) {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

/// Print a key-value pair with proper formatting.
pub fn print_field(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

pub fn print_success(message: &str) {
    println!("{}", message.green());
}

/// Print an error as JSON to stderr for machine consumption.
pub fn print_json_error(message: &str) {
    eprintln!(
        "{}",
        serde_json::json!({
            "error": message
        })
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: i64, name: &str) -> Score {
        Score {
            score_id: Uuid::parse_str("12345678-1234-1234-1234-123456789012").unwrap(),
            score: value,
            player_name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_from_flag_json() {
        assert_eq!(
            OutputFormat::from_flag(Some("json")).unwrap(),
            OutputFormat::Json
        );
    }

    #[test]
    fn test_format_from_flag_human() {
        assert_eq!(
            OutputFormat::from_flag(Some("human")).unwrap(),
            OutputFormat::Human
        );
    }

    #[test]
    fn test_format_from_flag_invalid() {
        assert!(OutputFormat::from_flag(Some("xml")).is_err());
    }

    #[test]
    fn test_format_uuid_short() {
        let uuid = Uuid::parse_str("12345678-1234-1234-1234-123456789012").unwrap();
        assert_eq!(format_uuid_short(uuid), "12345678...");
    }

    #[test]
    fn test_leaderboard_rows() {
        colored::control::set_override(false);

        let rows = leaderboard_rows(&[score(300, "Ann"), score(120, "Anonymous")]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "#1");
        assert_eq!(rows[0][1], "Ann");
        assert_eq!(rows[0][2], "300");
        assert_eq!(rows[1][0], "#2");
        assert_eq!(rows[1][4], "12345678...");
    }
}
