//! Output formatting utilities for the CLI
//!
//! Provides plain text, table and JSON rendering of server records.

use anyhow::Result;
use colored::*;
use openblu_core::{Pipeline, ServerInfo, ServerRecord};

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per server, or a block per server when verbose
    Text,
    Table,
    Json,
}

impl OutputFormat {
    /// Parse a validated config value; anything unknown falls back to text
    pub fn from_config(value: &str) -> Self {
        match value {
            "table" => OutputFormat::Table,
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Render a unix timestamp as a UTC date
pub fn format_timestamp(ts: i64) -> String {
    if ts <= 0 {
        return "-".to_string();
    }
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Scores are usually whole numbers; don't print a trailing `.0`
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.2}", score)
    }
}

fn format_line(record: &ServerRecord) -> String {
    format!(
        "{:<12} {} ({})  score {}  ping {} ms",
        record.id.cyan(),
        record.country,
        record.country_short.yellow(),
        format_score(record.score).green(),
        record.ping
    )
}

fn format_block(record: &ServerRecord) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} {}", "Server".bold(), record.id.cyan().bold()));
    output.push('\n');
    output.push_str(&format!(
        "  Country:       {} ({})",
        record.country,
        record.country_short.yellow()
    ));
    if let Some(host) = &record.host_name {
        output.push('\n');
        output.push_str(&format!("  Host:          {}", host));
    }
    if let Some(ip) = &record.ip_address {
        output.push('\n');
        output.push_str(&format!("  IP address:    {}", ip));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Score:         {}",
        format_score(record.score).green()
    ));
    output.push('\n');
    output.push_str(&format!("  Ping:          {} ms", record.ping));
    output.push('\n');
    output.push_str(&format!(
        "  Sessions:      {} ({} total)",
        record.sessions, record.total_sessions
    ));
    output.push('\n');
    output.push_str(&format!(
        "  Last updated:  {}",
        format_timestamp(record.last_updated)
    ));
    output.push('\n');
    output.push_str(&format!("  Created:       {}", format_timestamp(record.created)));
    output
}

/// Format a server listing, records kept in the given order
pub fn format_servers(
    records: &[ServerRecord],
    format: &OutputFormat,
    verbose: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Text => {
            if records.is_empty() {
                return Ok("No servers match the given criteria".dimmed().to_string());
            }
            let separator = if verbose { "\n\n" } else { "\n" };
            Ok(records
                .iter()
                .map(|r| if verbose { format_block(r) } else { format_line(r) })
                .collect::<Vec<_>>()
                .join(separator))
        }
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct ServerRow {
                #[tabled(rename = "ID")]
                id: String,
                #[tabled(rename = "Country")]
                country: String,
                #[tabled(rename = "Code")]
                country_short: String,
                #[tabled(rename = "Score")]
                score: String,
                #[tabled(rename = "Ping (ms)")]
                ping: String,
                #[tabled(rename = "Sessions")]
                sessions: String,
            }

            let rows: Vec<ServerRow> = records
                .iter()
                .map(|r| ServerRow {
                    id: r.id.cyan().to_string(),
                    country: r.country.clone(),
                    country_short: r.country_short.yellow().to_string(),
                    score: format_score(r.score).green().to_string(),
                    ping: r.ping.to_string(),
                    sessions: format!("{} / {}", r.sessions, r.total_sessions),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "VPN Servers:".bold(), table))
        }
    }
}

/// Format a single server's detail
pub fn format_server_info(info: &ServerInfo, format: &OutputFormat, verbose: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(info)?),
        OutputFormat::Table => format_servers(std::slice::from_ref(&info.record), format, verbose),
        OutputFormat::Text => Ok(format_block(&info.record)),
    }
}

/// Describe the selection criteria of a listing, one per line
pub fn format_criteria(pipeline: &Pipeline) -> String {
    let filter = match &pipeline.filter {
        Some(spec) => format!("{} contains '{}'", spec.field, spec.value),
        None => "none".to_string(),
    };
    let (order, sorted) = match &pipeline.order {
        Some(spec) => (spec.field.to_string(), spec.direction.to_string()),
        None => ("listing order".to_string(), "-".to_string()),
    };

    format!(
        "Filter: {}\nOrder: {}\nSorted by: {}\nLimit: {}",
        filter, order, sorted, pipeline.limit
    )
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Format warning message
pub fn format_warning(message: &str) -> String {
    format!("{} {}", "!".yellow().bold(), message)
}
