//! # Slipcheck CLI
//!
//! Command-line interface for settling football bet slips against API-Sports fixture results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rust_decimal::Decimal;
use serde::Deserialize;
use slipcheck_core::{
    normalize_rows, EngineConfig, FixtureId, Market, Selection, SettlementEngine,
    SettlementStatus, Settings, SlipReport, TableRow,
};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "slipcheck")]
#[command(about = "Settle football bet slips against live fixture results")]
#[command(version)]
struct Cli {
    /// API-Sports key (overrides configuration and API_SPORTS_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// API-Sports base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Extra configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Settle a slip of canonical selections
    Settle {
        /// JSON file with `selections` and an optional `base_url`
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Settle a slip of free-form rows (market aliases and pick shorthands)
    SettleTable {
        /// JSON file with `rows` and an optional `base_url`
        #[arg(short, long)]
        input: PathBuf,
    },
    /// List supported markets and their parameters
    Markets,
    /// Show the canonical selection for a market alias and pick
    Normalize {
        /// Market name or alias, e.g. "1X2" or "Goals Over/Under"
        #[arg(short, long)]
        market: String,
        /// Pick, e.g. "1", "GG" or "2-1"
        #[arg(short, long)]
        pick: String,
        /// Line for over/under and handicap markets
        #[arg(short, long, allow_hyphen_values = true)]
        line: Option<Decimal>,
        /// Team (HOME or AWAY) for team markets
        #[arg(short, long)]
        team: Option<String>,
        /// Fixture id to attach to the selection
        #[arg(short, long, default_value = "0")]
        fixture: u64,
    },
}

#[derive(Deserialize)]
struct SlipFile {
    #[serde(default)]
    base_url: Option<String>,
    selections: Vec<Selection>,
}

#[derive(Deserialize)]
struct TableFile {
    #[serde(default)]
    base_url: Option<String>,
    rows: Vec<TableRow>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Settle { input } => {
            let file: SlipFile = read_json(input)?;
            let report = settle(&cli, file.base_url.as_deref(), &file.selections).await?;
            print_report(&report, cli.json)?;
        }

        Commands::SettleTable { input } => {
            let file: TableFile = read_json(input)?;
            let selections = normalize_rows(file.rows)?;
            let report = settle(&cli, file.base_url.as_deref(), &selections).await?;
            print_report(&report, cli.json)?;
        }

        Commands::Markets => print_markets(cli.json)?,

        Commands::Normalize {
            market,
            pick,
            line,
            team,
            fixture,
        } => {
            let row = TableRow {
                fixture_id: FixtureId(*fixture),
                market: market.clone(),
                pick: pick.clone(),
                line: *line,
                team: team.clone(),
            };
            let selection = row.into_selection()?;
            selection.wager()?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&selection)?);
            } else {
                println!("{}: {}", "Market".yellow().bold(), selection.market_label().cyan());
                println!("{}: {}", "Pick".yellow().bold(), selection.pick);
                if let Some(line) = selection.line {
                    println!("{}: {}", "Line".yellow().bold(), line);
                }
                if let Some(team) = selection.team {
                    println!("{}: {}", "Team".yellow().bold(), team.as_str());
                }
                if selection.market == Market::Unmapped {
                    println!("{}", "Market is not supported and will settle as not_supported.".bright_black());
                }
            }
        }
    }

    Ok(())
}

async fn settle(cli: &Cli, file_base_url: Option<&str>, selections: &[Selection]) -> Result<SlipReport> {
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    settings.logging.init();
    debug!(config = %settings.digest(), "Configuration loaded");

    let provider = settings
        .provider
        .with_overrides(cli.base_url.as_deref().or(file_base_url), cli.api_key.as_deref());
    let client = provider.connect()?;
    let engine = SettlementEngine::new(client, EngineConfig::from(&settings.engine));

    Ok(engine.settle(selections).await?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid slip file {}", path.display()))
}

fn paint(status: SettlementStatus) -> ColoredString {
    let label = status.as_str().to_uppercase();
    match status {
        SettlementStatus::Won => label.green().bold(),
        SettlementStatus::Lost => label.red().bold(),
        SettlementStatus::Pending | SettlementStatus::NotSupported => label.yellow().bold(),
        _ => label.cyan().bold(),
    }
}

fn print_report(report: &SlipReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!();
    println!("{}: {}", "Slip".yellow().bold(), paint(report.status));
    println!("{}: {}", "Checked At".yellow().bold(), report.checked_at.to_rfc3339());
    println!("{}", "═".repeat(60).bright_black());
    for (index, result) in report.results.iter().enumerate() {
        println!(
            "#{} {} {} {} → {}",
            index + 1,
            result.fixture_id.to_string().cyan(),
            result.market,
            result.pick.bold(),
            paint(result.status)
        );
        println!("   {}", result.reason.bright_black());
    }
    println!("{}", "═".repeat(60).bright_black());
    Ok(())
}

fn print_markets(json: bool) -> Result<()> {
    if json {
        let markets: Vec<_> = Market::supported()
            .map(|market| {
                serde_json::json!({
                    "market": market,
                    "requires_line": market.requires_line(),
                    "requires_team": market.requires_team(),
                    "uses_statistics": market.uses_statistics(),
                    "picks": market.pick_format(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&markets)?);
        return Ok(());
    }

    println!("{}", "Supported Markets".green().bold());
    println!("{}", "═".repeat(60).bright_black());
    for market in Market::supported() {
        let mut params = Vec::new();
        if market.requires_line() {
            params.push("line");
        }
        if market.requires_team() {
            params.push("team");
        }
        if market.uses_statistics() {
            params.push("stats");
        }
        println!(
            "{:<28} {:<14} {}",
            market.as_str().cyan(),
            params.join(",").yellow(),
            market.pick_format()
        );
    }
    Ok(())
}
