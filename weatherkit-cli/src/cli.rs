use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use weatherkit_core::{
    ConnectionCache, ConnectionConfig, Coordinate, Operator, QualValue, Qualifiers, Row, RowSink,
    Table, quals::FORECAST_START,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherkit", version, about = "Query WeatherKit as tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure WeatherKit credentials interactively.
    Configure,

    /// List tables and their columns.
    Tables,

    /// Scan a table for a coordinate and print one JSON row per line.
    Query {
        /// Table name, e.g. "weatherkit_daily_forecast".
        table: String,

        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,

        /// Lower bound on forecast_start (hourly forecast only), RFC 3339.
        #[arg(long)]
        from: Option<DateTime<Utc>>,

        /// Upper bound on forecast_start (hourly forecast only), RFC 3339.
        #[arg(long)]
        to: Option<DateTime<Utc>>,
    },
}

const KEY_AUTH: &str = "Private key (.p8)";
const TOKEN_AUTH: &str = "Static token";

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Tables => print_tables(),
            Command::Query {
                table,
                latitude,
                longitude,
                from,
                to,
            } => {
                let table = Table::from_name(&table)?;
                let mut quals = Qualifiers::at(Coordinate::new(latitude, longitude));
                if let Some(from) = from {
                    quals.push(FORECAST_START, Operator::GtEq, QualValue::Timestamp(from));
                }
                if let Some(to) = to {
                    quals.push(FORECAST_START, Operator::LtEq, QualValue::Timestamp(to));
                }
                query(table, &quals).await?;
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = ConnectionConfig::load()?;

    let auth = Select::new("Authentication method:", vec![KEY_AUTH, TOKEN_AUTH])
        .prompt()
        .context("Configuration aborted")?;

    if auth == TOKEN_AUTH {
        cfg.token = Some(
            Password::new("Token:")
                .without_confirmation()
                .prompt()
                .context("Configuration aborted")?,
        );
    } else {
        cfg.token = None;
        cfg.key_id = Some(prompt("Key ID:", cfg.key_id.as_deref())?);
        cfg.service_id = Some(prompt("Service ID:", cfg.service_id.as_deref())?);
        cfg.team_id = Some(prompt("Team ID:", cfg.team_id.as_deref())?);
        cfg.private_key_path = Some(prompt(
            "Path to private key (.p8):",
            cfg.private_key_path.as_deref(),
        )?);
    }
    cfg.language = Some(prompt("Language:", Some(cfg.language()))?);

    cfg.credentials()?;
    cfg.save()?;

    println!(
        "Saved configuration to {}",
        ConnectionConfig::config_file_path()?.display()
    );
    Ok(())
}

fn prompt(message: &str, default: Option<&str>) -> anyhow::Result<String> {
    let mut text = Text::new(message);
    if let Some(default) = default {
        text = text.with_default(default);
    }
    text.prompt().context("Configuration aborted")
}

fn print_tables() {
    for table in Table::all() {
        println!("{table}: {}", table.description());
        for column in table.columns() {
            println!(
                "  {:<24} {:<10} {}",
                column.name,
                format!("{:?}", column.column_type),
                column.description
            );
        }
    }
}

async fn query(table: Table, quals: &Qualifiers) -> anyhow::Result<()> {
    let config = ConnectionConfig::load()?.with_env();
    let connection = ConnectionCache::new(config);

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    let mut sink = StdoutSink { cancelled };
    let emitted = table.list(&connection, quals, &mut sink).await?;
    log::info!("{table}: {emitted} rows");

    Ok(())
}

/// Prints each row as a JSON line until Ctrl-C.
struct StdoutSink {
    cancelled: Arc<AtomicBool>,
}

impl RowSink for StdoutSink {
    fn emit(&mut self, row: Row) {
        match serde_json::to_string(&row) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("could not serialize row: {e}"),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
