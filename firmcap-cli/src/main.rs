use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use firmcap_core::{
    hours_by_charge_code, live_capacity, simulate, weekly_trend, Assumptions, BucketId, TimeEntry,
    TrailingWindow,
};
use firmcap_ingest::parse_entries_csv;
use std::path::{Path, PathBuf};

mod config;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "firmcap",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FIRMCAP_BUILD_SHA"), ")"),
    about = "Firm capacity and utilization model"
)]
struct Cli {
    /// Assumptions file (default: ~/.firmcap/assumptions.toml)
    #[arg(long, global = true)]
    assumptions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the staffing assumptions file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Measured utilization from logged time over the trailing window
    Live {
        /// Time-entry CSV export (defaults to ./time_entries.csv if present)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Reference time (RFC 3339). Defaults to the current time.
        #[arg(long)]
        now: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assumption-driven capacity, sizing and growth projection
    Simulate {
        /// Override active client count
        #[arg(long)]
        clients: Option<u64>,

        /// Override monthly growth rate (percent)
        #[arg(long, allow_hyphen_values = true)]
        growth: Option<f64>,

        /// Override projection horizon (months)
        #[arg(long)]
        months: Option<u32>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Hours per bucket for recent calendar weeks
    Trend {
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long, default_value_t = 8)]
        weeks: usize,

        #[arg(long)]
        now: Option<String>,
    },

    /// Hours by charge code over the trailing window
    Codes {
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Only entries counting against this bucket (advisors, support, tax)
        #[arg(long)]
        bucket: Option<BucketId>,

        /// Limit number of rows printed (default: 15)
        #[arg(long, default_value_t = 15)]
        limit: usize,

        #[arg(long)]
        now: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write default assumptions to ~/.firmcap/assumptions.toml
    Init,

    /// Print the effective assumptions
    Show,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let assumptions_path = cli.assumptions.as_deref();

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let a = config::load_assumptions(assumptions_path)?;
                print!("{}", toml::to_string_pretty(&a).context("serialize assumptions")?);
            }
        },

        Command::Live { csv, now, json } => {
            let a = config::load_assumptions(assumptions_path)?;
            let now = parse_now(now.as_deref())?;
            let entries = load_entries(csv, &a)?;
            let report = live_capacity(&entries, &a, now);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::live(&report));
            }
        }

        Command::Simulate {
            clients,
            growth,
            months,
            json,
        } => {
            let mut a = config::load_assumptions(assumptions_path)?;
            if let Some(c) = clients {
                a.firm.active_clients = c;
            }
            if let Some(g) = growth {
                a.firm.monthly_growth_rate_pct = g;
            }
            if let Some(m) = months {
                a.firm.projection_months = m;
            }
            a.validate().context("invalid simulate override")?;
            let report = simulate(&a);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::simulation(&report));
            }
        }

        Command::Trend { csv, weeks, now } => {
            let a = config::load_assumptions(assumptions_path)?;
            let now = parse_now(now.as_deref())?;
            let entries = load_entries(csv, &a)?;
            let trend = weekly_trend(&entries, now, weeks, firm_tz(&a)?);
            print!("{}", render::trend(&trend));
        }

        Command::Codes {
            csv,
            bucket,
            limit,
            now,
        } => {
            let a = config::load_assumptions(assumptions_path)?;
            let now = parse_now(now.as_deref())?;
            let entries = load_entries(csv, &a)?;
            let window = TrailingWindow::last_days(now, a.firm.trailing_days);
            let rows = hours_by_charge_code(&entries, &window, bucket);
            print!("{}", render::charge_codes(&rows, limit));
        }
    }

    Ok(())
}

fn default_entries_csv() -> PathBuf {
    PathBuf::from("time_entries.csv")
}

/// One reference time per invocation; every window derives from it.
fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid --now '{s}' (expected RFC 3339)"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn firm_tz(a: &Assumptions) -> Result<Tz> {
    a.firm
        .timezone
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {}", a.firm.timezone))
}

fn load_entries(csv: Option<PathBuf>, a: &Assumptions) -> Result<Vec<TimeEntry>> {
    let path = csv.unwrap_or_else(default_entries_csv);
    if !path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", path.display());
    }
    read_entries_file(&path, firm_tz(a)?)
}

fn read_entries_file(path: &Path, tz: Tz) -> Result<Vec<TimeEntry>> {
    let import = parse_entries_csv(path, tz).with_context(|| format!("parsing {}", path.display()))?;
    if !import.skipped.is_empty() {
        eprintln!(
            "warning: skipped {} unreadable row(s) in {}",
            import.skipped.len(),
            path.display()
        );
    }
    Ok(import.entries)
}
