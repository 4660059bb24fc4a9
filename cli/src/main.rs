mod calendar;
mod tui;
mod workspace;

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use goaltracker_core::service::dto::GoalSummary;
use goaltracker_core::time::parse_month;
use goaltracker_core::{export_file_name, export_json, parse_date_key, AppConfig, CalendarUseCase};
use tracing_subscriber::EnvFilter;

use crate::workspace::{today, Workspace};

const LOG_FILE_NAME: &str = "goaltracker.log";

#[derive(Parser)]
#[command(name = "goaltracker")]
#[command(about = "Mark failed days, keep the streak going, watch the reward grow", long_about = None)]
struct Cli {
    /// Data directory (defaults to ~/.goaltracker)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Write the configuration file
    Init {
        /// Namespace for stored records
        #[arg(long)]
        app_id: String,
        /// First day counted toward the score (YYYY-MM-DD)
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        /// Custom sign-in token; anonymous sign-in when omitted
        #[arg(long)]
        token: Option<String>,
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
    /// Show accumulated money and the current streak
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Print a month (usage: calendar --month 2025-10)
    Calendar {
        #[arg(long)]
        month: Option<String>,
    },
    /// Mark a day as failed, or clear the mark, then save
    Toggle { date: String },
    /// Change the first day counted toward the score, then save
    StartDate { date: String },
    /// Write failed days to GoalTracker_FailedDays_<today>.json
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace all failed days with the dates in a JSON array file, then save
    Import { file: PathBuf },
    /// Open the Terminal User Interface
    Tui,
}

fn init_tracing(data_dir: &Path, to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // The TUI owns the terminal, so its logs go to a file.
    let log_file = if to_file {
        fs::create_dir_all(data_dir)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(data_dir.join(LOG_FILE_NAME)))
            .ok()
    } else {
        None
    };

    match log_file {
        Some(file) => builder.with_writer(Mutex::new(file)).with_ansi(false).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = AppConfig::resolve_data_dir(cli.data_dir)?;
    init_tracing(&data_dir, matches!(cli.command, Some(Commands::Tui) | None));

    match cli.command {
        Some(Commands::Init { app_id, start_date, locale, currency, token, force }) => {
            let path = AppConfig::config_path(&data_dir);
            if path.exists() && !force {
                println!("Error: {} already exists (use --force to overwrite).", path.display());
                return Ok(());
            }
            let start_date = match parse_date_key(start_date.trim()) {
                Ok(d) => d,
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            };
            if start_date > today() {
                println!("Error: the start date cannot be later than today");
                return Ok(());
            }

            let mut config = AppConfig::new(app_id, start_date, data_dir);
            if let Some(l) = locale {
                config.locale = l;
            }
            if let Some(c) = currency {
                config.currency = c;
            }
            config.auth_token = token;
            config.write()?;
            println!("Configuration written to {}", path.display());
        },
        Some(Commands::Status { json }) => {
            let ws = open_workspace(data_dir)?;
            let summary = CalendarUseCase::new(&ws.session, &ws.config.locale).summary(today(), &ws.config.currency);
            if json {
                println!("{}", serde_json_summary(&summary));
            } else {
                println!("User: {}", ws.user);
                calendar::print_summary(&summary);
            }
        },
        Some(Commands::Calendar { month }) => {
            let ws = open_workspace(data_dir)?;
            let reference = match month.as_deref().map(parse_month) {
                Some(Ok(m)) => m,
                Some(Err(e)) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
                None => today(),
            };
            let usecase = CalendarUseCase::new(&ws.session, &ws.config.locale);
            calendar::print_month(&usecase.month_view(reference, today()));
            calendar::print_summary(&usecase.summary(today(), &ws.config.currency));
        },
        Some(Commands::Toggle { date }) => {
            let mut ws = open_workspace(data_dir)?;
            match ws.session.toggle_key(&date, today()) {
                Ok(true) => println!("{} marked as failed.", date.trim()),
                Ok(false) => println!("{} is no longer marked as failed.", date.trim()),
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            }
            println!("{}", ws.save_message());
        },
        Some(Commands::StartDate { date }) => {
            let mut ws = open_workspace(data_dir)?;
            match ws.session.set_start_date(&date, today()) {
                Ok(d) => println!("Start date set to {}.", d.format("%Y-%m-%d")),
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            }
            println!("{}", ws.save_message());
        },
        Some(Commands::Export { out }) => {
            let ws = open_workspace(data_dir)?;
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            let path = dir.join(export_file_name(today()));
            fs::write(&path, export_json(ws.session.failed_days())?)?;
            println!("Exported {} failed days to {}", ws.session.failed_days().len(), path.display());
        },
        Some(Commands::Import { file }) => {
            let mut ws = open_workspace(data_dir)?;
            let content = match fs::read_to_string(&file) {
                Ok(c) => c,
                Err(e) => {
                    println!("Error: could not read {}: {}", file.display(), e);
                    return Ok(());
                }
            };
            match ws.session.import(&content, today()) {
                Ok(report) => println!("{}", report.summary()),
                Err(e) => {
                    println!("Error: {}", e);
                    return Ok(());
                }
            }
            println!("{}", ws.save_message());
        },
        Some(Commands::Tui) | None => {
            let ws = open_workspace(data_dir)?;
            tui::run(ws)?;
        }
    }
    Ok(())
}

fn open_workspace(data_dir: PathBuf) -> Result<Workspace> {
    let ws = Workspace::open(data_dir)?;
    if let Some(warning) = &ws.load_warning {
        println!("Warning: {}", warning);
    }
    Ok(ws)
}

fn serde_json_summary(summary: &GoalSummary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
