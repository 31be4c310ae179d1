//! Foresight CLI - command-line client for a time-series forecasting service
//!
//! This CLI provides a `foresight` command that uploads a dataset, previews it,
//! tunes a model family's parameters and renders the training results.

mod commands;
mod config;
mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Foresight CLI - train forecasting models from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "foresight",
    author,
    version,
    about = "Foresight - forecasting model training client",
    long_about = "Uploads a time-series dataset to a forecasting server, previews it, and trains one of six model families (CNN, LSTM, ARIMA, Prophet, XGBoost, Transformer)."
)]
struct Args {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every subcommand. Each overrides configuration files and
/// `FORESIGHT_*` environment variables.
#[derive(clap::Args, Debug, Default)]
pub struct GlobalOptions {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Forecasting server root (default http://localhost:5000)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Backend to use (http, mock)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Per-request timeout in seconds (0 waits indefinitely)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show tunable parameters
    ///
    /// Prints every field of one model family, or of all families, with its
    /// bounds and default value.
    Schema {
        /// Model family (cnn, lstm, arima, prophet, xgboost, transformer)
        model: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a dataset and show its preview
    Preview {
        /// CSV file to upload
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a dataset and train a model on it
    ///
    /// Parameters not given with --param keep the family's defaults.
    Train {
        /// CSV file to upload
        file: PathBuf,

        /// Column to forecast (defaults to the first column)
        #[arg(short, long)]
        target: Option<String>,

        /// Model family (overrides the configured default)
        #[arg(short, long)]
        model: Option<String>,

        /// Parameter override as NAME=VALUE (repeatable)
        #[arg(short, long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Write the forecast plot PNG here
        #[arg(long)]
        save_plot: Option<PathBuf>,

        /// Write the feature importance PNG here (XGBoost)
        #[arg(long)]
        save_importance: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let client_config = config::load_config(&args.global);

    // Initialize tracing
    let level = match client_config.log_level.as_deref().unwrap_or("info") {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Schema { model, json } => commands::schema::execute(model.as_deref(), json),
        Command::Preview { file, json } => commands::preview::execute(&client_config, &file, json).await,
        Command::Train { file, target, model, params, save_plot, save_importance, json } => {
            let options = commands::train::TrainOptions {
                target,
                model,
                params,
                save_plot,
                save_importance,
                json,
            };
            commands::train::execute(&client_config, &file, options).await
        }
    }
}
