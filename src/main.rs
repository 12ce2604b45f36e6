mod cli;
mod commands;
mod model;
mod results;
mod util;

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Subscriber, error, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{Cli, Commands};

type LogSubscriber = Box<dyn Subscriber + Send + Sync>;

fn main() {
    let cli = Cli::parse();

    let (subscriber, log_file_status) = build_subscriber(&cli.log_file, std::io::stdout);
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install log subscriber: {err}");
    }
    if let Err(err) = log_file_status {
        warn!(path = %cli.log_file.display(), error = %err, "logging to console only");
    }

    if let Err(err) = run(cli) {
        log_failure(&err);
        std::process::exit(1);
    }
}

fn log_failure(err: &anyhow::Error) {
    error!(error = %err, "command failed");
    for cause in err.chain().skip(1) {
        error!(cause = %cause, "caused by");
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Report(args) => commands::report::run(args),
    }
}

fn build_subscriber<C>(log_file: &Path, console: C) -> (LogSubscriber, Result<()>)
where
    C: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_target(false).with_writer(console);

    match open_log_file(log_file) {
        Ok(file) => {
            let file_layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(file_layer);
            (Box::new(subscriber), Ok(()))
        }
        Err(err) => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(console);
            (Box::new(subscriber), Err(err))
        }
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        util::ensure_directory(parent)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))
}
