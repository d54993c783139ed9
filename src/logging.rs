//! Tracing subscriber setup.
//!
//! The interactive dashboard owns the terminal, so it logs to a file; the
//! listing modes log to stderr.

use crate::cli::Cli;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

pub(crate) fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("food-dashboard")
        .join("food-dashboard.log")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub(crate) fn init(args: &Cli) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    let res = if args.is_interactive() {
        let path = args.log_file.clone().unwrap_or_else(default_log_path);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create log directory {}", dir.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open log file {}", path.display()))?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };

    res.map_err(|e| anyhow::anyhow!("install tracing subscriber: {e}"))
}
