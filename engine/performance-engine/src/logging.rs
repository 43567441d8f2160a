//! Logging and tracing setup

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging from `RUST_LOG`, defaulting to `info`
pub fn initialize_logging() -> Result<()> {
    let env_filter = filter_from_env(EnvFilter::DEFAULT_ENV);
    let fmt_layer = fmt::layer().compact().with_target(false).with_ansi(true);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    Ok(())
}

fn filter_from_env(var: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging with an explicit level and format (`json`, `pretty` or `compact`)
pub fn initialize_logging_with_config(level: &str, format: &str) -> Result<()> {
    validate_level(level)?;
    let env_filter = EnvFilter::try_new(level)?;

    let fmt_layer = match format {
        "json" => fmt::layer().json().with_target(true).with_file(true).with_line_number(true).boxed(),
        "pretty" => fmt::layer().pretty().with_target(false).with_ansi(true).boxed(),
        "compact" => fmt::layer().compact().with_target(false).with_ansi(true).boxed(),
        other => return Err(anyhow::anyhow!("Invalid log format: {}", other)),
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    Ok(())
}

fn validate_level(level: &str) -> Result<()> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(anyhow::anyhow!("Invalid log level: {}", level)),
    }
}
