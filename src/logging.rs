//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug`
//! when asked, with noisy transport crates held at `warn`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::Error;

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to a file; the terminal UI uses this to keep the screen clean
    File(PathBuf),
}

impl LogTarget {
    /// `~/.token-transfer/{file_name}`
    pub fn default_file(file_name: &str) -> Self {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".token-transfer");
        path.push(file_name);
        Self::File(path)
    }
}

/// Default filter directives for a verbosity
pub fn default_filter(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!(
        "token_transfer_sdk={},alloy=warn,reqwest=warn,hyper=warn",
        level
    )
}

fn env_filter(debug: bool) -> Result<EnvFilter, Error> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter(debug))
            .map_err(|e| Error::Config(format!("Failed to create log filter: {}", e))),
    }
}

/// Install the global subscriber
pub fn init_logging(target: LogTarget, debug: bool) -> Result<(), Error> {
    let filter = env_filter(debug)?;

    match target {
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| Error::Other(format!("Failed to install logger: {}", e))),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_target(true),
                )
                .try_init()
                .map_err(|e| Error::Other(format!("Failed to install logger: {}", e)))
        }
    }
}
