use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::UserId;

const DEFAULT_TIMEOUT_SECS: u64 = 900;
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) session_timeout: Duration,
    /// User the terminal driver speaks for.
    pub(crate) user: UserId,
    pub(crate) log_filter: String,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = match lookup("SPENDLESS_DB") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };

        let session_timeout = match lookup("SPENDLESS_SESSION_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.trim()
                    .parse()
                    .with_context(|| format!("SPENDLESS_SESSION_TIMEOUT_SECS is not a number: {secs}"))?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let user = match lookup("SPENDLESS_USER") {
            Some(id) => parse_user(&id).context("Invalid SPENDLESS_USER")?,
            None => UserId(1),
        };

        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into());

        Ok(Self {
            db_path,
            session_timeout,
            user,
            log_filter,
        })
    }
}

pub(crate) fn parse_user(text: &str) -> Result<UserId> {
    let id = text
        .trim()
        .parse()
        .with_context(|| format!("User id must be a whole number: {text}"))?;
    Ok(UserId(id))
}

fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "spendless", "Spendless")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("spendless.db"))
}
