mod config;
mod conversation;
mod db;
mod deletion;
mod error;
mod models;
mod parse;
mod report;
mod run;
mod store;
mod util;

use anyhow::Result;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    setup_logging(&config.log_filter);

    let db = db::Database::open(&config.db_path)?;
    tracing::debug!("using database {}", config.db_path.display());

    match args.len() {
        1 => run::as_chat(db, &config, config.user),
        _ => run::as_cli(&args, db, &config),
    }
}

/// Logs go to stderr so stdout carries only the conversation.
fn setup_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(filter))
        .init();
}
