//! Operator CLI over a file-backed inspection session.
//!
//! Every invocation opens the session store, applies one transition or query and prints the
//! result as JSON. State lives entirely in the store, so a pass may span many invocations.

pub mod args;
pub mod handlers;

use anyhow::Result;
use vaudit::domain::config::LoggingConfig;
use vaudit::logger::Logger;

/// Installs the logger described by `logging`. Console output goes to stderr so stdout stays
/// machine-readable.
///
/// # Errors
/// Unknown level name, unusable log directory or an already installed subscriber.
pub fn init_logger(logging: &LoggingConfig) -> Result<Logger> {
    let mut builder = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level_name(&logging.level)?
        .stderr(true)
        .json(logging.json);
    if let Some(directory) = &logging.directory {
        builder = builder.directory(directory);
    }
    Ok(builder.init()?)
}
