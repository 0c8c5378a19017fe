#![allow(clippy::print_stdout)]

use anyhow::Context;
use clap::Parser;
use vaudit::domain::config::InspectionConfig;
use vaudit::kernel::config::load_config;
use vaudit_cli::args::Cli;
use vaudit_cli::{handlers, init_logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg: InspectionConfig =
        load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    if let Some(data_dir) = cli.data_dir {
        cfg.storage.data_dir = data_dir;
    }

    let _log = init_logger(&cfg.logging)?;

    let session = handlers::open_session(cfg).await?;
    let output = handlers::execute(cli.command, &session).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
