// src/main.rs
mod cli;
mod commands;
mod menu;
mod screens;
mod theme;

use anyhow::{Context, Result};
use microset_lib::{logging, AppService};
use std::io::stdout;

fn main() -> Result<()> {
    let args = cli::parse_args();

    // Completion generation needs no service (and must not create one).
    if let Some(cli::Commands::GenerateCompletion { shell }) = args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    logging::init();

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;

    match args.command {
        None => screens::run_interactive(&mut service),
        Some(command) => commands::dispatch(&mut service, command),
    }
}
