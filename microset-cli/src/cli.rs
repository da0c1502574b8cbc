// src/cli.rs
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "microset", author, version)]
#[command(about = "Micro-workouts while your AI agent works", long_about = None)]
pub struct Cli {
    /// With no subcommand, the interactive menu is launched.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Suggest an exercise and record it as pending (for hooks)
    Suggest {
        /// Task description the suggestion is attached to
        #[arg(long)]
        task: Option<String>,
    },
    /// Log the pending suggestion as complete (for hooks)
    LogComplete,
    /// Discard the pending suggestion without logging (for hooks)
    LogSkip,
    /// Output the configuration as JSON
    ConfigGet,
    /// Set a config value
    ConfigSet {
        /// Config key (dot notation supported, e.g. quiet_hours.enabled)
        key: String,
        /// Value (JSON, boolean keyword, or raw string)
        value: String,
    },
    /// Add a value to a list-valued config key
    ConfigAdd {
        /// List key (e.g. equipment)
        key: String,
        /// Value to add
        value: String,
    },
    /// Remove a value from a list-valued config key
    ConfigRemove {
        /// List key
        key: String,
        /// Value to remove
        value: String,
    },
    /// Add a custom exercise from JSON
    AddExercise {
        /// Exercise JSON (name, count, category, intensity required)
        json: String,
    },
    /// Output today's stats as JSON
    Stats,
    /// Morning planning flow
    Morning {
        /// Show morning status as JSON (the default)
        #[arg(long)]
        status: bool,
        /// Mark the morning routine as completed
        #[arg(long, conflicts_with = "skip")]
        complete: bool,
        /// Skip the morning routine for today
        #[arg(long)]
        skip: bool,
        /// Routine name used (with --complete)
        #[arg(long)]
        routine: Option<String>,
    },
    /// Workout queue management
    Queue {
        /// Routine id or name to queue
        routine_id: Option<String>,
        /// Fire the queued workout (notification + timestamp)
        #[arg(long)]
        trigger: bool,
        /// Clear the queued workout
        #[arg(long)]
        cancel: bool,
        /// Trigger type: big_task, victory, manual
        #[arg(long, default_value = "big_task")]
        trigger_type: String,
        /// Description of what triggers the workout
        #[arg(long)]
        description: Option<String>,
    },
    /// Output the full day state as JSON
    Day,
    /// Generate a shell completion script
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
