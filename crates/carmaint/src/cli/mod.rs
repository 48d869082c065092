//! Command-line interface for carmaint.
//!
//! This module provides the CLI structure for the `carmaint` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ListArgs, NoteCommand, NoteFields, OutputFormat, ReminderCommand,
    ReminderFields, ServiceCommand, ServiceFields, StatusCommand, VehicleCommand, VehicleFields,
};

/// carmaint - Keep track of your vehicles' maintenance
///
/// Register vehicles, record their services, see which ones are due, and keep
/// reminders and notes alongside them.
#[derive(Debug, Parser)]
#[command(name = "carmaint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage vehicles
    #[command(subcommand)]
    Vehicle(VehicleCommand),

    /// Manage service records
    #[command(subcommand)]
    Service(ServiceCommand),

    /// Manage reminders
    #[command(subcommand)]
    Reminder(ReminderCommand),

    /// Manage notes
    #[command(subcommand)]
    Note(NoteCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
