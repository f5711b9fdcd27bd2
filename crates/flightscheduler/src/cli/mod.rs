//! Command-line interface for flightscheduler.
//!
//! This module provides the CLI structure and output rendering for the
//! `flightsched` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    parse_time, AircraftArgs, AircraftCommand, AirlineArgs, AirlineCommand, AirportCommand,
    AirportRef, ConfigCommand, CrewArgs, CrewCommand, FlightArgs, FlightCommand, OutputFormat,
    PositionArg, StatusCommand,
};

/// flightsched - Schedule flights and keep crew availability consistent
///
/// Manages aircraft, airlines, airports, crew and flights in a local
/// database. A crew member serves on one flight at a time.
#[derive(Debug, Parser)]
#[command(name = "flightsched")]
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

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "plain")]
    pub format: OutputFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage aircraft
    #[command(subcommand)]
    Aircraft(AircraftCommand),

    /// Manage airlines
    #[command(subcommand)]
    Airline(AirlineCommand),

    /// Browse and add airports
    #[command(subcommand)]
    Airport(AirportCommand),

    /// Manage flight crew
    #[command(subcommand)]
    Crew(CrewCommand),

    /// Schedule flights and assign crew
    #[command(subcommand)]
    Flight(FlightCommand),

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
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
