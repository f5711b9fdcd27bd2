//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands and the parsers
//! for their argument values.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Args, Subcommand, ValueEnum};

use crate::model::{Aircraft, Airline, CrewPosition, FlightCrew};

/// Aircraft commands.
#[derive(Debug, Subcommand)]
pub enum AircraftCommand {
    /// List all aircraft
    List,
    /// Show one aircraft
    Show {
        /// Aircraft ID
        id: i64,
    },
    /// Add an aircraft
    Add(AircraftArgs),
    /// Replace an aircraft's details
    Edit {
        /// Aircraft ID
        id: i64,
        /// Replacement aircraft fields
        #[command(flatten)]
        args: AircraftArgs,
    },
    /// Remove an aircraft and its flights
    Remove {
        /// Aircraft ID
        id: i64,
    },
}

/// Aircraft fields.
#[derive(Debug, Clone, Args)]
pub struct AircraftArgs {
    /// Model designation, e.g. "Airbus A320"
    #[arg(long)]
    pub model: String,
    /// Maximum crew per flight
    #[arg(long)]
    pub crew_capacity: u32,
    /// Passenger seats
    #[arg(long)]
    pub passenger_capacity: u32,
    /// Fuel tank capacity in litres
    #[arg(long)]
    pub fuel_tank_capacity: u32,
}

impl From<AircraftArgs> for Aircraft {
    fn from(args: AircraftArgs) -> Self {
        Aircraft::new(
            args.model,
            args.crew_capacity,
            args.passenger_capacity,
            args.fuel_tank_capacity,
        )
    }
}

/// Airline commands.
#[derive(Debug, Subcommand)]
pub enum AirlineCommand {
    /// List all airlines
    List,
    /// Show one airline
    Show {
        /// Airline ID
        id: i64,
    },
    /// Add an airline
    Add(AirlineArgs),
    /// Replace an airline's details
    Edit {
        /// Airline ID
        id: i64,
        /// Replacement airline fields
        #[command(flatten)]
        args: AirlineArgs,
    },
    /// Remove an airline and its flights
    Remove {
        /// Airline ID
        id: i64,
    },
}

/// Airline fields.
#[derive(Debug, Clone, Args)]
pub struct AirlineArgs {
    /// Airline name
    #[arg(long)]
    pub name: String,
    /// Country of registration
    #[arg(long)]
    pub country: String,
}

impl From<AirlineArgs> for Airline {
    fn from(args: AirlineArgs) -> Self {
        Airline::new(args.name, args.country)
    }
}

/// Airport commands.
#[derive(Debug, Subcommand)]
pub enum AirportCommand {
    /// List all airports
    List,
    /// Show one airport
    Show {
        /// Airport ID or IATA code
        airport: AirportRef,
    },
    /// Add an airport
    Add {
        /// Display name, e.g. "Oslo Gardermoen (OSL), Oslo"
        name: String,
    },
}

/// Crew commands.
#[derive(Debug, Subcommand)]
pub enum CrewCommand {
    /// List all crew members
    List {
        /// Only show available crew
        #[arg(long)]
        available: bool,
    },
    /// Show one crew member
    Show {
        /// Crew member ID
        id: i64,
    },
    /// Add a crew member
    Add(CrewArgs),
    /// Replace a crew member's details (availability is unchanged)
    Edit {
        /// Crew member ID
        id: i64,
        /// Replacement crew member fields
        #[command(flatten)]
        args: CrewArgs,
    },
    /// Remove a crew member
    Remove {
        /// Crew member ID
        id: i64,
    },
}

/// Crew member fields.
#[derive(Debug, Clone, Args)]
pub struct CrewArgs {
    /// Given name
    #[arg(long)]
    pub first_name: String,
    /// Family name
    #[arg(long)]
    pub last_name: String,
    /// Age in years
    #[arg(long)]
    pub age: Option<u32>,
    /// Position held
    #[arg(long, value_enum)]
    pub position: PositionArg,
}

impl From<CrewArgs> for FlightCrew {
    fn from(args: CrewArgs) -> Self {
        FlightCrew::new(args.first_name, args.last_name, args.age, args.position.into())
    }
}

/// Flight commands.
#[derive(Debug, Subcommand)]
pub enum FlightCommand {
    /// List all flights
    List,
    /// Show one flight with its crew
    Show {
        /// Flight ID
        id: i64,
    },
    /// Create a flight and assign crew
    Create(FlightArgs),
    /// Replace a flight's details and crew
    Edit {
        /// Flight ID
        id: i64,
        /// Replacement flight fields and crew
        #[command(flatten)]
        args: FlightArgs,
    },
    /// Delete a flight and release its crew
    Delete {
        /// Flight ID
        id: i64,
    },
    /// Show the choices available for a flight form
    Options {
        /// Show choices for editing this flight
        #[arg(long)]
        flight: Option<i64>,
    },
}

/// Flight fields.
#[derive(Debug, Clone, Args)]
pub struct FlightArgs {
    /// Origin airport ID or IATA code
    #[arg(long = "from")]
    pub origin: AirportRef,
    /// Destination airport ID or IATA code
    #[arg(long = "to")]
    pub destination: AirportRef,
    /// Departure time (RFC 3339 or "YYYY-MM-DD HH:MM", UTC)
    #[arg(long, value_parser = parse_time)]
    pub departs: DateTime<Utc>,
    /// Arrival time (RFC 3339 or "YYYY-MM-DD HH:MM", UTC)
    #[arg(long, value_parser = parse_time)]
    pub arrives: DateTime<Utc>,
    /// Departure gate
    #[arg(long)]
    pub gate: Option<String>,
    /// Operating airline ID
    #[arg(long)]
    pub airline: i64,
    /// Aircraft ID
    #[arg(long)]
    pub aircraft: i64,
    /// Crew member IDs, comma separated or repeated
    #[arg(long, value_delimiter = ',')]
    pub crew: Vec<i64>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// An airport given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirportRef {
    /// Numeric airport ID.
    Id(i64),
    /// Three-letter IATA code, upper-cased.
    Code(String),
}

impl FromStr for AirportRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(Self::Id(id));
        }
        if s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Ok(Self::Code(s.to_ascii_uppercase()));
        }
        Err(format!(
            "expected an airport ID or a three-letter code, got '{s}'"
        ))
    }
}

impl std::fmt::Display for AirportRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Code(code) => write!(f, "{code}"),
        }
    }
}

/// Parse a UTC time given as RFC 3339 or `YYYY-MM-DD HH:MM`.
///
/// # Errors
///
/// Returns a message naming the accepted formats.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|_| format!("invalid time '{s}': use RFC 3339 or \"YYYY-MM-DD HH:MM\""))
}

/// Crew position argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PositionArg {
    /// Pilot in command
    Captain,
    /// Second in command
    FirstOfficer,
    /// Flight engineer
    FlightEngineer,
    /// Senior cabin crew
    Purser,
    /// Cabin crew
    FlightAttendant,
}

impl From<PositionArg> for CrewPosition {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::Captain => Self::Captain,
            PositionArg::FirstOfficer => Self::FirstOfficer,
            PositionArg::FlightEngineer => Self::FlightEngineer,
            PositionArg::Purser => Self::Purser,
            PositionArg::FlightAttendant => Self::FlightAttendant,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_position_arg_conversion() {
        assert_eq!(
            CrewPosition::from(PositionArg::Captain),
            CrewPosition::Captain
        );
        assert_eq!(
            CrewPosition::from(PositionArg::FirstOfficer),
            CrewPosition::FirstOfficer
        );
        assert_eq!(
            CrewPosition::from(PositionArg::FlightAttendant),
            CrewPosition::FlightAttendant
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_airport_ref_parsing() {
        assert_eq!("7".parse::<AirportRef>(), Ok(AirportRef::Id(7)));
        assert_eq!(
            "lhr".parse::<AirportRef>(),
            Ok(AirportRef::Code("LHR".to_string()))
        );
        assert!("London".parse::<AirportRef>().is_err());
        assert!("L1R".parse::<AirportRef>().is_err());
    }

    #[test]
    fn test_parse_time_formats() {
        let expected = Utc.with_ymd_and_hms(2025, 5, 10, 8, 30, 0).unwrap();
        assert_eq!(parse_time("2025-05-10 08:30"), Ok(expected));
        assert_eq!(parse_time("2025-05-10T08:30:00Z"), Ok(expected));
        assert_eq!(parse_time("2025-05-10T10:30:00+02:00"), Ok(expected));
        assert!(parse_time("10/05/2025").unwrap_err().contains("RFC 3339"));
    }

    #[test]
    fn test_crew_args_into_record() {
        let crew: FlightCrew = CrewArgs {
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            age: Some(29),
            position: PositionArg::FirstOfficer,
        }
        .into();
        assert_eq!(crew.position, CrewPosition::FirstOfficer);
        assert!(crew.is_available);
    }

    #[test]
    fn test_aircraft_args_into_record() {
        let aircraft: Aircraft = AircraftArgs {
            model: "Boeing 737".to_string(),
            crew_capacity: 5,
            passenger_capacity: 150,
            fuel_tank_capacity: 20_000,
        }
        .into();
        assert_eq!(aircraft.crew_capacity, 5);
        assert!(aircraft.id.is_none());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
