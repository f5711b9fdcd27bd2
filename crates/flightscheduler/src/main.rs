//! `flightsched` - CLI for flightscheduler
//!
//! This binary manages aircraft, airlines, airports, crew and flights in the
//! scheduling database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use serde::Serialize;

use flightscheduler::cli::output::{
    render_errors, render_list, render_options, render_record, render_stats, Tabular,
};
use flightscheduler::cli::{
    AircraftCommand, AirlineCommand, AirportCommand, AirportRef, Cli, Command, ConfigCommand,
    CrewCommand, FlightArgs, FlightCommand, OutputFormat,
};
use flightscheduler::{
    init_logging, Airport, Catalog, Config, Flight, FlightScheduler, FlightSubmission, Storage,
    Submission,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // Configuration commands must work even when the config file is broken
    if let Command::Config(config_cmd) = cli.command {
        return handle_config(cli.config, config_cmd);
    }

    let config = Config::load_from(cli.config.clone())?;
    let storage = Storage::from_config(&config)
        .with_context(|| format!("opening {}", config.database_path().display()))?;

    let app = App {
        catalog: Catalog::new(&storage, config.catalog.clone()),
        scheduler: FlightScheduler::new(&storage, config.catalog.clone()),
        format: cli.format,
    };

    match cli.command {
        Command::Aircraft(cmd) => app.aircraft(cmd),
        Command::Airline(cmd) => app.airline(cmd),
        Command::Airport(cmd) => app.airport(cmd),
        Command::Crew(cmd) => app.crew(cmd),
        Command::Flight(cmd) => app.flight(cmd),
        Command::Status(cmd) => {
            let format = if cmd.json { OutputFormat::Json } else { app.format };
            println!(
                "{}",
                render_stats(format, &config.database_path(), &storage.stats()?)?
            );
            Ok(())
        }
        Command::Config(cmd) => handle_config(cli.config, cmd),
    }
}

struct App<'s> {
    catalog: Catalog<'s>,
    scheduler: FlightScheduler<'s>,
    format: OutputFormat,
}

impl App<'_> {
    fn list<T: Tabular + Serialize>(&self, items: &[T]) -> anyhow::Result<()> {
        println!("{}", render_list(self.format, items)?);
        Ok(())
    }

    fn show<T: Tabular + Serialize>(&self, item: &T) -> anyhow::Result<()> {
        println!("{}", render_record(self.format, item)?);
        Ok(())
    }

    fn saved<T: Tabular + Serialize>(
        &self,
        what: &str,
        submission: Submission<T>,
    ) -> anyhow::Result<()> {
        match submission {
            Submission::Saved(record) => self.show(&record),
            Submission::Rejected(errors) => {
                if self.format == OutputFormat::Json {
                    println!("{}", serde_json::to_string_pretty(&errors)?);
                } else {
                    eprintln!("{what} was not saved:");
                    eprintln!("{}", render_errors(&errors));
                }
                bail!("{} validation error(s)", errors.len())
            }
        }
    }

    fn aircraft(&self, cmd: AircraftCommand) -> anyhow::Result<()> {
        match cmd {
            AircraftCommand::List => self.list(&self.catalog.list_aircraft()?),
            AircraftCommand::Show { id } => self.show(&self.catalog.get_aircraft(id)?),
            AircraftCommand::Add(args) => {
                self.saved("Aircraft", self.catalog.create_aircraft(&args.into())?)
            }
            AircraftCommand::Edit { id, args } => {
                self.saved("Aircraft", self.catalog.update_aircraft(id, &args.into())?)
            }
            AircraftCommand::Remove { id } => {
                self.catalog.delete_aircraft(id)?;
                println!("Removed aircraft {id} and its flights.");
                Ok(())
            }
        }
    }

    fn airline(&self, cmd: AirlineCommand) -> anyhow::Result<()> {
        match cmd {
            AirlineCommand::List => self.list(&self.catalog.list_airlines()?),
            AirlineCommand::Show { id } => self.show(&self.catalog.get_airline(id)?),
            AirlineCommand::Add(args) => {
                self.saved("Airline", self.catalog.create_airline(&args.into())?)
            }
            AirlineCommand::Edit { id, args } => {
                self.saved("Airline", self.catalog.update_airline(id, &args.into())?)
            }
            AirlineCommand::Remove { id } => {
                self.catalog.delete_airline(id)?;
                println!("Removed airline {id} and its flights.");
                Ok(())
            }
        }
    }

    fn airport(&self, cmd: AirportCommand) -> anyhow::Result<()> {
        match cmd {
            AirportCommand::List => self.list(&self.catalog.list_airports()?),
            AirportCommand::Show { airport } => self.show(&self.resolve_airport(&airport)?),
            AirportCommand::Add { name } => {
                self.saved("Airport", self.catalog.create_airport(&Airport::new(name))?)
            }
        }
    }

    fn crew(&self, cmd: CrewCommand) -> anyhow::Result<()> {
        match cmd {
            CrewCommand::List { available } => {
                let mut crew = self.catalog.list_crew()?;
                if available {
                    crew.retain(|c| c.is_available);
                }
                self.list(&crew)
            }
            CrewCommand::Show { id } => self.show(&self.catalog.get_crew(id)?),
            CrewCommand::Add(args) => {
                self.saved("Crew member", self.catalog.create_crew(&args.into())?)
            }
            CrewCommand::Edit { id, args } => {
                self.saved("Crew member", self.catalog.update_crew(id, &args.into())?)
            }
            CrewCommand::Remove { id } => {
                self.catalog.delete_crew(id)?;
                println!("Removed crew member {id}.");
                Ok(())
            }
        }
    }

    fn flight(&self, cmd: FlightCommand) -> anyhow::Result<()> {
        match cmd {
            FlightCommand::List => self.list(&self.scheduler.list_flights()?),
            FlightCommand::Show { id } => self.show(&self.scheduler.flight_details(id)?),
            FlightCommand::Create(args) => {
                if let Some(reason) = self.scheduler.create_prerequisites()? {
                    bail!("cannot create flights yet: {reason}");
                }
                let draft = self.draft(&args)?;
                let submission = self.scheduler.create_flight(&draft, &args.crew)?;
                self.flight_saved(submission)
            }
            FlightCommand::Edit { id, args } => {
                let draft = self.draft(&args)?;
                let submission = self.scheduler.edit_flight(id, &draft, &args.crew)?;
                self.flight_saved(submission)
            }
            FlightCommand::Delete { id } => {
                self.scheduler.delete_flight(id)?;
                println!("Deleted flight {id}; its crew are available again.");
                Ok(())
            }
            FlightCommand::Options { flight } => {
                if flight.is_none() {
                    if let Some(reason) = self.scheduler.create_prerequisites()? {
                        eprintln!("Flight creation is disabled: {reason}");
                    }
                }
                let options = self.scheduler.form_options(flight)?;
                println!("{}", render_options(self.format, &options)?);
                Ok(())
            }
        }
    }

    fn flight_saved(&self, submission: FlightSubmission) -> anyhow::Result<()> {
        match submission {
            FlightSubmission::Saved(assigned) => {
                if !assigned.skipped_crew.is_empty() && self.format != OutputFormat::Json {
                    eprintln!(
                        "Not assigned (missing or unavailable): {:?}",
                        assigned.skipped_crew
                    );
                }
                if self.format == OutputFormat::Json {
                    println!("{}", serde_json::to_string_pretty(&assigned)?);
                    Ok(())
                } else {
                    self.show(&self.scheduler.flight_details(assigned.id())?)
                }
            }
            FlightSubmission::Rejected(rejected) => {
                if self.format == OutputFormat::Json {
                    println!("{}", serde_json::to_string_pretty(&rejected)?);
                } else {
                    eprintln!("Flight was not saved:");
                    eprintln!("{}", render_errors(&rejected.errors));
                    eprintln!();
                    eprintln!("{}", render_options(self.format, &rejected.options)?);
                }
                bail!("{} validation error(s)", rejected.errors.len())
            }
        }
    }

    fn draft(&self, args: &FlightArgs) -> anyhow::Result<Flight> {
        Ok(Flight {
            id: None,
            origin_id: self.airport_id(&args.origin)?,
            destination_id: self.airport_id(&args.destination)?,
            departure_time: args.departs,
            arrival_time: args.arrives,
            gate: args.gate.clone(),
            airline_id: args.airline,
            aircraft_id: args.aircraft,
        })
    }

    fn airport_id(&self, airport: &AirportRef) -> anyhow::Result<i64> {
        match airport {
            AirportRef::Id(id) => Ok(*id),
            AirportRef::Code(_) => self
                .resolve_airport(airport)?
                .id
                .ok_or_else(|| anyhow!("airport {airport} has no id")),
        }
    }

    fn resolve_airport(&self, airport: &AirportRef) -> anyhow::Result<Airport> {
        match airport {
            AirportRef::Id(id) => Ok(self.catalog.get_airport(*id)?),
            AirportRef::Code(code) => self
                .catalog
                .find_airport(code)?
                .ok_or_else(|| anyhow!("no airport with code {code}")),
        }
    }
}

fn handle_config(path: Option<std::path::PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:       {}", config.database_path().display());
                println!("  Busy timeout (ms):   {}", config.storage.busy_timeout_ms);
                println!();
                println!("[Catalog]");
                println!(
                    "  Max airport name:    {}",
                    config.catalog.max_airport_name_length
                );
                println!(
                    "  Min airports:        {}",
                    config.catalog.min_airports_for_flights
                );
            }
        }
        ConfigCommand::Path => {
            println!(
                "{}",
                path.unwrap_or_else(Config::default_config_path).display()
            );
        }
        ConfigCommand::Validate { file } => {
            let file = file
                .or(path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", file.display());
            match Config::load_file(&file) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
