//! Flight operations built on the crew assignment engine.
//!
//! Covers create, edit, delete and lookup of flights, plus the option lists a
//! flight form needs: candidate aircraft, airlines, airports and crew split
//! by role. A rejected submission comes back with those options filled in so
//! the caller can show the form again as submitted.

use serde::Serialize;
use tracing::info;

use crate::assignment::{AssignedFlight, CrewAssignmentEngine};
use crate::config::CatalogConfig;
use crate::error::{Entity, Error, Result};
use crate::model::{Aircraft, Airline, Airport, CrewPosition, Flight, FlightCrew};
use crate::storage::Storage;
use crate::validation::{Submission, ValidationErrors};

/// A flight with its references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightDetails {
    /// The flight record.
    pub flight: Flight,
    /// Aircraft flying the route.
    pub aircraft: Aircraft,
    /// Operating airline.
    pub airline: Airline,
    /// Departure airport.
    pub origin: Airport,
    /// Arrival airport.
    pub destination: Airport,
    /// Assigned crew, ascending by ID.
    pub crew: Vec<FlightCrew>,
}

/// Candidate values for a flight form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlightFormOptions {
    /// All aircraft.
    pub aircraft: Vec<Aircraft>,
    /// All airlines.
    pub airlines: Vec<Airline>,
    /// All airports, offered as both origin and destination.
    pub airports: Vec<Airport>,
    /// Selectable captains.
    pub captains: Vec<FlightCrew>,
    /// Selectable first officers.
    pub first_officers: Vec<FlightCrew>,
    /// Every other selectable crew member.
    pub other_crew: Vec<FlightCrew>,
    /// Crew IDs to show as selected.
    pub selected_crew: Vec<i64>,
}

impl FlightFormOptions {
    /// Every selectable crew member, whatever the role.
    pub fn all_crew(&self) -> impl Iterator<Item = &FlightCrew> {
        self.captains
            .iter()
            .chain(&self.first_officers)
            .chain(&self.other_crew)
    }
}

/// A flight submission that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFlight {
    /// The submitted flight, unchanged.
    pub draft: Flight,
    /// The submitted crew IDs, unchanged.
    pub crew_ids: Vec<i64>,
    /// Every validation message.
    pub errors: ValidationErrors,
    /// Options to show the form again.
    pub options: FlightFormOptions,
}

/// The outcome of a flight create or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlightSubmission {
    /// The flight and its crew were written.
    Saved(AssignedFlight),
    /// Validation failed; nothing was written.
    Rejected(Box<RejectedFlight>),
}

impl FlightSubmission {
    /// The saved flight, if any.
    #[must_use]
    pub fn saved(self) -> Option<AssignedFlight> {
        match self {
            Self::Saved(flight) => Some(flight),
            Self::Rejected(_) => None,
        }
    }

    /// The rejection, if validation failed.
    #[must_use]
    pub fn rejected(&self) -> Option<&RejectedFlight> {
        match self {
            Self::Saved(_) => None,
            Self::Rejected(rejected) => Some(rejected),
        }
    }
}

/// Why a new flight cannot be created yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateDisabled {
    /// No aircraft exist.
    NoAircraft,
    /// No airlines exist.
    NoAirlines,
    /// Fewer airports than required.
    TooFewAirports {
        /// Airports required.
        required: usize,
        /// Airports present.
        found: usize,
    },
}

impl std::fmt::Display for CreateDisabled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAircraft => write!(f, "Add at least one aircraft before creating flights."),
            Self::NoAirlines => write!(f, "Add at least one airline before creating flights."),
            Self::TooFewAirports { required, found } => write!(
                f,
                "At least {required} airports are required to create flights ({found} found)."
            ),
        }
    }
}

/// Flight operations over a storage handle.
#[derive(Debug, Clone)]
pub struct FlightScheduler<'s> {
    storage: &'s Storage,
    config: CatalogConfig,
}

impl<'s> FlightScheduler<'s> {
    /// Create a scheduler with the given rules.
    #[must_use]
    pub fn new(storage: &'s Storage, config: CatalogConfig) -> Self {
        Self { storage, config }
    }

    fn engine(&self) -> CrewAssignmentEngine<'s> {
        CrewAssignmentEngine::new(self.storage)
    }

    /// Check that a flight could be created at all.
    ///
    /// Returns `None` when creation is possible.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_prerequisites(&self) -> Result<Option<CreateDisabled>> {
        let stats = self.storage.stats()?;
        if stats.aircraft == 0 {
            return Ok(Some(CreateDisabled::NoAircraft));
        }
        if stats.airlines == 0 {
            return Ok(Some(CreateDisabled::NoAirlines));
        }
        let found = usize::try_from(stats.airports).unwrap_or_default();
        if found < self.config.min_airports_for_flights {
            return Ok(Some(CreateDisabled::TooFewAirports {
                required: self.config.min_airports_for_flights,
                found,
            }));
        }
        Ok(None)
    }

    /// Create a flight and assign the requested crew.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_flight(&self, draft: &Flight, crew_ids: &[i64]) -> Result<FlightSubmission> {
        let mut flight = draft.clone();
        flight.id = None;
        let submission = self.engine().validate_and_assign(&flight, crew_ids, &[])?;
        self.finish(submission, flight, crew_ids)
    }

    /// Replace a flight's fields and crew.
    ///
    /// Crew currently on the flight are read and released inside the same
    /// unit of work as the write, so keeping a crew member across the edit
    /// leaves them assigned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such flight and
    /// [`Error::Conflict`] if the write was lost.
    pub fn edit_flight(&self, id: i64, draft: &Flight, crew_ids: &[i64]) -> Result<FlightSubmission> {
        if !self.storage.flight_exists(id)? {
            return Err(Error::not_found(Entity::Flight, id));
        }

        let mut flight = draft.clone();
        flight.id = Some(id);
        let submission = self.engine().validate_and_assign(&flight, crew_ids, &[])?;
        self.finish(submission, flight, crew_ids)
    }

    /// Delete a flight and release its crew.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such flight.
    pub fn delete_flight(&self, id: i64) -> Result<()> {
        let tx = self.storage.begin()?;
        if !self.storage.flight_exists(id)? {
            return Err(Error::not_found(Entity::Flight, id));
        }
        let crew_ids = self.storage.flight_crew_ids(id)?;
        for &crew_id in &crew_ids {
            self.storage.release_crew(crew_id)?;
        }
        self.storage.delete_flight(id)?;
        tx.commit()?;
        info!(
            "Deleted flight {} and released {} crew member(s)",
            id,
            crew_ids.len()
        );
        Ok(())
    }

    /// A flight with its references resolved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such flight.
    pub fn flight_details(&self, id: i64) -> Result<FlightDetails> {
        let flight = self
            .storage
            .get_flight(id)?
            .ok_or_else(|| Error::not_found(Entity::Flight, id))?;
        self.resolve(flight)
    }

    /// Every flight with its references resolved, by departure time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_flights(&self) -> Result<Vec<FlightDetails>> {
        self.storage
            .list_flights()?
            .into_iter()
            .map(|flight| self.resolve(flight))
            .collect()
    }

    /// Options for a new flight form (`editing` is `None`) or for editing
    /// an existing flight.
    ///
    /// Crew are limited to available members plus those already on the
    /// flight being edited, which are also marked selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `editing` names a missing flight.
    pub fn form_options(&self, editing: Option<i64>) -> Result<FlightFormOptions> {
        let selected = match editing {
            Some(id) => {
                if !self.storage.flight_exists(id)? {
                    return Err(Error::not_found(Entity::Flight, id));
                }
                self.storage.flight_crew_ids(id)?
            }
            None => Vec::new(),
        };
        self.options(editing, selected)
    }

    fn options(&self, editing: Option<i64>, selected_crew: Vec<i64>) -> Result<FlightFormOptions> {
        let mut options = FlightFormOptions {
            aircraft: self.storage.list_aircraft()?,
            airlines: self.storage.list_airlines()?,
            airports: self.storage.list_airports()?,
            selected_crew,
            ..FlightFormOptions::default()
        };
        for crew in self.storage.list_selectable_crew(editing)? {
            match crew.position {
                CrewPosition::Captain => options.captains.push(crew),
                CrewPosition::FirstOfficer => options.first_officers.push(crew),
                _ => options.other_crew.push(crew),
            }
        }
        Ok(options)
    }

    fn finish(
        &self,
        submission: Submission<AssignedFlight>,
        draft: Flight,
        crew_ids: &[i64],
    ) -> Result<FlightSubmission> {
        match submission {
            Submission::Saved(assigned) => Ok(FlightSubmission::Saved(assigned)),
            Submission::Rejected(errors) => {
                let options = self.options(draft.id, crew_ids.to_vec())?;
                Ok(FlightSubmission::Rejected(Box::new(RejectedFlight {
                    draft,
                    crew_ids: crew_ids.to_vec(),
                    errors,
                    options,
                })))
            }
        }
    }

    fn resolve(&self, flight: Flight) -> Result<FlightDetails> {
        let aircraft = self
            .storage
            .get_aircraft(flight.aircraft_id)?
            .ok_or_else(|| Error::not_found(Entity::Aircraft, flight.aircraft_id))?;
        let airline = self
            .storage
            .get_airline(flight.airline_id)?
            .ok_or_else(|| Error::not_found(Entity::Airline, flight.airline_id))?;
        let origin = self.airport(flight.origin_id)?;
        let destination = self.airport(flight.destination_id)?;
        let crew = match flight.id {
            Some(id) => self.storage.flight_crew(id)?,
            None => Vec::new(),
        };
        Ok(FlightDetails {
            flight,
            aircraft,
            airline,
            origin,
            destination,
            crew,
        })
    }

    fn airport(&self, id: i64) -> Result<Airport> {
        self.storage
            .get_airport(id)?
            .ok_or_else(|| Error::not_found(Entity::Airport, id))
    }
}
