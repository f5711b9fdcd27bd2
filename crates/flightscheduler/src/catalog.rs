//! Validated CRUD for reference data: aircraft, airlines, airports and crew.
//!
//! Crew availability is never set here. New crew start available and
//! updates leave the flag alone; deleting an aircraft or airline releases
//! the crew of the flights that go with it.

use tracing::info;

use crate::config::CatalogConfig;
use crate::error::{Entity, Error, Result};
use crate::model::{Aircraft, Airline, Airport, FlightCrew};
use crate::storage::Storage;
use crate::validation::Submission;

/// Reference data operations over a storage handle.
#[derive(Debug, Clone)]
pub struct Catalog<'s> {
    storage: &'s Storage,
    config: CatalogConfig,
}

impl<'s> Catalog<'s> {
    /// Create a catalog with the given rules.
    #[must_use]
    pub fn new(storage: &'s Storage, config: CatalogConfig) -> Self {
        Self { storage, config }
    }

    // === Aircraft ===

    /// List all aircraft.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_aircraft(&self) -> Result<Vec<Aircraft>> {
        self.storage.list_aircraft()
    }

    /// Get an aircraft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such aircraft.
    pub fn get_aircraft(&self, id: i64) -> Result<Aircraft> {
        self.storage
            .get_aircraft(id)?
            .ok_or_else(|| Error::not_found(Entity::Aircraft, id))
    }

    /// Validate and store a new aircraft.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_aircraft(&self, aircraft: &Aircraft) -> Result<Submission<Aircraft>> {
        let errors = aircraft.validate();
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }
        let id = self.storage.insert_aircraft(aircraft)?;
        info!("Created aircraft {} ({})", id, aircraft.model);
        let mut stored = aircraft.clone();
        stored.id = Some(id);
        Ok(Submission::Saved(stored))
    }

    /// Validate and overwrite an aircraft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such aircraft and
    /// [`Error::Conflict`] if the write was lost.
    pub fn update_aircraft(&self, id: i64, aircraft: &Aircraft) -> Result<Submission<Aircraft>> {
        let errors = aircraft.validate();
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }
        let written = self.storage.update_aircraft(id, aircraft)?;
        self.ensure_written(written, Entity::Aircraft, id, Storage::aircraft_exists)?;
        info!("Updated aircraft {}", id);
        let mut stored = aircraft.clone();
        stored.id = Some(id);
        Ok(Submission::Saved(stored))
    }

    /// Delete an aircraft together with its flights, releasing their crew.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such aircraft.
    pub fn delete_aircraft(&self, id: i64) -> Result<()> {
        let tx = self.storage.begin()?;
        if !self.storage.aircraft_exists(id)? {
            return Err(Error::not_found(Entity::Aircraft, id));
        }
        let released = self.release_all(&self.storage.crew_ids_for_aircraft_flights(id)?)?;
        self.storage.delete_aircraft(id)?;
        tx.commit()?;
        info!("Deleted aircraft {} and released {} crew member(s)", id, released);
        Ok(())
    }

    // === Airlines ===

    /// List all airlines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_airlines(&self) -> Result<Vec<Airline>> {
        self.storage.list_airlines()
    }

    /// Get an airline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such airline.
    pub fn get_airline(&self, id: i64) -> Result<Airline> {
        self.storage
            .get_airline(id)?
            .ok_or_else(|| Error::not_found(Entity::Airline, id))
    }

    /// Validate and store a new airline.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_airline(&self, airline: &Airline) -> Result<Submission<Airline>> {
        let errors = airline.validate();
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }
        let id = self.storage.insert_airline(airline)?;
        info!("Created airline {} ({})", id, airline.name);
        let mut stored = airline.clone();
        stored.id = Some(id);
        Ok(Submission::Saved(stored))
    }

    /// Validate and overwrite an airline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such airline and
    /// [`Error::Conflict`] if the write was lost.
    pub fn update_airline(&self, id: i64, airline: &Airline) -> Result<Submission<Airline>> {
        let errors = airline.validate();
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }
        let written = self.storage.update_airline(id, airline)?;
        self.ensure_written(written, Entity::Airline, id, Storage::airline_exists)?;
        info!("Updated airline {}", id);
        let mut stored = airline.clone();
        stored.id = Some(id);
        Ok(Submission::Saved(stored))
    }

    /// Delete an airline together with its flights, releasing their crew.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such airline.
    pub fn delete_airline(&self, id: i64) -> Result<()> {
        let tx = self.storage.begin()?;
        if !self.storage.airline_exists(id)? {
            return Err(Error::not_found(Entity::Airline, id));
        }
        let released = self.release_all(&self.storage.crew_ids_for_airline_flights(id)?)?;
        self.storage.delete_airline(id)?;
        tx.commit()?;
        info!("Deleted airline {} and released {} crew member(s)", id, released);
        Ok(())
    }

    // === Airports ===

    /// List all airports.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_airports(&self) -> Result<Vec<Airport>> {
        self.storage.list_airports()
    }

    /// Get an airport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such airport.
    pub fn get_airport(&self, id: i64) -> Result<Airport> {
        self.storage
            .get_airport(id)?
            .ok_or_else(|| Error::not_found(Entity::Airport, id))
    }

    /// Find an airport by its IATA code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_airport(&self, code: &str) -> Result<Option<Airport>> {
        self.storage.find_airport_by_code(code)
    }

    /// Validate and store a new airport.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_airport(&self, airport: &Airport) -> Result<Submission<Airport>> {
        let errors = airport.validate(self.config.max_airport_name_length);
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }
        let id = self.storage.insert_airport(airport)?;
        info!("Created airport {} ({})", id, airport.name);
        let mut stored = airport.clone();
        stored.id = Some(id);
        Ok(Submission::Saved(stored))
    }

    // === Crew ===

    /// List all crew members.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_crew(&self) -> Result<Vec<FlightCrew>> {
        self.storage.list_crew()
    }

    /// Get a crew member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such crew member.
    pub fn get_crew(&self, id: i64) -> Result<FlightCrew> {
        self.storage
            .get_crew(id)?
            .ok_or_else(|| Error::not_found(Entity::FlightCrew, id))
    }

    /// Validate and store a new crew member. The stored record is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_crew(&self, crew: &FlightCrew) -> Result<Submission<FlightCrew>> {
        let errors = crew.validate();
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }
        let mut stored = crew.clone();
        stored.is_available = true;
        let id = self.storage.insert_crew(&stored)?;
        stored.id = Some(id);
        info!("Created crew member {} ({})", id, stored.full_name());
        Ok(Submission::Saved(stored))
    }

    /// Validate and overwrite a crew member's details.
    ///
    /// The returned record carries the stored availability, whatever
    /// `crew.is_available` says.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such crew member and
    /// [`Error::Conflict`] if the write was lost.
    pub fn update_crew(&self, id: i64, crew: &FlightCrew) -> Result<Submission<FlightCrew>> {
        let errors = crew.validate();
        if !errors.is_empty() {
            return Ok(Submission::Rejected(errors));
        }
        let written = self.storage.update_crew_details(id, crew)?;
        self.ensure_written(written, Entity::FlightCrew, id, Storage::crew_exists)?;
        info!("Updated crew member {}", id);
        Ok(Submission::Saved(self.get_crew(id)?))
    }

    /// Delete a crew member and its flight assignments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is no such crew member.
    pub fn delete_crew(&self, id: i64) -> Result<()> {
        if !self.storage.delete_crew(id)? {
            return Err(Error::not_found(Entity::FlightCrew, id));
        }
        info!("Deleted crew member {}", id);
        Ok(())
    }

    fn release_all(&self, crew_ids: &[i64]) -> Result<usize> {
        let mut released = 0;
        for &crew_id in crew_ids {
            if self.storage.release_crew(crew_id)? {
                released += 1;
            }
        }
        Ok(released)
    }

    fn ensure_written(
        &self,
        written: bool,
        entity: Entity,
        id: i64,
        exists: fn(&Storage, i64) -> Result<bool>,
    ) -> Result<()> {
        if written {
            Ok(())
        } else if exists(self.storage, id)? {
            Err(Error::conflict(entity, id))
        } else {
            Err(Error::not_found(entity, id))
        }
    }
}
