//! Crew assignment engine.
//!
//! Validates a flight together with its requested crew, then releases the
//! flight's previous crew, claims the requested ones and writes the flight,
//! all in one unit of work. Validation failures are returned as
//! [`Submission::Rejected`] and leave the database untouched.
//!
//! A requested crew member that is missing or already taken when the claim
//! runs is skipped without failing the request. Skipped IDs are reported in
//! [`AssignedFlight::skipped_crew`].

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Entity, Error, Result};
use crate::model::{Flight, FlightCrew};
use crate::storage::Storage;
use crate::validation::{Submission, ValidationErrors};

/// A flight as written, with the crew that ended up assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedFlight {
    /// The stored flight; `id` is always set.
    pub flight: Flight,
    /// Assigned crew, ascending by ID.
    pub crew: Vec<FlightCrew>,
    /// Requested crew IDs that were missing or unavailable, in request order.
    pub skipped_crew: Vec<i64>,
}

impl AssignedFlight {
    /// The stored flight's ID.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.flight.id.unwrap_or_default()
    }

    /// IDs of the assigned crew.
    #[must_use]
    pub fn crew_ids(&self) -> Vec<i64> {
        self.crew.iter().filter_map(|c| c.id).collect()
    }
}

/// Validates flights and applies crew availability changes.
#[derive(Debug, Clone, Copy)]
pub struct CrewAssignmentEngine<'s> {
    storage: &'s Storage,
}

impl<'s> CrewAssignmentEngine<'s> {
    /// Create an engine over the given storage handle.
    #[must_use]
    pub fn new(storage: &'s Storage) -> Self {
        Self { storage }
    }

    /// Run every check against a flight and its requested crew.
    ///
    /// All violations are collected; nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the aircraft lookup fails.
    pub fn validate(&self, flight: &Flight, crew_ids: &[i64]) -> Result<ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if flight.origin_id == flight.destination_id {
            errors.add(
                "destination_id",
                "Origin and destination airports must be different.",
            );
        }

        let distinct = distinct_ids(crew_ids);
        match self.storage.get_aircraft(flight.aircraft_id)? {
            None => errors.add("aircraft_id", "Aircraft not found."),
            Some(aircraft) => {
                if distinct.len() > aircraft.crew_capacity as usize {
                    errors.add_form(format!(
                        "Too many crew members. Aircraft capacity: {}.",
                        aircraft.crew_capacity
                    ));
                }
            }
        }

        if distinct.len() != crew_ids.len() {
            errors.add_form("Duplicate crew members are not allowed.");
        }

        for error in &flight.validate() {
            match error.field {
                Some(field) => errors.add(field, error.message.clone()),
                None => errors.add_form(error.message.clone()),
            }
        }

        Ok(errors)
    }

    /// Validate, then write the flight and its crew as one unit of work.
    ///
    /// `flight.id` selects between insert (`None`) and update (`Some`).
    /// `previous_crew_ids` are released before the requested crew are
    /// claimed, so a crew member kept across an edit stays assigned. On an
    /// update the crew stored for the flight are read inside the unit of
    /// work and released as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when updating a
    /// flight that no longer exists, [`Error::Conflict`](crate::Error::Conflict)
    /// when the update is not applied although the flight still exists, and
    /// database errors otherwise. In every error case nothing is written.
    pub fn validate_and_assign(
        &self,
        flight: &Flight,
        crew_ids: &[i64],
        previous_crew_ids: &[i64],
    ) -> Result<Submission<AssignedFlight>> {
        let errors = self.validate(flight, crew_ids)?;
        if !errors.is_empty() {
            warn!(
                "Rejected flight {:?}: {} validation error(s)",
                flight.id,
                errors.len()
            );
            return Ok(Submission::Rejected(errors));
        }

        let tx = self.storage.begin()?;

        let flight_id = self.write_flight(flight)?;

        let mut released = distinct_ids(previous_crew_ids);
        if flight.id.is_some() {
            for crew_id in self.storage.flight_crew_ids(flight_id)? {
                if !released.contains(&crew_id) {
                    released.push(crew_id);
                }
            }
        }

        for &crew_id in &released {
            if self.storage.release_crew(crew_id)? {
                debug!("Released crew member {} from flight {}", crew_id, flight_id);
            }
        }

        let mut assigned = Vec::new();
        let mut skipped_crew = Vec::new();
        for crew_id in distinct_ids(crew_ids) {
            if self.storage.claim_crew(crew_id)? {
                debug!("Assigned crew member {} to flight {}", crew_id, flight_id);
                assigned.push(crew_id);
            } else {
                warn!(
                    "Skipped crew member {} for flight {}: missing or unavailable",
                    crew_id, flight_id
                );
                skipped_crew.push(crew_id);
            }
        }

        self.storage.replace_flight_crew(flight_id, &assigned)?;
        let crew = self.storage.flight_crew(flight_id)?;

        tx.commit()?;

        info!(
            "Saved flight {} with {} crew member(s)",
            flight_id,
            crew.len()
        );

        let mut stored = flight.clone();
        stored.id = Some(flight_id);
        Ok(Submission::Saved(AssignedFlight {
            flight: stored,
            crew,
            skipped_crew,
        }))
    }

    fn write_flight(&self, flight: &Flight) -> Result<i64> {
        match flight.id {
            None => self.storage.insert_flight(flight),
            Some(id) => {
                if self.storage.update_flight(id, flight)? {
                    Ok(id)
                } else if self.storage.flight_exists(id)? {
                    Err(Error::conflict(Entity::Flight, id))
                } else {
                    Err(Error::not_found(Entity::Flight, id))
                }
            }
        }
    }
}

/// Distinct IDs in first-seen order.
fn distinct_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::{Aircraft, Airline, CrewPosition};

    struct Fixture {
        storage: Storage,
        aircraft_id: i64,
        airline_id: i64,
        crew: Vec<i64>,
    }

    fn fixture(crew_capacity: u32) -> Fixture {
        crate::logging::init_test_logging();
        let storage = Storage::open_in_memory().unwrap();
        let aircraft_id = storage
            .insert_aircraft(&Aircraft::new("Boeing 737", crew_capacity, 150, 20_000))
            .unwrap();
        let airline_id = storage
            .insert_airline(&Airline::new("TestAir", "TestLand"))
            .unwrap();
        let crew = [
            ("John", "Doe", CrewPosition::Captain),
            ("Jane", "Smith", CrewPosition::FirstOfficer),
            ("Mike", "Johnson", CrewPosition::FlightAttendant),
            ("Ann", "Lee", CrewPosition::Purser),
        ]
        .into_iter()
        .map(|(first, last, position)| {
            storage
                .insert_crew(&FlightCrew::new(first, last, None, position))
                .unwrap()
        })
        .collect();
        Fixture {
            storage,
            aircraft_id,
            airline_id,
            crew,
        }
    }

    impl Fixture {
        fn flight(&self) -> Flight {
            Flight {
                id: None,
                origin_id: 1,
                destination_id: 2,
                departure_time: Utc.with_ymd_and_hms(2025, 5, 10, 8, 0, 0).unwrap(),
                arrival_time: Utc.with_ymd_and_hms(2025, 5, 10, 14, 30, 0).unwrap(),
                gate: Some("A1".to_string()),
                airline_id: self.airline_id,
                aircraft_id: self.aircraft_id,
            }
        }

        fn engine(&self) -> CrewAssignmentEngine<'_> {
            CrewAssignmentEngine::new(&self.storage)
        }

        fn available(&self, crew_id: i64) -> bool {
            self.storage.get_crew(crew_id).unwrap().unwrap().is_available
        }

        fn create(&self, crew_ids: &[i64]) -> AssignedFlight {
            self.engine()
                .validate_and_assign(&self.flight(), crew_ids, &[])
                .unwrap()
                .saved()
                .unwrap()
        }

        fn edit(&self, flight_id: i64, crew_ids: &[i64]) -> Submission<AssignedFlight> {
            let mut flight = self.flight();
            flight.id = Some(flight_id);
            let previous = self.storage.flight_crew_ids(flight_id).unwrap();
            self.engine()
                .validate_and_assign(&flight, crew_ids, &previous)
                .unwrap()
        }

        fn assert_untouched(&self) {
            assert_eq!(self.storage.stats().unwrap().flights, 0);
            for &id in &self.crew {
                assert!(self.available(id));
            }
        }
    }

    fn messages(submission: &Submission<AssignedFlight>) -> Vec<String> {
        submission
            .rejected()
            .expect("expected a rejected submission")
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    #[test]
    fn test_same_origin_and_destination_rejected() {
        let f = fixture(5);
        let mut flight = f.flight();
        flight.origin_id = 5;
        flight.destination_id = 5;

        let result = f
            .engine()
            .validate_and_assign(&flight, &[f.crew[0]], &[])
            .unwrap();

        let errors = result.rejected().unwrap();
        assert_eq!(
            errors.for_field("destination_id").collect::<Vec<_>>(),
            vec!["Origin and destination airports must be different."]
        );
        assert_eq!(errors.len(), 1);
        f.assert_untouched();
    }

    #[test]
    fn test_unknown_aircraft_rejected() {
        let f = fixture(5);
        let mut flight = f.flight();
        flight.aircraft_id = 999;

        let result = f.engine().validate_and_assign(&flight, &[], &[]).unwrap();
        assert_eq!(
            result
                .rejected()
                .unwrap()
                .for_field("aircraft_id")
                .collect::<Vec<_>>(),
            vec!["Aircraft not found."]
        );
        f.assert_untouched();
    }

    #[test]
    fn test_capacity_exceeded_cites_capacity() {
        let f = fixture(2);
        let crew_ids = [f.crew[0], f.crew[1], f.crew[2]];

        let result = f
            .engine()
            .validate_and_assign(&f.flight(), &crew_ids, &[])
            .unwrap();

        assert_eq!(
            messages(&result),
            vec!["Too many crew members. Aircraft capacity: 2."]
        );
        f.assert_untouched();
    }

    #[test]
    fn test_capacity_counts_distinct_crew() {
        let f = fixture(2);
        let errors = f
            .engine()
            .validate(&f.flight(), &[f.crew[0], f.crew[0], f.crew[1]])
            .unwrap();
        assert!(!errors.contains("Too many crew members. Aircraft capacity: 2."));
        assert!(errors.contains("Duplicate crew members are not allowed."));
    }

    #[test]
    fn test_duplicate_crew_rejected() {
        let f = fixture(5);
        let crew_ids = [f.crew[0], f.crew[0], f.crew[1]];

        let result = f
            .engine()
            .validate_and_assign(&f.flight(), &crew_ids, &[])
            .unwrap();

        assert_eq!(
            messages(&result),
            vec!["Duplicate crew members are not allowed."]
        );
        f.assert_untouched();
    }

    #[test]
    fn test_all_errors_collected_in_order() {
        let f = fixture(2);
        let mut flight = f.flight();
        flight.destination_id = flight.origin_id;
        flight.gate = Some(" ".to_string());
        let crew_ids = [f.crew[0], f.crew[1], f.crew[2], f.crew[2]];

        let result = f
            .engine()
            .validate_and_assign(&flight, &crew_ids, &[])
            .unwrap();

        assert_eq!(
            messages(&result),
            vec![
                "Origin and destination airports must be different.",
                "Too many crew members. Aircraft capacity: 2.",
                "Duplicate crew members are not allowed.",
                "Gate must not be blank.",
            ]
        );
        f.assert_untouched();
    }

    #[test]
    fn test_origin_check_independent_of_aircraft() {
        let f = fixture(5);
        let mut flight = f.flight();
        flight.origin_id = 5;
        flight.destination_id = 5;
        flight.aircraft_id = 999;

        let errors = f.engine().validate(&flight, &[1, 1]).unwrap();
        assert_eq!(
            errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>(),
            vec![
                "Origin and destination airports must be different.",
                "Aircraft not found.",
                "Duplicate crew members are not allowed.",
            ]
        );
    }

    #[test]
    fn test_create_assigns_available_crew() {
        let f = fixture(5);
        let assigned = f.create(&[f.crew[1], f.crew[0]]);

        assert!(assigned.flight.id.is_some());
        assert_eq!(assigned.crew_ids(), vec![f.crew[0], f.crew[1]]);
        assert!(assigned.skipped_crew.is_empty());
        assert!(!f.available(f.crew[0]));
        assert!(!f.available(f.crew[1]));
        assert!(f.available(f.crew[2]));
        assert_eq!(
            f.storage.flight_crew_ids(assigned.id()).unwrap(),
            vec![f.crew[0], f.crew[1]]
        );
    }

    #[test]
    fn test_create_without_crew() {
        let f = fixture(5);
        let assigned = f.create(&[]);
        assert!(assigned.crew.is_empty());
        assert_eq!(f.storage.stats().unwrap().flights, 1);
    }

    #[test]
    fn test_unavailable_crew_silently_skipped() {
        let f = fixture(5);
        let first = f.create(&[f.crew[0]]);

        let second = f.create(&[f.crew[0], f.crew[1]]);
        assert_eq!(second.skipped_crew, vec![f.crew[0]]);
        assert_eq!(second.crew_ids(), vec![f.crew[1]]);

        assert_eq!(
            f.storage.flight_crew_ids(first.id()).unwrap(),
            vec![f.crew[0]]
        );
        assert!(!f.available(f.crew[0]));
    }

    #[test]
    fn test_missing_crew_silently_skipped() {
        let f = fixture(5);
        let assigned = f.create(&[999, f.crew[0]]);
        assert_eq!(assigned.skipped_crew, vec![999]);
        assert_eq!(assigned.crew_ids(), vec![f.crew[0]]);
    }

    #[test]
    fn test_edit_releases_and_reassigns() {
        let f = fixture(5);
        let (one, two, three) = (f.crew[0], f.crew[1], f.crew[2]);
        let created = f.create(&[one, two]);

        let edited = f.edit(created.id(), &[two, three]).saved().unwrap();

        assert!(f.available(one));
        assert!(!f.available(two));
        assert!(!f.available(three));
        assert_eq!(edited.crew_ids(), vec![two, three]);
        assert!(edited.skipped_crew.is_empty());
        assert_eq!(
            f.storage.flight_crew_ids(created.id()).unwrap(),
            vec![two, three]
        );
    }

    #[test]
    fn test_edit_is_idempotent() {
        let f = fixture(5);
        let created = f.create(&[f.crew[0]]);

        let once = f.edit(created.id(), &[f.crew[1], f.crew[2]]).saved().unwrap();
        let crew_after_once = f.storage.list_crew().unwrap();

        let twice = f.edit(created.id(), &[f.crew[1], f.crew[2]]).saved().unwrap();
        let crew_after_twice = f.storage.list_crew().unwrap();

        assert_eq!(once.crew_ids(), twice.crew_ids());
        assert!(twice.skipped_crew.is_empty());
        assert_eq!(crew_after_once, crew_after_twice);
    }

    #[test]
    fn test_rejected_edit_keeps_previous_crew() {
        let f = fixture(2);
        let created = f.create(&[f.crew[0], f.crew[1]]);

        let result = f.edit(created.id(), &[f.crew[1], f.crew[2], f.crew[3]]);
        assert!(!result.is_saved());

        assert!(!f.available(f.crew[0]));
        assert!(!f.available(f.crew[1]));
        assert!(f.available(f.crew[2]));
        assert_eq!(
            f.storage.flight_crew_ids(created.id()).unwrap(),
            vec![f.crew[0], f.crew[1]]
        );
    }

    #[test]
    fn test_edit_updates_flight_fields() {
        let f = fixture(5);
        let created = f.create(&[]);

        let mut flight = f.flight();
        flight.id = Some(created.id());
        flight.gate = None;
        flight.destination_id = 3;
        f.engine().validate_and_assign(&flight, &[], &[]).unwrap();

        let stored = f.storage.get_flight(created.id()).unwrap().unwrap();
        assert_eq!(stored.gate, None);
        assert_eq!(stored.destination_id, 3);
    }

    #[test]
    fn test_edit_missing_flight_is_not_found() {
        let f = fixture(5);
        let mut flight = f.flight();
        flight.id = Some(42);

        let err = f
            .engine()
            .validate_and_assign(&flight, &[f.crew[0]], &[])
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(f.available(f.crew[0]));
    }

    #[test]
    fn test_edit_releases_stored_crew_missing_from_previous() {
        let f = fixture(5);
        let (one, two) = (f.crew[0], f.crew[1]);
        let created = f.create(&[one]);

        let mut flight = f.flight();
        flight.id = Some(created.id());
        let edited = f
            .engine()
            .validate_and_assign(&flight, &[two], &[])
            .unwrap()
            .saved()
            .unwrap();

        assert!(f.available(one));
        assert!(!f.available(two));
        assert_eq!(edited.crew_ids(), vec![two]);
    }

    #[test]
    fn test_distinct_ids_keeps_first_seen_order() {
        assert_eq!(distinct_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(distinct_ids(&[]).is_empty());
    }
}
