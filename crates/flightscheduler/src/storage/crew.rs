//! Flight crew queries, including the availability flag.

use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::error::Result;
use crate::model::{CrewPosition, FlightCrew};

use super::Storage;

const CREW_COLUMNS: &str = "id, first_name, last_name, age, position, is_available";

impl Storage {
    /// Insert a crew member and return the new ID.
    ///
    /// The record's `is_available` is stored as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_crew(&self, crew: &FlightCrew) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO flight_crews (first_name, last_name, age, position, is_available)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                crew.first_name,
                crew.last_name,
                crew.age,
                crew.position.as_str(),
                crew.is_available,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted crew member with id {}", id);
        Ok(id)
    }

    /// Get a crew member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_crew(&self, id: i64) -> Result<Option<FlightCrew>> {
        let sql = format!("SELECT {CREW_COLUMNS} FROM flight_crews WHERE id = ?1");
        let result = self
            .conn
            .query_row(&sql, [id], Self::row_to_crew)
            .optional()?;
        Ok(result)
    }

    /// List every crew member ordered by last name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_crew(&self) -> Result<Vec<FlightCrew>> {
        let sql = format!(
            "SELECT {CREW_COLUMNS} FROM flight_crews ORDER BY last_name, first_name, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let crew = stmt
            .query_map([], Self::row_to_crew)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(crew)
    }

    /// List crew that may be offered for a flight form.
    ///
    /// That is every available crew member, plus those currently assigned to
    /// `flight_id` when editing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_selectable_crew(&self, flight_id: Option<i64>) -> Result<Vec<FlightCrew>> {
        let sql = format!(
            r"
            SELECT {CREW_COLUMNS} FROM flight_crews
            WHERE is_available = 1
               OR id IN (SELECT crew_id FROM flight_crew_assignments WHERE flight_id = ?1)
            ORDER BY last_name, first_name, id
            "
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let crew = stmt
            .query_map([flight_id], Self::row_to_crew)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(crew)
    }

    /// Overwrite a crew member's personal details.
    ///
    /// `is_available` is left untouched. Returns `false` if no row was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_crew_details(&self, id: i64, crew: &FlightCrew) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE flight_crews
            SET first_name = ?2, last_name = ?3, age = ?4, position = ?5
            WHERE id = ?1
            ",
            params![
                id,
                crew.first_name,
                crew.last_name,
                crew.age,
                crew.position.as_str(),
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete a crew member and its assignment rows.
    ///
    /// Returns `true` if a crew member was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_crew(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM flight_crews WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Mark a crew member available.
    ///
    /// Returns `false` if the crew member does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn release_crew(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE flight_crews SET is_available = 1 WHERE id = ?1",
            [id],
        )?;
        Ok(affected > 0)
    }

    /// Mark a crew member unavailable, but only if it is currently available.
    ///
    /// Returns `false` when the crew member is missing or already taken; the
    /// check and the write are a single statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn claim_crew(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE flight_crews SET is_available = 0 WHERE id = ?1 AND is_available = 1",
            [id],
        )?;
        Ok(affected > 0)
    }

    /// Check whether a crew member exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn crew_exists(&self, id: i64) -> Result<bool> {
        self.exists("flight_crews", id)
    }

    pub(super) fn row_to_crew(row: &rusqlite::Row) -> rusqlite::Result<FlightCrew> {
        let position_str: String = row.get(4)?;
        let position = position_str
            .parse::<CrewPosition>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(FlightCrew {
            id: Some(row.get(0)?),
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            age: row.get(3)?,
            position,
            is_available: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn seed_crew(storage: &Storage) -> i64 {
        storage
            .insert_crew(&FlightCrew::new(
                "John",
                "Doe",
                Some(35),
                CrewPosition::Captain,
            ))
            .unwrap()
    }

    #[test]
    fn test_insert_and_get_crew() {
        let storage = create_test_storage();
        let id = seed_crew(&storage);

        let crew = storage.get_crew(id).unwrap().unwrap();
        assert_eq!(crew.first_name, "John");
        assert_eq!(crew.age, Some(35));
        assert_eq!(crew.position, CrewPosition::Captain);
        assert!(crew.is_available);
    }

    #[test]
    fn test_crew_without_age() {
        let storage = create_test_storage();
        let id = storage
            .insert_crew(&FlightCrew::new("Mike", "Johnson", None, CrewPosition::Purser))
            .unwrap();
        assert_eq!(storage.get_crew(id).unwrap().unwrap().age, None);
    }

    #[test]
    fn test_claim_is_conditional() {
        let storage = create_test_storage();
        let id = seed_crew(&storage);

        assert!(storage.claim_crew(id).unwrap());
        assert!(!storage.get_crew(id).unwrap().unwrap().is_available);
        assert!(!storage.claim_crew(id).unwrap());
        assert!(!storage.claim_crew(999).unwrap());

        assert!(storage.release_crew(id).unwrap());
        assert!(storage.get_crew(id).unwrap().unwrap().is_available);
        assert!(!storage.release_crew(999).unwrap());
    }

    #[test]
    fn test_update_details_keeps_availability() {
        let storage = create_test_storage();
        let id = seed_crew(&storage);
        storage.claim_crew(id).unwrap();

        let mut edited = FlightCrew::new("Johnny", "Doe", Some(36), CrewPosition::FirstOfficer);
        edited.is_available = true;
        assert!(storage.update_crew_details(id, &edited).unwrap());

        let crew = storage.get_crew(id).unwrap().unwrap();
        assert_eq!(crew.first_name, "Johnny");
        assert_eq!(crew.position, CrewPosition::FirstOfficer);
        assert!(!crew.is_available);
    }

    #[test]
    fn test_selectable_crew_excludes_unavailable() {
        let storage = create_test_storage();
        let id = seed_crew(&storage);
        let other = storage
            .insert_crew(&FlightCrew::new("Jane", "Smith", None, CrewPosition::FirstOfficer))
            .unwrap();
        storage.claim_crew(id).unwrap();

        let ids: Vec<_> = storage
            .list_selectable_crew(None)
            .unwrap()
            .into_iter()
            .filter_map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![other]);
    }

    #[test]
    fn test_unknown_position_is_an_error() {
        let storage = create_test_storage();
        storage
            .conn
            .execute(
                "INSERT INTO flight_crews (first_name, last_name, position) VALUES ('A', 'B', 'Navigator')",
                [],
            )
            .unwrap();
        assert!(storage.list_crew().is_err());
    }

    #[test]
    fn test_delete_crew() {
        let storage = create_test_storage();
        let id = seed_crew(&storage);
        assert!(storage.crew_exists(id).unwrap());
        assert!(storage.delete_crew(id).unwrap());
        assert!(!storage.delete_crew(id).unwrap());
    }
}
