//! Aircraft, airline and airport queries.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::error::Result;
use crate::model::{Aircraft, Airline, Airport};

use super::Storage;

impl Storage {
    // === Aircraft ===

    /// Insert an aircraft and return its new ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_aircraft(&self, aircraft: &Aircraft) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO aircraft (model, crew_capacity, passenger_capacity, fuel_tank_capacity)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                aircraft.model,
                aircraft.crew_capacity,
                aircraft.passenger_capacity,
                aircraft.fuel_tank_capacity,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted aircraft with id {}", id);
        Ok(id)
    }

    /// Get an aircraft by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_aircraft(&self, id: i64) -> Result<Option<Aircraft>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, model, crew_capacity, passenger_capacity, fuel_tank_capacity
                FROM aircraft WHERE id = ?1
                ",
                [id],
                Self::row_to_aircraft,
            )
            .optional()?;
        Ok(result)
    }

    /// List all aircraft ordered by model.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_aircraft(&self) -> Result<Vec<Aircraft>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, model, crew_capacity, passenger_capacity, fuel_tank_capacity
            FROM aircraft ORDER BY model, id
            ",
        )?;
        let aircraft = stmt
            .query_map([], Self::row_to_aircraft)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(aircraft)
    }

    /// Overwrite an aircraft's fields.
    ///
    /// Returns `false` if no row was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_aircraft(&self, id: i64, aircraft: &Aircraft) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE aircraft
            SET model = ?2, crew_capacity = ?3, passenger_capacity = ?4, fuel_tank_capacity = ?5
            WHERE id = ?1
            ",
            params![
                id,
                aircraft.model,
                aircraft.crew_capacity,
                aircraft.passenger_capacity,
                aircraft.fuel_tank_capacity,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete an aircraft. Its flights go with it.
    ///
    /// Returns `true` if an aircraft was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_aircraft(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM aircraft WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Check whether an aircraft exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn aircraft_exists(&self, id: i64) -> Result<bool> {
        self.exists("aircraft", id)
    }

    fn row_to_aircraft(row: &rusqlite::Row) -> rusqlite::Result<Aircraft> {
        Ok(Aircraft {
            id: Some(row.get(0)?),
            model: row.get(1)?,
            crew_capacity: row.get(2)?,
            passenger_capacity: row.get(3)?,
            fuel_tank_capacity: row.get(4)?,
        })
    }

    // === Airlines ===

    /// Insert an airline and return its new ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_airline(&self, airline: &Airline) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO airlines (name, country) VALUES (?1, ?2)",
            params![airline.name, airline.country],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted airline with id {}", id);
        Ok(id)
    }

    /// Get an airline by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_airline(&self, id: i64) -> Result<Option<Airline>> {
        let result = self
            .conn
            .query_row(
                "SELECT id, name, country FROM airlines WHERE id = ?1",
                [id],
                Self::row_to_airline,
            )
            .optional()?;
        Ok(result)
    }

    /// List all airlines ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_airlines(&self) -> Result<Vec<Airline>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, country FROM airlines ORDER BY name, id")?;
        let airlines = stmt
            .query_map([], Self::row_to_airline)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(airlines)
    }

    /// Overwrite an airline's fields.
    ///
    /// Returns `false` if no row was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_airline(&self, id: i64, airline: &Airline) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE airlines SET name = ?2, country = ?3 WHERE id = ?1",
            params![id, airline.name, airline.country],
        )?;
        Ok(affected > 0)
    }

    /// Delete an airline. Its flights go with it.
    ///
    /// Returns `true` if an airline was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_airline(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM airlines WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Check whether an airline exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn airline_exists(&self, id: i64) -> Result<bool> {
        self.exists("airlines", id)
    }

    fn row_to_airline(row: &rusqlite::Row) -> rusqlite::Result<Airline> {
        Ok(Airline {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            country: row.get(2)?,
        })
    }

    // === Airports ===

    /// Insert an airport and return its new ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_airport(&self, airport: &Airport) -> Result<i64> {
        self.conn
            .execute("INSERT INTO airports (name) VALUES (?1)", [&airport.name])?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted airport with id {}", id);
        Ok(id)
    }

    /// Get an airport by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_airport(&self, id: i64) -> Result<Option<Airport>> {
        let result = self
            .conn
            .query_row(
                "SELECT id, name FROM airports WHERE id = ?1",
                [id],
                Self::row_to_airport,
            )
            .optional()?;
        Ok(result)
    }

    /// Find an airport by the IATA code in its name, e.g. `"LHR"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_airport_by_code(&self, code: &str) -> Result<Option<Airport>> {
        let pattern = format!("%({})%", code.to_ascii_uppercase());
        let result = self
            .conn
            .query_row(
                "SELECT id, name FROM airports WHERE name LIKE ?1 ORDER BY id LIMIT 1",
                [pattern],
                Self::row_to_airport,
            )
            .optional()?;
        Ok(result)
    }

    /// List all airports in ID order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_airports(&self) -> Result<Vec<Airport>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM airports ORDER BY id")?;
        let airports = stmt
            .query_map([], Self::row_to_airport)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(airports)
    }

    fn row_to_airport(row: &rusqlite::Row) -> rusqlite::Result<Airport> {
        Ok(Airport {
            id: Some(row.get(0)?),
            name: row.get(1)?,
        })
    }

    /// Check whether a row with `id` exists in `table`.
    pub(super) fn exists(&self, table: &str, id: i64) -> Result<bool> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE id = ?1");
        let count: i64 = self.conn.query_row(&sql, [id], |row| row.get(0))?;
        Ok(count > 0)
    }
}
