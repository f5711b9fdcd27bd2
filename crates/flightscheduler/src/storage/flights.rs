//! Flight and flight/crew join table queries.

use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::error::Result;
use crate::model::{Flight, FlightCrew};

use super::{timestamp_column, Storage};

const FLIGHT_COLUMNS: &str =
    "id, origin_id, destination_id, departure_time, arrival_time, gate, airline_id, aircraft_id";

impl Storage {
    /// Insert a flight and return its new ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including when a
    /// referenced airport, airline or aircraft does not exist.
    pub fn insert_flight(&self, flight: &Flight) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO flights
                (origin_id, destination_id, departure_time, arrival_time, gate, airline_id, aircraft_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                flight.origin_id,
                flight.destination_id,
                flight.departure_time.to_rfc3339(),
                flight.arrival_time.to_rfc3339(),
                flight.gate,
                flight.airline_id,
                flight.aircraft_id,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted flight with id {}", id);
        Ok(id)
    }

    /// Get a flight by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_flight(&self, id: i64) -> Result<Option<Flight>> {
        let sql = format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE id = ?1");
        let result = self
            .conn
            .query_row(&sql, [id], Self::row_to_flight)
            .optional()?;
        Ok(result)
    }

    /// List all flights by departure time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_flights(&self) -> Result<Vec<Flight>> {
        let sql = format!("SELECT {FLIGHT_COLUMNS} FROM flights ORDER BY departure_time, id");
        let mut stmt = self.conn.prepare(&sql)?;
        let flights = stmt
            .query_map([], Self::row_to_flight)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(flights)
    }

    /// Overwrite a flight's fields. Crew are not touched.
    ///
    /// Returns `false` if no row was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_flight(&self, id: i64, flight: &Flight) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE flights
            SET origin_id = ?2, destination_id = ?3, departure_time = ?4, arrival_time = ?5,
                gate = ?6, airline_id = ?7, aircraft_id = ?8
            WHERE id = ?1
            ",
            params![
                id,
                flight.origin_id,
                flight.destination_id,
                flight.departure_time.to_rfc3339(),
                flight.arrival_time.to_rfc3339(),
                flight.gate,
                flight.airline_id,
                flight.aircraft_id,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Delete a flight and its assignment rows.
    ///
    /// Crew availability is not touched here.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_flight(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM flights WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Check whether a flight exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn flight_exists(&self, id: i64) -> Result<bool> {
        self.exists("flights", id)
    }

    /// IDs of the crew assigned to a flight, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn flight_crew_ids(&self, flight_id: i64) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT crew_id FROM flight_crew_assignments WHERE flight_id = ?1 ORDER BY crew_id",
        )?;
        let ids = stmt
            .query_map([flight_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// The crew records assigned to a flight, ascending by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn flight_crew(&self, flight_id: i64) -> Result<Vec<FlightCrew>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT c.id, c.first_name, c.last_name, c.age, c.position, c.is_available
            FROM flight_crews c
            JOIN flight_crew_assignments a ON a.crew_id = c.id
            WHERE a.flight_id = ?1
            ORDER BY c.id
            ",
        )?;
        let crew = stmt
            .query_map([flight_id], Self::row_to_crew)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(crew)
    }

    /// Replace a flight's assignment rows with `crew_ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn replace_flight_crew(&self, flight_id: i64, crew_ids: &[i64]) -> Result<()> {
        self.conn.execute(
            "DELETE FROM flight_crew_assignments WHERE flight_id = ?1",
            [flight_id],
        )?;
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO flight_crew_assignments (flight_id, crew_id) VALUES (?1, ?2)",
        )?;
        for crew_id in crew_ids {
            stmt.execute([flight_id, *crew_id])?;
        }
        Ok(())
    }

    /// IDs of crew on any flight flown by the aircraft.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn crew_ids_for_aircraft_flights(&self, aircraft_id: i64) -> Result<Vec<i64>> {
        self.crew_ids_for_flights_where("aircraft_id", aircraft_id)
    }

    /// IDs of crew on any flight operated by the airline.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn crew_ids_for_airline_flights(&self, airline_id: i64) -> Result<Vec<i64>> {
        self.crew_ids_for_flights_where("airline_id", airline_id)
    }

    fn crew_ids_for_flights_where(&self, column: &str, value: i64) -> Result<Vec<i64>> {
        let sql = format!(
            r"
            SELECT DISTINCT a.crew_id
            FROM flight_crew_assignments a
            JOIN flights f ON f.id = a.flight_id
            WHERE f.{column} = ?1
            ORDER BY a.crew_id
            "
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map([value], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    fn row_to_flight(row: &rusqlite::Row) -> rusqlite::Result<Flight> {
        Ok(Flight {
            id: Some(row.get(0)?),
            origin_id: row.get(1)?,
            destination_id: row.get(2)?,
            departure_time: timestamp_column(row, 3)?,
            arrival_time: timestamp_column(row, 4)?,
            gate: row.get(5)?,
            airline_id: row.get(6)?,
            aircraft_id: row.get(7)?,
        })
    }
}
