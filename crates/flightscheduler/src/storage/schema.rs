//! `SQLite` schema definitions for flightscheduler.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the aircraft table.
pub const CREATE_AIRCRAFT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS aircraft (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model TEXT NOT NULL,
    crew_capacity INTEGER NOT NULL CHECK (crew_capacity >= 0),
    passenger_capacity INTEGER NOT NULL CHECK (passenger_capacity >= 0),
    fuel_tank_capacity INTEGER NOT NULL CHECK (fuel_tank_capacity >= 0)
)
";

/// SQL statement to create the airlines table.
pub const CREATE_AIRLINES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS airlines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    country TEXT NOT NULL
)
";

/// SQL statement to create the airports table.
pub const CREATE_AIRPORTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS airports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
)
";

/// SQL statement to create the flight crew table.
///
/// `position` holds the variant name of [`CrewPosition`](crate::model::CrewPosition).
pub const CREATE_FLIGHT_CREWS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flight_crews (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    age INTEGER,
    position TEXT NOT NULL,
    is_available INTEGER NOT NULL DEFAULT 1
)
";

/// SQL statement to create the flights table.
///
/// Deleting an aircraft or airline cascades to its flights; airports in use
/// cannot be deleted.
pub const CREATE_FLIGHTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    origin_id INTEGER NOT NULL REFERENCES airports(id) ON DELETE RESTRICT,
    destination_id INTEGER NOT NULL REFERENCES airports(id) ON DELETE RESTRICT,
    departure_time TEXT NOT NULL,
    arrival_time TEXT NOT NULL,
    gate TEXT,
    airline_id INTEGER NOT NULL REFERENCES airlines(id) ON DELETE CASCADE,
    aircraft_id INTEGER NOT NULL REFERENCES aircraft(id) ON DELETE CASCADE
)
";

/// SQL statement to create the flight/crew join table.
///
/// The schema allows a crew member on several flights; exclusivity is
/// enforced through `flight_crews.is_available`, not here.
pub const CREATE_FLIGHT_CREW_ASSIGNMENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flight_crew_assignments (
    flight_id INTEGER NOT NULL REFERENCES flights(id) ON DELETE CASCADE,
    crew_id INTEGER NOT NULL REFERENCES flight_crews(id) ON DELETE CASCADE,
    PRIMARY KEY (flight_id, crew_id)
)
";

/// Index for resolving a crew member's flights.
pub const CREATE_ASSIGNMENT_CREW_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_assignments_crew ON flight_crew_assignments(crew_id)
";

/// Index for cascading aircraft deletes.
pub const CREATE_FLIGHT_AIRCRAFT_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_aircraft ON flights(aircraft_id)
";

/// Index for cascading airline deletes.
pub const CREATE_FLIGHT_AIRLINE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_airline ON flights(airline_id)
";

/// Index for the form option crew split.
pub const CREATE_CREW_AVAILABILITY_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flight_crews_available ON flight_crews(is_available, position)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_AIRCRAFT_TABLE,
    CREATE_AIRLINES_TABLE,
    CREATE_AIRPORTS_TABLE,
    CREATE_FLIGHT_CREWS_TABLE,
    CREATE_FLIGHTS_TABLE,
    CREATE_FLIGHT_CREW_ASSIGNMENTS_TABLE,
    CREATE_ASSIGNMENT_CREW_INDEX,
    CREATE_FLIGHT_AIRCRAFT_INDEX,
    CREATE_FLIGHT_AIRLINE_INDEX,
    CREATE_CREW_AVAILABILITY_INDEX,
    CREATE_METADATA_TABLE,
];

/// Reference airports inserted by the second migration.
pub const SEED_AIRPORTS: &[&str] = &[
    "John F. Kennedy (JFK), New York",
    "Los Angeles International (LAX), Los Angeles",
    "Hartsfield-Jackson Atlanta (ATL), Atlanta",
    "Heathrow Airport (LHR), London",
    "Charles de Gaulle (CDG), Paris",
    "Tokyo Haneda (HND), Tokyo",
    "Dubai International (DXB), Dubai",
    "Sydney Airport (SYD), Sydney",
    "Changi Airport (SIN), Singapore",
    "Hong Kong International (HKG), Hong Kong",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_flights_table_references() {
        assert!(CREATE_FLIGHTS_TABLE.contains("REFERENCES airports(id) ON DELETE RESTRICT"));
        assert!(CREATE_FLIGHTS_TABLE.contains("REFERENCES aircraft(id) ON DELETE CASCADE"));
        assert!(CREATE_FLIGHTS_TABLE.contains("REFERENCES airlines(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_assignment_table_has_composite_key() {
        assert!(CREATE_FLIGHT_CREW_ASSIGNMENTS_TABLE.contains("PRIMARY KEY (flight_id, crew_id)"));
    }

    #[test]
    fn test_seed_airports_fit_name_limit() {
        assert_eq!(SEED_AIRPORTS.len(), 10);
        for name in SEED_AIRPORTS {
            assert!(name.chars().count() <= 100);
        }
    }
}
