//! Error types for flightscheduler.
//!
//! These are faults: things the caller cannot fix by editing a form. Field and
//! form validation problems are not errors; they travel as
//! [`ValidationErrors`](crate::validation::ValidationErrors) inside a
//! [`Submission`](crate::validation::Submission).

use std::path::PathBuf;
use thiserror::Error;

/// The kind of record an operation was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    /// An aircraft type/tail.
    Aircraft,
    /// An operating airline.
    Airline,
    /// An origin or destination airport.
    Airport,
    /// A flight crew member.
    FlightCrew,
    /// A scheduled flight.
    Flight,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Aircraft => write!(f, "aircraft"),
            Self::Airline => write!(f, "airline"),
            Self::Airport => write!(f, "airport"),
            Self::FlightCrew => write!(f, "flight crew member"),
            Self::Flight => write!(f, "flight"),
        }
    }
}

/// The main error type for flightscheduler operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Record Errors ===
    /// The requested record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record.
        entity: Entity,
        /// Identifier that was looked up.
        id: i64,
    },

    /// A write touched no row although the record still exists.
    ///
    /// Never retried; the caller gets the failure as-is.
    #[error("{entity} {id} was modified concurrently")]
    Conflict {
        /// Kind of record.
        entity: Entity,
        /// Identifier of the record being written.
        id: i64,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flightscheduler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a not-found error.
    #[must_use]
    pub fn not_found(entity: Entity, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create a persistence conflict error.
    #[must_use]
    pub fn conflict(entity: Entity, id: i64) -> Self {
        Self::Conflict { entity, id }
    }

    /// Check if this error means the record does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a persistence conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = Error::not_found(Entity::Flight, 42);
        assert_eq!(err.to_string(), "flight 42 not found");

        let err = Error::not_found(Entity::FlightCrew, 7);
        assert_eq!(err.to_string(), "flight crew member 7 not found");
    }

    #[test]
    fn test_conflict_display() {
        let err = Error::conflict(Entity::Aircraft, 3);
        assert_eq!(err.to_string(), "aircraft 3 was modified concurrently");
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::not_found(Entity::Airline, 1).is_not_found());
        assert!(!Error::not_found(Entity::Airline, 1).is_conflict());
        assert!(Error::conflict(Entity::Airline, 1).is_conflict());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "busy_timeout_ms must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("busy_timeout_ms"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
