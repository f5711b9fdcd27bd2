//! Core record types for flightscheduler.
//!
//! Each record carries an `id` that is `None` until the storage layer assigns
//! one, plus a `validate` method for its own field constraints. Constraints
//! that span records (crew capacity, crew availability) live in
//! [`assignment`](crate::assignment).

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

/// Matches the IATA code in an airport name such as `"Heathrow Airport (LHR), London"`.
static AIRPORT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([A-Z]{3})\)").expect("Invalid regex pattern"));

/// An aircraft that can be assigned to flights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Identifier assigned by the storage layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Model designation, e.g. `"Airbus A320"`.
    pub model: String,
    /// Maximum crew that may be assigned to a flight flown by this aircraft.
    pub crew_capacity: u32,
    /// Passenger seats.
    pub passenger_capacity: u32,
    /// Fuel tank capacity in litres.
    pub fuel_tank_capacity: u32,
}

impl Aircraft {
    /// Create a new, unsaved aircraft.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        crew_capacity: u32,
        passenger_capacity: u32,
        fuel_tank_capacity: u32,
    ) -> Self {
        Self {
            id: None,
            model: model.into(),
            crew_capacity,
            passenger_capacity,
            fuel_tank_capacity,
        }
    }

    /// Check field constraints.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("model", &self.model, "Model is required.");
        errors
    }
}

/// An operating airline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    /// Identifier assigned by the storage layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Airline name.
    pub name: String,
    /// Country of registration.
    pub country: String,
}

impl Airline {
    /// Create a new, unsaved airline.
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            country: country.into(),
        }
    }

    /// Check field constraints.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Name is required.");
        errors.require("country", &self.country, "Country is required.");
        errors
    }
}

/// An airport, used as both origin and destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Identifier assigned by the storage layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name, conventionally `"<name> (<IATA>), <city>"`.
    pub name: String,
}

impl Airport {
    /// Create a new, unsaved airport.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// The three-letter IATA code embedded in the name, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        AIRPORT_CODE
            .captures(&self.name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Check field constraints.
    #[must_use]
    pub fn validate(&self, max_name_length: usize) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Name is required.");
        if self.name.chars().count() > max_name_length {
            errors.add(
                "name",
                format!("Name must be at most {max_name_length} characters."),
            );
        }
        errors
    }
}

/// The position a crew member holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrewPosition {
    /// Pilot in command.
    Captain,
    /// Second in command.
    FirstOfficer,
    /// Flight engineer.
    FlightEngineer,
    /// Senior cabin crew.
    Purser,
    /// Cabin crew.
    FlightAttendant,
}

impl CrewPosition {
    /// Every position, in rank order.
    pub const ALL: [Self; 5] = [
        Self::Captain,
        Self::FirstOfficer,
        Self::FlightEngineer,
        Self::Purser,
        Self::FlightAttendant,
    ];

    /// The name stored in the database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Captain => "Captain",
            Self::FirstOfficer => "FirstOfficer",
            Self::FlightEngineer => "FlightEngineer",
            Self::Purser => "Purser",
            Self::FlightAttendant => "FlightAttendant",
        }
    }
}

impl std::fmt::Display for CrewPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Captain => write!(f, "Captain"),
            Self::FirstOfficer => write!(f, "First Officer"),
            Self::FlightEngineer => write!(f, "Flight Engineer"),
            Self::Purser => write!(f, "Purser"),
            Self::FlightAttendant => write!(f, "Flight Attendant"),
        }
    }
}

/// Returned when a stored position name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPosition(pub String);

impl std::fmt::Display for UnknownPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown crew position: {}", self.0)
    }
}

impl std::error::Error for UnknownPosition {}

impl FromStr for CrewPosition {
    type Err = UnknownPosition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPosition(s.to_string()))
    }
}

/// A flight crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightCrew {
    /// Identifier assigned by the storage layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Age in years, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Position held.
    pub position: CrewPosition,
    /// `true` while the crew member is not assigned to any flight.
    pub is_available: bool,
}

impl FlightCrew {
    /// Create a new, unsaved and available crew member.
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: Option<u32>,
        position: CrewPosition,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
            position,
            is_available: true,
        }
    }

    /// `"First Last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check field constraints.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.require("first_name", &self.first_name, "First name is required.");
        errors.require("last_name", &self.last_name, "Last name is required.");
        errors
    }
}

/// A scheduled flight.
///
/// The assigned crew are held in a separate join table and are not part of
/// this record; see [`AssignedFlight`](crate::assignment::AssignedFlight).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Identifier assigned by the storage layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Departure airport.
    pub origin_id: i64,
    /// Arrival airport.
    pub destination_id: i64,
    /// Scheduled departure (UTC).
    pub departure_time: DateTime<Utc>,
    /// Scheduled arrival (UTC).
    pub arrival_time: DateTime<Utc>,
    /// Departure gate, if assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gate: Option<String>,
    /// Operating airline.
    pub airline_id: i64,
    /// Aircraft flying the route.
    pub aircraft_id: i64,
}

impl Flight {
    /// Check field constraints local to the flight record.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if let Some(gate) = &self.gate {
            errors.require("gate", gate, "Gate must not be blank.");
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crew_position_round_trips_storage_name() {
        for position in CrewPosition::ALL {
            assert_eq!(position.as_str().parse::<CrewPosition>(), Ok(position));
        }
    }

    #[test]
    fn test_crew_position_unknown() {
        let err = "Navigator".parse::<CrewPosition>().unwrap_err();
        assert_eq!(err.to_string(), "unknown crew position: Navigator");
    }

    #[test]
    fn test_crew_position_display() {
        assert_eq!(CrewPosition::FirstOfficer.to_string(), "First Officer");
        assert_eq!(CrewPosition::Purser.to_string(), "Purser");
    }

    #[test]
    fn test_new_crew_is_available() {
        let crew = FlightCrew::new("John", "Doe", Some(35), CrewPosition::Captain);
        assert!(crew.is_available);
        assert!(crew.id.is_none());
        assert_eq!(crew.full_name(), "John Doe");
    }

    #[test]
    fn test_crew_validation_requires_names() {
        let crew = FlightCrew::new("", " ", None, CrewPosition::Purser);
        let errors = crew.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.for_field("first_name").collect::<Vec<_>>(),
            vec!["First name is required."]
        );
        assert_eq!(
            errors.for_field("last_name").collect::<Vec<_>>(),
            vec!["Last name is required."]
        );
    }

    #[test]
    fn test_aircraft_validation() {
        assert!(Aircraft::new("Boeing 737", 5, 150, 20_000).validate().is_empty());
        assert!(Aircraft::new("", 5, 150, 20_000)
            .validate()
            .contains("Model is required."));
    }

    #[test]
    fn test_airline_validation() {
        let errors = Airline::new("", "").validate();
        assert!(errors.contains("Name is required."));
        assert!(errors.contains("Country is required."));
        assert!(Airline::new("TestAir", "TestLand").validate().is_empty());
    }

    #[test]
    fn test_airport_name_length() {
        let airport = Airport::new("x".repeat(101));
        let errors = airport.validate(100);
        assert!(errors.contains("Name must be at most 100 characters."));
        assert!(Airport::new("x".repeat(100)).validate(100).is_empty());
    }

    #[test]
    fn test_airport_code() {
        let jfk = Airport::new("John F. Kennedy (JFK), New York");
        assert_eq!(jfk.code(), Some("JFK"));
        let nameless = Airport::new("Test Origin");
        assert_eq!(nameless.code(), None);
    }

    #[test]
    fn test_flight_gate_validation() {
        let mut flight = Flight {
            id: None,
            origin_id: 1,
            destination_id: 2,
            departure_time: Utc::now(),
            arrival_time: Utc::now(),
            gate: None,
            airline_id: 1,
            aircraft_id: 1,
        };
        assert!(flight.validate().is_empty());

        flight.gate = Some("  ".to_string());
        assert!(flight.validate().contains("Gate must not be blank."));

        flight.gate = Some("B2".to_string());
        assert!(flight.validate().is_empty());
    }

    #[test]
    fn test_crew_serialization() {
        let crew = FlightCrew::new("Jane", "Smith", None, CrewPosition::FirstOfficer);
        let json = serde_json::to_string(&crew).unwrap();
        assert!(json.contains(r#""position":"FirstOfficer""#));
        assert!(!json.contains("age"));

        let back: FlightCrew = serde_json::from_str(&json).unwrap();
        assert_eq!(back, crew);
    }
}
