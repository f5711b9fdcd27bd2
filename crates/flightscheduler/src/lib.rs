//! `flightscheduler` - Flight scheduling with consistent crew availability
//!
//! This library stores aircraft, airlines, airports, crew and flights, and
//! assigns crew to flights so that a crew member serves on at most one
//! flight at a time.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod assignment;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod scheduler;
pub mod storage;
pub mod validation;

pub use assignment::{AssignedFlight, CrewAssignmentEngine};
pub use catalog::Catalog;
pub use config::Config;
pub use error::{Entity, Error, Result};
pub use logging::init_logging;
pub use model::{Aircraft, Airline, Airport, CrewPosition, Flight, FlightCrew};
pub use scheduler::{
    CreateDisabled, FlightDetails, FlightFormOptions, FlightScheduler, FlightSubmission,
    RejectedFlight,
};
pub use storage::{Storage, StorageStats};
pub use validation::{FieldError, Submission, ValidationErrors};
