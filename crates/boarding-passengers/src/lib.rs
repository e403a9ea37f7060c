//! Passenger state and the boarding state machine.
//!
//! This crate holds the logic layer for passengers -- everything that
//! operates on passenger records without knowing about ticks, runs, or
//! configuration files. It sits between `boarding-cabin` (the geometry) and
//! `boarding-core` (the driver that ticks the whole set).
//!
//! # Modules
//!
//! - [`error`] -- Error types for passenger operations ([`PassengerError`])
//! - [`manifest`] -- The passenger arena for one run ([`Manifest`]) and
//!   its instantiation from a board order
//! - [`movement`] -- The per-passenger transition rule ([`step_passenger`])
//! - [`passenger`] -- A single passenger record ([`Passenger`])
//! - [`profile`] -- Bag and speed proportions ([`BoardingProfile`])

pub mod error;
pub mod manifest;
pub mod movement;
pub mod passenger;
pub mod profile;

// Re-export primary types at crate root for convenience.
pub use error::PassengerError;
pub use manifest::{Manifest, PassengerAssignment, instantiate_passengers};
pub use movement::{StepOutcome, step_passenger};
pub use passenger::Passenger;
pub use profile::{BoardingProfile, SpeedCounts};
