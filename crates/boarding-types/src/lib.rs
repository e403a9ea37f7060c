//! Shared type definitions for the aircraft boarding simulation.
//!
//! This crate is the single source of truth for the value types passed
//! between the cabin, passenger, and driver crates, and handed to the
//! visualization and reporting collaborators.
//!
//! # Modules
//!
//! - [`enums`] -- Boarding methods, passenger phases, and boarding speeds
//! - [`structs`] -- Coordinates, speed mixes, and per-tick snapshots

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BoardingMethod, BoardingSpeed, MAX_STOW_TICKS, PassengerPhase, UnknownMethodError};
pub use structs::{Coordinate, PassengerSnapshot, SpeedMix, TickSnapshot};
