//! Cabin geometry for the aircraft boarding simulation.
//!
//! This crate models the physical cabin: seat blocks laid out left to right,
//! walkway lanes inserted between consecutive blocks, each seat lane's
//! distance to every walkway, and the window-to-aisle ranking that the
//! window-first boarding methods rely on.
//!
//! # Modules
//!
//! - [`cabin`] -- The immutable [`Cabin`] layout and walkway selection.
//! - [`error`] -- Error types for cabin construction and lane queries.

pub mod cabin;
pub mod error;

// Re-export primary types at crate root.
pub use cabin::{Cabin, build_cabin};
pub use error::CabinError;
