//! Error types for the boarding-passengers crate.
//!
//! Setup problems (bad proportions, an order that is not a permutation of
//! the cabin's seats) and broken runtime invariants are reported as typed
//! errors rather than panics.

use boarding_cabin::CabinError;
use boarding_types::Coordinate;
use rust_decimal::Decimal;

/// Errors that can occur while building or stepping passengers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PassengerError {
    /// A proportion was outside `[0, 1]`.
    #[error("{name} must be between 0 and 1, got {value}")]
    ProportionOutOfRange {
        /// Which proportion was rejected.
        name: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// The speed mix shares add up to more than one.
    #[error("speed mix shares sum to {total}, which exceeds 1")]
    SpeedMixExceedsOne {
        /// Sum of the slow, average, and fast shares.
        total: Decimal,
    },

    /// The board order is not a permutation of the cabin's seats.
    #[error("invalid board order: {reason}")]
    InvalidOrder {
        /// What is wrong with the order.
        reason: String,
    },

    /// A passenger was assigned a lane that is not a walkway.
    #[error("lane {lane} is not a walkway lane")]
    NotAWalkway {
        /// The offending lane.
        lane: u32,
    },

    /// No passenger exists at the given boarding index.
    #[error("no passenger at boarding index {index} (manifest holds {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of passengers in the manifest.
        len: usize,
    },

    /// A standing passenger ended up outside the walkway grid.
    #[error("passenger {index} is standing off the walkway at {position}")]
    OffWalkway {
        /// Boarding index of the passenger.
        index: usize,
        /// Where the passenger was found.
        position: Coordinate,
    },

    /// The cabin rejected a lane query.
    #[error("cabin error: {source}")]
    Cabin {
        /// The underlying cabin error.
        #[from]
        source: CabinError,
    },

    /// An arithmetic overflow occurred while counting passengers.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
