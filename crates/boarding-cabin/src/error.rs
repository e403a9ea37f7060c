//! Error types for the `boarding-cabin` crate.
//!
//! Every cabin problem is a configuration error: it is reported when the
//! cabin is built, never discovered partway through a simulation.

/// Errors that can occur while building or querying a cabin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CabinError {
    /// The seat block list was empty.
    #[error("cabin needs at least one seat block")]
    NoSeatBlocks,

    /// A seat block had no seats.
    #[error("seat block {index} has no seats")]
    EmptySeatBlock {
        /// Zero-based position of the block in the list.
        index: usize,
    },

    /// The cabin had no rows.
    #[error("cabin needs at least one row")]
    NoRows,

    /// Only one seat block was given, so there is nowhere to walk.
    #[error("cabin has {blocks} seat block(s) and therefore no walkway; at least two are required")]
    NoWalkway {
        /// Number of seat blocks given.
        blocks: usize,
    },

    /// The lane was not one of the cabin's seat lanes.
    #[error("lane {lane} is not a seat lane")]
    NotASeatLane {
        /// The offending lane.
        lane: u32,
    },

    /// Lane or seat counts overflowed while laying out the cabin.
    #[error("arithmetic overflow in cabin layout: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },
}
