//! A single passenger record.

use boarding_types::{BoardingSpeed, Coordinate, PassengerPhase, PassengerSnapshot};
use serde::{Deserialize, Serialize};

/// One passenger, bound to one seat for the whole run.
///
/// Records are owned by a [`Manifest`](crate::Manifest) and only change
/// through [`step_passenger`](crate::step_passenger), which keeps the
/// walkway occupancy grid in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Position in the board order; the passenger acts at this slot each tick.
    pub(crate) boarding_index: usize,
    /// The seat this passenger must reach.
    pub(crate) target_seat: Coordinate,
    /// Walkway lane the passenger boards along.
    pub(crate) walkway_lane: u32,
    /// Current cell: door queue, walkway, or the target seat.
    pub(crate) position: Coordinate,
    /// Whether the passenger is in the target seat.
    pub(crate) seated: bool,
    /// Whether the passenger carries a bag.
    pub(crate) has_bag: bool,
    /// Stowing speed (only matters for bag carriers).
    pub(crate) speed: BoardingSpeed,
    /// Ticks of stowing left before the passenger can sit.
    pub(crate) bag_stow_remaining: u32,
    /// Whether the passenger was evicted and has not re-seated yet.
    pub(crate) displaced: bool,
}

impl Passenger {
    /// Create a passenger queued at the door of its walkway.
    pub(crate) const fn new(
        boarding_index: usize,
        target_seat: Coordinate,
        walkway_lane: u32,
        has_bag: bool,
        speed: BoardingSpeed,
    ) -> Self {
        Self {
            boarding_index,
            target_seat,
            walkway_lane,
            position: Coordinate::door(walkway_lane),
            seated: false,
            has_bag,
            speed,
            bag_stow_remaining: if has_bag { speed.stow_ticks() } else { 0 },
            displaced: false,
        }
    }

    /// Position in the board order.
    pub const fn boarding_index(&self) -> usize {
        self.boarding_index
    }

    /// The assigned seat.
    pub const fn target_seat(&self) -> Coordinate {
        self.target_seat
    }

    /// Walkway lane chosen at boarding.
    pub const fn walkway_lane(&self) -> u32 {
        self.walkway_lane
    }

    /// Current cell.
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Whether the passenger is in the target seat.
    pub const fn is_seated(&self) -> bool {
        self.seated
    }

    /// Whether the passenger carries a bag.
    pub const fn has_bag(&self) -> bool {
        self.has_bag
    }

    /// Stowing speed.
    pub const fn speed(&self) -> BoardingSpeed {
        self.speed
    }

    /// Ticks of stowing left.
    pub const fn bag_stow_remaining(&self) -> u32 {
        self.bag_stow_remaining
    }

    /// Whether the passenger is standing after being evicted.
    pub const fn is_displaced(&self) -> bool {
        self.displaced
    }

    /// Whether the passenger stands at its target row.
    pub const fn at_target_row(&self) -> bool {
        self.position.row == self.target_seat.row
    }

    /// The state machine phase, derived from the record.
    pub const fn phase(&self) -> PassengerPhase {
        if self.seated {
            PassengerPhase::Seated
        } else if self.displaced {
            PassengerPhase::Displaced
        } else if self.position.row == 0 {
            PassengerPhase::Waiting
        } else if self.position.row < self.target_seat.row {
            PassengerPhase::Advancing
        } else {
            PassengerPhase::Stowing
        }
    }

    /// Seats the passenger has to squeeze past to sit down.
    ///
    /// These are the cells of the target row strictly between the current
    /// lane and the target lane. Occupancy is not checked here.
    pub fn blocking_seats(&self) -> Vec<Coordinate> {
        let current = self.position.lane;
        let target = self.target_seat.lane;
        let (low, high) = if target > current {
            (current, target)
        } else {
            (target, current)
        };
        (low.saturating_add(1)..high)
            .map(|lane| Coordinate::new(self.target_seat.row, lane))
            .collect()
    }

    /// A copy of the passenger's visible state.
    pub const fn snapshot(&self) -> PassengerSnapshot {
        PassengerSnapshot {
            boarding_index: self.boarding_index,
            target_seat: self.target_seat,
            position: self.position,
            seated: self.seated,
            phase: self.phase(),
        }
    }
}
