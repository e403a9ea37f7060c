//! Core value structs: cabin coordinates, speed mixes, and snapshots.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::PassengerPhase;

/// A cell in the cabin grid.
///
/// `row` runs from the front of the cabin (row 1) to the rear; row 0 is the
/// door queue in front of the first row. `lane` is the lateral position,
/// numbered from 1 at the left-hand window. A seat is a coordinate whose lane
/// is a seat lane; a walkway cell is one whose lane is a walkway lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Row index, 0 for the door queue.
    pub row: u32,
    /// Lateral lane index, starting at 1.
    pub lane: u32,
}

impl Coordinate {
    /// Create a coordinate from a row and lane.
    pub const fn new(row: u32, lane: u32) -> Self {
        Self { row, lane }
    }

    /// The door-queue cell in front of the given walkway lane.
    pub const fn door(lane: u32) -> Self {
        Self { row: 0, lane }
    }

    /// The cell one row further back in the same lane, if it exists.
    pub fn next_row(self) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(1)?,
            lane: self.lane,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.lane)
    }
}

/// Proportions of slow, average, and fast passengers.
///
/// Only `slow` and `fast` are rounded up when counting passengers; the
/// average group takes whoever is left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedMix {
    /// Share of passengers taking three ticks to stow a bag.
    pub slow: Decimal,
    /// Share of passengers taking two ticks to stow a bag.
    pub average: Decimal,
    /// Share of passengers taking one tick to stow a bag.
    pub fast: Decimal,
}

impl SpeedMix {
    /// Create a speed mix from its three shares.
    pub const fn new(slow: Decimal, average: Decimal, fast: Decimal) -> Self {
        Self {
            slow,
            average,
            fast,
        }
    }

    /// Sum of all three shares, `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        self.slow.checked_add(self.average)?.checked_add(self.fast)
    }
}

impl Default for SpeedMix {
    /// 30% slow, 40% average, 30% fast.
    fn default() -> Self {
        Self {
            slow: Decimal::new(3, 1),
            average: Decimal::new(4, 1),
            fast: Decimal::new(3, 1),
        }
    }
}

/// One passenger's state at the end of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerSnapshot {
    /// Position in the board order.
    pub boarding_index: usize,
    /// The passenger's assigned seat.
    pub target_seat: Coordinate,
    /// Where the passenger is standing or sitting.
    pub position: Coordinate,
    /// Whether the passenger is in the target seat.
    pub seated: bool,
    /// The state machine phase at this tick.
    pub phase: PassengerPhase,
}

/// Every passenger's state at the end of one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSnapshot {
    /// The tick that just completed (first tick is 1).
    pub tick: u64,
    /// Passengers in boarding order.
    pub passengers: Vec<PassengerSnapshot>,
}

impl TickSnapshot {
    /// Number of passengers seated at the end of this tick.
    pub fn seated_count(&self) -> usize {
        self.passengers.iter().filter(|p| p.seated).count()
    }

    /// Look up a passenger by boarding index.
    pub fn passenger(&self, boarding_index: usize) -> Option<&PassengerSnapshot> {
        self.passengers.get(boarding_index)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn coordinates_order_row_major() {
        let a = Coordinate::new(1, 7);
        let b = Coordinate::new(2, 1);
        assert!(a < b);
        assert_eq!(Coordinate::door(4), Coordinate::new(0, 4));
        assert_eq!(Coordinate::new(3, 4).next_row(), Some(Coordinate::new(4, 4)));
        assert_eq!(Coordinate::new(u32::MAX, 4).next_row(), None);
        assert_eq!(Coordinate::new(2, 5).to_string(), "(2, 5)");
    }

    #[test]
    fn default_speed_mix_sums_to_one() {
        assert_eq!(SpeedMix::default().total(), Some(dec!(1.0)));
    }

    #[test]
    fn speed_mix_accepts_numbers_from_json() {
        let parsed: Result<SpeedMix, _> =
            serde_json::from_str(r#"{"slow": 0.2, "average": 0.5, "fast": 0.3}"#);
        let mix = parsed.ok();
        assert_eq!(mix, Some(SpeedMix::new(dec!(0.2), dec!(0.5), dec!(0.3))));
    }

    #[test]
    fn snapshot_counts_seated() {
        let seat = Coordinate::new(1, 1);
        let snapshot = TickSnapshot {
            tick: 3,
            passengers: vec![
                PassengerSnapshot {
                    boarding_index: 0,
                    target_seat: seat,
                    position: seat,
                    seated: true,
                    phase: PassengerPhase::Seated,
                },
                PassengerSnapshot {
                    boarding_index: 1,
                    target_seat: Coordinate::new(1, 2),
                    position: Coordinate::new(1, 3),
                    seated: false,
                    phase: PassengerPhase::Stowing,
                },
            ],
        };
        assert_eq!(snapshot.seated_count(), 1);
        assert_eq!(snapshot.passenger(1).map(|p| p.phase), Some(PassengerPhase::Stowing));
        assert!(snapshot.passenger(2).is_none());
    }
}
