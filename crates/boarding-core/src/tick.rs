//! One tick: a synchronous pass over every passenger in boarding order.
//!
//! Passengers act strictly by boarding index, and whatever one passenger
//! does (advance, sit, evict) is visible to every later passenger in the
//! same tick. The scan is sequential and must stay that way.

use boarding_passengers::{Manifest, PassengerError, StepOutcome, step_passenger};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors that can occur during tick execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    /// A passenger transition failed.
    #[error("passenger error at tick {tick}: {source}")]
    Passenger {
        /// The tick being executed.
        tick: u64,
        /// The underlying passenger error.
        source: PassengerError,
    },

    /// A tick counter overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// Description of what was being counted.
        context: String,
    },
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    /// The tick number (first tick is 1).
    pub tick: u64,
    /// Passengers that moved one row.
    pub advanced: u32,
    /// Passengers that spent the tick stowing a bag.
    pub stowing: u32,
    /// Passengers that sat down this tick.
    pub seated: u32,
    /// Passengers that could not move.
    pub blocked: u32,
    /// Seated passengers forced back into the walkway.
    pub evictions: u32,
    /// Passengers in their seats at the end of the tick.
    pub seated_total: u32,
}

impl TickSummary {
    /// Whether any passenger changed state this tick.
    pub const fn made_progress(&self) -> bool {
        self.advanced > 0 || self.stowing > 0 || self.seated > 0
    }
}

/// Execute one tick.
///
/// # Errors
///
/// Returns [`TickError::Passenger`] if a passenger transition fails.
pub fn run_tick(manifest: &mut Manifest, tick: u64) -> Result<TickSummary, TickError> {
    let mut summary = TickSummary {
        tick,
        ..TickSummary::default()
    };
    let overflow = || TickError::ArithmeticOverflow {
        context: String::from("tick outcome counters"),
    };

    for index in 0..manifest.len() {
        let outcome = step_passenger(manifest, index)
            .map_err(|source| TickError::Passenger { tick, source })?;
        match outcome {
            StepOutcome::Idle => {}
            StepOutcome::Stowed { .. } => {
                summary.stowing = summary.stowing.checked_add(1).ok_or_else(overflow)?;
            }
            StepOutcome::Seated { evicted } => {
                summary.seated = summary.seated.checked_add(1).ok_or_else(overflow)?;
                summary.evictions = u32::try_from(evicted.len())
                    .ok()
                    .and_then(|n| summary.evictions.checked_add(n))
                    .ok_or_else(overflow)?;
            }
            StepOutcome::Advanced { .. } => {
                summary.advanced = summary.advanced.checked_add(1).ok_or_else(overflow)?;
            }
            StepOutcome::Blocked => {
                summary.blocked = summary.blocked.checked_add(1).ok_or_else(overflow)?;
            }
        }
    }

    let seated_total = manifest.len().saturating_sub(manifest.unseated_count());
    summary.seated_total = u32::try_from(seated_total).unwrap_or(u32::MAX);

    debug!(
        tick,
        advanced = summary.advanced,
        stowing = summary.stowing,
        seated = summary.seated,
        blocked = summary.blocked,
        evictions = summary.evictions,
        seated_total = summary.seated_total,
        "Tick complete"
    );

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boarding_cabin::Cabin;
    use boarding_passengers::PassengerAssignment;
    use boarding_types::{BoardingSpeed, Coordinate};

    use super::*;

    fn single_row() -> Manifest {
        let cabin = Cabin::new(&[1, 1], 1).unwrap();
        Manifest::from_assignments(
            &cabin,
            &[
                PassengerAssignment {
                    target_seat: Coordinate::new(1, 1),
                    walkway_lane: 2,
                    has_bag: true,
                    speed: BoardingSpeed::Fast,
                },
                PassengerAssignment {
                    target_seat: Coordinate::new(1, 3),
                    walkway_lane: 2,
                    has_bag: false,
                    speed: BoardingSpeed::Fast,
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn first_tick_one_passenger_per_walkway_enters() {
        let mut m = single_row();
        let summary = run_tick(&mut m, 1).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.advanced, 1);
        assert_eq!(summary.blocked, 1);
        assert!(summary.made_progress());
    }

    #[test]
    fn stowing_blocks_the_walkway() {
        let mut m = single_row();
        run_tick(&mut m, 1).unwrap();
        let second = run_tick(&mut m, 2).unwrap();
        assert_eq!(second.stowing, 1);
        assert_eq!(second.blocked, 1);

        let third = run_tick(&mut m, 3).unwrap();
        assert_eq!(third.seated, 1);
        assert_eq!(third.advanced, 1);
        assert_eq!(third.seated_total, 1);

        let fourth = run_tick(&mut m, 4).unwrap();
        assert_eq!(fourth.seated, 1);
        assert_eq!(fourth.seated_total, 2);
        assert!(m.all_seated());
    }

    #[test]
    fn seated_cabin_makes_no_progress() {
        let mut m = single_row();
        for tick in 1..=4 {
            run_tick(&mut m, tick).unwrap();
        }
        let idle = run_tick(&mut m, 5).unwrap();
        assert!(!idle.made_progress());
        assert_eq!(idle.seated_total, 2);
    }
}
