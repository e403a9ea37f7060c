//! The per-passenger transition rule.
//!
//! [`step_passenger`] applies one tick's worth of behaviour to a single
//! passenger. The rule is checked top to bottom and the first match wins:
//!
//! 1. Seated passengers do nothing.
//! 2. At the target row with bag time left: stow for one tick.
//! 3. At the target row with nothing left to stow: evict every seated
//!    passenger between the walkway and the target seat, then sit.
//! 4. Otherwise advance one row if the next walkway cell is free.
//! 5. Otherwise wait.
//!
//! Effects land in the [`Manifest`] immediately, so later passengers in the
//! same tick see them.

use boarding_types::Coordinate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::PassengerError;
use crate::manifest::Manifest;

/// What one passenger did during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Already seated.
    Idle,
    /// Spent the tick stowing a bag.
    Stowed {
        /// Stow ticks still to go.
        remaining: u32,
    },
    /// Sat down, evicting the listed boarding indices.
    Seated {
        /// Passengers forced back into the walkway.
        evicted: Vec<usize>,
    },
    /// Moved one row back.
    Advanced {
        /// The new cell.
        to: Coordinate,
    },
    /// Could not move because the next cell is taken.
    Blocked,
}

impl StepOutcome {
    /// Whether the passenger's state changed.
    pub const fn changed_state(&self) -> bool {
        !matches!(self, Self::Idle | Self::Blocked)
    }
}

/// Apply the transition rule to the passenger at `index`.
///
/// # Errors
///
/// Returns [`PassengerError::IndexOutOfRange`] for an unknown index and
/// [`PassengerError::OffWalkway`] if a standing passenger is found outside
/// the walkway grid.
pub fn step_passenger(
    manifest: &mut Manifest,
    index: usize,
) -> Result<StepOutcome, PassengerError> {
    let passenger = manifest.passenger_mut(index)?;

    if passenger.seated {
        return Ok(StepOutcome::Idle);
    }

    if passenger.at_target_row() {
        if passenger.bag_stow_remaining > 0 {
            passenger.bag_stow_remaining = passenger.bag_stow_remaining.saturating_sub(1);
            return Ok(StepOutcome::Stowed {
                remaining: passenger.bag_stow_remaining,
            });
        }
        return sit_down(manifest, index);
    }

    let from = passenger.position;
    let to = from.next_row().ok_or(PassengerError::OffWalkway {
        index,
        position: from,
    })?;
    let occupied = manifest
        .standing_at(to)
        .ok_or(PassengerError::OffWalkway { index, position: to })?;
    if occupied > 0 {
        return Ok(StepOutcome::Blocked);
    }

    manifest.leave_cell(index, from)?;
    manifest.enter_cell(index, to)?;
    manifest.passenger_mut(index)?.position = to;
    Ok(StepOutcome::Advanced { to })
}

/// Rule 3: clear the way into the row, then take the seat.
fn sit_down(manifest: &mut Manifest, index: usize) -> Result<StepOutcome, PassengerError> {
    let passenger = manifest.passenger_mut(index)?;
    let cell = passenger.position;
    let seat = passenger.target_seat;
    let blocking = passenger.blocking_seats();

    let evicted: Vec<usize> = blocking
        .into_iter()
        .filter_map(|blocked| manifest.seat_owner(blocked))
        .filter(|&owner| {
            owner != index && manifest.passenger(owner).is_some_and(|p| p.is_seated())
        })
        .collect();

    for &owner in &evicted {
        let other = manifest.passenger_mut(owner)?;
        other.seated = false;
        other.displaced = true;
        other.position = cell;
        manifest.enter_cell(owner, cell)?;
    }

    manifest.leave_cell(index, cell)?;
    let passenger = manifest.passenger_mut(index)?;
    passenger.position = seat;
    passenger.seated = true;
    passenger.displaced = false;

    if !evicted.is_empty() {
        trace!(
            passenger = index,
            %seat,
            evicted = evicted.len(),
            "Passenger squeezed past seated row-mates"
        );
    }

    Ok(StepOutcome::Seated { evicted })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boarding_cabin::Cabin;
    use boarding_types::{BoardingSpeed, PassengerPhase};

    use super::*;
    use crate::manifest::PassengerAssignment;

    fn assign(
        row: u32,
        lane: u32,
        walkway: u32,
        has_bag: bool,
        speed: BoardingSpeed,
    ) -> PassengerAssignment {
        PassengerAssignment {
            target_seat: Coordinate::new(row, lane),
            walkway_lane: walkway,
            has_bag,
            speed,
        }
    }

    /// One row of `[1, 3]`: lane 1 | walkway 2 | lanes 3, 4, 5.
    fn eviction_manifest() -> Manifest {
        let cabin = Cabin::new(&[1, 3], 1).unwrap();
        Manifest::from_assignments(
            &cabin,
            &[
                assign(1, 3, 2, false, BoardingSpeed::Fast),
                assign(1, 5, 2, false, BoardingSpeed::Fast),
                assign(1, 4, 2, false, BoardingSpeed::Fast),
                assign(1, 1, 2, false, BoardingSpeed::Fast),
            ],
        )
        .unwrap()
    }

    fn tick(manifest: &mut Manifest) -> Vec<StepOutcome> {
        (0..manifest.len())
            .map(|i| step_passenger(manifest, i).unwrap())
            .collect()
    }

    #[test]
    fn aisle_passenger_is_evicted_and_reseats() {
        let mut m = eviction_manifest();

        // Tick 1: only the first passenger can enter row 1.
        let outcomes = tick(&mut m);
        assert_eq!(
            outcomes.first(),
            Some(&StepOutcome::Advanced {
                to: Coordinate::new(1, 2)
            })
        );
        assert_eq!(outcomes.get(1), Some(&StepOutcome::Blocked));

        // Tick 2: the aisle passenger sits and the window passenger moves up.
        let outcomes = tick(&mut m);
        assert_eq!(outcomes.first(), Some(&StepOutcome::Seated { evicted: vec![] }));
        assert!(matches!(outcomes.get(1), Some(StepOutcome::Advanced { .. })));

        // Tick 3: the window passenger squeezes past the aisle seat.
        let outcomes = tick(&mut m);
        assert_eq!(outcomes.first(), Some(&StepOutcome::Idle));
        assert_eq!(outcomes.get(1), Some(&StepOutcome::Seated { evicted: vec![0] }));
        let aisle = m.passenger(0).unwrap();
        assert!(!aisle.is_seated());
        assert_eq!(aisle.phase(), PassengerPhase::Displaced);
        assert_eq!(aisle.position(), Coordinate::new(1, 2));
        assert_eq!(m.standing_at(Coordinate::new(1, 2)), Some(1));

        // Tick 4: the aisle passenger takes its seat back.
        let outcomes = tick(&mut m);
        assert_eq!(outcomes.first(), Some(&StepOutcome::Seated { evicted: vec![] }));
        let aisle = m.passenger(0).unwrap();
        assert!(aisle.is_seated());
        assert!(!aisle.is_displaced());
        assert_eq!(aisle.position(), Coordinate::new(1, 3));
        assert_eq!(m.passenger(1).map(|p| p.position()), Some(Coordinate::new(1, 5)));
    }

    #[test]
    fn window_passenger_evicts_both_row_mates() {
        let cabin = Cabin::new(&[3, 1], 1).unwrap();
        // Lanes 1, 2, 3 | walkway 4 | lane 5.
        let mut m = Manifest::from_assignments(
            &cabin,
            &[
                assign(1, 3, 4, false, BoardingSpeed::Fast),
                assign(1, 2, 4, false, BoardingSpeed::Fast),
                assign(1, 1, 4, false, BoardingSpeed::Fast),
                assign(1, 5, 4, false, BoardingSpeed::Fast),
            ],
        )
        .unwrap();

        let mut evicted_by_window = None;
        for _ in 0..20 {
            if let Some(StepOutcome::Seated { evicted }) = tick(&mut m).get(2) {
                if !evicted.is_empty() {
                    evicted_by_window = Some(evicted.clone());
                }
            }
            if m.all_seated() {
                break;
            }
        }

        assert_eq!(evicted_by_window, Some(vec![1, 0]));
        assert!(m.all_seated());
        for p in m.passengers() {
            assert_eq!(p.position(), p.target_seat());
        }
    }

    #[test]
    fn stowing_counts_down_before_sitting() {
        let cabin = Cabin::new(&[1, 1], 1).unwrap();
        let mut m = Manifest::from_assignments(
            &cabin,
            &[
                assign(1, 1, 2, true, BoardingSpeed::Slow),
                assign(1, 3, 2, false, BoardingSpeed::Fast),
            ],
        )
        .unwrap();

        assert!(matches!(step_passenger(&mut m, 0), Ok(StepOutcome::Advanced { .. })));
        assert_eq!(step_passenger(&mut m, 0), Ok(StepOutcome::Stowed { remaining: 2 }));
        assert_eq!(step_passenger(&mut m, 0), Ok(StepOutcome::Stowed { remaining: 1 }));
        assert_eq!(step_passenger(&mut m, 0), Ok(StepOutcome::Stowed { remaining: 0 }));
        assert_eq!(
            m.passenger(0).map(|p| p.phase()),
            Some(PassengerPhase::Stowing)
        );
        assert_eq!(step_passenger(&mut m, 0), Ok(StepOutcome::Seated { evicted: vec![] }));
        assert_eq!(step_passenger(&mut m, 0), Ok(StepOutcome::Idle));
    }

    #[test]
    fn walkways_do_not_block_each_other() {
        let cabin = Cabin::new(&[1, 1, 1], 2).unwrap();
        // Lane 1 | walkway 2 | lane 3 | walkway 4 | lane 5.
        let mut m = Manifest::from_assignments(
            &cabin,
            &[
                assign(2, 1, 2, false, BoardingSpeed::Fast),
                assign(2, 5, 4, false, BoardingSpeed::Fast),
                assign(1, 1, 2, false, BoardingSpeed::Fast),
                assign(1, 3, 2, false, BoardingSpeed::Fast),
                assign(1, 5, 4, false, BoardingSpeed::Fast),
                assign(2, 3, 4, false, BoardingSpeed::Fast),
            ],
        )
        .unwrap();

        let outcomes = tick(&mut m);
        assert!(matches!(outcomes.first(), Some(StepOutcome::Advanced { .. })));
        assert!(matches!(outcomes.get(1), Some(StepOutcome::Advanced { .. })));
        assert_eq!(outcomes.get(2), Some(&StepOutcome::Blocked));
        assert_eq!(outcomes.get(4), Some(&StepOutcome::Blocked));
    }

    #[test]
    fn unknown_index_is_an_error() {
        let mut m = eviction_manifest();
        assert_eq!(
            step_passenger(&mut m, 9),
            Err(PassengerError::IndexOutOfRange { index: 9, len: 4 })
        );
    }

    #[test]
    fn changed_state_ignores_idle_and_blocked() {
        assert!(!StepOutcome::Idle.changed_state());
        assert!(!StepOutcome::Blocked.changed_state());
        assert!(StepOutcome::Stowed { remaining: 0 }.changed_state());
        assert!(StepOutcome::Seated { evicted: vec![] }.changed_state());
    }
}
