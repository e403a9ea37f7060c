//! The passenger arena for one boarding run.
//!
//! A [`Manifest`] owns every [`Passenger`] in boarding-index order together
//! with two lookup structures kept in step with them:
//!
//! - a seat -> boarding index map, used to find who sits in a blocking seat;
//! - a walkway occupancy grid counting the standing passengers in each
//!   walkway cell (the door queue at row 0 is unbounded and not tracked).
//!
//! Passengers refer to each other only by boarding index, so the driver can
//! hold a single `&mut Manifest` for the whole tick.

use std::collections::BTreeMap;

use boarding_cabin::Cabin;
use boarding_types::{BoardingSpeed, Coordinate, TickSnapshot};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::PassengerError;
use crate::passenger::Passenger;
use crate::profile::BoardingProfile;

/// Everything needed to create one passenger, in boarding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassengerAssignment {
    /// The seat to reach.
    pub target_seat: Coordinate,
    /// Walkway lane to board along.
    pub walkway_lane: u32,
    /// Whether a bag must be stowed before sitting.
    pub has_bag: bool,
    /// Stowing speed.
    pub speed: BoardingSpeed,
}

/// All passengers of one run, indexed by boarding index.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// The cabin being boarded.
    cabin: Cabin,
    /// Passengers in boarding order.
    passengers: Vec<Passenger>,
    /// Seat -> boarding index of its passenger.
    seat_owner: BTreeMap<Coordinate, usize>,
    /// Standing passengers per walkway cell, by [`Cabin::walkway_cell_index`].
    occupancy: Vec<u32>,
}

/// Create the passenger set for a board order.
///
/// Shorthand for [`Manifest::instantiate`].
pub fn instantiate_passengers(
    cabin: &Cabin,
    order: &[Coordinate],
    profile: &BoardingProfile,
    rng: &mut impl Rng,
) -> Result<Manifest, PassengerError> {
    Manifest::instantiate(cabin, order, profile, rng)
}

impl Manifest {
    /// Create one passenger per seat of `order`, in that order.
    ///
    /// Each passenger boards along its nearest walkway (ties broken at
    /// random). Bags go to `ceil(n × bag_percent)` passengers chosen
    /// uniformly; speeds are shuffled over every passenger by the profile's
    /// speed counts.
    ///
    /// # Errors
    ///
    /// Returns [`PassengerError::InvalidOrder`] if `order` is not a
    /// permutation of the cabin's seats, or a profile validation error.
    pub fn instantiate(
        cabin: &Cabin,
        order: &[Coordinate],
        profile: &BoardingProfile,
        rng: &mut impl Rng,
    ) -> Result<Self, PassengerError> {
        profile.validate()?;
        let n = order.len();

        let mut walkways = Vec::with_capacity(n);
        for seat in order {
            walkways.push(cabin.choose_walkway(seat.lane, rng)?);
        }

        let bag_count = profile.bag_count(n)?;
        let mut bags: Vec<bool> = (0..n).map(|i| i < bag_count).collect();
        bags.shuffle(rng);

        let counts = profile.speed_counts(n)?;
        let mut speeds: Vec<BoardingSpeed> = std::iter::repeat_n(BoardingSpeed::Slow, counts.slow)
            .chain(std::iter::repeat_n(BoardingSpeed::Average, counts.average))
            .chain(std::iter::repeat_n(BoardingSpeed::Fast, counts.fast))
            .collect();
        speeds.shuffle(rng);

        let assignments: Vec<PassengerAssignment> = order
            .iter()
            .zip(walkways)
            .zip(bags.into_iter().zip(speeds))
            .map(|((&target_seat, walkway_lane), (has_bag, speed))| PassengerAssignment {
                target_seat,
                walkway_lane,
                has_bag,
                speed,
            })
            .collect();

        debug!(
            passengers = n,
            bags = bag_count,
            slow = counts.slow,
            average = counts.average,
            fast = counts.fast,
            "Passengers instantiated"
        );

        Self::from_assignments(cabin, &assignments)
    }

    /// Create a manifest from explicit per-passenger assignments.
    ///
    /// # Errors
    ///
    /// Returns [`PassengerError::InvalidOrder`] unless the target seats are
    /// exactly the cabin's seats, each once, and
    /// [`PassengerError::NotAWalkway`] for a lane that is not a walkway.
    pub fn from_assignments(
        cabin: &Cabin,
        assignments: &[PassengerAssignment],
    ) -> Result<Self, PassengerError> {
        if assignments.len() != cabin.seat_count() {
            return Err(PassengerError::InvalidOrder {
                reason: format!(
                    "{} seats ordered but the cabin has {}",
                    assignments.len(),
                    cabin.seat_count()
                ),
            });
        }

        let mut seat_owner = BTreeMap::new();
        let mut passengers = Vec::with_capacity(assignments.len());

        for (index, assignment) in assignments.iter().enumerate() {
            let seat = assignment.target_seat;
            if !cabin.is_seat(seat) {
                return Err(PassengerError::InvalidOrder {
                    reason: format!("{seat} is not a seat in this cabin"),
                });
            }
            if seat_owner.insert(seat, index).is_some() {
                return Err(PassengerError::InvalidOrder {
                    reason: format!("{seat} appears more than once"),
                });
            }
            if cabin.walkway_lanes().binary_search(&assignment.walkway_lane).is_err() {
                return Err(PassengerError::NotAWalkway {
                    lane: assignment.walkway_lane,
                });
            }
            passengers.push(Passenger::new(
                index,
                seat,
                assignment.walkway_lane,
                assignment.has_bag,
                assignment.speed,
            ));
        }

        Ok(Self {
            occupancy: vec![0; cabin.walkway_cell_count()],
            cabin: cabin.clone(),
            passengers,
            seat_owner,
        })
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// The cabin being boarded.
    pub const fn cabin(&self) -> &Cabin {
        &self.cabin
    }

    /// All passengers in boarding order.
    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    /// The passenger at a boarding index.
    pub fn passenger(&self, index: usize) -> Option<&Passenger> {
        self.passengers.get(index)
    }

    /// Number of passengers.
    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    /// Whether the manifest holds no passengers.
    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    /// Boarding index of the passenger assigned to `seat`.
    pub fn seat_owner(&self, seat: Coordinate) -> Option<usize> {
        self.seat_owner.get(&seat).copied()
    }

    /// The board order: every passenger's target seat by boarding index.
    pub fn board_order(&self) -> Vec<Coordinate> {
        self.passengers.iter().map(Passenger::target_seat).collect()
    }

    /// Whether every passenger is seated.
    pub fn all_seated(&self) -> bool {
        self.passengers.iter().all(Passenger::is_seated)
    }

    /// Number of passengers still standing.
    pub fn unseated_count(&self) -> usize {
        self.passengers.iter().filter(|p| !p.is_seated()).count()
    }

    /// Number of standing passengers in a walkway cell.
    ///
    /// Returns `None` for cells outside the walkway grid.
    pub fn standing_at(&self, cell: Coordinate) -> Option<u32> {
        let slot = self.cabin.walkway_cell_index(cell)?;
        self.occupancy.get(slot).copied()
    }

    /// Every passenger's state, tagged with the tick that produced it.
    pub fn snapshot(&self, tick: u64) -> TickSnapshot {
        TickSnapshot {
            tick,
            passengers: self.passengers.iter().map(Passenger::snapshot).collect(),
        }
    }

    // -------------------------------------------------------------------
    // Mutation (state machine only)
    // -------------------------------------------------------------------

    pub(crate) fn passenger_mut(&mut self, index: usize) -> Result<&mut Passenger, PassengerError> {
        let len = self.passengers.len();
        self.passengers
            .get_mut(index)
            .ok_or(PassengerError::IndexOutOfRange { index, len })
    }

    /// Record one more standing passenger in `cell`. The door queue is not
    /// tracked.
    pub(crate) fn enter_cell(
        &mut self,
        index: usize,
        cell: Coordinate,
    ) -> Result<(), PassengerError> {
        if cell.row == 0 {
            return Ok(());
        }
        let slot = self.occupancy_slot(index, cell)?;
        *slot = slot.checked_add(1).ok_or_else(|| PassengerError::ArithmeticOverflow {
            context: String::from("walkway occupancy"),
        })?;
        Ok(())
    }

    /// Record one fewer standing passenger in `cell`.
    pub(crate) fn leave_cell(
        &mut self,
        index: usize,
        cell: Coordinate,
    ) -> Result<(), PassengerError> {
        if cell.row == 0 {
            return Ok(());
        }
        let slot = self.occupancy_slot(index, cell)?;
        *slot = slot.saturating_sub(1);
        Ok(())
    }

    fn occupancy_slot(
        &mut self,
        index: usize,
        cell: Coordinate,
    ) -> Result<&mut u32, PassengerError> {
        self.cabin
            .walkway_cell_index(cell)
            .and_then(|slot| self.occupancy.get_mut(slot))
            .ok_or(PassengerError::OffWalkway {
                index,
                position: cell,
            })
    }
}
