//! Boarding order generation.
//!
//! Each policy turns a [`Cabin`] into a board order: a permutation of every
//! seat, first boarder first. Grouped policies split the rows into
//! `group_count` contiguous ranges; when the rows do not divide evenly the
//! earliest groups take one extra row each.
//!
//! The front-to-back and back-to-front families (plain and WMA) share one
//! partition routine, parameterized by which end of the cabin boards first
//! and how a group's seats are shuffled.

use std::cmp::Reverse;

use boarding_cabin::Cabin;
use boarding_types::{BoardingMethod, Coordinate, UnknownMethodError};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Errors that can occur while generating a board order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    /// The group count is zero or larger than the number of rows.
    #[error("group count {groups} must be between 1 and the row count {rows}")]
    GroupCountOutOfRange {
        /// The requested number of groups.
        groups: u32,
        /// Rows in the cabin.
        rows: u32,
    },

    /// The method name is not one of the known policies.
    #[error("{source}")]
    UnknownMethod {
        /// The parse failure.
        #[from]
        source: UnknownMethodError,
    },
}

/// Which end of the cabin the first group is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowDirection {
    FrontFirst,
    RearFirst,
}

/// How the seats of one row group are shuffled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupSplit {
    /// All seats of the group in one shuffle.
    Whole,
    /// One shuffle per seat lane, lanes in window-to-aisle order.
    PerLane,
}

/// Check that `group_count` lies in `[1, row_count]`.
///
/// # Errors
///
/// Returns [`OrderError::GroupCountOutOfRange`] otherwise.
pub const fn validate_group_count(cabin: &Cabin, group_count: u32) -> Result<(), OrderError> {
    if group_count == 0 || group_count > cabin.row_count() {
        return Err(OrderError::GroupCountOutOfRange {
            groups: group_count,
            rows: cabin.row_count(),
        });
    }
    Ok(())
}

/// Generate the board order for a policy.
///
/// `group_count` is validated for every method, even those that ignore it.
///
/// # Errors
///
/// Returns [`OrderError::GroupCountOutOfRange`] for a bad group count.
pub fn generate_order(
    cabin: &Cabin,
    method: BoardingMethod,
    group_count: u32,
    rng: &mut impl Rng,
) -> Result<Vec<Coordinate>, OrderError> {
    validate_group_count(cabin, group_count)?;

    let order = match method {
        BoardingMethod::Random => {
            let mut seats = cabin.seats();
            seats.shuffle(rng);
            seats
        }
        BoardingMethod::FrontToBack => {
            grouped_order(cabin, group_count, RowDirection::FrontFirst, GroupSplit::Whole, rng)
        }
        BoardingMethod::BackToFront => {
            grouped_order(cabin, group_count, RowDirection::RearFirst, GroupSplit::Whole, rng)
        }
        BoardingMethod::WindowMiddleAisle => {
            let mut seats = cabin.seats();
            seats.shuffle(rng);
            // Stable, so each lane keeps its shuffled order.
            seats.sort_by_key(|seat| rank(cabin, seat.lane));
            seats
        }
        BoardingMethod::FrontToBackWma => {
            grouped_order(cabin, group_count, RowDirection::FrontFirst, GroupSplit::PerLane, rng)
        }
        BoardingMethod::BackToFrontWma => {
            grouped_order(cabin, group_count, RowDirection::RearFirst, GroupSplit::PerLane, rng)
        }
        BoardingMethod::Optimal => {
            let mut seats = cabin.seats();
            seats.sort_by_key(|seat| (rank(cabin, seat.lane), Reverse(seat.row)));
            seats
        }
    };

    debug!(method = %method, groups = group_count, seats = order.len(), "Board order generated");
    Ok(order)
}

/// Generate the board order for a policy given by name.
///
/// # Errors
///
/// Returns [`OrderError::UnknownMethod`] if `method` is not an accepted
/// name, or any error from [`generate_order`].
pub fn generate_board_order(
    cabin: &Cabin,
    method: &str,
    group_count: u32,
    rng: &mut impl Rng,
) -> Result<Vec<Coordinate>, OrderError> {
    let method: BoardingMethod = method.parse()?;
    generate_order(cabin, method, group_count, rng)
}

/// Rows per group, earliest groups first. The first `rows % groups` groups
/// get one extra row.
pub fn group_sizes(row_count: u32, group_count: u32) -> Vec<u32> {
    let base = row_count.checked_div(group_count).unwrap_or(0);
    let remainder = row_count.checked_rem(group_count).unwrap_or(0);
    (0..group_count)
        .map(|g| if g < remainder { base.saturating_add(1) } else { base })
        .collect()
}

/// Rows of each group, in boarding order.
fn row_groups(row_count: u32, group_count: u32, direction: RowDirection) -> Vec<Vec<u32>> {
    let rows: Vec<u32> = match direction {
        RowDirection::FrontFirst => (1..=row_count).collect(),
        RowDirection::RearFirst => (1..=row_count).rev().collect(),
    };

    let mut remaining = rows.as_slice();
    group_sizes(row_count, group_count)
        .into_iter()
        .map(|size| {
            let take = usize::try_from(size).unwrap_or(0).min(remaining.len());
            let (group, rest) = remaining.split_at(take);
            remaining = rest;
            group.to_vec()
        })
        .collect()
}

fn grouped_order(
    cabin: &Cabin,
    group_count: u32,
    direction: RowDirection,
    split: GroupSplit,
    rng: &mut impl Rng,
) -> Vec<Coordinate> {
    let mut order = Vec::with_capacity(cabin.seat_count());

    for rows in row_groups(cabin.row_count(), group_count, direction) {
        match split {
            GroupSplit::Whole => {
                let mut group: Vec<Coordinate> = rows
                    .iter()
                    .flat_map(|&row| {
                        cabin
                            .seat_lanes()
                            .iter()
                            .map(move |&lane| Coordinate::new(row, lane))
                    })
                    .collect();
                group.shuffle(rng);
                order.extend(group);
            }
            GroupSplit::PerLane => {
                for &lane in cabin.window_to_aisle_order() {
                    let mut column: Vec<Coordinate> =
                        rows.iter().map(|&row| Coordinate::new(row, lane)).collect();
                    column.shuffle(rng);
                    order.extend(column);
                }
            }
        }
    }

    order
}

fn rank(cabin: &Cabin, lane: u32) -> usize {
    cabin.lane_rank(lane).unwrap_or(usize::MAX)
}
