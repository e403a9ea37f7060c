//! Cabin layout: seat lanes, walkway lanes, and lane distances.
//!
//! Lateral positions are numbered from 1 at the left-hand window. Each seat
//! block of size *k* takes *k* consecutive positions and a single walkway
//! position sits between consecutive blocks (never after the last one):
//!
//! ```text
//! seat_blocks = [3, 3]   ->  S S S W S S S    (lanes 1..=7, walkway 4)
//! seat_blocks = [2, 2, 2] -> S S W S S W S S  (walkways 3 and 6)
//! ```
//!
//! Everything is derived once in [`Cabin::new`] and never changes.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use boarding_types::Coordinate;
use rand::Rng;
use tracing::debug;

use crate::error::CabinError;

/// An aircraft cabin: rows of seat blocks separated by walkways.
///
/// Deserializing reads only `seat_blocks` and `row_count` and rebuilds the
/// rest through [`Cabin::new`], so a decoded cabin is always valid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CabinLayout")]
pub struct Cabin {
    /// Number of seat rows.
    row_count: u32,
    /// Seats per block, left to right.
    seat_blocks: Vec<u32>,
    /// Lateral positions holding seats, ascending.
    seat_lanes: Vec<u32>,
    /// Lateral positions between blocks, ascending.
    walkway_lanes: Vec<u32>,
    /// Seat lane -> distance to each walkway lane, in walkway order.
    lane_distance: BTreeMap<u32, Vec<u32>>,
    /// Seat lanes, window-most first.
    window_to_aisle_order: Vec<u32>,
}

/// The serialized inputs of a [`Cabin`].
#[derive(serde::Deserialize)]
struct CabinLayout {
    seat_blocks: Vec<u32>,
    row_count: u32,
}

impl TryFrom<CabinLayout> for Cabin {
    type Error = CabinError;

    fn try_from(layout: CabinLayout) -> Result<Self, Self::Error> {
        Self::new(&layout.seat_blocks, layout.row_count)
    }
}

/// Build a cabin from its seat blocks and row count.
///
/// Shorthand for [`Cabin::new`].
pub fn build_cabin(seat_blocks: &[u32], row_count: u32) -> Result<Cabin, CabinError> {
    Cabin::new(seat_blocks, row_count)
}

impl Cabin {
    /// Lay out a cabin.
    ///
    /// # Errors
    ///
    /// Returns [`CabinError::NoSeatBlocks`], [`CabinError::EmptySeatBlock`],
    /// [`CabinError::NoRows`], or [`CabinError::NoWalkway`] for an invalid
    /// layout, and [`CabinError::ArithmeticOverflow`] if the lane
    /// numbering does not fit in `u32`.
    pub fn new(seat_blocks: &[u32], row_count: u32) -> Result<Self, CabinError> {
        if seat_blocks.is_empty() {
            return Err(CabinError::NoSeatBlocks);
        }
        if let Some(index) = seat_blocks.iter().position(|&size| size == 0) {
            return Err(CabinError::EmptySeatBlock { index });
        }
        if row_count == 0 {
            return Err(CabinError::NoRows);
        }
        if seat_blocks.len() < 2 {
            return Err(CabinError::NoWalkway {
                blocks: seat_blocks.len(),
            });
        }

        let (seat_lanes, walkway_lanes) = lay_out_lanes(seat_blocks)?;

        let lane_distance: BTreeMap<u32, Vec<u32>> = seat_lanes
            .iter()
            .map(|&lane| {
                let distances = walkway_lanes.iter().map(|&w| w.abs_diff(lane)).collect();
                (lane, distances)
            })
            .collect();

        let mut window_to_aisle_order = seat_lanes.clone();
        window_to_aisle_order.sort_by_key(|lane| {
            let nearest = lane_distance
                .get(lane)
                .and_then(|d| d.iter().min().copied())
                .unwrap_or(0);
            (Reverse(nearest), *lane)
        });

        debug!(
            rows = row_count,
            ?seat_lanes,
            ?walkway_lanes,
            ?window_to_aisle_order,
            "Cabin laid out"
        );

        Ok(Self {
            row_count,
            seat_blocks: seat_blocks.to_vec(),
            seat_lanes,
            walkway_lanes,
            lane_distance,
            window_to_aisle_order,
        })
    }

    // -------------------------------------------------------------------
    // Layout accessors
    // -------------------------------------------------------------------

    /// Number of seat rows.
    pub const fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Seats per block, left to right.
    pub fn seat_blocks(&self) -> &[u32] {
        &self.seat_blocks
    }

    /// Lateral positions holding seats, ascending.
    pub fn seat_lanes(&self) -> &[u32] {
        &self.seat_lanes
    }

    /// Lateral positions passengers walk along, ascending.
    pub fn walkway_lanes(&self) -> &[u32] {
        &self.walkway_lanes
    }

    /// Distances from a seat lane to every walkway lane, in walkway order.
    pub fn lane_distance(&self, lane: u32) -> Option<&[u32]> {
        self.lane_distance.get(&lane).map(Vec::as_slice)
    }

    /// Distance from a seat lane to its nearest walkway.
    pub fn nearest_walkway_distance(&self, lane: u32) -> Option<u32> {
        self.lane_distance(lane)?.iter().min().copied()
    }

    /// The largest nearest-walkway distance of any seat lane.
    pub fn max_lane_distance(&self) -> u32 {
        self.seat_lanes
            .iter()
            .filter_map(|&lane| self.nearest_walkway_distance(lane))
            .max()
            .unwrap_or(0)
    }

    /// Seat lanes sorted window-most first.
    ///
    /// Lanes further from their nearest walkway come first; lanes at the
    /// same distance keep ascending lane order.
    pub fn window_to_aisle_order(&self) -> &[u32] {
        &self.window_to_aisle_order
    }

    /// Position of a seat lane in [`Self::window_to_aisle_order`]
    /// (0 is the window-most lane).
    pub fn lane_rank(&self, lane: u32) -> Option<usize> {
        self.window_to_aisle_order.iter().position(|&l| l == lane)
    }

    /// Number of seats in one row.
    pub fn seats_per_row(&self) -> usize {
        self.seat_lanes.len()
    }

    /// Total number of seats (and therefore passengers).
    pub fn seat_count(&self) -> usize {
        usize::try_from(self.row_count)
            .ok()
            .and_then(|rows| rows.checked_mul(self.seats_per_row()))
            .unwrap_or(usize::MAX)
    }

    /// Every seat, row by row from the front, left to right within a row.
    pub fn seats(&self) -> Vec<Coordinate> {
        (1..=self.row_count)
            .flat_map(|row| self.seat_lanes.iter().map(move |&lane| Coordinate::new(row, lane)))
            .collect()
    }

    /// Whether the coordinate is one of the cabin's seats.
    pub fn is_seat(&self, coord: Coordinate) -> bool {
        (1..=self.row_count).contains(&coord.row)
            && self.seat_lanes.binary_search(&coord.lane).is_ok()
    }

    /// Whether the coordinate is a walkway cell inside the cabin (row 0, the
    /// door queue, is not).
    pub fn is_walkway_cell(&self, coord: Coordinate) -> bool {
        self.walkway_cell_index(coord).is_some()
    }

    /// Dense index of a walkway cell, for occupancy grids.
    ///
    /// Cells are numbered row by row from row 1, walkway by walkway within a
    /// row. Returns `None` for the door queue, seats, and cells outside the
    /// cabin.
    pub fn walkway_cell_index(&self, coord: Coordinate) -> Option<usize> {
        if coord.row == 0 || coord.row > self.row_count {
            return None;
        }
        let lane_slot = self.walkway_lanes.binary_search(&coord.lane).ok()?;
        let row_slot = usize::try_from(coord.row.checked_sub(1)?).ok()?;
        row_slot
            .checked_mul(self.walkway_lanes.len())?
            .checked_add(lane_slot)
    }

    /// Number of walkway cells inside the cabin.
    pub fn walkway_cell_count(&self) -> usize {
        usize::try_from(self.row_count)
            .ok()
            .and_then(|rows| rows.checked_mul(self.walkway_lanes.len()))
            .unwrap_or(usize::MAX)
    }

    // -------------------------------------------------------------------
    // Walkway selection
    // -------------------------------------------------------------------

    /// Walkway lanes at the minimum distance from a seat lane.
    ///
    /// # Errors
    ///
    /// Returns [`CabinError::NotASeatLane`] if `lane` holds no seats.
    pub fn nearest_walkways(&self, lane: u32) -> Result<Vec<u32>, CabinError> {
        let distances = self
            .lane_distance(lane)
            .ok_or(CabinError::NotASeatLane { lane })?;
        let nearest = distances
            .iter()
            .min()
            .copied()
            .ok_or(CabinError::NotASeatLane { lane })?;
        Ok(self
            .walkway_lanes
            .iter()
            .zip(distances)
            .filter(|&(_, &d)| d == nearest)
            .map(|(&w, _)| w)
            .collect())
    }

    /// Pick the walkway a passenger seated in `lane` boards along.
    ///
    /// The nearest walkway wins; if several are equally near, one of them
    /// is chosen uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`CabinError::NotASeatLane`] if `lane` holds no seats.
    pub fn choose_walkway(&self, lane: u32, rng: &mut impl Rng) -> Result<u32, CabinError> {
        let nearest = self.nearest_walkways(lane)?;
        let pick = match nearest.len() {
            0 => None,
            1 => nearest.first().copied(),
            n => nearest.get(rng.random_range(0..n)).copied(),
        };
        pick.ok_or(CabinError::NotASeatLane { lane })
    }
}

/// Assign lateral positions to seat lanes and walkway lanes.
fn lay_out_lanes(seat_blocks: &[u32]) -> Result<(Vec<u32>, Vec<u32>), CabinError> {
    let overflow = || CabinError::ArithmeticOverflow {
        context: String::from("lane numbering overflow"),
    };

    let mut seat_lanes = Vec::new();
    let mut walkway_lanes = Vec::new();
    let mut next_lane: u32 = 1;

    for (index, &size) in seat_blocks.iter().enumerate() {
        for _ in 0..size {
            seat_lanes.push(next_lane);
            next_lane = next_lane.checked_add(1).ok_or_else(overflow)?;
        }
        let is_last = index.checked_add(1) == Some(seat_blocks.len());
        if !is_last {
            walkway_lanes.push(next_lane);
            next_lane = next_lane.checked_add(1).ok_or_else(overflow)?;
        }
    }

    Ok((seat_lanes, walkway_lanes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn single_aisle_layout() {
        let cabin = Cabin::new(&[3, 3], 10).unwrap();
        assert_eq!(cabin.seat_lanes(), &[1, 2, 3, 5, 6, 7]);
        assert_eq!(cabin.walkway_lanes(), &[4]);
        assert_eq!(cabin.lane_distance(1), Some([3].as_slice()));
        assert_eq!(cabin.lane_distance(5), Some([1].as_slice()));
        assert_eq!(cabin.lane_distance(4), None);
        assert_eq!(cabin.window_to_aisle_order(), &[1, 7, 2, 6, 3, 5]);
        assert_eq!(cabin.max_lane_distance(), 3);
        assert_eq!(cabin.seat_count(), 60);
        assert_eq!(cabin.seats_per_row(), 6);
    }

    #[test]
    fn twin_aisle_layout_ranks_by_nearest_walkway() {
        let cabin = Cabin::new(&[2, 2, 2], 5).unwrap();
        assert_eq!(cabin.seat_lanes(), &[1, 2, 4, 5, 7, 8]);
        assert_eq!(cabin.walkway_lanes(), &[3, 6]);
        assert_eq!(cabin.lane_distance(4), Some([1, 2].as_slice()));
        // Windows are two from a walkway; everything else is adjacent to one.
        assert_eq!(cabin.window_to_aisle_order(), &[1, 8, 2, 4, 5, 7]);
        assert_eq!(cabin.lane_rank(1), Some(0));
        assert_eq!(cabin.lane_rank(7), Some(5));
        assert_eq!(cabin.lane_rank(3), None);
    }

    #[test]
    fn seat_and_walkway_lanes_are_disjoint() {
        for blocks in [vec![3, 3], vec![2, 4, 2], vec![1, 3], vec![3, 3, 3, 3]] {
            let cabin = Cabin::new(&blocks, 4).unwrap();
            let seats: BTreeSet<u32> = cabin.seat_lanes().iter().copied().collect();
            assert!(cabin.walkway_lanes().iter().all(|w| !seats.contains(w)));
            assert_eq!(cabin.walkway_lanes().len(), blocks.len() - 1);
            assert_eq!(cabin.seats_per_row(), blocks.iter().sum::<u32>() as usize);
        }
    }

    #[test]
    fn seats_are_row_major() {
        let cabin = Cabin::new(&[1, 2], 2).unwrap();
        assert_eq!(
            cabin.seats(),
            vec![
                Coordinate::new(1, 1),
                Coordinate::new(1, 3),
                Coordinate::new(1, 4),
                Coordinate::new(2, 1),
                Coordinate::new(2, 3),
                Coordinate::new(2, 4),
            ]
        );
        assert!(cabin.is_seat(Coordinate::new(2, 4)));
        assert!(!cabin.is_seat(Coordinate::new(2, 2)));
        assert!(!cabin.is_seat(Coordinate::new(3, 1)));
        assert!(!cabin.is_seat(Coordinate::new(0, 1)));
    }

    #[test]
    fn invalid_layouts_rejected() {
        assert_eq!(Cabin::new(&[], 10), Err(CabinError::NoSeatBlocks));
        assert_eq!(
            Cabin::new(&[3, 0, 3], 10),
            Err(CabinError::EmptySeatBlock { index: 1 })
        );
        assert_eq!(Cabin::new(&[3, 3], 0), Err(CabinError::NoRows));
        assert_eq!(Cabin::new(&[6], 10), Err(CabinError::NoWalkway { blocks: 1 }));
    }

    #[test]
    fn walkway_cell_indices_are_dense() {
        let cabin = Cabin::new(&[2, 2, 2], 3).unwrap();
        assert_eq!(cabin.walkway_cell_count(), 6);
        assert_eq!(cabin.walkway_cell_index(Coordinate::new(1, 3)), Some(0));
        assert_eq!(cabin.walkway_cell_index(Coordinate::new(1, 6)), Some(1));
        assert_eq!(cabin.walkway_cell_index(Coordinate::new(3, 6)), Some(5));
        assert_eq!(cabin.walkway_cell_index(Coordinate::door(3)), None);
        assert_eq!(cabin.walkway_cell_index(Coordinate::new(4, 3)), None);
        assert_eq!(cabin.walkway_cell_index(Coordinate::new(1, 2)), None);
        assert!(cabin.is_walkway_cell(Coordinate::new(2, 3)));
    }

    #[test]
    fn nearest_walkway_is_unique_when_unambiguous() {
        let cabin = Cabin::new(&[2, 2, 2], 3).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(cabin.nearest_walkways(4), Ok(vec![3]));
        assert_eq!(cabin.nearest_walkways(5), Ok(vec![6]));
        for _ in 0..20 {
            assert_eq!(cabin.choose_walkway(1, &mut rng), Ok(3));
            assert_eq!(cabin.choose_walkway(8, &mut rng), Ok(6));
        }
        assert_eq!(
            cabin.choose_walkway(3, &mut rng),
            Err(CabinError::NotASeatLane { lane: 3 })
        );
    }

    #[test]
    fn equidistant_walkways_are_both_chosen() {
        // Lanes: 1 2 [3] 4 [5] 6 7 -- lane 4 sits between the two walkways.
        let cabin = Cabin::new(&[2, 1, 2], 2).unwrap();
        assert_eq!(cabin.nearest_walkways(4), Ok(vec![3, 5]));

        let mut rng = SmallRng::seed_from_u64(42);
        let picks: BTreeSet<u32> = (0..64)
            .filter_map(|_| cabin.choose_walkway(4, &mut rng).ok())
            .collect();
        assert_eq!(picks, BTreeSet::from([3, 5]));
    }

    #[test]
    fn cabin_serializes() {
        let cabin = Cabin::new(&[3, 3], 2).unwrap();
        let json = serde_json::to_value(&cabin).unwrap();
        assert_eq!(json["row_count"], 2);
        assert_eq!(json["walkway_lanes"], serde_json::json!([4]));

        let decoded: Cabin = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, cabin);
    }

    #[test]
    fn deserializing_validates_the_layout() {
        let single_block = serde_json::json!({ "seat_blocks": [6], "row_count": 4 });
        assert!(serde_json::from_value::<Cabin>(single_block).is_err());

        let no_rows = serde_json::json!({ "seat_blocks": [3, 3], "row_count": 0 });
        assert!(serde_json::from_value::<Cabin>(no_rows).is_err());

        // Derived fields are rebuilt, not trusted.
        let tampered = serde_json::json!({
            "seat_blocks": [2, 2],
            "row_count": 3,
            "walkway_lanes": [1],
        });
        let cabin: Cabin = serde_json::from_value(tampered).unwrap();
        assert_eq!(cabin.walkway_lanes(), &[3]);
    }
}
