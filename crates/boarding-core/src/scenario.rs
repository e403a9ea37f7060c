//! A fully-specified boarding setup.
//!
//! A [`Scenario`] bundles everything needed to produce a fresh passenger
//! set: cabin shape, boarding policy, group count, and the passenger
//! profile. Building consumes randomness only from the RNG handed in, so a
//! seeded RNG reproduces the whole run.

use boarding_cabin::{Cabin, CabinError};
use boarding_passengers::{BoardingProfile, Manifest, PassengerError, instantiate_passengers};
use boarding_types::{BoardingMethod, TickSnapshot};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::order::{self, OrderError};
use crate::runner::{self, RunLimits, RunnerError, SimulationResult};

/// Errors that can occur while building or running a scenario.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    /// The cabin shape is invalid.
    #[error("cabin error: {source}")]
    Cabin {
        /// The underlying cabin error.
        #[from]
        source: CabinError,
    },

    /// The board order could not be generated.
    #[error("order error: {source}")]
    Order {
        /// The underlying order error.
        #[from]
        source: OrderError,
    },

    /// The passenger set could not be created.
    #[error("passenger error: {source}")]
    Passenger {
        /// The underlying passenger error.
        #[from]
        source: PassengerError,
    },

    /// The run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: RunnerError,
    },
}

/// One boarding setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Seats per block, left to right.
    pub seat_blocks: Vec<u32>,
    /// Number of seat rows.
    pub row_count: u32,
    /// Boarding policy.
    pub method: BoardingMethod,
    /// Row groups for the grouped policies.
    pub group_count: u32,
    /// Bag and speed proportions.
    pub profile: BoardingProfile,
}

impl Default for Scenario {
    /// A 15-row `[3, 3]` cabin boarding at random.
    fn default() -> Self {
        Self {
            seat_blocks: vec![3, 3],
            row_count: 15,
            method: BoardingMethod::Random,
            group_count: 1,
            profile: BoardingProfile::default(),
        }
    }
}

impl Scenario {
    /// Check every parameter and lay out the cabin.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: a bad cabin shape, a group count
    /// outside `[1, row_count]`, or an out-of-range proportion.
    pub fn validate(&self) -> Result<Cabin, ScenarioError> {
        let cabin = Cabin::new(&self.seat_blocks, self.row_count)?;
        order::validate_group_count(&cabin, self.group_count)?;
        self.profile.validate()?;
        Ok(cabin)
    }

    /// Build a fresh passenger set.
    ///
    /// # Errors
    ///
    /// See [`Self::validate`].
    pub fn build(&self, rng: &mut impl Rng) -> Result<Manifest, ScenarioError> {
        let cabin = self.validate()?;
        let board_order = order::generate_order(&cabin, self.method, self.group_count, rng)?;
        Ok(instantiate_passengers(&cabin, &board_order, &self.profile, rng)?)
    }

    /// Build and run one repetition from a seed.
    ///
    /// # Errors
    ///
    /// Returns a setup error or [`RunnerError::NotConverged`].
    pub fn run_once(
        &self,
        seed: u64,
        limits: RunLimits,
    ) -> Result<SimulationResult, ScenarioError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut manifest = self.build(&mut rng)?;
        Ok(runner::run_to_completion(&mut manifest, limits)?)
    }

    /// Build and run one repetition from a seed, keeping every tick.
    ///
    /// # Errors
    ///
    /// See [`Self::run_once`].
    pub fn run_once_with_history(
        &self,
        seed: u64,
        limits: RunLimits,
    ) -> Result<(SimulationResult, Vec<TickSnapshot>), ScenarioError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut manifest = self.build(&mut rng)?;
        Ok(runner::run_with_history(&mut manifest, limits)?)
    }
}
