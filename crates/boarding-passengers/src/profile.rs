//! Bag and boarding-speed proportions for a passenger set.
//!
//! Counts are derived by rounding up: `ceil(n × bag_percent)` passengers
//! carry a bag, `ceil(n × slow)` are slow and `ceil(n × fast)` are fast,
//! and the average group takes the remainder. Speeds are drawn over every
//! passenger; only bag carriers ever spend ticks stowing.
//!
//! Proportions are exact decimals, so `0.1 × 30` is exactly 3 and is never
//! rounded up to 4.

use boarding_types::SpeedMix;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::PassengerError;

/// How many passengers board at each speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedCounts {
    /// Passengers taking three ticks to stow.
    pub slow: usize,
    /// Passengers taking two ticks to stow.
    pub average: usize,
    /// Passengers taking one tick to stow.
    pub fast: usize,
}

/// Luggage and speed make-up of the passengers in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingProfile {
    /// Share of passengers carrying a bag that must be stowed.
    pub bag_percent: Decimal,
    /// Shares of slow, average, and fast passengers.
    pub speed_mix: SpeedMix,
}

impl Default for BoardingProfile {
    /// Half the passengers carry bags; the default speed mix.
    fn default() -> Self {
        Self {
            bag_percent: Decimal::new(5, 1),
            speed_mix: SpeedMix::default(),
        }
    }
}

impl BoardingProfile {
    /// Create a validated profile.
    ///
    /// # Errors
    ///
    /// See [`Self::validate`].
    pub fn new(bag_percent: Decimal, speed_mix: SpeedMix) -> Result<Self, PassengerError> {
        let profile = Self {
            bag_percent,
            speed_mix,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// A profile in which nobody carries a bag.
    pub fn no_bags() -> Self {
        Self {
            bag_percent: Decimal::ZERO,
            speed_mix: SpeedMix::default(),
        }
    }

    /// Check every proportion is within `[0, 1]` and the speed shares do not
    /// add up to more than one.
    ///
    /// # Errors
    ///
    /// Returns [`PassengerError::ProportionOutOfRange`] or
    /// [`PassengerError::SpeedMixExceedsOne`].
    pub fn validate(&self) -> Result<(), PassengerError> {
        check_unit("bag_percent", self.bag_percent)?;
        check_unit("speed_mix.slow", self.speed_mix.slow)?;
        check_unit("speed_mix.average", self.speed_mix.average)?;
        check_unit("speed_mix.fast", self.speed_mix.fast)?;

        let total = self
            .speed_mix
            .total()
            .ok_or_else(|| PassengerError::ArithmeticOverflow {
                context: String::from("speed mix total"),
            })?;
        if total > Decimal::ONE {
            return Err(PassengerError::SpeedMixExceedsOne { total });
        }
        Ok(())
    }

    /// Number of bag carriers among `passengers`.
    pub fn bag_count(&self, passengers: usize) -> Result<usize, PassengerError> {
        ceil_share(passengers, self.bag_percent)
    }

    /// Number of passengers at each speed among `passengers`.
    ///
    /// If rounding up both the slow and fast shares would exceed the total,
    /// the fast group is trimmed.
    pub fn speed_counts(&self, passengers: usize) -> Result<SpeedCounts, PassengerError> {
        let slow = ceil_share(passengers, self.speed_mix.slow)?;
        let fast =
            ceil_share(passengers, self.speed_mix.fast)?.min(passengers.saturating_sub(slow));
        let average = passengers.saturating_sub(slow).saturating_sub(fast);
        Ok(SpeedCounts {
            slow,
            average,
            fast,
        })
    }
}

/// Reject a proportion outside `[0, 1]`.
fn check_unit(name: &'static str, value: Decimal) -> Result<(), PassengerError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(PassengerError::ProportionOutOfRange { name, value });
    }
    Ok(())
}

/// `ceil(passengers × share)`, never more than `passengers`.
fn ceil_share(passengers: usize, share: Decimal) -> Result<usize, PassengerError> {
    let overflow = || PassengerError::ArithmeticOverflow {
        context: String::from("passenger share rounding"),
    };
    let scaled = Decimal::from(passengers)
        .checked_mul(share)
        .ok_or_else(overflow)?
        .ceil();
    let count = scaled.to_usize().ok_or_else(overflow)?;
    Ok(count.min(passengers))
}
