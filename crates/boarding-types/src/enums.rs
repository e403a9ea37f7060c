//! Enumeration types for the boarding simulation.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Boarding methods
// ---------------------------------------------------------------------------

/// A boarding policy deciding the order in which seats board.
///
/// The serialized names are the exact strings accepted from configuration
/// files and callers (`"random"`, `"front-to-back WMA"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoardingMethod {
    /// Full uniform shuffle of all seats.
    #[serde(rename = "random")]
    Random,
    /// Row groups from the front of the cabin, shuffled within each group.
    #[serde(rename = "front-to-back")]
    FrontToBack,
    /// Row groups from the rear of the cabin, shuffled within each group.
    #[serde(rename = "back-to-front")]
    BackToFront,
    /// Window seats first, then middle, then aisle (lane by lane).
    #[serde(rename = "WMA")]
    WindowMiddleAisle,
    /// Window-middle-aisle within row groups taken from the front.
    #[serde(rename = "front-to-back WMA")]
    FrontToBackWma,
    /// Window-middle-aisle within row groups taken from the rear.
    #[serde(rename = "back-to-front WMA")]
    BackToFrontWma,
    /// Deterministic window-first, rear-row-first ordering.
    #[serde(rename = "optimal")]
    Optimal,
}

impl BoardingMethod {
    /// Every boarding method, in the order they are usually reported.
    pub const ALL: [Self; 7] = [
        Self::FrontToBack,
        Self::BackToFront,
        Self::WindowMiddleAisle,
        Self::FrontToBackWma,
        Self::BackToFrontWma,
        Self::Random,
        Self::Optimal,
    ];

    /// The exact method name used in configuration and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::FrontToBack => "front-to-back",
            Self::BackToFront => "back-to-front",
            Self::WindowMiddleAisle => "WMA",
            Self::FrontToBackWma => "front-to-back WMA",
            Self::BackToFrontWma => "back-to-front WMA",
            Self::Optimal => "optimal",
        }
    }

    /// Whether the method partitions rows into boarding groups.
    pub const fn uses_groups(self) -> bool {
        matches!(
            self,
            Self::FrontToBack | Self::BackToFront | Self::FrontToBackWma | Self::BackToFrontWma
        )
    }

    /// Whether the method draws from the RNG while ordering seats.
    pub const fn is_randomized(self) -> bool {
        !matches!(self, Self::Optimal)
    }
}

impl fmt::Display for BoardingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A method name that matches none of the known boarding methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown boarding method: {name:?}")]
pub struct UnknownMethodError {
    /// The rejected name, as given.
    pub name: String,
}

impl FromStr for BoardingMethod {
    type Err = UnknownMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.name() == s)
            .ok_or_else(|| UnknownMethodError { name: s.to_owned() })
    }
}

// ---------------------------------------------------------------------------
// Boarding speeds
// ---------------------------------------------------------------------------

/// Number of ticks the slowest passenger needs to stow a bag.
pub const MAX_STOW_TICKS: u32 = 3;

/// How quickly a passenger stows a bag once at the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardingSpeed {
    /// Three ticks to stow.
    Slow,
    /// Two ticks to stow.
    Average,
    /// One tick to stow.
    Fast,
}

impl BoardingSpeed {
    /// Ticks spent stowing a bag at this speed.
    pub const fn stow_ticks(self) -> u32 {
        match self {
            Self::Slow => MAX_STOW_TICKS,
            Self::Average => 2,
            Self::Fast => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Passenger phases
// ---------------------------------------------------------------------------

/// Where a passenger is in the boarding state machine.
///
/// Derived from the passenger record on demand; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerPhase {
    /// Queued at the door (row 0).
    Waiting,
    /// In a walkway, short of the target row.
    Advancing,
    /// At the target row, still stowing a bag or about to sit.
    Stowing,
    /// In the target seat.
    Seated,
    /// Pushed back into the walkway to let another passenger through.
    Displaced,
}

impl PassengerPhase {
    /// Whether the passenger still occupies the walkway or door queue.
    pub const fn is_standing(self) -> bool {
        !matches!(self, Self::Seated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_parse_back() {
        for method in BoardingMethod::ALL {
            assert_eq!(method.name().parse::<BoardingMethod>(), Ok(method));
        }
    }

    #[test]
    fn unknown_method_rejected() {
        let err = "front WMA".parse::<BoardingMethod>();
        assert_eq!(
            err,
            Err(UnknownMethodError {
                name: "front WMA".to_owned()
            })
        );
        // Names are case sensitive.
        assert!("wma".parse::<BoardingMethod>().is_err());
        assert!("Random".parse::<BoardingMethod>().is_err());
    }

    #[test]
    fn serde_uses_exact_names() {
        let json = serde_json::to_string(&BoardingMethod::BackToFrontWma).unwrap_or_default();
        assert_eq!(json, "\"back-to-front WMA\"");

        let parsed: Result<BoardingMethod, _> = serde_json::from_str("\"WMA\"");
        assert_eq!(parsed.ok(), Some(BoardingMethod::WindowMiddleAisle));
    }

    #[test]
    fn grouped_methods() {
        assert!(BoardingMethod::FrontToBack.uses_groups());
        assert!(BoardingMethod::BackToFrontWma.uses_groups());
        assert!(!BoardingMethod::Random.uses_groups());
        assert!(!BoardingMethod::WindowMiddleAisle.uses_groups());
        assert!(!BoardingMethod::Optimal.uses_groups());
        assert!(!BoardingMethod::Optimal.is_randomized());
    }

    #[test]
    fn stow_ticks_by_speed() {
        assert_eq!(BoardingSpeed::Slow.stow_ticks(), 3);
        assert_eq!(BoardingSpeed::Average.stow_ticks(), 2);
        assert_eq!(BoardingSpeed::Fast.stow_ticks(), 1);
    }
}
