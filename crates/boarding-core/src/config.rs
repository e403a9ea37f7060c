//! Configuration loading and typed config structures for the boarding
//! simulation.
//!
//! The canonical configuration lives in `boarding-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, and provides a loader that reads and validates the file.
//! Every section and field has a default, so an empty file is valid.

use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use boarding_passengers::BoardingProfile;
use boarding_types::{BoardingMethod, SpeedMix, UnknownMethodError};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::runner::RunLimits;
use crate::scenario::{Scenario, ScenarioError};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// `BOARDING_SEED` is not an unsigned integer.
    #[error("invalid BOARDING_SEED {value:?}: {source}")]
    InvalidSeed {
        /// The rejected value.
        value: String,
        /// The underlying parse error.
        source: ParseIntError,
    },

    /// `BOARDING_METHOD` names no known boarding method.
    #[error("invalid BOARDING_METHOD: {source}")]
    UnknownMethod {
        /// The underlying parse error.
        #[from]
        source: UnknownMethodError,
    },

    /// The configured scenario is invalid.
    #[error("invalid scenario: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: ScenarioError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `boarding-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Cabin shape.
    #[serde(default)]
    pub cabin: CabinConfig,

    /// Boarding policy.
    #[serde(default)]
    pub boarding: BoardingConfig,

    /// Passenger luggage and speeds.
    #[serde(default)]
    pub passengers: PassengersConfig,

    /// Seeding, repetitions, and run bounds.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Where to write results.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `BOARDING_SEED` overrides `simulation.seed`
    /// - `BOARDING_METHOD` overrides `boarding.method`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or an
    /// override error if an environment variable is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or an
    /// override error if an environment variable is malformed.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `BOARDING_*` environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeed`] or [`ConfigError::UnknownMethod`]
    /// if a variable is set but malformed.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let seed = std::env::var("BOARDING_SEED").ok();
        let method = std::env::var("BOARDING_METHOD").ok();
        self.apply_overrides(seed.as_deref(), method.as_deref())
    }

    /// Apply seed and method overrides given as raw strings.
    ///
    /// Nothing changes unless both values are valid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeed`] or [`ConfigError::UnknownMethod`].
    pub fn apply_overrides(
        &mut self,
        seed: Option<&str>,
        method: Option<&str>,
    ) -> Result<(), ConfigError> {
        let seed = seed
            .map(|value| {
                value.parse::<u64>().map_err(|source| ConfigError::InvalidSeed {
                    value: value.to_owned(),
                    source,
                })
            })
            .transpose()?;
        let method = method.map(str::parse::<BoardingMethod>).transpose()?;

        if let Some(seed) = seed {
            self.simulation.seed = seed;
        }
        if let Some(method) = method {
            self.boarding.method = method;
        }
        Ok(())
    }

    /// The configured scenario, validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Scenario`] if any parameter is out of range.
    pub fn scenario(&self) -> Result<Scenario, ConfigError> {
        let scenario = Scenario {
            seat_blocks: self.cabin.seat_blocks.clone(),
            row_count: self.cabin.rows,
            method: self.boarding.method,
            group_count: self.boarding.groups,
            profile: BoardingProfile {
                bag_percent: self.passengers.bag_percent,
                speed_mix: self.passengers.speed_mix,
            },
        };
        scenario.validate()?;
        Ok(scenario)
    }

    /// Run bounds; a `max_ticks` of zero derives the cap from the cabin.
    pub const fn limits(&self) -> RunLimits {
        match self.simulation.max_ticks {
            0 => RunLimits { max_ticks: None },
            cap => RunLimits::with_max_ticks(cap),
        }
    }
}

/// Cabin shape configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CabinConfig {
    /// Number of seat rows.
    #[serde(default = "default_rows")]
    pub rows: u32,

    /// Seats per block, left to right. Needs at least two blocks.
    #[serde(default = "default_seat_blocks")]
    pub seat_blocks: Vec<u32>,
}

impl Default for CabinConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            seat_blocks: default_seat_blocks(),
        }
    }
}

/// Boarding policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BoardingConfig {
    /// Policy name, e.g. `"random"` or `"back-to-front WMA"`.
    #[serde(default = "default_method")]
    pub method: BoardingMethod,

    /// Number of row groups (grouped policies only, but always checked).
    #[serde(default = "default_groups")]
    pub groups: u32,
}

impl Default for BoardingConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            groups: default_groups(),
        }
    }
}

/// Passenger luggage and speed configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PassengersConfig {
    /// Share of passengers carrying a bag.
    #[serde(default = "default_bag_percent")]
    pub bag_percent: Decimal,

    /// Shares of slow, average, and fast passengers.
    #[serde(default)]
    pub speed_mix: SpeedMix,
}

impl Default for PassengersConfig {
    fn default() -> Self {
        Self {
            bag_percent: default_bag_percent(),
            speed_mix: SpeedMix::default(),
        }
    }
}

/// Seeding, repetition, and run-bound configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Seed of the first (or only) run.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of seeded repetitions; 1 runs the scenario once.
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,

    /// Tick cap per run; 0 derives one from the cabin.
    #[serde(default)]
    pub max_ticks: u64,

    /// Whether a single run keeps the per-tick history.
    #[serde(default)]
    pub record_history: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            repetitions: default_repetitions(),
            max_ticks: 0,
            record_history: false,
        }
    }
}

/// Output file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// JSON file for the per-tick history of a single run.
    #[serde(default)]
    pub history_path: Option<PathBuf>,

    /// JSON file for the repetition report.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde requires named functions)
// ---------------------------------------------------------------------------

const fn default_rows() -> u32 {
    15
}

fn default_seat_blocks() -> Vec<u32> {
    vec![3, 3]
}

const fn default_method() -> BoardingMethod {
    BoardingMethod::Random
}

const fn default_groups() -> u32 {
    1
}

fn default_bag_percent() -> Decimal {
    Decimal::new(5, 1)
}

const fn default_seed() -> u64 {
    42
}

const fn default_repetitions() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.cabin.rows, 15);
        assert_eq!(config.cabin.seat_blocks, vec![3, 3]);
        assert_eq!(config.boarding.method, BoardingMethod::Random);
        assert_eq!(config.passengers.bag_percent, dec!(0.5));
        assert_eq!(config.simulation.repetitions, 1);
        assert_eq!(config.logging.level, "info");
        assert!(config.scenario().is_ok());
        assert_eq!(config.limits(), RunLimits::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
cabin:
  rows: 30
  seat_blocks: [2, 3, 2]

boarding:
  method: "back-to-front WMA"
  groups: 4

passengers:
  bag_percent: 0.8
  speed_mix:
    slow: 0.2
    average: 0.5
    fast: 0.3

simulation:
  seed: 7
  repetitions: 50
  max_ticks: 5000
  record_history: true

output:
  history_path: "history.json"
  report_path: "report.json"

logging:
  level: "debug"
"#;
        let config: SimulationConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.cabin.rows, 30);
        assert_eq!(config.cabin.seat_blocks, vec![2, 3, 2]);
        assert_eq!(config.boarding.method, BoardingMethod::BackToFrontWma);
        assert_eq!(config.boarding.groups, 4);
        assert_eq!(config.passengers.bag_percent, dec!(0.8));
        assert_eq!(
            config.passengers.speed_mix,
            SpeedMix::new(dec!(0.2), dec!(0.5), dec!(0.3))
        );
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.repetitions, 50);
        assert!(config.simulation.record_history);
        assert_eq!(config.output.history_path, Some(PathBuf::from("history.json")));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.limits(), RunLimits::with_max_ticks(5000));

        let scenario = config.scenario().unwrap();
        assert_eq!(scenario.group_count, 4);
        assert_eq!(scenario.profile.bag_percent, dec!(0.8));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: SimulationConfig =
            serde_yml::from_str("boarding:\n  method: optimal\n").unwrap();
        assert_eq!(config.boarding.method, BoardingMethod::Optimal);
        assert_eq!(config.boarding.groups, 1);
        assert_eq!(config.cabin, CabinConfig::default());
        assert_eq!(config.simulation.seed, 42);
    }

    #[test]
    fn unknown_method_is_a_parse_error() {
        let result: Result<SimulationConfig, _> =
            serde_yml::from_str("boarding:\n  method: zone\n");
        assert!(result.is_err());
    }

    #[test]
    fn overrides_replace_yaml_values() {
        let mut config: SimulationConfig =
            serde_yml::from_str("boarding:\n  method: optimal\n").unwrap();
        config
            .apply_overrides(Some("9001"), Some("back-to-front WMA"))
            .unwrap();
        assert_eq!(config.simulation.seed, 9001);
        assert_eq!(config.boarding.method, BoardingMethod::BackToFrontWma);

        config.apply_overrides(None, None).unwrap();
        assert_eq!(config.simulation.seed, 9001);
    }

    #[test]
    fn unknown_method_override_rejected() {
        let mut config: SimulationConfig =
            serde_yml::from_str("boarding:\n  method: optimal\n").unwrap();
        let err = config.apply_overrides(None, Some("zone")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownMethod { ref source } if source.name == "zone"
        ));
        assert_eq!(config.boarding.method, BoardingMethod::Optimal);
    }

    #[test]
    fn non_numeric_seed_override_rejected() {
        let mut config = SimulationConfig::default();
        let err = config.apply_overrides(Some("seven"), Some("WMA")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeed { ref value, .. } if value == "seven"));
        assert_eq!(config.simulation.seed, 42);
        assert_eq!(config.boarding.method, BoardingMethod::Random);
    }

    #[test]
    fn invalid_scenario_rejected() {
        let config: SimulationConfig =
            serde_yml::from_str("cabin:\n  rows: 4\n  seat_blocks: [6]\n").unwrap();
        assert!(matches!(config.scenario(), Err(ConfigError::Scenario { .. })));

        let config: SimulationConfig =
            serde_yml::from_str("boarding:\n  groups: 0\n").unwrap();
        assert!(matches!(config.scenario(), Err(ConfigError::Scenario { .. })));

        let config: SimulationConfig =
            serde_yml::from_str("passengers:\n  bag_percent: 1.5\n").unwrap();
        assert!(matches!(config.scenario(), Err(ConfigError::Scenario { .. })));
    }
}
