//! Headless engine binary for the aircraft boarding simulation.
//!
//! Loads a scenario from `boarding-config.yaml`, runs it once or as a batch
//! of seeded repetitions, logs a boarding summary, and optionally writes the
//! per-tick history and the repetition report as JSON.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `boarding-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing), `RUST_LOG` first
//! 3. Validate the scenario
//! 4. Run once, or run the repetitions in parallel
//! 5. Log the summary and export results

mod error;
mod summary;

use std::path::Path;

use boarding_core::config::SimulationConfig;
use boarding_core::run_repetitions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const CONFIG_PATH: &str = "boarding-config.yaml";

/// Application entry point for the boarding engine.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a run does not
/// converge, or a result file cannot be written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("boarding-engine starting");
    if !from_file {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }

    // 3. Validate the scenario.
    let scenario = config.scenario()?;
    let limits = config.limits();
    info!(
        rows = scenario.row_count,
        seat_blocks = ?scenario.seat_blocks,
        method = %scenario.method,
        groups = scenario.group_count,
        bag_percent = %scenario.profile.bag_percent,
        seed = config.simulation.seed,
        repetitions = config.simulation.repetitions,
        "Configuration loaded"
    );

    // 4-5. Run and report.
    if config.simulation.repetitions > 1 {
        let report = run_repetitions(
            &scenario,
            config.simulation.repetitions,
            config.simulation.seed,
            limits,
        )
        .map_err(EngineError::from)?;
        summary::log_repetitions(&report);

        if let Some(path) = &config.output.report_path {
            let json = report.to_json().map_err(EngineError::from)?;
            summary::write_file(path, &json)?;
            info!(path = %path.display(), "Repetition report written");
        }
    } else {
        let keep_history = config.simulation.record_history || config.output.history_path.is_some();
        let result = if keep_history {
            let (result, history) = scenario
                .run_once_with_history(config.simulation.seed, limits)
                .map_err(EngineError::from)?;
            if let Some(path) = &config.output.history_path {
                summary::write_json(path, &history, "tick history")?;
                info!(path = %path.display(), ticks = history.len(), "Tick history written");
            }
            result
        } else {
            scenario
                .run_once(config.simulation.seed, limits)
                .map_err(EngineError::from)?
        };
        summary::log_single_run(&scenario, &result);

        if let Some(path) = &config.output.report_path {
            summary::write_json(path, &result, "simulation result")?;
            info!(path = %path.display(), "Simulation result written");
        }
    }

    info!("boarding-engine finished");
    Ok(())
}

/// Load configuration from `boarding-config.yaml`, falling back to defaults
/// (with environment overrides) when the file does not exist.
///
/// Runs before logging is installed, so every problem is returned rather
/// than logged. The flag reports whether the file was found.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        let config = SimulationConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides()?;
        Ok((config, false))
    }
}
