//! Boarding summaries and result export.

use std::path::Path;

use boarding_core::{RepetitionReport, Scenario, SimulationResult};
use serde::Serialize;
use tracing::info;

use crate::error::EngineError;

/// Log the parameters and step count of a single run.
pub fn log_single_run(scenario: &Scenario, result: &SimulationResult) {
    let mix = &scenario.profile.speed_mix;
    info!(
        rows = scenario.row_count,
        abreast = ?scenario.seat_blocks,
        method = %scenario.method,
        bag_percent = %scenario.profile.bag_percent,
        slow = %mix.slow,
        average = %mix.average,
        fast = %mix.fast,
        groups = scenario.group_count,
        steps = result.steps,
        evictions = result.evictions,
        passengers = result.passengers,
        "Boarding summary"
    );
}

/// Log the statistics of a batch of repetitions.
pub fn log_repetitions(report: &RepetitionReport) {
    let stats = &report.statistics;
    info!(
        experiment_id = %report.experiment_id,
        method = %report.scenario.method,
        repetitions = stats.count,
        mean = stats.mean,
        std_dev = stats.std_dev,
        min = stats.min,
        max = stats.max,
        "Repetition summary"
    );
}

/// Serialize `value` as pretty JSON and write it to `path`.
pub fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    what: &'static str,
) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| EngineError::Encode { what, source })?;
    write_file(path, &json)
}

/// Write `contents` to `path`.
pub fn write_file(path: &Path, contents: &str) -> Result<(), EngineError> {
    std::fs::write(path, contents).map_err(|source| EngineError::Write {
        path: path.to_path_buf(),
        source,
    })
}
