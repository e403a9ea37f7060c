//! Monte Carlo repetitions of one scenario.
//!
//! Repetition `i` seeds its own RNG with `base_seed + i` and builds a fresh
//! passenger set, so repetitions share no state and run in parallel on the
//! rayon pool. Results are collected in repetition order, which makes the
//! report identical from run to run for the same base seed.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::runner::{RunLimits, SimulationResult};
use crate::scenario::{Scenario, ScenarioError};

/// Error type for experiment operations.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// Zero repetitions were requested.
    #[error("at least one repetition is required")]
    NoRepetitions,

    /// The scenario is invalid.
    #[error("invalid scenario: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: ScenarioError,
    },

    /// One repetition failed.
    #[error("repetition {repetition} (seed {seed}) failed: {source}")]
    Repetition {
        /// Zero-based repetition number.
        repetition: u32,
        /// The seed it ran with.
        seed: u64,
        /// The underlying failure.
        source: ScenarioError,
    },

    /// Serialization of the report failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Summary statistics over the step counts of all repetitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepStatistics {
    /// Number of repetitions.
    pub count: usize,
    /// Mean step count.
    pub mean: f64,
    /// Population standard deviation of the step count.
    pub std_dev: f64,
    /// Fewest steps in any repetition.
    pub min: u64,
    /// Most steps in any repetition.
    pub max: u64,
}

impl StepStatistics {
    /// Summarize a non-empty list of step counts.
    pub fn from_steps(steps: &[u64]) -> Option<Self> {
        let min = steps.iter().min().copied()?;
        let max = steps.iter().max().copied()?;
        #[allow(clippy::cast_precision_loss)]
        let count = steps.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let values: Vec<f64> = steps.iter().map(|&s| s as f64).collect();

        let mean = values.iter().sum::<f64>() / count;
        let variance = values
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / count;

        Some(Self {
            count: steps.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

/// The outcome of a batch of repetitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionReport {
    /// Unique identifier for this batch (UUID v7, time-ordered).
    pub experiment_id: Uuid,
    /// When the batch finished.
    pub completed_at: DateTime<Utc>,
    /// The scenario every repetition ran.
    pub scenario: Scenario,
    /// Seed of repetition 0.
    pub base_seed: u64,
    /// Step count of each repetition, in repetition order.
    pub steps: Vec<u64>,
    /// Total evictions of each repetition, in repetition order.
    pub evictions: Vec<u64>,
    /// Summary of `steps`.
    pub statistics: StepStatistics,
}

impl RepetitionReport {
    /// Render the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, ExperimentError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExperimentError::Serialization(format!("repetition report: {e}")))
    }
}

/// Run `repetitions` independent seeded runs of a scenario in parallel.
///
/// # Errors
///
/// Returns [`ExperimentError::NoRepetitions`] for zero repetitions,
/// [`ExperimentError::Scenario`] if the scenario is invalid (checked once,
/// before any work starts), and [`ExperimentError::Repetition`] for the
/// lowest-numbered failing repetition.
pub fn run_repetitions(
    scenario: &Scenario,
    repetitions: u32,
    base_seed: u64,
    limits: RunLimits,
) -> Result<RepetitionReport, ExperimentError> {
    if repetitions == 0 {
        return Err(ExperimentError::NoRepetitions);
    }
    scenario.validate()?;

    info!(
        method = %scenario.method,
        repetitions,
        base_seed,
        "Repetitions starting"
    );

    let outcomes: Vec<Result<SimulationResult, ExperimentError>> = (0..repetitions)
        .into_par_iter()
        .map(|repetition| {
            let seed = base_seed.wrapping_add(u64::from(repetition));
            scenario
                .run_once(seed, limits)
                .map_err(|source| ExperimentError::Repetition {
                    repetition,
                    seed,
                    source,
                })
        })
        .collect();
    // Sequential, so the reported failure does not depend on thread timing.
    let results = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;

    let steps: Vec<u64> = results.iter().map(|r| r.steps).collect();
    let evictions: Vec<u64> = results.iter().map(|r| r.evictions).collect();
    let statistics = StepStatistics::from_steps(&steps).ok_or(ExperimentError::NoRepetitions)?;

    info!(
        method = %scenario.method,
        repetitions,
        mean = statistics.mean,
        std_dev = statistics.std_dev,
        min = statistics.min,
        max = statistics.max,
        "Repetitions complete"
    );

    Ok(RepetitionReport {
        experiment_id: Uuid::now_v7(),
        completed_at: Utc::now(),
        scenario: scenario.clone(),
        base_seed,
        steps,
        evictions,
        statistics,
    })
}
