//! Simulation loop runner with a convergence guard.
//!
//! This module provides [`run_to_completion`] and [`run_with_history`],
//! which repeat [`run_tick`] until every passenger is seated. The runner
//! adds the control plane around the single tick:
//!
//! - **Tick cap**: stop with [`RunnerError::NotConverged`] once the cap is
//!   reached, either a configured limit or one derived from the cabin.
//! - **Stall detection**: a tick in which nobody moved, stowed, or sat while
//!   passengers are still standing can never be followed by progress, so it
//!   ends the run immediately.
//! - **Observers**: a [`TickObserver`] sees every completed tick, which is
//!   how the per-tick history is recorded.

use boarding_cabin::Cabin;
use boarding_passengers::Manifest;
use boarding_types::{MAX_STOW_TICKS, TickSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::tick::{TickError, TickSummary, run_tick};

/// Errors that can occur during a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// The run stalled or hit the tick cap with passengers still standing.
    #[error("boarding did not converge: {unseated} passengers unseated after tick {tick}")]
    NotConverged {
        /// The last tick executed.
        tick: u64,
        /// Passengers not yet seated.
        unseated: usize,
    },

    /// The tick counter overflowed.
    #[error("tick counter overflow")]
    TickOverflow,
}

/// Bounds on a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLimits {
    /// Hard tick cap. `None` derives one from the cabin and passenger count.
    pub max_ticks: Option<u64>,
}

impl RunLimits {
    /// Limits with an explicit tick cap.
    pub const fn with_max_ticks(max_ticks: u64) -> Self {
        Self {
            max_ticks: Some(max_ticks),
        }
    }

    /// The tick cap that applies to this manifest.
    pub fn tick_cap(&self, manifest: &Manifest) -> u64 {
        self.max_ticks
            .unwrap_or_else(|| default_tick_cap(manifest.cabin(), manifest.len()))
    }
}

/// Derived tick cap:
/// `passengers × (row_count + seats_per_row + MAX_STOW_TICKS + 2)`.
pub fn default_tick_cap(cabin: &Cabin, passengers: usize) -> u64 {
    let seats_per_row = u64::try_from(cabin.seats_per_row()).unwrap_or(u64::MAX);
    let per_passenger = u64::from(cabin.row_count())
        .saturating_add(seats_per_row)
        .saturating_add(u64::from(MAX_STOW_TICKS))
        .saturating_add(2);
    u64::try_from(passengers)
        .unwrap_or(u64::MAX)
        .saturating_mul(per_passenger)
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Ticks needed to seat every passenger.
    pub steps: u64,
    /// Evictions over the whole run.
    pub evictions: u64,
    /// Passengers boarded.
    pub passengers: usize,
}

/// Callback invoked after each tick completes.
pub trait TickObserver {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, manifest: &Manifest);
}

/// A no-op observer.
pub struct NoOpObserver;

impl TickObserver for NoOpObserver {
    fn on_tick(&mut self, _summary: &TickSummary, _manifest: &Manifest) {}
}

/// Records a snapshot of every passenger after each tick.
#[derive(Debug, Default)]
pub struct HistoryRecorder {
    /// Snapshots in tick order.
    pub snapshots: Vec<TickSnapshot>,
}

impl TickObserver for HistoryRecorder {
    fn on_tick(&mut self, summary: &TickSummary, manifest: &Manifest) {
        self.snapshots.push(manifest.snapshot(summary.tick));
    }
}

/// Run ticks until every passenger is seated, reporting each tick.
///
/// # Errors
///
/// Returns [`RunnerError::NotConverged`] on a stall or when the tick cap is
/// reached, and [`RunnerError::Tick`] if a tick fails.
pub fn run_observed(
    manifest: &mut Manifest,
    limits: RunLimits,
    observer: &mut dyn TickObserver,
) -> Result<SimulationResult, RunnerError> {
    let cap = limits.tick_cap(manifest);
    let mut tick: u64 = 0;
    let mut evictions: u64 = 0;

    while !manifest.all_seated() {
        if tick >= cap {
            let unseated = manifest.unseated_count();
            warn!(tick, cap, unseated, "Tick cap reached before boarding finished");
            return Err(RunnerError::NotConverged { tick, unseated });
        }
        tick = tick.checked_add(1).ok_or(RunnerError::TickOverflow)?;

        let summary = run_tick(manifest, tick)?;
        evictions = evictions.saturating_add(u64::from(summary.evictions));
        observer.on_tick(&summary, manifest);

        if !summary.made_progress() && !manifest.all_seated() {
            let unseated = manifest.unseated_count();
            warn!(tick, unseated, blocked = summary.blocked, "Boarding stalled");
            return Err(RunnerError::NotConverged { tick, unseated });
        }
    }

    info!(steps = tick, evictions, passengers = manifest.len(), "Boarding complete");

    Ok(SimulationResult {
        steps: tick,
        evictions,
        passengers: manifest.len(),
    })
}

/// Run ticks until every passenger is seated.
///
/// # Errors
///
/// See [`run_observed`].
pub fn run_to_completion(
    manifest: &mut Manifest,
    limits: RunLimits,
) -> Result<SimulationResult, RunnerError> {
    run_observed(manifest, limits, &mut NoOpObserver)
}

/// Run to completion, keeping a snapshot of every passenger after each
/// tick. Snapshot `k` (0-based) holds the state after tick `k + 1`.
///
/// # Errors
///
/// See [`run_observed`].
pub fn run_with_history(
    manifest: &mut Manifest,
    limits: RunLimits,
) -> Result<(SimulationResult, Vec<TickSnapshot>), RunnerError> {
    let mut recorder = HistoryRecorder::default();
    let result = run_observed(manifest, limits, &mut recorder)?;
    Ok((result, recorder.snapshots))
}
