//! Boarding order generation, the tick driver, and experiment orchestration
//! for the aircraft boarding simulation.
//!
//! This crate turns a cabin and a boarding policy into a complete run:
//! it orders the seats, ticks the passenger state machine until everyone
//! is seated, and repeats whole runs in parallel for Monte Carlo estimates.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `boarding-config.yaml` into
//!   strongly-typed structs.
//! - [`experiment`] -- Parallel seeded repetitions and step statistics
//!   ([`RepetitionReport`]).
//! - [`order`] -- The seven boarding policies ([`generate_order`]).
//! - [`runner`] -- Run to completion, with or without per-tick history, and
//!   the convergence guard.
//! - [`scenario`] -- One fully-specified boarding setup ([`Scenario`]).
//! - [`tick`] -- One synchronous pass over every passenger.
//!
//! [`RepetitionReport`]: experiment::RepetitionReport
//! [`generate_order`]: order::generate_order
//! [`Scenario`]: scenario::Scenario

pub mod config;
pub mod experiment;
pub mod order;
pub mod runner;
pub mod scenario;
pub mod tick;

pub use experiment::{ExperimentError, RepetitionReport, StepStatistics, run_repetitions};
pub use order::{OrderError, generate_board_order, generate_order};
pub use runner::{
    HistoryRecorder, NoOpObserver, RunLimits, RunnerError, SimulationResult, TickObserver,
    default_tick_cap, run_observed, run_to_completion, run_with_history,
};
pub use scenario::{Scenario, ScenarioError};
pub use tick::{TickError, TickSummary, run_tick};
