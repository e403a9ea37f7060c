//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the run itself, and result export.

use std::path::PathBuf;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: boarding_core::config::ConfigError,
    },

    /// A single run failed.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: boarding_core::ScenarioError,
    },

    /// A batch of repetitions failed.
    #[error("experiment error: {source}")]
    Experiment {
        /// The underlying experiment error.
        #[from]
        source: boarding_core::ExperimentError,
    },

    /// Results could not be encoded as JSON.
    #[error("failed to encode {what}: {source}")]
    Encode {
        /// What was being encoded.
        what: &'static str,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// A result file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The destination file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
