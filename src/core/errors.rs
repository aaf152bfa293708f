/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * The simulation core itself never fails: empty input and bad quanta are
 * defined edge cases. These errors belong to the collaborators around it
 * (configuration loading, process files, orchestration).
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for collaborator operations
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Simulation errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimulationError {
    #[error("I/O error: {0}")]
    #[diagnostic(
        code(simulation::io_error),
        help("Check that the file exists and that its permissions allow the operation.")
    )]
    Io(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(simulation::configuration_error),
        help("Review the scheduler configuration values and their types.")
    )]
    Configuration(String),

    #[error("Invalid process: {0}")]
    #[diagnostic(
        code(simulation::invalid_process),
        help("Processes need a unique PID and a burst time of at least one tick.")
    )]
    InvalidProcess(String),

    #[error("Unknown algorithm '{0}'")]
    #[diagnostic(
        code(simulation::unknown_algorithm),
        help("Valid: rr, priority, priority_np, mlq, mlfq.")
    )]
    UnknownAlgorithm(String),

    #[error("No processes to simulate")]
    #[diagnostic(
        code(simulation::no_processes),
        help("Load a process file or generate a workload before running.")
    )]
    NoProcesses,

    #[error("Serialization error: {0}")]
    #[diagnostic(code(simulation::serialization_error))]
    Serialization(String),
}

impl From<std::io::Error> for SimulationError {
    fn from(err: std::io::Error) -> Self {
        SimulationError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(err: serde_json::Error) -> Self {
        SimulationError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.txt");
        let err: SimulationError = io.into();
        assert!(matches!(err, SimulationError::Io(ref msg) if msg.contains("missing.txt")));
    }

    #[test]
    fn test_error_serialization() {
        let err = SimulationError::UnknownAlgorithm("fifo".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("unknown_algorithm"));

        let back: SimulationError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
