//! Error types for gait-evo
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Error type for genome operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// Gene count is not a whole number of actuator triples
    #[error("Gene count {0} is not a multiple of {1} (genes per actuator)")]
    RaggedGenome(usize, usize),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Error type for optimizer failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptimizerError {
    /// Initial step size must be a positive, finite real
    #[error("Invalid sigma {0}: must be positive and finite")]
    InvalidSigma(f64),

    /// The search distribution needs at least one dimension
    #[error("Initial mean is empty")]
    EmptyMean,

    /// A reported batch did not cover the whole population
    #[error("Batch size mismatch: expected {expected} solutions, got {actual}")]
    BatchSize { expected: usize, actual: usize },

    /// A reported solution has the wrong dimension
    #[error("Solution dimension mismatch: expected {expected}, got {actual}")]
    SolutionDimension { expected: usize, actual: usize },

    /// A reported fitness was NaN
    #[error("Fitness for solution {0} is not a number")]
    NanFitness(usize),
}

/// Error type for simulation failures
#[derive(Debug, Error)]
pub enum SimError {
    /// IO error while writing simulation artifacts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Video capture could not be encoded
    #[error("Capture error: {0}")]
    Capture(String),

    /// Candidate does not match the simulated robot
    #[error("Candidate has {actual} actuators, robot has {expected}")]
    ActuatorMismatch { expected: usize, actual: usize },
}

/// Top-level error type for a driver run
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Optimizer error
    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    /// Simulation error
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimError),

    /// IO error on the generation log
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error on the generation log
    #[error("Log error: {0}")]
    Log(#[from] csv::Error),
}

/// Result type alias for driver operations
pub type EvoResult<T> = Result<T, EvolutionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_error_display() {
        let err = OptimizerError::InvalidSigma(-2.0);
        assert_eq!(
            err.to_string(),
            "Invalid sigma -2: must be positive and finite"
        );

        let err = OptimizerError::BatchSize {
            expected: 8,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Batch size mismatch: expected 8 solutions, got 3"
        );
    }

    #[test]
    fn test_genome_error_display() {
        let err = GenomeError::RaggedGenome(7, 3);
        assert_eq!(
            err.to_string(),
            "Gene count 7 is not a multiple of 3 (genes per actuator)"
        );
    }

    #[test]
    fn test_evolution_error_from_optimizer_error() {
        let opt_err = OptimizerError::EmptyMean;
        let evo_err: EvolutionError = opt_err.into();
        assert!(matches!(evo_err, EvolutionError::Optimizer(_)));
    }

    #[test]
    fn test_evolution_error_from_sim_error() {
        let sim_err = SimError::Capture("bad frame".to_string());
        let evo_err: EvolutionError = sim_err.into();
        assert!(matches!(evo_err, EvolutionError::Simulation(_)));
    }
}
