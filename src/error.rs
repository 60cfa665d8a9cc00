//! Error types for decomposition, ansatz construction and expectation sweeps.

use thiserror::Error;

/// Errors produced by the VQE utilities.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// The matrix handed to the decomposer is not `2^n x 2^n` for the configured `n`.
    #[error("expected a {expected}x{expected} matrix, got {rows}x{cols}")]
    DimensionMismatch {
        /// Required side length.
        expected: usize,
        /// Rows of the offending matrix.
        rows: usize,
        /// Columns of the offending matrix.
        cols: usize,
    },

    /// An ansatz received a parameter vector of the wrong length.
    #[error("ansatz takes {expected} parameters, got {actual}")]
    InvalidParameterCount {
        /// Number of free parameters of the ansatz.
        expected: usize,
        /// Length of the supplied parameter vector.
        actual: usize,
    },

    /// Failure reported by a simulation or execution collaborator, passed through as is.
    #[error("simulation failed: {0}")]
    SimulationFailure(#[from] anyhow::Error),

    /// A Pauli term or gate addresses a qubit outside the register.
    #[error("qubit {qubit} is out of range for a {n_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Register width.
        n_qubits: usize,
    },

    /// The Hamiltonian and the prepared circuit act on registers of different widths.
    #[error("hamiltonian acts on {hamiltonian} qubits but the circuit has {circuit}")]
    RegisterMismatch {
        /// Register width of the Hamiltonian.
        hamiltonian: usize,
        /// Register width of the circuit.
        circuit: usize,
    },

    /// A register must hold at least one qubit and stay small enough to index.
    #[error("unsupported register width of {0} qubits")]
    InvalidQubitCount(usize),

    /// The angle grid has no points.
    #[error("angle grid is empty")]
    EmptyGrid,

    /// `points^parameters` grid evaluations do not fit in `usize`.
    #[error("a {points}-point grid over {parameters} parameters is too large to sweep")]
    GridTooLarge {
        /// Points per parameter axis.
        points: usize,
        /// Number of ansatz parameters.
        parameters: usize,
    },

    /// Sampling needs at least one shot.
    #[error("shot count must be at least 1, got {0}")]
    InvalidShotCount(usize),

    /// The circuit measures nothing into its classical register.
    #[error("circuit has no measured classical bit")]
    NoMeasurement,
}

/// Result type for the VQE utilities.
pub type VqeResult<T> = Result<T, VqeError>;
