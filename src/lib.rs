//! Small variational quantum eigensolver toolkit.
//!
//! Two independent utilities sit on top of a tiny state-vector simulator:
//!
//! - [`decompose()`] writes a two-qubit operator as `Σ a_ij (σ_i ⊗ σ_j)`.
//! - [`sweep()`] evaluates `<psi(θ)| H |psi(θ)>` over a grid of ansatz
//!   parameters and reports the lowest energy found. [`refine()`] can polish
//!   that point and [`estimate_expectation()`] gives the shot-based estimate.

pub mod ansatz;
pub mod circuit;
pub mod decompose;
pub mod error;
pub mod expectation;
pub mod gates;
pub mod pauli;
pub mod plot;
pub mod qstate;
pub mod refine;
pub mod sampling;
pub mod sweep;
mod test_util;

use num_complex::Complex;

pub type Qbit = Complex<f64>;

pub use ansatz::{Ansatz, CustomGateAnsatz, Entangler, EntanglingAnsatz, FnAnsatz, ParameterSharing};
pub use circuit::{Circuit, CustomGate, GateKind};
pub use decompose::{decompose, PauliComponent, PauliDecomposer};
pub use error::{VqeError, VqeResult};
pub use expectation::{expectation_value, ExpectationSimulator, WavefunctionSimulator};
pub use pauli::{Pauli, PauliSum, PauliTerm};
pub use qstate::QState;
pub use refine::{refine, RefineConfig, Refinement};
pub use sampling::{estimate_expectation, SamplingExecutor, ShotSampler};
pub use sweep::{sweep, AngleGrid, SweepOutcome};
