use nalgebra::{DMatrix, DVector, Matrix2};
use num_complex::Complex;

use crate::circuit::{Circuit, CustomGate, GateKind};
use crate::error::{VqeError, VqeResult};
use crate::gates::{cx_dense_matrix, h_dense_matrix, i_dense_matrix, x_dense_matrix};
use crate::Qbit;

pub trait Ansatz {
    /// Register width of the circuits this ansatz builds.
    fn num_qubits(&self) -> usize;

    /// Length of the parameter vector [`Ansatz::build`] expects.
    fn num_parameters(&self) -> usize;

    fn build(&self, params: &[f64]) -> VqeResult<Circuit>;
}

fn check_parameter_count(expected: usize, params: &[f64]) -> VqeResult<()> {
    if params.len() != expected {
        return Err(VqeError::InvalidParameterCount {
            expected,
            actual: params.len(),
        });
    }
    Ok(())
}

/// How rotation angles are assigned across repeated layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParameterSharing {
    /// Every layer reads the same `n_qubits` angles.
    #[default]
    SharedAcrossLayers,
    /// Each layer has its own `n_qubits` angles.
    PerLayer,
}

/// Where the CNOTs of each entangling layer go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entangler {
    /// One CNOT between a fixed pair, whatever the register width.
    FixedPair { control: usize, target: usize },
    /// `CNOT(q + 1, q)` for every neighbouring pair.
    Chain,
}

impl Default for Entangler {
    fn default() -> Self {
        Entangler::FixedPair {
            control: 1,
            target: 0,
        }
    }
}

/// `depth` repetitions of an entangling layer followed by `RY` on every qubit.
#[derive(Clone, Debug)]
pub struct EntanglingAnsatz {
    n_qubits: usize,
    depth: usize,
    sharing: ParameterSharing,
    entangler: Entangler,
}

impl EntanglingAnsatz {
    pub fn new(n_qubits: usize, depth: usize) -> VqeResult<Self> {
        if n_qubits < 2 {
            return Err(VqeError::InvalidQubitCount(n_qubits));
        }

        Ok(Self {
            n_qubits,
            depth,
            sharing: ParameterSharing::default(),
            entangler: Entangler::default(),
        })
    }

    #[must_use]
    pub fn with_sharing(mut self, sharing: ParameterSharing) -> Self {
        self.sharing = sharing;
        self
    }

    pub fn with_entangler(mut self, entangler: Entangler) -> VqeResult<Self> {
        if let Entangler::FixedPair { control, target } = entangler {
            if let Some(&qubit) = [control, target].iter().find(|&&q| q >= self.n_qubits) {
                return Err(VqeError::QubitOutOfRange {
                    qubit,
                    n_qubits: self.n_qubits,
                });
            }
        }

        self.entangler = entangler;
        Ok(self)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn sharing(&self) -> ParameterSharing {
        self.sharing
    }

    pub fn entangler(&self) -> Entangler {
        self.entangler
    }

    fn parameter_index(&self, layer: usize, qubit: usize) -> usize {
        match self.sharing {
            ParameterSharing::SharedAcrossLayers => qubit,
            ParameterSharing::PerLayer => layer * self.n_qubits + qubit,
        }
    }
}

impl Ansatz for EntanglingAnsatz {
    fn num_qubits(&self) -> usize {
        self.n_qubits
    }

    fn num_parameters(&self) -> usize {
        match self.sharing {
            ParameterSharing::SharedAcrossLayers => self.n_qubits,
            ParameterSharing::PerLayer => self.depth * self.n_qubits,
        }
    }

    fn build(&self, params: &[f64]) -> VqeResult<Circuit> {
        check_parameter_count(self.num_parameters(), params)?;

        let mut circuit = Circuit::new(self.n_qubits);
        for layer in 0..self.depth {
            match self.entangler {
                Entangler::FixedPair { control, target } => circuit.add_cnot(control, target)?,
                Entangler::Chain => {
                    for q in 0..self.n_qubits - 1 {
                        circuit.add_cnot(q + 1, q)?;
                    }
                }
            }

            for q in 0..self.n_qubits {
                let angle = params[self.parameter_index(layer, q)];
                circuit.add_gate_at(q, GateKind::RY(angle))?;
            }
        }

        Ok(circuit)
    }
}

pub const CUSTOM_GATE_NAME: &str = "new_gate";

/// One registered two-qubit gate `(I⊗X) · CX · D(θ/2) · (H⊗I)`, then qubit 0 is measured.
#[derive(Clone, Debug, Default)]
pub struct CustomGateAnsatz;

impl CustomGateAnsatz {
    pub fn new() -> Self {
        Self
    }

    pub fn gate_matrix(theta: f64) -> DMatrix<Qbit> {
        let t1 = dense(&i_dense_matrix()).kronecker(&dense(&x_dense_matrix()));
        let t2 = dense(&h_dense_matrix()).kronecker(&dense(&i_dense_matrix()));
        let cx = DMatrix::from_column_slice(4, 4, cx_dense_matrix().as_slice());

        let minus = Complex::from_polar(1.0, -theta / 2.0);
        let plus = Complex::from_polar(1.0, theta / 2.0);
        let phase = DMatrix::from_diagonal(&DVector::from_vec(vec![minus, minus, plus, plus]));

        t1 * cx * phase * t2
    }

    pub fn gate(theta: f64) -> VqeResult<CustomGate> {
        Ok(CustomGate::new(CUSTOM_GATE_NAME, Self::gate_matrix(theta))?)
    }
}

fn dense(m: &Matrix2<Qbit>) -> DMatrix<Qbit> {
    DMatrix::from_column_slice(2, 2, m.as_slice())
}

impl Ansatz for CustomGateAnsatz {
    fn num_qubits(&self) -> usize {
        2
    }

    fn num_parameters(&self) -> usize {
        1
    }

    fn build(&self, params: &[f64]) -> VqeResult<Circuit> {
        check_parameter_count(self.num_parameters(), params)?;

        let mut circuit = Circuit::new(2);
        circuit.add_custom_gate(&Self::gate(params[0])?)?;
        circuit.declare_bits(1);
        circuit.measure(0, 0)?;

        Ok(circuit)
    }
}

/// Wraps a closure as an ansatz.
pub struct FnAnsatz<F> {
    n_qubits: usize,
    n_params: usize,
    build: F,
}

impl<F> FnAnsatz<F>
where
    F: Fn(&[f64]) -> VqeResult<Circuit>,
{
    pub fn new(n_qubits: usize, n_params: usize, build: F) -> Self {
        Self {
            n_qubits,
            n_params,
            build,
        }
    }
}

impl<F> Ansatz for FnAnsatz<F>
where
    F: Fn(&[f64]) -> VqeResult<Circuit>,
{
    fn num_qubits(&self) -> usize {
        self.n_qubits
    }

    fn num_parameters(&self) -> usize {
        self.n_params
    }

    fn build(&self, params: &[f64]) -> VqeResult<Circuit> {
        check_parameter_count(self.n_params, params)?;
        (self.build)(params)
    }
}
