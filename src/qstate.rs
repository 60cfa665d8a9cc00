use std::fmt::Display;

use anyhow::Result;
use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use num_complex::Complex;

use crate::Qbit;

/// State vector over `n` qubits. Qubit 0 is the least significant bit of the basis index.
#[derive(Clone, Debug)]
pub struct QState {
    pub(crate) state: DVector<Qbit>,
}

impl QState {
    pub fn new(state: &[Qbit]) -> Result<Self> {
        let len = state.len();
        if len == 0 || (len & (len - 1)) != 0 {
            return Err(anyhow::anyhow!(
                "State vector length must be a non-zero power of 2"
            ));
        }

        let state = DVector::from_row_slice(state);
        Ok(Self { state })
    }

    pub fn zero_state(num_of_qbits: usize) -> Self {
        let size = 2_usize.pow(num_of_qbits as u32);
        let mut state = DVector::zeros(size);
        state[0] = Complex::new(1.0, 0.0); // |0...0> state
        Self { state }
    }

    pub fn from_str(qbits: &str) -> Result<Self> {
        let index = usize::from_str_radix(qbits, 2)?;
        let mut state = DVector::zeros(2_usize.pow(qbits.len() as u32));
        state[index] = Complex::new(1.0, 0.0);

        Ok(Self { state })
    }

    pub fn num_of_qbits(&self) -> usize {
        self.state.len().ilog2() as usize
    }

    pub fn amplitudes(&self) -> &DVector<Qbit> {
        &self.state
    }

    /// Born probabilities of the computational basis states.
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.iter().map(|amp| amp.norm_sqr()).collect()
    }

    /// `<psi| op |psi>` for an operator spanning the whole register.
    pub fn overlap(&self, op: &CsrMatrix<Qbit>) -> Result<Qbit> {
        if op.nrows() != self.state.len() || op.ncols() != self.state.len() {
            return Err(anyhow::anyhow!(
                "Operator of shape {}x{} does not act on a state of length {}",
                op.nrows(),
                op.ncols(),
                self.state.len()
            ));
        }

        let op_state = op * self.state.clone();
        Ok(self.state.dotc(&op_state))
    }
}

impl Display for QState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bin_width = self.num_of_qbits();

        for (i, value) in self.state.iter().enumerate() {
            writeln!(f, "|{:0width$b}>: {}", i, value, width = bin_width)?;
        }

        Ok(())
    }
}

impl From<QState> for DVector<Qbit> {
    fn from(qstate: QState) -> Self {
        qstate.state
    }
}
