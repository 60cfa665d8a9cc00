use std::fmt::Display;

use nalgebra::{DMatrix, Matrix2, SymmetricEigen};
use nalgebra_sparse::convert::serial::{convert_csr_dense, convert_dense_coo};
use nalgebra_sparse::CsrMatrix;

use crate::circuit::kronecker_product;
use crate::error::{VqeError, VqeResult};
use crate::gates::{i_dense_matrix, x_dense_matrix, y_dense_matrix, z_dense_matrix};
use crate::Qbit;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    pub fn matrix(&self) -> Matrix2<Qbit> {
        match self {
            Pauli::I => i_dense_matrix(),
            Pauli::X => x_dense_matrix(),
            Pauli::Y => y_dense_matrix(),
            Pauli::Z => z_dense_matrix(),
        }
    }

    pub fn label(&self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

impl Display for Pauli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// `coefficient · Π (pauli on qubit)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PauliTerm {
    coefficient: Qbit,
    ops: Vec<(usize, Pauli)>,
}

impl PauliTerm {
    pub fn new(coefficient: Qbit, ops: impl IntoIterator<Item = (usize, Pauli)>) -> Self {
        Self {
            coefficient,
            ops: ops.into_iter().collect(),
        }
    }

    /// Real-coefficient shorthand.
    pub fn real(coefficient: f64, ops: impl IntoIterator<Item = (usize, Pauli)>) -> Self {
        Self::new(Qbit::new(coefficient, 0.0), ops)
    }

    pub fn coefficient(&self) -> Qbit {
        self.coefficient
    }

    pub fn ops(&self) -> &[(usize, Pauli)] {
        &self.ops
    }

    /// Highest qubit the term mentions, `None` for a bare scalar.
    pub fn max_qubit(&self) -> Option<usize> {
        self.ops.iter().map(|(q, _)| *q).max()
    }

    /// Matrix of the Pauli product on an `n_qubits` register, without the coefficient.
    ///
    /// Factors that share a qubit are multiplied in list order.
    pub fn operator(&self, n_qubits: usize) -> VqeResult<CsrMatrix<Qbit>> {
        let mut factors = vec![Matrix2::<Qbit>::identity(); n_qubits];
        for &(qubit, pauli) in &self.ops {
            let factor = factors
                .get_mut(qubit)
                .ok_or(VqeError::QubitOutOfRange { qubit, n_qubits })?;
            *factor *= pauli.matrix();
        }

        let mut op = CsrMatrix::identity(1);
        for factor in factors.iter().rev() {
            op = kronecker_product(&op, &CsrMatrix::from(&convert_dense_coo(factor)));
        }

        Ok(op)
    }
}

impl Display for PauliTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.coefficient)?;
        if self.ops.is_empty() {
            return write!(f, "*I");
        }
        for (qubit, pauli) in &self.ops {
            write!(f, "*{}{}", pauli, qubit)?;
        }
        Ok(())
    }
}

/// A weighted sum of Pauli terms on a register of `n_qubits`.
#[derive(Clone, Debug, PartialEq)]
pub struct PauliSum {
    n_qubits: usize,
    terms: Vec<PauliTerm>,
}

impl PauliSum {
    pub fn new(n_qubits: usize, terms: Vec<PauliTerm>) -> VqeResult<Self> {
        if n_qubits == 0 {
            return Err(VqeError::InvalidQubitCount(n_qubits));
        }

        if let Some(qubit) = terms
            .iter()
            .filter_map(PauliTerm::max_qubit)
            .find(|&q| q >= n_qubits)
        {
            return Err(VqeError::QubitOutOfRange { qubit, n_qubits });
        }

        Ok(Self { n_qubits, terms })
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Dense `2^n x 2^n` matrix of the whole sum.
    pub fn matrix(&self) -> VqeResult<DMatrix<Qbit>> {
        let dim = 1 << self.n_qubits;
        let mut total = DMatrix::zeros(dim, dim);
        for term in &self.terms {
            total += convert_csr_dense(&term.operator(self.n_qubits)?) * term.coefficient;
        }
        Ok(total)
    }

    /// Smallest eigenvalue, assuming the sum is Hermitian.
    pub fn ground_state_energy(&self) -> VqeResult<f64> {
        let eigen = SymmetricEigen::new(self.matrix()?);
        Ok(eigen
            .eigenvalues
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min))
    }
}

impl Display for PauliSum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terms = self
            .terms
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" + ");
        write!(f, "{}", terms)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;
    use crate::{assert_approx_complex_eq, assert_approx_eq, qstate::QState, Circuit};

    fn heisenberg() -> Result<PauliSum> {
        Ok(PauliSum::new(
            2,
            vec![
                PauliTerm::real(0.5, [(1, Pauli::X), (0, Pauli::X)]),
                PauliTerm::real(0.5, [(1, Pauli::Y), (0, Pauli::Y)]),
                PauliTerm::real(0.5, [(1, Pauli::Z), (0, Pauli::Z)]),
                PauliTerm::real(-0.5, [(1, Pauli::I), (0, Pauli::I)]),
            ],
        )?)
    }

    #[test]
    fn test_1qbit_z_operator() -> Result<()> {
        let term = PauliTerm::real(1.0, [(0, Pauli::Z)]);
        let op = term.operator(1)?;

        let q0 = QState::from_str("0")?;
        assert_approx_complex_eq!(1.0, 0.0, q0.overlap(&op)?);

        let q1 = Circuit::new(1).H(0)?.apply(&q0)?;
        assert_approx_complex_eq!(0.0, 0.0, q1.overlap(&op)?);

        Ok(())
    }

    #[test]
    fn test_2qbit_xz_operator() -> Result<()> {
        let term = PauliTerm::real(1.0, [(0, Pauli::X), (1, Pauli::Z)]);
        let op = term.operator(2)?;

        let q00 = QState::from_str("00")?;
        assert_approx_complex_eq!(0.0, 0.0, q00.overlap(&op)?);

        let q1 = Circuit::new(2).H(0)?.apply(&q00)?;
        assert_approx_complex_eq!(1.0, 0.0, q1.overlap(&op)?);

        Ok(())
    }

    #[test]
    fn test_repeated_qubit_multiplies_factors() -> Result<()> {
        // X·Y = iZ
        let term = PauliTerm::real(1.0, [(0, Pauli::X), (0, Pauli::Y)]);
        let op = convert_csr_dense(&term.operator(1)?);
        assert_approx_complex_eq!(0.0, 1.0, op[(0, 0)]);
        assert_approx_complex_eq!(0.0, -1.0, op[(1, 1)]);

        Ok(())
    }

    #[test]
    fn test_rejects_out_of_range_qubit() {
        let err = PauliSum::new(2, vec![PauliTerm::real(1.0, [(2, Pauli::Z)])]).unwrap_err();
        assert!(matches!(
            err,
            VqeError::QubitOutOfRange {
                qubit: 2,
                n_qubits: 2
            }
        ));
        assert!(matches!(
            PauliSum::new(0, vec![]),
            Err(VqeError::InvalidQubitCount(0))
        ));
    }

    #[test]
    fn test_heisenberg_spectrum() -> Result<()> {
        let h = heisenberg()?;
        let m = h.matrix()?;

        assert_approx_complex_eq!(0.0, 0.0, m[(0, 0)]);
        assert_approx_complex_eq!(-1.0, 0.0, m[(1, 1)]);
        assert_approx_complex_eq!(1.0, 0.0, m[(1, 2)]);
        assert_approx_eq!(-2.0, h.ground_state_energy()?);

        Ok(())
    }

    #[test]
    fn test_display() {
        let term = PauliTerm::real(0.5, [(1, Pauli::X), (0, Pauli::X)]);
        assert_eq!("0.5+0i*X1*X0", term.to_string());
    }
}
