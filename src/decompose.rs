//! Pauli decomposition: the coefficient of a product `B` is `Tr(B† H) / 2^n`.

use std::fmt::Display;

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::{VqeError, VqeResult};
use crate::pauli::{Pauli, PauliSum, PauliTerm};
use crate::Qbit;

/// Coefficients whose modulus is at or below this are treated as zero.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// One non-vanishing term of a decomposition. `paulis[0]` acts on the most significant qubit.
#[derive(Clone, Debug, PartialEq)]
pub struct PauliComponent {
    paulis: Vec<Pauli>,
    coefficient: Qbit,
}

impl PauliComponent {
    pub fn paulis(&self) -> &[Pauli] {
        &self.paulis
    }

    pub fn coefficient(&self) -> Qbit {
        self.coefficient
    }

    /// Tensor label such as `X⊗Y`.
    pub fn label(&self) -> String {
        self.paulis
            .iter()
            .map(|p| p.label().to_string())
            .collect::<Vec<_>>()
            .join("⊗")
    }

    /// The same term addressed by qubit index, identities dropped.
    pub fn to_term(&self) -> PauliTerm {
        let n = self.paulis.len();
        let ops = self
            .paulis
            .iter()
            .enumerate()
            .filter(|(_, p)| **p != Pauli::I)
            .map(|(pos, p)| (n - 1 - pos, *p));
        PauliTerm::new(self.coefficient, ops)
    }
}

impl Display for PauliComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t*\t( {} )", self.coefficient, self.label())
    }
}

#[derive(Clone, Debug)]
pub struct PauliDecomposer {
    n_qubits: usize,
    tolerance: f64,
}

impl PauliDecomposer {
    pub fn new(n_qubits: usize) -> VqeResult<Self> {
        check_qubit_count(n_qubits)?;

        Ok(Self {
            n_qubits,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn dim(&self) -> usize {
        1 << self.n_qubits
    }

    /// Projects `h` onto every Pauli product, in `I, X, Y, Z` lexicographic order.
    pub fn decompose(&self, h: &DMatrix<Qbit>) -> VqeResult<Vec<PauliComponent>> {
        let dim = self.dim();
        if h.nrows() != dim || h.ncols() != dim {
            return Err(VqeError::DimensionMismatch {
                expected: dim,
                rows: h.nrows(),
                cols: h.ncols(),
            });
        }

        let norm = dim as f64;
        let mut components = Vec::new();
        for paulis in pauli_products(self.n_qubits) {
            let basis = basis_operator(&paulis);
            let coefficient = hilbert_schmidt(&basis, h) / norm;

            if coefficient.norm() > self.tolerance {
                components.push(PauliComponent {
                    paulis,
                    coefficient,
                });
            }
        }

        debug!(
            n_qubits = self.n_qubits,
            terms = components.len(),
            "decomposed operator"
        );
        Ok(components)
    }
}

/// Decomposes a 4x4 (two-qubit) matrix.
pub fn decompose(h: &DMatrix<Qbit>) -> VqeResult<Vec<PauliComponent>> {
    PauliDecomposer::new(2)?.decompose(h)
}

/// `Tr(a† b)`.
pub fn hilbert_schmidt(a: &DMatrix<Qbit>, b: &DMatrix<Qbit>) -> Qbit {
    (a.adjoint() * b).trace()
}

/// Kronecker product of the given Paulis, leftmost factor most significant.
pub fn basis_operator(paulis: &[Pauli]) -> DMatrix<Qbit> {
    paulis.iter().fold(DMatrix::identity(1, 1), |acc, p| {
        let m = p.matrix();
        acc.kronecker(&DMatrix::from_column_slice(2, 2, m.as_slice()))
    })
}

/// Rebuilds `Σ a · B` from a decomposition.
pub fn reconstruct(components: &[PauliComponent], n_qubits: usize) -> VqeResult<DMatrix<Qbit>> {
    check_qubit_count(n_qubits)?;
    let dim = 1 << n_qubits;
    let mut total = DMatrix::zeros(dim, dim);
    for component in components {
        if component.paulis.len() != n_qubits {
            let side = u32::try_from(component.paulis.len())
                .ok()
                .and_then(|len| 1_usize.checked_shl(len))
                .unwrap_or(usize::MAX);
            return Err(VqeError::DimensionMismatch {
                expected: dim,
                rows: side,
                cols: side,
            });
        }
        total += basis_operator(&component.paulis) * component.coefficient;
    }
    Ok(total)
}

/// Turns a decomposition into a Hamiltonian over `n_qubits`.
pub fn components_to_pauli_sum(
    components: &[PauliComponent],
    n_qubits: usize,
) -> VqeResult<PauliSum> {
    PauliSum::new(
        n_qubits,
        components.iter().map(PauliComponent::to_term).collect(),
    )
}

/// `4^n` Pauli products must be countable in `usize`.
fn check_qubit_count(n_qubits: usize) -> VqeResult<()> {
    if n_qubits == 0 || n_qubits >= (usize::BITS / 2) as usize {
        return Err(VqeError::InvalidQubitCount(n_qubits));
    }
    Ok(())
}

fn pauli_products(n_qubits: usize) -> impl Iterator<Item = Vec<Pauli>> {
    (0..4_usize.pow(n_qubits as u32)).map(move |index| {
        (0..n_qubits)
            .rev()
            .map(|digit| Pauli::ALL[(index / 4_usize.pow(digit as u32)) % 4])
            .collect()
    })
}
