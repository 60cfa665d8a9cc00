use anyhow::Result;
use tracing::trace;

use crate::circuit::Circuit;
use crate::error::{VqeError, VqeResult};
use crate::pauli::{PauliSum, PauliTerm};
use crate::qstate::QState;
use crate::Qbit;

pub trait ExpectationSimulator {
    /// One overlap per term, for the state `circuit` prepares from `|0...0>`.
    /// Coefficients are not applied.
    fn expectations(&self, circuit: &Circuit, terms: &[PauliTerm]) -> Result<Vec<Qbit>>;
}

/// Noiseless state-vector simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct WavefunctionSimulator;

impl WavefunctionSimulator {
    pub fn new() -> Self {
        Self
    }

    pub fn wavefunction(&self, circuit: &Circuit) -> Result<QState> {
        circuit.apply(&QState::zero_state(circuit.num_of_qbits()))
    }
}

impl ExpectationSimulator for WavefunctionSimulator {
    fn expectations(&self, circuit: &Circuit, terms: &[PauliTerm]) -> Result<Vec<Qbit>> {
        let state = self.wavefunction(circuit)?;

        terms
            .iter()
            .map(|term| {
                let op = term.operator(circuit.num_of_qbits())?;
                state.overlap(&op)
            })
            .collect()
    }
}

/// `Re Σ_k c_k <psi| P_k |psi>` for the state prepared by `circuit`.
pub fn expectation_value<S>(hamiltonian: &PauliSum, circuit: &Circuit, simulator: &S) -> VqeResult<f64>
where
    S: ExpectationSimulator + ?Sized,
{
    if hamiltonian.n_qubits() != circuit.num_of_qbits() {
        return Err(VqeError::RegisterMismatch {
            hamiltonian: hamiltonian.n_qubits(),
            circuit: circuit.num_of_qbits(),
        });
    }

    let overlaps = simulator.expectations(circuit, hamiltonian.terms())?;
    if overlaps.len() != hamiltonian.len() {
        return Err(VqeError::SimulationFailure(anyhow::anyhow!(
            "Simulator returned {} overlaps for {} terms",
            overlaps.len(),
            hamiltonian.len()
        )));
    }

    let expectation: Qbit = overlaps
        .iter()
        .zip(hamiltonian.terms())
        .map(|(overlap, term)| overlap * term.coefficient())
        .sum();

    trace!(re = expectation.re, im = expectation.im, "expectation");
    Ok(expectation.re)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::{
        assert_approx_complex_eq, assert_approx_eq, circuit::GateKind, pauli::Pauli,
    };

    struct BrokenSimulator;

    impl ExpectationSimulator for BrokenSimulator {
        fn expectations(&self, _circuit: &Circuit, _terms: &[PauliTerm]) -> Result<Vec<Qbit>> {
            Err(anyhow::anyhow!("backend offline"))
        }
    }

    struct ShortSimulator;

    impl ExpectationSimulator for ShortSimulator {
        fn expectations(&self, _circuit: &Circuit, _terms: &[PauliTerm]) -> Result<Vec<Qbit>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_overlaps_exclude_coefficients() -> Result<()> {
        let circuit = Circuit::new(1).gate_at(0, GateKind::X)?;
        let terms = [
            PauliTerm::real(3.0, [(0, Pauli::Z)]),
            PauliTerm::real(-2.0, []),
        ];
        let overlaps = WavefunctionSimulator::new().expectations(&circuit, &terms)?;

        assert_approx_complex_eq!(-1.0, 0.0, overlaps[0]);
        assert_approx_complex_eq!(1.0, 0.0, overlaps[1]);

        Ok(())
    }

    #[test]
    fn test_expectation_value_weights_terms() -> Result<()> {
        // RY(θ)|0>: <Z> = cos θ, <X> = sin θ
        let theta = PI / 3.0;
        let circuit = Circuit::new(1).gate_at(0, GateKind::RY(theta))?;
        let h = PauliSum::new(
            1,
            vec![
                PauliTerm::real(2.0, [(0, Pauli::Z)]),
                PauliTerm::real(0.5, [(0, Pauli::X)]),
                PauliTerm::real(1.0, []),
            ],
        )?;

        let e = expectation_value(&h, &circuit, &WavefunctionSimulator::new())?;
        assert_approx_eq!(2.0 * theta.cos() + 0.5 * theta.sin() + 1.0, e);

        Ok(())
    }

    #[test]
    fn test_register_mismatch() -> Result<()> {
        let h = PauliSum::new(2, vec![PauliTerm::real(1.0, [(0, Pauli::Z)])])?;
        let err = expectation_value(&h, &Circuit::new(1), &WavefunctionSimulator::new()).unwrap_err();
        assert!(matches!(
            err,
            VqeError::RegisterMismatch {
                hamiltonian: 2,
                circuit: 1
            }
        ));

        Ok(())
    }

    #[test]
    fn test_simulator_failures_propagate() -> Result<()> {
        let h = PauliSum::new(1, vec![PauliTerm::real(1.0, [(0, Pauli::Z)])])?;
        let circuit = Circuit::new(1);

        let err = expectation_value(&h, &circuit, &BrokenSimulator).unwrap_err();
        assert!(matches!(err, VqeError::SimulationFailure(_)));
        assert!(err.to_string().contains("backend offline"));

        let err = expectation_value(&h, &circuit, &ShortSimulator).unwrap_err();
        assert!(matches!(err, VqeError::SimulationFailure(_)));

        Ok(())
    }
}
