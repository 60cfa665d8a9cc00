//! Shot-based execution and the frequency estimator built on it.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::weighted::WeightedAliasIndex;
use rand_distr::Distribution;
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::{VqeError, VqeResult};
use crate::qstate::QState;

pub const DEFAULT_SHOTS: usize = 10_000;

pub trait SamplingExecutor {
    /// Runs `circuit` `shots` times and returns the classical register of every run.
    fn run(&mut self, circuit: &Circuit, shots: usize) -> Result<Vec<Vec<u8>>>;
}

/// Draws computational-basis outcomes from the Born distribution of the final state.
///
/// All measurements are taken at the end of the circuit.
pub struct ShotSampler<R> {
    rng: R,
}

impl ShotSampler<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ShotSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SamplingExecutor for ShotSampler<R> {
    fn run(&mut self, circuit: &Circuit, shots: usize) -> Result<Vec<Vec<u8>>> {
        let state = circuit.apply(&QState::zero_state(circuit.num_of_qbits()))?;
        let outcomes = WeightedAliasIndex::new(state.probabilities())
            .map_err(|e| anyhow::anyhow!("Invalid outcome distribution: {}", e))?;
        let measurements = circuit.measurements();

        let runs = (0..shots)
            .map(|_| {
                let basis = outcomes.sample(&mut self.rng);
                let mut bits = vec![0u8; circuit.num_of_bits()];
                for &(qbit, bit) in &measurements {
                    bits[bit] = ((basis >> qbit) & 1) as u8;
                }
                bits
            })
            .collect();

        Ok(runs)
    }
}

/// `freq(0) - freq(1)` of classical bit 0 over `shots` runs.
///
/// Converges to `<Z>` of the measured qubit with variance `(1 - E^2) / shots`.
pub fn estimate_expectation<E>(executor: &mut E, circuit: &Circuit, shots: usize) -> VqeResult<f64>
where
    E: SamplingExecutor + ?Sized,
{
    if shots == 0 {
        return Err(VqeError::InvalidShotCount(shots));
    }
    if !circuit.measurements().iter().any(|&(_, bit)| bit == 0) {
        return Err(VqeError::NoMeasurement);
    }

    let runs = executor.run(circuit, shots)?;
    if runs.len() != shots {
        return Err(VqeError::SimulationFailure(anyhow::anyhow!(
            "Executor returned {} runs for {} shots",
            runs.len(),
            shots
        )));
    }

    let mut zeros = 0_usize;
    let mut ones = 0_usize;
    for run in &runs {
        match run.first().copied() {
            Some(0) => zeros += 1,
            Some(1) => ones += 1,
            other => {
                return Err(VqeError::SimulationFailure(anyhow::anyhow!(
                    "Unexpected readout {:?}",
                    other
                )))
            }
        }
    }

    let freq_is_0 = zeros as f64 / shots as f64;
    let freq_is_1 = ones as f64 / shots as f64;
    debug!(shots, zeros, ones, "sampled expectation");

    Ok(freq_is_0 - freq_is_1)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::{ansatz::Ansatz, assert_approx_eq, circuit::GateKind, CustomGateAnsatz};

    fn measured(mut circuit: Circuit, qbit: usize) -> Result<Circuit> {
        circuit.declare_bits(1);
        circuit.measure(qbit, 0)?;
        Ok(circuit)
    }

    fn three_sigma(expected: f64, shots: usize) -> f64 {
        3.0 * ((1.0 - expected * expected) / shots as f64).sqrt()
    }

    #[test]
    fn test_deterministic_outcome() -> Result<()> {
        let circuit = measured(Circuit::new(1).gate_at(0, GateKind::X)?, 0)?;
        let mut sampler = ShotSampler::seeded(7);

        assert_approx_eq!(-1.0, estimate_expectation(&mut sampler, &circuit, 100)?);

        Ok(())
    }

    #[test]
    fn test_register_layout() -> Result<()> {
        let mut circuit = Circuit::new(2).gate_at(1, GateKind::X)?;
        circuit.declare_bits(2);
        circuit.measure(0, 0)?;
        circuit.measure(1, 1)?;

        let runs = ShotSampler::seeded(1).run(&circuit, 5)?;
        assert_eq!(5, runs.len());
        assert!(runs.iter().all(|run| run == &vec![0, 1]));

        Ok(())
    }

    #[test]
    fn test_ry_estimate_within_three_sigma() -> Result<()> {
        let theta = PI / 3.0;
        let expected = theta.cos();
        let circuit = measured(Circuit::new(1).gate_at(0, GateKind::RY(theta))?, 0)?;

        let estimate = estimate_expectation(&mut ShotSampler::seeded(42), &circuit, DEFAULT_SHOTS)?;
        assert!(
            (estimate - expected).abs() <= three_sigma(expected, DEFAULT_SHOTS),
            "estimate {} too far from {}",
            estimate,
            expected
        );

        Ok(())
    }

    #[test]
    fn test_custom_gate_estimate() -> Result<()> {
        // qubit 0 ends up in an equal superposition for every θ
        let circuit = CustomGateAnsatz::new().build(&[0.4])?;

        let estimate = estimate_expectation(&mut ShotSampler::seeded(2024), &circuit, DEFAULT_SHOTS)?;
        assert!(estimate.abs() <= three_sigma(0.0, DEFAULT_SHOTS));

        Ok(())
    }

    #[test]
    fn test_same_seed_same_runs() -> Result<()> {
        let circuit = measured(Circuit::new(1).H(0)?, 0)?;
        let a = ShotSampler::seeded(9).run(&circuit, 50)?;
        let b = ShotSampler::seeded(9).run(&circuit, 50)?;
        assert_eq!(a, b);

        Ok(())
    }

    #[test]
    fn test_invalid_requests() -> Result<()> {
        let mut sampler = ShotSampler::seeded(0);

        let unmeasured = Circuit::new(1).H(0)?;
        assert!(matches!(
            estimate_expectation(&mut sampler, &unmeasured, 10),
            Err(VqeError::NoMeasurement)
        ));

        let circuit = measured(Circuit::new(1), 0)?;
        assert!(matches!(
            estimate_expectation(&mut sampler, &circuit, 0),
            Err(VqeError::InvalidShotCount(0))
        ));

        Ok(())
    }
}
