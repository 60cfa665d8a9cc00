use std::f64::consts::TAU;

use tracing::{debug, info};

use crate::ansatz::Ansatz;
use crate::error::{VqeError, VqeResult};
use crate::expectation::{expectation_value, ExpectationSimulator};
use crate::pauli::PauliSum;

pub const DEFAULT_GRID_POINTS: usize = 40;

#[derive(Clone, Debug, PartialEq)]
pub struct AngleGrid {
    points: Vec<f64>,
}

impl AngleGrid {
    /// `num` evenly spaced values from `start` to `stop`, both ends included.
    pub fn linspace(start: f64, stop: f64, num: usize) -> Self {
        let points = match num {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (num - 1) as f64;
                let mut points = (0..num - 1)
                    .map(|i| start + i as f64 * step)
                    .collect::<Vec<_>>();
                points.push(stop);
                points
            }
        };
        Self { points }
    }

    /// `num` points on `[0, 2π]`.
    pub fn full_turn(num: usize) -> Self {
        Self::linspace(0.0, TAU, num)
    }

    pub fn from_points(points: Vec<f64>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for AngleGrid {
    fn default() -> Self {
        Self::full_turn(DEFAULT_GRID_POINTS)
    }
}

#[derive(Clone, Debug)]
pub struct SweepOutcome {
    energies: Vec<f64>,
    minimum: f64,
    best_parameters: Vec<f64>,
    num_parameters: usize,
}

impl SweepOutcome {
    /// Energies in sweep order: the first parameter varies slowest.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn best_parameters(&self) -> &[f64] {
        &self.best_parameters
    }

    pub fn num_parameters(&self) -> usize {
        self.num_parameters
    }
}

fn grid_parameters(grid: &[f64], num_parameters: usize, index: usize) -> Vec<f64> {
    let n = grid.len();
    (0..num_parameters)
        .map(|d| {
            let stride = n.pow((num_parameters - 1 - d) as u32);
            grid[(index / stride) % n]
        })
        .collect()
}

/// Evaluates the Hamiltonian at every point of `grid^k` and keeps the lowest energy.
///
/// Ties keep the earliest grid point.
pub fn sweep<A, S>(
    hamiltonian: &PauliSum,
    ansatz: &A,
    grid: &AngleGrid,
    simulator: &S,
) -> VqeResult<SweepOutcome>
where
    A: Ansatz + ?Sized,
    S: ExpectationSimulator + ?Sized,
{
    if grid.is_empty() {
        return Err(VqeError::EmptyGrid);
    }
    if ansatz.num_qubits() != hamiltonian.n_qubits() {
        return Err(VqeError::RegisterMismatch {
            hamiltonian: hamiltonian.n_qubits(),
            circuit: ansatz.num_qubits(),
        });
    }

    let num_parameters = ansatz.num_parameters();
    let total = u32::try_from(num_parameters)
        .ok()
        .and_then(|exp| grid.len().checked_pow(exp))
        .ok_or(VqeError::GridTooLarge {
            points: grid.len(),
            parameters: num_parameters,
        })?;
    info!(
        num_parameters,
        grid_points = grid.len(),
        evaluations = total,
        "starting sweep"
    );

    let mut energies = Vec::new();
    let mut best: Option<(f64, Vec<f64>)> = None;
    for index in 0..total {
        let params = grid_parameters(grid.points(), num_parameters, index);
        let circuit = ansatz.build(&params)?;
        let energy = expectation_value(hamiltonian, &circuit, simulator)?;
        debug!(?params, energy, "grid point");

        if best.as_ref().map_or(true, |(min, _)| energy < *min) {
            best = Some((energy, params));
        }
        energies.push(energy);
    }

    let (minimum, best_parameters) = best.ok_or(VqeError::EmptyGrid)?;
    info!(minimum, ?best_parameters, "sweep finished");

    Ok(SweepOutcome {
        energies,
        minimum,
        best_parameters,
        num_parameters,
    })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use anyhow::Result;

    use super::*;
    use crate::{
        ansatz::{EntanglingAnsatz, FnAnsatz, ParameterSharing},
        assert_approx_eq,
        circuit::{Circuit, GateKind},
        expectation::WavefunctionSimulator,
        pauli::{Pauli, PauliTerm},
    };

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
    fn test_linspace_includes_both_ends() {
        let grid = AngleGrid::linspace(0.0, 1.0, 5);
        assert_eq!(&[0.0, 0.25, 0.5, 0.75, 1.0], grid.points());

        assert_eq!(&[2.0], AngleGrid::linspace(2.0, 3.0, 1).points());
        assert!(AngleGrid::linspace(0.0, 1.0, 0).is_empty());

        let default = AngleGrid::default();
        assert_eq!(40, default.len());
        assert_eq!(TAU, default.points()[39]);
    }

    #[test]
    fn test_heisenberg_sweep_finds_ground_state() -> Result<()> {
        let h = heisenberg()?;
        let ansatz = EntanglingAnsatz::new(2, 3)?;
        let outcome = sweep(&h, &ansatz, &AngleGrid::default(), &WavefunctionSimulator::new())?;

        assert_eq!(1600, outcome.energies().len());
        assert!(outcome.minimum() >= h.ground_state_energy()? - 1e-9);
        assert_approx_eq!(-2.0, outcome.minimum(), 1e-2);

        Ok(())
    }

    #[test]
    fn test_sweep_order_is_first_parameter_outermost() -> Result<()> {
        let h = heisenberg()?;
        let ansatz = EntanglingAnsatz::new(2, 3)?;
        let grid = AngleGrid::from_points(vec![1.0, 2.0]);
        let outcome = sweep(&h, &ansatz, &grid, &WavefunctionSimulator::new())?;

        let at = |a: f64, b: f64| -> Result<f64> {
            let circuit = ansatz.build(&[a, b])?;
            Ok(expectation_value(&h, &circuit, &WavefunctionSimulator::new())?)
        };
        assert_eq!(at(1.0, 1.0)?, outcome.energies()[0]);
        assert_eq!(at(1.0, 2.0)?, outcome.energies()[1]);
        assert_eq!(at(2.0, 1.0)?, outcome.energies()[2]);
        assert_eq!(at(2.0, 2.0)?, outcome.energies()[3]);

        // Cross-checked against an independent state-vector calculation.
        assert_approx_eq!(-1.779389042371014, outcome.energies()[1], 1e-9);

        Ok(())
    }

    #[test]
    fn test_single_point_grid() -> Result<()> {
        let h = heisenberg()?;
        let ansatz = EntanglingAnsatz::new(2, 3)?;
        let sim = WavefunctionSimulator::new();
        let outcome = sweep(&h, &ansatz, &AngleGrid::from_points(vec![0.7]), &sim)?;

        let expected = expectation_value(&h, &ansatz.build(&[0.7, 0.7])?, &sim)?;
        assert_eq!(&[expected], outcome.energies());
        assert_eq!(expected, outcome.minimum());
        assert_eq!(&[0.7, 0.7], outcome.best_parameters());

        Ok(())
    }

    #[test]
    fn test_one_parameter_ansatz() -> Result<()> {
        let h = PauliSum::new(1, vec![PauliTerm::real(1.0, [(0, Pauli::Z)])])?;
        let ansatz = FnAnsatz::new(1, 1, |p: &[f64]| {
            Ok(Circuit::new(1).gate_at(0, GateKind::RY(p[0]))?)
        });
        let outcome = sweep(
            &h,
            &ansatz,
            &AngleGrid::full_turn(9),
            &WavefunctionSimulator::new(),
        )?;

        assert_eq!(9, outcome.energies().len());
        assert_approx_eq!(-1.0, outcome.minimum());
        assert_approx_eq!(PI, outcome.best_parameters()[0]);

        Ok(())
    }

    #[test]
    fn test_rejects_empty_grid_and_mismatched_register() -> Result<()> {
        let h = heisenberg()?;
        let ansatz = EntanglingAnsatz::new(2, 1)?;
        let sim = WavefunctionSimulator::new();

        assert!(matches!(
            sweep(&h, &ansatz, &AngleGrid::from_points(vec![]), &sim),
            Err(VqeError::EmptyGrid)
        ));

        let wide = EntanglingAnsatz::new(3, 1)?;
        assert!(matches!(
            sweep(&h, &wide, &AngleGrid::default(), &sim),
            Err(VqeError::RegisterMismatch { .. })
        ));

        Ok(())
    }

    #[test]
    fn test_rejects_grid_that_overflows() -> Result<()> {
        let h = heisenberg()?;
        let ansatz = EntanglingAnsatz::new(2, 7)?.with_sharing(ParameterSharing::PerLayer);
        assert_eq!(14, ansatz.num_parameters());

        let result = sweep(&h, &ansatz, &AngleGrid::default(), &WavefunctionSimulator::new());
        assert!(matches!(
            result,
            Err(VqeError::GridTooLarge {
                points: 40,
                parameters: 14
            })
        ));

        Ok(())
    }
}
