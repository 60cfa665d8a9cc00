use argmin::core::{CostFunction, Executor, State};
use argmin::solver::neldermead::NelderMead;
use tracing::{debug, info};

use crate::ansatz::Ansatz;
use crate::error::{VqeError, VqeResult};
use crate::expectation::{expectation_value, ExpectationSimulator};
use crate::pauli::PauliSum;

#[derive(Clone, Debug)]
pub struct RefineConfig {
    pub max_iters: u64,
    /// Offset of the initial simplex vertices along each parameter axis.
    pub initial_step: f64,
    pub sd_tolerance: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            initial_step: 0.1,
            sd_tolerance: 1e-12,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Refinement {
    pub parameters: Vec<f64>,
    pub energy: f64,
    pub iterations: u64,
}

struct EnergyCost<'a, A: ?Sized, S: ?Sized> {
    hamiltonian: &'a PauliSum,
    ansatz: &'a A,
    simulator: &'a S,
}

impl<A, S> EnergyCost<'_, A, S>
where
    A: Ansatz + ?Sized,
    S: ExpectationSimulator + ?Sized,
{
    fn energy(&self, params: &[f64]) -> VqeResult<f64> {
        let circuit = self.ansatz.build(params)?;
        expectation_value(self.hamiltonian, &circuit, self.simulator)
    }
}

impl<A, S> CostFunction for EnergyCost<'_, A, S>
where
    A: Ansatz + ?Sized,
    S: ExpectationSimulator + ?Sized,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        Ok(self.energy(params)?)
    }
}

/// Runs Nelder–Mead from `start`. The returned energy is never above the energy at `start`.
pub fn refine<A, S>(
    hamiltonian: &PauliSum,
    ansatz: &A,
    simulator: &S,
    start: &[f64],
    config: &RefineConfig,
) -> VqeResult<Refinement>
where
    A: Ansatz + ?Sized,
    S: ExpectationSimulator + ?Sized,
{
    if start.len() != ansatz.num_parameters() {
        return Err(VqeError::InvalidParameterCount {
            expected: ansatz.num_parameters(),
            actual: start.len(),
        });
    }

    let problem = EnergyCost {
        hamiltonian,
        ansatz,
        simulator,
    };
    let start_energy = problem.energy(start)?;
    if start.is_empty() {
        return Ok(Refinement {
            parameters: Vec::new(),
            energy: start_energy,
            iterations: 0,
        });
    }

    let mut simplex = vec![start.to_vec()];
    for i in 0..start.len() {
        let mut vertex = start.to_vec();
        vertex[i] += config.initial_step;
        simplex.push(vertex);
    }

    let solver: NelderMead<Vec<f64>, f64> =
        NelderMead::new(simplex).with_sd_tolerance(config.sd_tolerance)?;

    let res = Executor::new(problem, solver)
        .configure(|state| state.max_iters(config.max_iters))
        .run()?;

    let iterations = res.state.get_iter();
    let energy = res.state.get_best_cost();
    let parameters = res
        .state
        .get_best_param()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("No best parameter found in the optimization result"))?;
    debug!(iterations, energy, "nelder-mead finished");

    if energy > start_energy {
        return Ok(Refinement {
            parameters: start.to_vec(),
            energy: start_energy,
            iterations,
        });
    }

    info!(start_energy, energy, ?parameters, "refined");
    Ok(Refinement {
        parameters,
        energy,
        iterations,
    })
}
