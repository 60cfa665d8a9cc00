use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use simple_vqe::{
    decompose, estimate_expectation,
    plot::plot_landscape,
    refine, sweep, Ansatz, AngleGrid, CustomGateAnsatz, EntanglingAnsatz, Pauli, PauliSum,
    PauliTerm, RefineConfig, ShotSampler, WavefunctionSimulator,
};
use tracing::info;

/// Pauli decomposition and grid-search VQE on a two-qubit Heisenberg coupling
#[derive(Parser, Debug)]
#[command(name = "simple-vqe")]
struct Args {
    /// Points per parameter axis on [0, 2π]
    #[arg(long, default_value_t = 40)]
    grid_points: usize,

    /// Repetitions of the entangling layer
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Shots for the sampled estimate
    #[arg(long, default_value_t = 10_000)]
    shots: usize,

    /// Angle fed to the custom-gate ansatz
    #[arg(long, default_value_t = FRAC_PI_2)]
    theta: f64,

    /// Sampler seed; random when omitted
    #[arg(long, env = "SIMPLE_VQE_SEED")]
    seed: Option<u64>,

    /// Polish the best grid point with Nelder-Mead
    #[arg(long)]
    refine: bool,

    /// Write the energy landscape as a PNG heat map
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

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

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let hamiltonian = heisenberg()?;
    println!("H = {}", hamiltonian);

    // Pauli decomposition of the Hamiltonian's own matrix
    for component in decompose(&hamiltonian.matrix()?)? {
        println!("{}", component);
    }

    // Grid search
    let simulator = WavefunctionSimulator::new();
    let ansatz = EntanglingAnsatz::new(hamiltonian.n_qubits(), args.depth)?;
    let grid = AngleGrid::full_turn(args.grid_points);
    let outcome = sweep(&hamiltonian, &ansatz, &grid, &simulator)?;

    println!("{}", outcome.minimum());
    info!(
        exact = hamiltonian.ground_state_energy()?,
        parameters = ?outcome.best_parameters(),
        "grid minimum {}",
        outcome.minimum()
    );

    if args.refine {
        let refined = refine(
            &hamiltonian,
            &ansatz,
            &simulator,
            outcome.best_parameters(),
            &RefineConfig::default(),
        )?;
        println!("refined: {} at {:?}", refined.energy, refined.parameters);
    }

    if let Some(path) = &args.plot {
        plot_landscape(&outcome, &grid, path)?;
        info!("Landscape saved to {}", path.display());
    }

    // Shot-based estimate for the custom-gate ansatz
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, shots = args.shots, theta = args.theta, "sampling");
    let circuit = CustomGateAnsatz::new().build(&[args.theta])?;
    let mut sampler = ShotSampler::seeded(seed);
    let estimate = estimate_expectation(&mut sampler, &circuit, args.shots)?;
    println!("{}", estimate);

    Ok(())
}
