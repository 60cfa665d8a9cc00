use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;

use crate::error::VqeError;
use crate::sweep::{AngleGrid, SweepOutcome};

/// Renders a two-parameter sweep as a heat map, first parameter along x. Low energies are blue.
pub fn plot_landscape(outcome: &SweepOutcome, grid: &AngleGrid, file_name: &Path) -> Result<()> {
    if outcome.num_parameters() != 2 {
        return Err(VqeError::InvalidParameterCount {
            expected: 2,
            actual: outcome.num_parameters(),
        }
        .into());
    }

    let n = grid.len();
    let energies = outcome.energies();
    if energies.len() != n * n {
        return Err(anyhow::anyhow!(
            "Sweep has {} energies but the grid implies {}",
            energies.len(),
            n * n
        ));
    }

    let lo = energies.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = energies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { 1.0 };

    let root = BitMapBackend::new(file_name, (640, 640)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .build_cartesian_2d(0..n, 0..n)?;

    chart.draw_series((0..n).flat_map(|i| (0..n).map(move |j| (i, j))).map(|(i, j)| {
        let t = (energies[i * n + j] - lo) / span;
        let color = HSLColor(0.66 * (1.0 - t), 0.8, 0.5);
        Rectangle::new([(i, j), (i + 1, j + 1)], color.filled())
    }))?;

    root.present()?;
    Ok(())
}
