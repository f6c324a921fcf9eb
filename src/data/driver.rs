// ABOUTME: Multi-run driver that simulates every threshold and hands the runs to a plotter
// Prints one summary line per run as it completes

use super::simulator::{simulate_cost, SimulationRun};
use crate::utils::error::Result;
use rand::Rng;
use std::io::Write;
use tracing::info;

/// Consumes the finished runs, one labeled ratio series per threshold
pub trait RatioPlotter {
    fn plot(&mut self, runs: &[SimulationRun]) -> Result<()>;
}

/// Fans the same runs out to several plotters in order
#[derive(Default)]
pub struct PlotterChain {
    plotters: Vec<Box<dyn RatioPlotter>>,
}

impl PlotterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, plotter: Box<dyn RatioPlotter>) {
        self.plotters.push(plotter);
    }

    pub fn len(&self) -> usize {
        self.plotters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plotters.is_empty()
    }
}

impl RatioPlotter for PlotterChain {
    fn plot(&mut self, runs: &[SimulationRun]) -> Result<()> {
        for plotter in &mut self.plotters {
            plotter.plot(runs)?;
        }
        Ok(())
    }
}

/// Simulate each threshold in order, write its summary line to `out`, then plot all runs.
///
/// Duplicate thresholds are kept; each run draws fresh tokens from `rng`.
pub fn plot_cost_ratios<R: Rng>(
    pi_values: &[f64],
    iterations: usize,
    rng: &mut R,
    out: &mut dyn Write,
    plotter: &mut dyn RatioPlotter,
) -> Result<Vec<SimulationRun>> {
    let mut runs = Vec::with_capacity(pi_values.len());

    for &pi in pi_values {
        let run = simulate_cost(pi, iterations, rng)?;
        writeln!(out, "{}", run.summary_line())?;
        info!(
            threshold = pi,
            refreshes = run.refreshes,
            tracker_cost = run.tracker_cost,
            baseline_cost = run.baseline_cost,
            "simulation run complete"
        );
        runs.push(run);
    }

    plotter.plot(&runs)?;
    Ok(runs)
}
