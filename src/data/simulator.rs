// ABOUTME: Drives random token arrivals through a tracker and a baseline in lockstep
// Records the baseline/tracker cost ratio after every step

use super::tracker::Biller;
use crate::utils::error::{Result, SimError};
use crate::utils::format::{format_ratio, format_usd, threshold_label};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Tokens per simulated request, drawn uniformly (inclusive)
pub const TOKEN_RANGE: RangeInclusive<u64> = 100..=500;

/// Iterations per run used by the command line defaults
pub const DEFAULT_ITERATIONS: usize = 80;

/// Thresholds compared by the command line defaults
pub const DEFAULT_PI_VALUES: [f64; 5] = [0.5, 0.72, 1.5, 2.0, 0.5];

/// Outcome of simulating one threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub threshold: f64,
    /// Baseline cost / tracker cost after each iteration
    pub ratios: Vec<f64>,
    pub tracker_cost: f64,
    pub baseline_cost: f64,
    /// Number of cache refreshes the tracker paid for
    pub refreshes: usize,
}

impl SimulationRun {
    pub fn label(&self) -> String {
        threshold_label(self.threshold)
    }

    /// Final cost ratio, `None` for an empty run
    pub fn final_ratio(&self) -> Option<f64> {
        self.ratios.last().copied()
    }

    /// `(iteration, ratio)` pairs with a 0-based iteration index
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.ratios
            .iter()
            .enumerate()
            .map(|(i, ratio)| (i as f64, *ratio))
            .collect()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Tracker cost: {}, Baseline cost: {}, Cost ratio: {}",
            format_usd(self.tracker_cost),
            format_usd(self.baseline_cost),
            format_ratio(self.final_ratio())
        )
    }
}

/// Owns one tracker and one baseline for the duration of a run
pub struct Simulator {
    threshold: f64,
    tracker: Biller,
    baseline: Biller,
    ratios: Vec<f64>,
    refreshes: usize,
}

impl Simulator {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            tracker: Biller::tracker(threshold),
            baseline: Biller::baseline(),
            ratios: Vec::new(),
            refreshes: 0,
        }
    }

    /// Feed the same request to both billers and record the resulting ratio
    pub fn step(&mut self, tokens: u64) -> Result<f64> {
        if self.tracker.infer(tokens) {
            self.refreshes += 1;
        }
        self.baseline.infer(tokens);

        let tracker_cost = self.tracker.cost();
        if tracker_cost == 0.0 {
            return Err(SimError::ZeroTrackerCost {
                iteration: self.ratios.len(),
            });
        }

        let ratio = self.baseline.cost() / tracker_cost;
        self.ratios.push(ratio);
        Ok(ratio)
    }

    /// Run `iterations` steps with token counts drawn from `rng`
    pub fn run<R: Rng>(&mut self, iterations: usize, rng: &mut R) -> Result<()> {
        self.ratios.reserve(iterations);
        for _ in 0..iterations {
            let token_len = rng.gen_range(TOKEN_RANGE);
            self.step(token_len)?;
        }
        Ok(())
    }

    pub fn tracker(&self) -> &Biller {
        &self.tracker
    }

    pub fn baseline(&self) -> &Biller {
        &self.baseline
    }

    pub fn finish(self) -> SimulationRun {
        SimulationRun {
            threshold: self.threshold,
            tracker_cost: self.tracker.cost(),
            baseline_cost: self.baseline.cost(),
            ratios: self.ratios,
            refreshes: self.refreshes,
        }
    }
}

/// Simulate one threshold over `iterations` random requests
pub fn simulate_cost<R: Rng>(
    threshold: f64,
    iterations: usize,
    rng: &mut R,
) -> Result<SimulationRun> {
    let mut simulator = Simulator::new(threshold);
    simulator.run(iterations, rng)?;
    Ok(simulator.finish())
}
