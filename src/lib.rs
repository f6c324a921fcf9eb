// ABOUTME: Main library module that exports the public API
// Central module for the prompt-cache cost simulator

pub mod app;
pub mod data;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::{ExportFormat, SimConfig};
pub use data::{
    plot_cost_ratios, simulate_cost, Biller, CostModel, RatioPlotter, SimulationRun, ThresholdPolicy,
};
pub use utils::{Result, SimError};
