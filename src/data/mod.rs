pub mod cost_model;
pub mod driver;
pub mod export;
pub mod optimizer;
pub mod simulator;
pub mod tracker;


pub use cost_model::{CostModel, Pricing};
pub use driver::{plot_cost_ratios, PlotterChain, RatioPlotter};
pub use export::{render_runs, FileExporter};
pub use optimizer::{find_optimal_n, optimize_splits, scheduled_cost, OptimalPlan, SplitPlan};
pub use simulator::{simulate_cost, SimulationRun, Simulator};
pub use tracker::{Biller, RefreshPolicy, ThresholdPolicy};
