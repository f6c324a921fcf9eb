pub mod config;
pub mod state;

pub use config::{ExportFormat, SimConfig};
pub use state::{AppEvent, ChartState};
