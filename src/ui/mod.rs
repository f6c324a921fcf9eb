pub mod chart;
pub mod terminal;

pub use chart::RatioChart;
pub use terminal::TerminalPlotter;
