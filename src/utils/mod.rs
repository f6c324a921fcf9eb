pub mod error;
pub mod format;

pub use error::{Result, SimError};
pub use format::{format_ratio, format_usd, threshold_label};
