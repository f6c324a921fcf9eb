// ABOUTME: Centralized error handling for the simulator
// Provides consistent error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Tracker cost is zero at iteration {iteration}; cost ratio is undefined")]
    ZeroTrackerCost { iteration: usize },

    #[error("Cannot place {splits} cache refreshes in a context of {length} tokens")]
    InvalidSchedule { splits: usize, length: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Channel send error: {0}")]
    ChannelSend(String),
}

impl<T> From<crossbeam_channel::SendError<T>> for SimError {
    fn from(err: crossbeam_channel::SendError<T>) -> Self {
        SimError::ChannelSend(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
