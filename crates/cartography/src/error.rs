//! Error types for Cartography operations.
//!
//! This module provides the main error type [`CartographyError`]. Graph
//! construction and layout never fail on malformed topology; errors only come
//! from configuration handling and from callers converting a cancelled
//! [`Outcome`](crate::Outcome) into a `Result`.

use thiserror::Error;

/// The main error type for Cartography operations.
#[derive(Debug, Error)]
pub enum CartographyError {
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid direction `{0}`, expected one of TB, BT, LR, RL")]
    InvalidDirection(String),

    #[error("Operation cancelled during {phase}")]
    Cancelled { phase: &'static str },
}

impl CartographyError {
    /// Create a new `InvalidConfig` error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
