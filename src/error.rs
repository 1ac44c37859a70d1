//! Error types

use thiserror::Error;

use crate::sim::GamePhase;

/// Rejected session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Shown to the player when they try to start without a name
    #[error("Please enter your name!")]
    EmptyPlayerName,
    #[error("cannot {action} while in {from:?}")]
    InvalidTransition {
        from: GamePhase,
        action: &'static str,
    },
}

/// Failures loading configuration or settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
