// ⚠️ Error taxonomy for fetching and deriving plan views

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlanBoardError>;

#[derive(Debug, Error)]
pub enum PlanBoardError {
    /// Connection refused, DNS failure, timeout...
    #[error("Failed to fetch plans: {0}")]
    Transport(#[from] reqwest::Error),

    /// Endpoint answered with a non-2xx status
    #[error("Failed to fetch plans (HTTP {status})")]
    Status { status: u16 },

    #[error("Malformed plans payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Missing route parameter, nothing to look up
    #[error("{0}")]
    NotFound(String),
}

impl PlanBoardError {
    /// True for the fetch-failure class (transport or HTTP status)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            PlanBoardError::Transport(_) | PlanBoardError::Status { .. }
        )
    }
}
