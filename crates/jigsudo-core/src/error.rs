use thiserror::Error;

/// Result type for fallible core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core.
///
/// Search dead ends and infeasible carvings are not errors: the orchestrator
/// treats them as a failed attempt and retries. Only running out of attempts
/// reaches the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Every top-level attempt failed
    #[error("could not generate a valid daily board after {attempts} attempts")]
    AttemptBudgetExhausted { attempts: usize },

    /// A grid could not be built from the given values
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// A cell coordinate was outside the board
    #[error("cell ({row}, {col}) is outside the 9x9 board")]
    CellOutOfRange { row: usize, col: usize },

    /// A generated board broke one of its own guarantees
    #[error("inconsistent board: {0}")]
    Inconsistent(String),

    /// Writing the daily file failed
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the daily document failed
    #[error("encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
