use thiserror::Error;

/// Core error type for stepwise operations.
#[derive(Error, Debug)]
pub enum StepwiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested target version outside [0, file count] / below the current
    /// version. Raised before any transaction is opened.
    #[error("Target version {target} is out of range (current version {current}, {available} migration(s) available)")]
    OutOfRange {
        target: i64,
        current: u32,
        available: usize,
    },

    /// The catalog has no file for an index inside the requested range.
    #[error("Migration file for index {0} is missing")]
    MissingMigration(u32),

    /// The file exists but does not parse into a migration unit.
    #[error("{path} is not a valid migration: {reason}")]
    InvalidMigration { path: String, reason: String },

    /// A unit's up/down reported failure; `detail` carries the unit's error.
    #[error("Migration '{name}' failed: {detail}")]
    StepFailed { name: String, detail: String },
}

/// Result type alias using StepwiseError.
pub type Result<T> = std::result::Result<T, StepwiseError>;
