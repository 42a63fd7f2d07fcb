//! Error types for the terminal host.
//!
//! [`EngineError`] covers startup and I/O failures that end the process.
//! Rejected player actions are not errors at this level; the garden reports
//! them as notices.

/// Top-level error for the `zengarden` binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: zengarden_core::ConfigError,
    },

    /// Reading player input or writing output failed.
    #[error("terminal I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The snapshot could not be encoded as JSON.
    #[error("snapshot encoding error: {source}")]
    Snapshot {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// A line of player input that is not a valid command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// The first word is not a known command.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// A required argument was not given.
    #[error("{command} needs a {argument}")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// An argument that should be a number is not one.
    #[error("not a number: {0}")]
    InvalidNumber(String),

    /// Row or column outside the 3x3 garden.
    #[error("no plot at row {row}, column {col}; rows and columns are 0 to 2")]
    OutOfGrid {
        /// Requested row.
        row: u8,
        /// Requested column.
        col: u8,
    },
}
