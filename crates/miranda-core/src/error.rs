//! Error types for the Miranda launcher.

use thiserror::Error;

/// Result type alias using [`LaunchError`].
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Errors from building, spawning and relaying the runner process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The merged stdout/stderr pipe could not be created.
    #[error("Failed to set up child output stream: {0}")]
    StreamSetup(#[source] std::io::Error),

    /// The executable is neither on `PATH` nor in the current directory.
    #[error("Executable not found: {program}")]
    NotFound { program: String },

    /// The executable was located but the OS refused to start it.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on the child for its exit status failed.
    #[error("Failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),

    /// Writing relayed output to our own stdout failed.
    #[error("Failed to relay child output: {0}")]
    Relay(#[source] std::io::Error),
}

impl LaunchError {
    /// Whether this error belongs to the spawn class (missing or unstartable executable).
    pub const fn is_spawn_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Spawn { .. })
    }
}
