//! Environment overrides applied to the child before it starts.

use std::process::Command;

/// A single environment variable forced on the child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvOverride {
    pub key: &'static str,
    pub value: &'static str,
}

/// Makes the Python interpreter behind the runner write stdout/stderr unbuffered,
/// so relayed output shows up as it is produced.
pub const PYTHON_UNBUFFERED: EnvOverride = EnvOverride {
    key: "PYTHONUNBUFFERED",
    value: "true",
};

/// Overrides every launch applies.
pub const DEFAULT_OVERRIDES: &[EnvOverride] = &[PYTHON_UNBUFFERED];

impl EnvOverride {
    /// Set this override on `cmd`. The rest of the parent environment is inherited unchanged.
    pub fn apply(&self, cmd: &mut Command) {
        cmd.env(self.key, self.value);
    }
}
