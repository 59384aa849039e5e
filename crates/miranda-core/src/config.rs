//! Launcher configuration.
//!
//! Resolution order:
//! 1. Built-in defaults
//! 2. Environment variables
//!
//! There is no configuration file.

use std::ffi::OsString;

use tracing::warn;

use crate::args::{LaunchSpec, build_arguments};

/// Runner executable, resolved through `PATH` or the current directory.
pub const RUNNER: &str = "uv";

/// Environment variable holding a whitespace-separated replacement for the runner prefix.
pub const RUNNER_ARGS_VAR: &str = "MIRANDA_BOOTSTRAPPER_UV_ARGS";

/// Environment variable holding the default log filter.
pub const LOG_LEVEL_VAR: &str = "MIRANDA_BOOTSTRAPPER_LOG_LEVEL";

/// Environment variable switching log records to JSON lines.
pub const LOG_JSON_VAR: &str = "MIRANDA_BOOTSTRAPPER_LOG_JSON";

/// Runner prefix used when no override is given.
pub const DEFAULT_RUNNER_ARGS: &[&str] = &[
    "run",
    "--with-requirements",
    "requirements.txt",
    "--cache-dir",
    ".uvcache",
    "main.py",
];

/// Complete launcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Runner executable name.
    pub runner: String,
    /// Runner prefix used when `runner_args_override` yields no tokens.
    pub default_runner_args: Vec<String>,
    /// Raw value of [`RUNNER_ARGS_VAR`], if set.
    pub runner_args_override: Option<OsString>,
    /// Default log filter directive.
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            runner: RUNNER.to_string(),
            default_runner_args: DEFAULT_RUNNER_ARGS
                .iter()
                .map(ToString::to_string)
                .collect(),
            runner_args_override: None,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl LauncherConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut config = Self::default();
        apply_env_overrides(&mut config, &lookup);
        config
    }

    /// The runner prefix override as text. A non UTF-8 value is ignored with a warning.
    pub fn runner_args_override(&self) -> Option<&str> {
        let raw = self.runner_args_override.as_deref()?;
        let text = raw.to_str();
        if text.is_none() {
            warn!(
                var = RUNNER_ARGS_VAR,
                value = ?raw,
                "Ignoring non UTF-8 runner arguments override"
            );
        }
        text
    }

    /// Build the runner argument list for `user_args`.
    pub fn launch_spec<U>(&self, user_args: U) -> LaunchSpec
    where
        U: IntoIterator,
        U::Item: Into<OsString>,
    {
        build_arguments(
            self.runner_args_override(),
            &self.default_runner_args,
            user_args,
        )
    }
}

fn apply_env_overrides<F>(config: &mut LauncherConfig, lookup: &F)
where
    F: Fn(&str) -> Option<OsString>,
{
    if let Some(val) = lookup(RUNNER_ARGS_VAR) {
        config.runner_args_override = Some(val);
    }
    if let Some(val) = lookup(LOG_LEVEL_VAR).and_then(|v| v.into_string().ok()) {
        if !val.trim().is_empty() {
            config.log_level = val.trim().to_string();
        }
    }
    if let Some(val) = lookup(LOG_JSON_VAR).and_then(|v| v.into_string().ok()) {
        config.log_json = matches!(val.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
    }
}
