//! Runner command-line assembly.

use std::ffi::{OsStr, OsString};

/// Arguments handed to the runner: the runner prefix followed by the forwarded caller arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    args: Vec<OsString>,
    prefix_len: usize,
}

impl LaunchSpec {
    /// Full argument list, prefix first.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Runner prefix portion.
    pub fn runner_args(&self) -> &[OsString] {
        &self.args[..self.prefix_len]
    }

    /// Forwarded caller portion.
    pub fn user_args(&self) -> &[OsString] {
        &self.args[self.prefix_len..]
    }

    pub fn into_args(self) -> Vec<OsString> {
        self.args
    }
}

/// Build the runner argument list.
///
/// When `override_value` splits into at least one whitespace-separated token,
/// those tokens replace `default_args` as the prefix. The caller arguments are
/// appended unchanged.
pub fn build_arguments<D, U>(override_value: Option<&str>, default_args: D, user_args: U) -> LaunchSpec
where
    D: IntoIterator,
    D::Item: AsRef<OsStr>,
    U: IntoIterator,
    U::Item: Into<OsString>,
{
    let overridden: Vec<OsString> = override_value
        .map(|v| v.split_whitespace().map(OsString::from).collect())
        .unwrap_or_default();

    let mut args = if overridden.is_empty() {
        default_args
            .into_iter()
            .map(|a| a.as_ref().to_os_string())
            .collect()
    } else {
        overridden
    };
    let prefix_len = args.len();
    args.extend(user_args.into_iter().map(Into::into));

    LaunchSpec { args, prefix_len }
}
