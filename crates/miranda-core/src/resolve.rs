//! Runner executable lookup.
//!
//! The runner is looked up on `PATH` first and then in the current directory.
//! A hit in the current directory is allowed but reported, since it is easy to
//! pick up a stray binary that way.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{LaunchError, Result};

/// Where a program was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An absolute directory listed in `PATH`.
    SearchPath,
    /// The current working directory, either directly or through a relative `PATH` entry.
    CurrentDir,
}

/// A located executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProgram {
    pub path: PathBuf,
    pub resolution: Resolution,
}

impl ResolvedProgram {
    pub const fn is_current_dir(&self) -> bool {
        matches!(self.resolution, Resolution::CurrentDir)
    }
}

/// Resolve `program` against the process `PATH` and working directory.
pub fn resolve_program(program: &str) -> Result<ResolvedProgram> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path_var = std::env::var_os("PATH");
    resolve_program_in(program, path_var.as_deref(), &cwd)
}

/// Resolve `program` against an explicit search path and working directory.
pub fn resolve_program_in(
    program: &str,
    path_var: Option<&OsStr>,
    cwd: &Path,
) -> Result<ResolvedProgram> {
    match which::which_in(program, path_var, cwd) {
        Ok(path) => {
            let resolution = classify(&path, cwd);
            debug!(program, path = %path.display(), ?resolution, "Resolved program");
            Ok(ResolvedProgram { path, resolution })
        }
        Err(err) => {
            debug!(program, error = %err, "Not on PATH, trying current directory");
            let local = Path::new(".").join(program);
            which::which_in(&local, None::<&OsStr>, cwd)
                .map(|path| ResolvedProgram {
                    path,
                    resolution: Resolution::CurrentDir,
                })
                .map_err(|_| LaunchError::NotFound {
                    program: program.to_string(),
                })
        }
    }
}

fn classify(path: &Path, cwd: &Path) -> Resolution {
    if path.is_relative() || path.parent().is_some_and(|dir| same_dir(dir, cwd)) {
        Resolution::CurrentDir
    } else {
        Resolution::SearchPath
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
