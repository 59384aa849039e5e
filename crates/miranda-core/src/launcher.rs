//! Runner process lifecycle.
//!
//! Spawns the runner with stdout and stderr attached to one pipe, relays that
//! pipe to a sink and reports the child's exit status.

use std::ffi::OsString;
use std::io::{PipeReader, Write};
use std::process::{Child, Command, ExitStatus};

use tracing::{debug, info, warn};

use crate::env::EnvOverride;
use crate::error::{LaunchError, Result};
use crate::relay::{RelayStats, relay};
use crate::resolve::{ResolvedProgram, resolve_program};

/// A running child and the read end of its merged output pipe.
#[derive(Debug)]
pub struct LaunchedChild {
    child: Child,
    output: Option<PipeReader>,
}

impl LaunchedChild {
    /// OS process id.
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Take the merged output stream. Returns `None` once taken.
    pub fn take_output(&mut self) -> Option<PipeReader> {
        self.output.take()
    }

    /// Relay the merged output to `sink` until the child closes it.
    ///
    /// Returns empty stats if the stream was already taken.
    pub fn relay_to<W: Write>(&mut self, sink: W) -> Result<RelayStats> {
        let Some(output) = self.output.take() else {
            return Ok(RelayStats::default());
        };
        relay(output, sink).map_err(LaunchError::Relay)
    }

    /// Close the output stream (if still held) and wait for the child to exit.
    pub fn wait(mut self) -> Result<ExitStatus> {
        drop(self.output.take());
        let status = self.child.wait().map_err(LaunchError::Wait)?;
        debug!(pid = self.child.id(), ?status, "Child exited");
        Ok(status)
    }
}

/// Resolve and spawn `program` with `args`, applying `overrides` to its environment.
///
/// A program found through the current directory is started anyway, with a warning.
pub fn spawn<I>(program: &str, args: I, overrides: &[EnvOverride]) -> Result<LaunchedChild>
where
    I: IntoIterator<Item = OsString>,
{
    let resolved = resolve_program(program)?;
    if resolved.is_current_dir() {
        warn!(
            program,
            path = %resolved.path.display(),
            "Resolved executable relative to the current directory"
        );
    }
    spawn_resolved(program, &resolved, args, overrides)
}

fn spawn_resolved<I>(
    program: &str,
    resolved: &ResolvedProgram,
    args: I,
    overrides: &[EnvOverride],
) -> Result<LaunchedChild>
where
    I: IntoIterator<Item = OsString>,
{
    let (reader, writer) = std::io::pipe().map_err(LaunchError::StreamSetup)?;
    let stderr_writer = writer.try_clone().map_err(LaunchError::StreamSetup)?;

    // The command owns our copies of the write end; it must be dropped after
    // spawn or the reader never sees end-of-stream.
    let child = {
        let mut cmd = Command::new(&resolved.path);
        cmd.args(args).stdout(writer).stderr(stderr_writer);
        for o in overrides {
            o.apply(&mut cmd);
        }
        info!(
            program,
            path = %resolved.path.display(),
            args = ?cmd.get_args().collect::<Vec<_>>(),
            "Spawning runner"
        );
        cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: program.to_string(),
            source,
        })?
    };
    debug!(pid = child.id(), "Runner started");

    Ok(LaunchedChild {
        child,
        output: Some(reader),
    })
}

/// Map a child exit status to the code this process should exit with.
///
/// Signal deaths on Unix become `128 + signal`, the shell convention. Anything
/// that does not fit in a `u8` becomes `1`.
pub fn exit_code(status: ExitStatus) -> u8 {
    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or(1);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return u8::try_from(128 + signal).unwrap_or(1);
        }
    }
    1
}
