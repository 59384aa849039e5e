//! Miranda bootstrapper
//!
//! Launches Miranda through `uv`, relays the child's combined stdout/stderr to
//! our stdout and exits with the child's status. Every command-line argument is
//! forwarded to Miranda; the bootstrapper reads none itself.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};

use miranda_core::env::DEFAULT_OVERRIDES;
use miranda_core::tracing_init::{default_filter, init_tracing};
use miranda_core::{LaunchSpec, LauncherConfig, exit_code, spawn};

fn main() -> ExitCode {
    let config = LauncherConfig::from_env();
    init_tracing(&default_filter(&config.log_level), config.log_json);

    match run(&config, std::env::args_os().skip(1)) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run<I>(config: &LauncherConfig, user_args: I) -> Result<u8>
where
    I: IntoIterator<Item = OsString>,
{
    let spec = config.launch_spec(user_args);
    let mut stdout = io::stdout().lock();

    write_banner(&mut stdout, &spec).context("failed to write to stdout")?;

    let mut child = spawn(&config.runner, spec.into_args(), DEFAULT_OVERRIDES)
        .with_context(|| format!("failed to launch {}", config.runner))?;
    info!(pid = child.id(), "Miranda started");

    let stats = child.relay_to(&mut stdout)?;
    let status = child.wait()?;
    info!(
        ?status,
        bytes = stats.bytes,
        read_error = stats.read_error.is_some(),
        "Miranda exited"
    );

    writeln!(stdout, "Miranda subprocess done, exiting").context("failed to write to stdout")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(exit_code(status))
}

fn write_banner<W: Write>(out: &mut W, spec: &LaunchSpec) -> io::Result<()> {
    writeln!(out, "Starting miranda bootstrapper")?;
    writeln!(out, "Miranda arguments: {}", bracketed(spec.user_args()))?;
    writeln!(out, "UV arguments: {}", bracketed(spec.runner_args()))?;
    writeln!(out, "Launching Miranda")?;
    out.flush()
}

/// Space-separated list in brackets, e.g. `[--flag x]`.
fn bracketed(args: &[OsString]) -> String {
    let joined: Vec<_> = args.iter().map(|a| a.to_string_lossy()).collect();
    format!("[{}]", joined.join(" "))
}
