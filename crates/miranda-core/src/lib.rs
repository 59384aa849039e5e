//! Miranda Core Library
//!
//! Building blocks for the Miranda bootstrapper:
//! - Runner argument assembly with an environment override
//! - Runner lookup on `PATH` and in the current directory
//! - Spawning with stdout and stderr merged into one pipe
//! - Chunked relay of that pipe to our own stdout
//! - Exit status forwarding

pub mod args;
pub mod config;
pub mod env;
pub mod error;
pub mod launcher;
pub mod relay;
pub mod resolve;
pub mod tracing_init;

pub use args::{LaunchSpec, build_arguments};
pub use config::LauncherConfig;
pub use env::EnvOverride;
pub use error::{LaunchError, Result};
pub use launcher::{LaunchedChild, exit_code, spawn};
pub use relay::{CHUNK_SIZE, RelayStats, relay};
pub use resolve::{Resolution, ResolvedProgram};
