//! Logging utilities.
//!
//! The engine logs through the `log` facade only: `debug!` for loop
//! start/stop, `trace!` for skipped frames, `error!` for failed platform work.
//! Binaries pick a backend; [`init_logging`] sets up `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
