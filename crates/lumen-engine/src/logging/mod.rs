//! Logger initialization.
//!
//! Engine code logs through the `log` facade only; `env_logger` is installed
//! by the binary through [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
