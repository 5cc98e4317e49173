#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Process bootstrap shared by service binaries.

pub mod config;
pub mod logging;
pub mod signals;

pub use config::{AppConfig, CliArgs, ConfigError, LogFormat, LoggingConfig, ServerConfig};
pub use logging::init_logging;
pub use signals::wait_for_shutdown;
