//! Observability module for logging.

mod logging;

pub use logging::{LogFormat, LogLevel, LoggingConfig, LOG_FORMAT_VAR, LOG_LEVEL_VAR};
