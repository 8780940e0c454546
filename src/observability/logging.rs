//! Structured logging for the toolkit server.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the log level
pub const LOG_LEVEL_VAR: &str = "TOOLKIT_LOG_LEVEL";
/// Environment variable selecting the log format
pub const LOG_FORMAT_VAR: &str = "TOOLKIT_LOG_FORMAT";

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - verbose debugging information
    Debug,
    /// Info level - general information
    Info,
    /// Warn level - warnings
    Warn,
    /// Error level - errors
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty printed format for development
    Pretty,
    /// JSON format for production
    Json,
    /// Compact format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// Configuration for logging
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level
    pub level: LogLevel,
    /// Log format
    pub format: LogFormat,
    /// Whether to include timestamps
    pub include_timestamps: bool,
    /// Whether to include target (module path)
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            include_timestamps: true,
            include_target: false,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Read level and format from the environment, ignoring unparseable values
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(level) = std::env::var(LOG_LEVEL_VAR).ok().and_then(|v| v.parse().ok()) {
            config.level = level;
        }
        if let Some(format) = std::env::var(LOG_FORMAT_VAR).ok().and_then(|v| v.parse().ok()) {
            config.format = format;
        }
        config
    }

    /// Set the log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the log format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable timestamps
    pub fn with_timestamps(mut self, include: bool) -> Self {
        self.include_timestamps = include;
        self
    }

    /// Enable or disable target
    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    /// Create configuration for development
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            include_timestamps: true,
            include_target: true,
        }
    }

    /// Create configuration for production
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            include_timestamps: true,
            include_target: false,
        }
    }

    /// Install the global subscriber.
    ///
    /// `RUST_LOG` directives are honored on top of the configured level. Fails
    /// if a subscriber is already installed.
    pub fn init(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let level = LevelFilter::from_level(self.level.into());
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let registry = tracing_subscriber::registry().with(filter);
        match (self.format, self.include_timestamps) {
            (LogFormat::Json, _) => registry
                .with(fmt::layer().json().with_target(self.include_target))
                .try_init()?,
            (LogFormat::Compact, true) => registry
                .with(fmt::layer().compact().with_target(self.include_target))
                .try_init()?,
            (LogFormat::Compact, false) => registry
                .with(
                    fmt::layer()
                        .compact()
                        .without_time()
                        .with_target(self.include_target),
                )
                .try_init()?,
            (LogFormat::Pretty, true) => registry
                .with(fmt::layer().with_target(self.include_target))
                .try_init()?,
            (LogFormat::Pretty, false) => registry
                .with(fmt::layer().without_time().with_target(self.include_target))
                .try_init()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config() {
        let config = LoggingConfig::new()
            .with_level(LogLevel::Debug)
            .with_format(LogFormat::Json)
            .with_timestamps(false)
            .with_target(true);

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.include_timestamps);
        assert!(config.include_target);
    }

    #[test]
    fn test_presets() {
        assert_eq!(LoggingConfig::development().level, LogLevel::Debug);
        assert_eq!(LoggingConfig::production().format, LogFormat::Json);
    }

    #[test]
    fn test_parse_level_and_format() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("loud".parse::<LogLevel>().is_err());
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
