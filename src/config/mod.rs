//! Service configuration and configuration stores.

pub mod dotenv;
mod store;

pub use store::{ConfigStore, EnvFileStore, InMemoryConfigStore};

use crate::errors::{ToolkitError, ToolkitResult};
use crate::observability::LoggingConfig;
use crate::{DEFAULT_BIND_ADDR, ENV_FILE_NAME};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable overriding the bind address
pub const BIND_ADDR_VAR: &str = "TOOLKIT_BIND_ADDR";
/// Environment variable overriding the `.env` file location
pub const ENV_FILE_VAR: &str = "TOOLKIT_ENV_FILE";

/// Configuration for the toolkit server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// `.env` file deployment variables are written to
    pub env_file: PathBuf,
    /// Logging setup
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8000))),
            env_file: PathBuf::from(ENV_FILE_NAME),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> ToolkitResult<Self> {
        let mut builder = Self::builder().logging(LoggingConfig::from_env());

        if let Ok(addr) = std::env::var(BIND_ADDR_VAR) {
            let addr = addr.parse().map_err(|e| ToolkitError::Configuration {
                message: format!("Invalid {} '{}': {}", BIND_ADDR_VAR, addr, e),
            })?;
            builder = builder.bind_addr(addr);
        }

        if let Ok(path) = std::env::var(ENV_FILE_VAR) {
            builder = builder.env_file(path);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> ToolkitResult<()> {
        let named_env = self
            .env_file
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(ENV_FILE_NAME))
            .unwrap_or(false);
        if !named_env {
            return Err(ToolkitError::Configuration {
                message: format!(
                    "Environment file must be named {}: {}",
                    ENV_FILE_NAME,
                    self.env_file.display()
                ),
            });
        }
        Ok(())
    }

    /// Open the `.env` store this configuration points at
    pub fn env_store(&self) -> ToolkitResult<EnvFileStore> {
        EnvFileStore::new(self.env_file.clone())
    }
}

/// Builder for ServerConfig
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the bind address
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Set the `.env` file path
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.env_file = path.into();
        self
    }

    /// Set the logging configuration
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Build and validate; relative `.env` paths are resolved against the current directory
    pub fn build(mut self) -> ToolkitResult<ServerConfig> {
        self.config.validate()?;
        if self.config.env_file.is_relative() {
            self.config.env_file = std::env::current_dir()?.join(&self.config.env_file);
        }
        Ok(self.config)
    }
}
