//! Key/value configuration stores.
//!
//! Deployment availability and environment-variable updates go through the
//! [`ConfigStore`] trait instead of the process environment, so the backing
//! can be a `.env` file, memory, or a test double.

use super::dotenv::{is_valid_key, DotEnv};
use crate::errors::{ToolkitError, ToolkitResult};
use crate::ENV_FILE_NAME;
use async_trait::async_trait;
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// Store of configuration variables
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Current value of `key`, if any
    async fn get(&self, key: &str) -> ToolkitResult<Option<String>>;

    /// Persist `key` with `value`
    async fn set(&self, key: &str, value: &SecretString) -> ToolkitResult<()>;

    /// Whether `key` has a non-empty value
    async fn is_set(&self, key: &str) -> ToolkitResult<bool> {
        Ok(self
            .get(key)
            .await?
            .map(|value| !value.is_empty())
            .unwrap_or(false))
    }
}

fn check_key(key: &str) -> ToolkitResult<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(ToolkitError::InvalidArgument {
            message: format!("Invalid environment variable name: {}", key),
        })
    }
}

/// Store backed by a `.env` file.
///
/// The path is made absolute when the store is created, so later changes to
/// the working directory do not move it. Reads fall back to the process
/// environment unless disabled.
pub struct EnvFileStore {
    path: PathBuf,
    process_fallback: bool,
    write_lock: Mutex<()>,
}

impl EnvFileStore {
    /// Create a store for the given `.env` file
    pub fn new(path: impl Into<PathBuf>) -> ToolkitResult<Self> {
        let path = path.into();
        let is_env_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.ends_with(ENV_FILE_NAME))
            .unwrap_or(false);
        if !is_env_file {
            return Err(ToolkitError::Configuration {
                message: format!("Environment file must be named {}: {}", ENV_FILE_NAME, path.display()),
            });
        }

        let path = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()?.join(path)
        };

        Ok(Self {
            path,
            process_fallback: true,
            write_lock: Mutex::new(()),
        })
    }

    /// Create a store for `<dir>/.env`
    pub fn in_dir(dir: impl AsRef<Path>) -> ToolkitResult<Self> {
        Self::new(dir.as_ref().join(ENV_FILE_NAME))
    }

    /// Enable or disable reading from the process environment when the file has no entry
    pub fn with_process_fallback(mut self, enabled: bool) -> Self {
        self.process_fallback = enabled;
        self
    }

    /// Absolute path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> ToolkitResult<DotEnv> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(DotEnv::parse(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DotEnv::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ConfigStore for EnvFileStore {
    async fn get(&self, key: &str) -> ToolkitResult<Option<String>> {
        if let Some(value) = self.load().await?.get(key) {
            return Ok(Some(value.to_string()));
        }
        if self.process_fallback {
            return Ok(std::env::var(key).ok());
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &SecretString) -> ToolkitResult<()> {
        check_key(key)?;

        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        doc.set(key, value.expose_secret());

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, doc.render()).await?;

        debug!(key = key, path = %self.path.display(), "Wrote environment variable");
        Ok(())
    }
}

/// Store held in memory
#[derive(Default)]
pub struct InMemoryConfigStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl InMemoryConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset a variable
    pub fn with_var(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.write().insert(key.into(), value.into());
        self
    }

    /// Copy of all variables
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.read().clone()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self, key: &str) -> ToolkitResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &SecretString) -> ToolkitResult<()> {
        check_key(key)?;
        self.values
            .write()
            .insert(key.to_string(), value.expose_secret().clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_string())
    }

    #[test]
    fn test_env_file_store_path_is_absolute() {
        let store = EnvFileStore::new(".env").unwrap();
        assert!(store.path().is_absolute());
        assert!(store.path().ends_with(".env"));
    }

    #[test]
    fn test_env_file_store_rejects_other_file_names() {
        assert!(matches!(
            EnvFileStore::new("/tmp/config.toml"),
            Err(ToolkitError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_env_file_store_writes_and_reads() {
        let dir = TempDir::new().unwrap();
        let store = EnvFileStore::in_dir(dir.path())
            .unwrap()
            .with_process_fallback(false);

        assert!(!store.is_set("COHERE_VAR_1").await.unwrap());
        store.set("COHERE_VAR_1", &secret("TestCohereValue")).await.unwrap();

        assert_eq!(
            store.get("COHERE_VAR_1").await.unwrap().as_deref(),
            Some("TestCohereValue")
        );
        let contents = std::fs::read_to_string(dir.path().join(".env")).unwrap();
        assert_eq!(contents, "COHERE_VAR_1=TestCohereValue\n");
    }

    #[tokio::test]
    async fn test_env_file_store_keeps_unrelated_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "# settings\nOTHER=1\nCOHERE_VAR_1=old\n").unwrap();

        let store = EnvFileStore::new(&path).unwrap().with_process_fallback(false);
        store.set("COHERE_VAR_1", &secret("new")).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "# settings\nOTHER=1\nCOHERE_VAR_1=new\n");
    }

    #[tokio::test]
    async fn test_empty_value_is_not_set() {
        let store = InMemoryConfigStore::new().with_var("SAGEMAKER_VAR_1", "");
        assert!(!store.is_set("SAGEMAKER_VAR_1").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_key_is_rejected() {
        let store = InMemoryConfigStore::new();
        let result = store.set("NOT-A-KEY", &secret("x")).await;
        assert!(matches!(result, Err(ToolkitError::InvalidArgument { .. })));
        assert!(store.snapshot().is_empty());
    }
}
