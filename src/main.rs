//! Toolkit server binary.

use integrations_cohere_toolkit::{
    serve, AppState, DeploymentRegistry, DeploymentServiceImpl, ServerConfig,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::from_env()?;
    config.logging.init()?;

    let store = Arc::new(config.env_store()?);
    let registry = Arc::new(DeploymentRegistry::builtin());
    info!(
        deployments = registry.len(),
        env_file = %store.path().display(),
        "Loaded deployment registry"
    );

    let state = AppState::new(Arc::new(DeploymentServiceImpl::new(registry, store)));
    serve(&config, state).await?;
    Ok(())
}
