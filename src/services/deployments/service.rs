//! Deployments service implementation.

use super::types::{Deployment, DeploymentDefinition, DeploymentRegistry};
use crate::config::ConfigStore;
use crate::errors::{ToolkitError, ToolkitResult};
use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Deployments service trait for testability
#[async_trait]
pub trait DeploymentService: Send + Sync {
    /// List deployments, only the available ones unless `show_all` is set
    async fn list_deployments(&self, show_all: bool) -> ToolkitResult<Vec<Deployment>>;

    /// Persist environment variables belonging to the named deployment
    async fn set_env_vars(
        &self,
        deployment_name: &str,
        env_vars: BTreeMap<String, SecretString>,
    ) -> ToolkitResult<()>;
}

/// Implementation of the Deployments service
pub struct DeploymentServiceImpl {
    registry: Arc<DeploymentRegistry>,
    store: Arc<dyn ConfigStore>,
}

impl DeploymentServiceImpl {
    /// Create a new Deployments service
    pub fn new(registry: Arc<DeploymentRegistry>, store: Arc<dyn ConfigStore>) -> Self {
        Self { registry, store }
    }

    /// Whether every variable the deployment requires is set
    pub async fn is_available(&self, definition: &DeploymentDefinition) -> ToolkitResult<bool> {
        for var in &definition.env_vars {
            if !self.store.is_set(var).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl DeploymentService for DeploymentServiceImpl {
    async fn list_deployments(&self, show_all: bool) -> ToolkitResult<Vec<Deployment>> {
        let mut deployments = Vec::with_capacity(self.registry.len());
        for definition in self.registry.iter() {
            let available = self.is_available(definition).await?;
            if show_all || available {
                deployments.push(Deployment::from_definition(definition, available));
            }
        }

        if !show_all && deployments.is_empty() {
            warn!(known = self.registry.len(), "No deployment has its environment configured");
            return Err(ToolkitError::NoAvailableDeployments);
        }

        debug!(show_all = show_all, count = deployments.len(), "Listed deployments");
        Ok(deployments)
    }

    async fn set_env_vars(
        &self,
        deployment_name: &str,
        env_vars: BTreeMap<String, SecretString>,
    ) -> ToolkitResult<()> {
        let definition = self.registry.find(deployment_name).ok_or_else(|| {
            ToolkitError::not_found("deployment", format!("Deployment {} not found", deployment_name))
        })?;

        let invalid: Vec<&str> = env_vars
            .keys()
            .map(String::as_str)
            .filter(|key| !definition.owns_env_var(key))
            .collect();
        if !invalid.is_empty() {
            return Err(ToolkitError::InvalidArgument {
                message: format!(
                    "Environment variables not valid for deployment: {}",
                    invalid.join(",")
                ),
            });
        }

        for (key, value) in &env_vars {
            self.store.set(key, value).await?;
        }

        info!(
            deployment = %definition.name,
            variables = ?env_vars.keys().collect::<Vec<_>>(),
            "Updated deployment environment"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test_registry;
    use crate::mocks::MockConfigStore;

    fn service(store: Arc<MockConfigStore>) -> DeploymentServiceImpl {
        DeploymentServiceImpl::new(Arc::new(test_registry()), store)
    }

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, SecretString> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), SecretString::new(v.to_string())))
            .collect()
    }

    #[tokio::test]
    async fn test_lists_only_available_deployments() {
        let store = Arc::new(
            MockConfigStore::new()
                .with_var("COHERE_VAR_1", "a")
                .with_var("COHERE_VAR_2", "b")
                .with_var("SAGEMAKER_VAR_1", "c"),
        );

        let deployments = service(store).list_deployments(false).await.unwrap();
        assert_eq!(deployments.len(), 1);
        assert_eq!(deployments[0].name, "Cohere Platform");
        assert!(deployments[0].is_available);
    }

    #[tokio::test]
    async fn test_show_all_includes_unavailable() {
        let store = Arc::new(MockConfigStore::new());
        let deployments = service(store).list_deployments(true).await.unwrap();

        assert_eq!(deployments.len(), 2);
        assert!(deployments.iter().all(|d| !d.is_available));
    }

    #[tokio::test]
    async fn test_no_available_deployments() {
        let store = Arc::new(MockConfigStore::new());
        let result = service(store).list_deployments(false).await;
        assert!(matches!(result, Err(ToolkitError::NoAvailableDeployments)));
    }

    #[tokio::test]
    async fn test_set_env_vars_writes_each_variable() {
        let store = Arc::new(MockConfigStore::new());
        service(store.clone())
            .set_env_vars(
                "Cohere Platform",
                vars(&[("COHERE_VAR_1", "one"), ("COHERE_VAR_2", "two")]),
            )
            .await
            .unwrap();

        assert_eq!(
            store.writes(),
            vec![
                ("COHERE_VAR_1".to_string(), "one".to_string()),
                ("COHERE_VAR_2".to_string(), "two".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_set_env_vars_rejects_foreign_variables() {
        let store = Arc::new(MockConfigStore::new());
        let result = service(store.clone())
            .set_env_vars(
                "Cohere Platform",
                vars(&[("SAGEMAKER_VAR_1", "x"), ("COHERE_VAR_1", "y"), ("API_KEY", "z")]),
            )
            .await;

        match result {
            Err(ToolkitError::InvalidArgument { message }) => assert_eq!(
                message,
                "Environment variables not valid for deployment: API_KEY,SAGEMAKER_VAR_1"
            ),
            other => panic!("Expected invalid argument, got {:?}", other),
        }
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_set_env_vars_unknown_deployment() {
        let store = Arc::new(MockConfigStore::new());
        let result = service(store).set_env_vars("unknown", BTreeMap::new()).await;
        assert!(matches!(result, Err(ToolkitError::NotFound { .. })));
    }
}
