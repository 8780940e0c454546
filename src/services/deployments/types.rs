//! Types for the Deployments service.

use crate::config::dotenv::is_valid_key;
use crate::errors::{ToolkitError, ToolkitResult};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Deployments known out of the box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelDeploymentName {
    /// Cohere's hosted API
    CoherePlatform,
    /// Amazon SageMaker endpoint
    SageMaker,
    /// Azure AI endpoint
    Azure,
    /// Amazon Bedrock
    Bedrock,
}

impl ModelDeploymentName {
    /// Every built-in deployment, in listing order
    pub const ALL: [ModelDeploymentName; 4] = [
        ModelDeploymentName::CoherePlatform,
        ModelDeploymentName::SageMaker,
        ModelDeploymentName::Azure,
        ModelDeploymentName::Bedrock,
    ];

    /// Display name, also used as the identifier in URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelDeploymentName::CoherePlatform => "Cohere Platform",
            ModelDeploymentName::SageMaker => "SageMaker",
            ModelDeploymentName::Azure => "Azure",
            ModelDeploymentName::Bedrock => "Bedrock",
        }
    }
}

impl fmt::Display for ModelDeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelDeploymentName {
    type Err = ToolkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ToolkitError::not_found("deployment", format!("Deployment {} not found", s)))
    }
}

/// Static description of a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDefinition {
    /// Deployment identifier
    pub name: String,
    /// Models served by the deployment
    pub models: Vec<String>,
    /// Environment variables that must all be set for the deployment to be available
    pub env_vars: Vec<String>,
}

impl DeploymentDefinition {
    /// Create a definition with no models or variables
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Vec::new(),
            env_vars: Vec::new(),
        }
    }

    /// Set the served models
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Set the required environment variables
    pub fn with_env_vars<I, S>(mut self, env_vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars = env_vars.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `key` is one of this deployment's variables
    pub fn owns_env_var(&self, key: &str) -> bool {
        self.env_vars.iter().any(|var| var == key)
    }
}

/// A deployment as reported to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Deployment identifier
    pub name: String,
    /// Models served by the deployment
    pub models: Vec<String>,
    /// Required environment variables
    pub env_vars: Vec<String>,
    /// Whether every required variable is set
    pub is_available: bool,
}

impl Deployment {
    /// Report a definition with its availability
    pub fn from_definition(definition: &DeploymentDefinition, is_available: bool) -> Self {
        Self {
            name: definition.name.clone(),
            models: definition.models.clone(),
            env_vars: definition.env_vars.clone(),
            is_available,
        }
    }
}

/// Body of an environment-variable update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDeploymentEnv {
    /// Variable name to value
    #[serde(default)]
    pub env_vars: BTreeMap<String, SecretString>,
}

/// Ordered set of known deployments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRegistry {
    definitions: Vec<DeploymentDefinition>,
}

impl DeploymentRegistry {
    /// Create a registry; names must be unique and variables valid env names
    pub fn new(definitions: Vec<DeploymentDefinition>) -> ToolkitResult<Self> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.name.as_str()) {
                return Err(ToolkitError::Configuration {
                    message: format!("Duplicate deployment: {}", definition.name),
                });
            }
            if let Some(bad) = definition.env_vars.iter().find(|var| !is_valid_key(var)) {
                return Err(ToolkitError::Configuration {
                    message: format!(
                        "Deployment {} declares invalid environment variable {}",
                        definition.name, bad
                    ),
                });
            }
        }
        Ok(Self { definitions })
    }

    /// The deployments shipped with the toolkit
    pub fn builtin() -> Self {
        let definitions = ModelDeploymentName::ALL
            .into_iter()
            .map(builtin_definition)
            .collect();
        Self { definitions }
    }

    /// Look up a deployment by name
    pub fn find(&self, name: &str) -> Option<&DeploymentDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Iterate deployments in listing order
    pub fn iter(&self) -> impl Iterator<Item = &DeploymentDefinition> {
        self.definitions.iter()
    }

    /// Number of deployments
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn builtin_definition(name: ModelDeploymentName) -> DeploymentDefinition {
    let definition = DeploymentDefinition::new(name.as_str());
    match name {
        ModelDeploymentName::CoherePlatform => definition
            .with_models(["command-r-plus", "command-r", "command", "command-light"])
            .with_env_vars(["COHERE_API_KEY"]),
        ModelDeploymentName::SageMaker => definition.with_models(["command-r"]).with_env_vars([
            "SAGE_MAKER_ACCESS_KEY",
            "SAGE_MAKER_SECRET_KEY",
            "SAGE_MAKER_SESSION_TOKEN",
            "SAGE_MAKER_REGION_NAME",
            "SAGE_MAKER_ENDPOINT_NAME",
        ]),
        ModelDeploymentName::Azure => definition
            .with_models(["azure-command"])
            .with_env_vars(["AZURE_API_KEY", "AZURE_CHAT_ENDPOINT_URL"]),
        ModelDeploymentName::Bedrock => definition
            .with_models(["cohere.command-r-plus-v1:0"])
            .with_env_vars([
                "BEDROCK_ACCESS_KEY",
                "BEDROCK_SECRET_KEY",
                "BEDROCK_SESSION_TOKEN",
                "BEDROCK_REGION_NAME",
            ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_registry_matches_names() {
        let registry = DeploymentRegistry::builtin();
        assert_eq!(registry.len(), ModelDeploymentName::ALL.len());
        for name in ModelDeploymentName::ALL {
            let definition = registry.find(name.as_str()).unwrap();
            assert!(!definition.env_vars.is_empty());
            assert!(!definition.models.is_empty());
        }
        assert!(DeploymentRegistry::new(registry.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn test_deployment_name_round_trip() {
        assert_eq!(
            "Cohere Platform".parse::<ModelDeploymentName>().unwrap(),
            ModelDeploymentName::CoherePlatform
        );
        assert!("unknown".parse::<ModelDeploymentName>().is_err());
    }

    #[test]
    fn test_registry_rejects_duplicates_and_bad_vars() {
        let duplicate = DeploymentRegistry::new(vec![
            DeploymentDefinition::new("A"),
            DeploymentDefinition::new("A"),
        ]);
        assert!(matches!(duplicate, Err(ToolkitError::Configuration { .. })));

        let bad_var = DeploymentRegistry::new(vec![
            DeploymentDefinition::new("A").with_env_vars(["NOT A VAR"]),
        ]);
        assert!(matches!(bad_var, Err(ToolkitError::Configuration { .. })));
    }

    #[test]
    fn test_owns_env_var() {
        let definition = DeploymentDefinition::new("Cohere Platform")
            .with_env_vars(["COHERE_VAR_1", "COHERE_VAR_2"]);
        assert!(definition.owns_env_var("COHERE_VAR_2"));
        assert!(!definition.owns_env_var("SAGEMAKER_VAR_1"));
    }

    #[test]
    fn test_deployment_serialization() {
        let definition = DeploymentDefinition::new("SageMaker")
            .with_models(["test"])
            .with_env_vars(["SAGEMAKER_VAR_1"]);
        let value = serde_json::to_value(Deployment::from_definition(&definition, false)).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "SageMaker",
                "models": ["test"],
                "env_vars": ["SAGEMAKER_VAR_1"],
                "is_available": false
            })
        );
    }

    #[test]
    fn test_update_body_defaults_to_empty() {
        let update: UpdateDeploymentEnv = serde_json::from_value(json!({})).unwrap();
        assert!(update.env_vars.is_empty());

        let update: UpdateDeploymentEnv =
            serde_json::from_value(json!({"env_vars": {"B": "2", "A": "1"}})).unwrap();
        assert_eq!(update.env_vars.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
