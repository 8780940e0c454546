//! Deployments service.
//!
//! Lists the model deployments the toolkit knows about, reports whether each
//! has its environment configured, and persists deployment variables.

mod service;
mod types;

pub use service::{DeploymentService, DeploymentServiceImpl};
pub use types::{
    Deployment, DeploymentDefinition, DeploymentRegistry, ModelDeploymentName, UpdateDeploymentEnv,
};
