//! Tests for the deployment endpoints.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use integrations_cohere_toolkit::config::{ConfigStore, EnvFileStore, InMemoryConfigStore};
use integrations_cohere_toolkit::errors::NO_AVAILABLE_DEPLOYMENTS_MESSAGE;
use integrations_cohere_toolkit::fixtures::test_registry;
use integrations_cohere_toolkit::mocks::MockConfigStore;
use integrations_cohere_toolkit::services::deployments::{
    DeploymentService, DeploymentServiceImpl,
};
use integrations_cohere_toolkit::{router, AppState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use test_case::test_case;
use tower::ServiceExt;

fn app(store: Arc<dyn ConfigStore>) -> Router {
    let service = DeploymentServiceImpl::new(Arc::new(test_registry()), store);
    router(AppState::new(Arc::new(service)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(Arc::new(MockConfigStore::new())), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_list_includes_only_configured_deployments() {
    let store = MockConfigStore::new()
        .with_var("COHERE_VAR_1", "TestCohereValue")
        .with_var("COHERE_VAR_2", "TestCohereValue")
        .with_var("SAGEMAKER_VAR_1", "TestSageMakerValue");

    let (status, body) = send(app(Arc::new(store)), get("/deployments")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Cohere Platform"]);
    assert_eq!(body[0]["is_available"], json!(true));
    assert_eq!(body[0]["models"], json!(["test"]));
    assert_eq!(body[0]["env_vars"], json!(["COHERE_VAR_1", "COHERE_VAR_2"]));
}

#[test_case("/deployments?all=1"; "one")]
#[test_case("/deployments?all=true"; "true")]
#[tokio::test]
async fn test_list_all_returns_every_deployment(uri: &str) {
    let (status, body) = send(app(Arc::new(MockConfigStore::new())), get(uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Cohere Platform", "SageMaker"]);
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["is_available"] == json!(false)));
}

#[test_case("/deployments"; "unset")]
#[test_case("/deployments?all=0"; "zero")]
#[test_case("/deployments?all=false"; "false")]
#[tokio::test]
async fn test_no_available_deployments(uri: &str) {
    let (status, body) = send(app(Arc::new(MockConfigStore::new())), get(uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": [NO_AVAILABLE_DEPLOYMENTS_MESSAGE]}));
}

#[tokio::test]
async fn test_list_rejects_unparseable_flag() {
    let (status, body) = send(
        app(Arc::new(MockConfigStore::new())),
        get("/deployments?all=maybe"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], json!("all"));
}

#[tokio::test]
async fn test_set_env_vars_writes_to_store() {
    let store = Arc::new(MockConfigStore::new());
    let (status, body) = send(
        app(store.clone()),
        post_json(
            "/deployments/Cohere+Platform/set_env_vars",
            json!({"env_vars": {"COHERE_VAR_1": "TestCohereValue"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    assert_eq!(
        store.writes(),
        vec![("COHERE_VAR_1".to_string(), "TestCohereValue".to_string())]
    );
}

#[tokio::test]
async fn test_set_env_vars_accepts_percent_encoded_name() {
    let store = Arc::new(MockConfigStore::new());
    let (status, _) = send(
        app(store.clone()),
        post_json(
            "/deployments/Cohere%20Platform/set_env_vars",
            json!({"env_vars": {"COHERE_VAR_2": "x"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.writes().len(), 1);
}

#[tokio::test]
async fn test_set_env_vars_escaped_plus_also_means_space() {
    let store = Arc::new(MockConfigStore::new());
    let (status, _) = send(
        app(store.clone()),
        post_json(
            "/deployments/Cohere%2BPlatform/set_env_vars",
            json!({"env_vars": {"COHERE_VAR_1": "x"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.writes().len(), 1);
}

#[tokio::test]
async fn test_set_env_vars_rejects_other_deployment_variables() {
    let store = Arc::new(MockConfigStore::new());
    let (status, body) = send(
        app(store.clone()),
        post_json(
            "/deployments/Cohere+Platform/set_env_vars",
            json!({"env_vars": {"SAGEMAKER_VAR_1": "TestSageMakerValue"}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"detail": "Environment variables not valid for deployment: SAGEMAKER_VAR_1"})
    );
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn test_set_env_vars_unknown_deployment() {
    let (status, body) = send(
        app(Arc::new(MockConfigStore::new())),
        post_json("/deployments/unknown/set_env_vars", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"detail": "Deployment unknown not found"}));
}

#[tokio::test]
async fn test_set_env_vars_store_failure_is_server_error() {
    let (status, _) = send(
        app(Arc::new(MockConfigStore::new().failing_writes())),
        post_json(
            "/deployments/SageMaker/set_env_vars",
            json!({"env_vars": {"SAGEMAKER_VAR_1": "x"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_set_env_vars_persists_to_env_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(".env"), "# toolkit\nUNRELATED=1\n").unwrap();
    let store = Arc::new(
        EnvFileStore::in_dir(dir.path())
            .unwrap()
            .with_process_fallback(false),
    );

    let (status, _) = send(
        app(store.clone()),
        post_json(
            "/deployments/Cohere+Platform/set_env_vars",
            json!({"env_vars": {"COHERE_VAR_1": "TestCohereValue"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let contents = std::fs::read_to_string(dir.path().join(".env")).unwrap();
    assert_eq!(contents, "# toolkit\nUNRELATED=1\nCOHERE_VAR_1=TestCohereValue\n");

    // Cohere Platform still needs COHERE_VAR_2
    let (status, _) = send(app(store.clone()), get("/deployments")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        app(store.clone()),
        post_json(
            "/deployments/Cohere+Platform/set_env_vars",
            json!({"env_vars": {"COHERE_VAR_2": "value with spaces"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, body) = send(app(store), get("/deployments")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Cohere Platform"]);
}

#[tokio::test]
async fn test_file_and_memory_stores_agree_on_availability() {
    let dir = TempDir::new().unwrap();
    let file_store = Arc::new(
        EnvFileStore::in_dir(dir.path())
            .unwrap()
            .with_process_fallback(false),
    );
    let memory_store = Arc::new(InMemoryConfigStore::new());

    let services: Vec<DeploymentServiceImpl> = vec![
        DeploymentServiceImpl::new(Arc::new(test_registry()), file_store),
        DeploymentServiceImpl::new(Arc::new(test_registry()), memory_store),
    ];

    for service in &services {
        let mut vars = std::collections::BTreeMap::new();
        vars.insert(
            "SAGEMAKER_VAR_1".to_string(),
            secrecy::SecretString::new("a".to_string()),
        );
        vars.insert(
            "SAGEMAKER_VAR_2".to_string(),
            secrecy::SecretString::new("b".to_string()),
        );
        service.set_env_vars("SageMaker", vars).await.unwrap();
    }

    let mut listings = Vec::new();
    for service in &services {
        listings.push(service.list_deployments(true).await.unwrap());
    }
    assert_eq!(listings[0], listings[1]);
    assert_eq!(
        listings[0]
            .iter()
            .map(|d| (d.name.as_str(), d.is_available))
            .collect::<Vec<_>>(),
        vec![("Cohere Platform", false), ("SageMaker", true)]
    );
}
