//! Workload roles served through the router

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mesh_gateway::{
    api::routes::create_router,
    backend::{HttpCaller, StaticResolver},
    config::{ServiceRole, Settings},
    AppState,
};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(settings: Settings) -> Router {
    let caller = HttpCaller::new(Arc::new(StaticResolver::default()), None).unwrap();
    let state = AppState::new(settings, Arc::new(caller)).unwrap();
    create_router(Arc::new(state))
}

fn settings_for(role: ServiceRole) -> Settings {
    let mut settings = Settings::default();
    settings.service.role = role;
    settings
}

async fn get(app: Router) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_cpu_workload() {
    let (status, body) = get(app(settings_for(ServiceRole::Cpu))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "CPU Task Done. Found 9592 primes.\n");
}

#[tokio::test]
async fn test_io_workload_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = dir.path().join("junk.dat");

    let mut settings = settings_for(ServiceRole::Io);
    settings.workload.io.path = scratch.to_string_lossy().into_owned();
    settings.workload.io.size_mb = 2;
    settings.workload.io.sync = true;

    let (status, body) = get(app(settings)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "I/O Stress Test Done\n");
    assert!(!scratch.exists());
}

#[tokio::test]
async fn test_io_workload_reports_filesystem_errors() {
    let dir = tempfile::tempdir().unwrap();

    let mut settings = settings_for(ServiceRole::Io);
    settings.workload.io.path = dir
        .path()
        .join("missing")
        .join("junk.dat")
        .to_string_lossy()
        .into_owned();
    settings.workload.io.size_mb = 1;

    let (status, body) = get(app(settings)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("IO error: "));
}

#[tokio::test]
async fn test_mem_workload() {
    let mut settings = settings_for(ServiceRole::Mem);
    settings.workload.mem.chunks = 2;
    settings.workload.mem.chunk_mb = 1;
    settings.workload.mem.pause_ms = 1;

    let app = app(settings);
    let (status, body) = get(app.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Allocated 2MB. Total chunks: 2\n");

    let (_, body) = get(app).await;
    assert_eq!(body, "Allocated 2MB. Total chunks: 2\n");
}

#[tokio::test]
async fn test_net_workload_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut settings = settings_for(ServiceRole::Net);
    settings.workload.net.url = server.uri();

    let (status, body) = get(app(settings)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Network Task Done. Status: 204 No Content\n");
}

#[tokio::test]
async fn test_net_workload_failure_is_text() {
    let mut settings = settings_for(ServiceRole::Net);
    settings.workload.net.url = "http://127.0.0.1:1".to_string();

    let (status, body) = get(app(settings)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Error: "));
}
