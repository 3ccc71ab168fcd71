//! Gateway and composite services wired to HttpCaller

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mesh_gateway::{
    api::routes::create_router,
    backend::{HttpCaller, StaticResolver},
    config::{ServiceRole, Settings},
    gateway::LATENCY_HEADER,
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend(body: &str, delay_ms: u64, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

fn app(role: ServiceRole, resolver: StaticResolver) -> Router {
    let mut settings = Settings::default();
    settings.service.role = role;
    let caller = HttpCaller::new(Arc::new(resolver), None).unwrap();
    let state = AppState::new(settings, Arc::new(caller)).unwrap();
    create_router(Arc::new(state))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<u64>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let latency = response
        .headers()
        .get(LATENCY_HEADER)
        .map(|v| v.to_str().unwrap().parse::<u64>().unwrap());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, latency, String::from_utf8(body.to_vec()).unwrap())
}

fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
}

#[tokio::test]
async fn test_cpu_route_passes_body_through() {
    let cpu = backend("CPU Task Done. Found 9592 primes.\n", 25, 1).await;
    let resolver = StaticResolver::default().with_override("svc-cpu", cpu.uri());

    let (status, latency, body) = get(app(ServiceRole::Gateway, resolver), "/cpu").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "CPU Task Done. Found 9592 primes.\n");
    assert!(latency.unwrap() >= 25);
}

#[tokio::test]
async fn test_unreachable_backend_keeps_ok_status() {
    let resolver = StaticResolver::default().with_override("svc-mem", refused_url());

    let (status, latency, body) = get(app(ServiceRole::Gateway, resolver), "/mem").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Error: "));
    assert!(latency.is_some());
}

#[tokio::test]
async fn test_chain_over_http() {
    let cpu = backend("CPU Task Done. Found 9592 primes.\n", 0, 1).await;
    let resolver = StaticResolver::default().with_override("svc-cpu", cpu.uri());

    let (status, latency, body) = get(app(ServiceRole::Chain, resolver), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "Chain Complete. Downstream said: CPU Task Done. Found 9592 primes.\n"
    );
    assert!(latency.is_none());
}

#[tokio::test]
async fn test_chain_with_downstream_down() {
    let resolver = StaticResolver::default().with_override("svc-cpu", refused_url());

    let (status, _, body) = get(app(ServiceRole::Chain, resolver), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("Error calling downstream: "));
    assert!(!body.starts_with("Error calling downstream: Error: "));
}

#[tokio::test]
async fn test_fanout_over_http_hits_both_backends() {
    let cpu = backend("cpu\n", 40, 1).await;
    let io = backend("io\n", 40, 1).await;
    let resolver = StaticResolver::default()
        .with_override("svc-cpu", cpu.uri())
        .with_override("svc-io", io.uri());

    let (status, _, body) = get(app(ServiceRole::Fanout, resolver), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Fanout Complete.\n");
    // Both servers verify their single expected call on drop
}

#[tokio::test]
async fn test_gateway_to_fanout_two_hops() {
    let cpu = backend("cpu\n", 0, 1).await;
    let io = backend("io\n", 0, 1).await;
    let fanout_resolver = StaticResolver::default()
        .with_override("svc-cpu", cpu.uri())
        .with_override("svc-io", io.uri());

    // Serve the fan-out role on a real socket so the gateway can reach it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let fanout_addr = listener.local_addr().unwrap();
    let fanout_app = app(ServiceRole::Fanout, fanout_resolver);
    tokio::spawn(async move {
        axum::serve(listener, fanout_app).await.unwrap();
    });

    let gateway_resolver =
        StaticResolver::default().with_override("svc-fanout", format!("http://{}", fanout_addr));

    let (status, latency, body) = get(app(ServiceRole::Gateway, gateway_resolver), "/fanout").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Fanout Complete.\n");
    assert!(latency.is_some());
}
