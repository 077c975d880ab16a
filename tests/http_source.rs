//! End-to-end tests of the HTTP source against a local canned-response server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use collectwatch::data::DashboardState;
use collectwatch::ui::alerts::{alerts_display, AlertsDisplay};
use collectwatch::{
    refresh_cycle, DashboardSource, FetchError, HttpSource, SampleSource, Severity, SourceKind,
    Thresholds, Trigger,
};

const HEALTH: &str = r#"{"overall_score": 85.5, "status": "good",
    "system": {"cpu_percent": 45.2, "memory_percent": 62.8, "disk_percent": 34.1}}"#;
const QUALITY: &str = r#"{"completeness": 0.95, "consistency": 0.88, "accuracy": 0.92,
    "timeliness": 0.85, "validity": 0.97, "uniqueness": 0.94}"#;
const COLLECTION: &str = r#"[
    {"name": "College Scorecard API", "status": "healthy", "records": 6543, "last_update": "2 minutes ago"},
    {"name": "Legacy FTP", "status": "stale", "records": 0, "last_update": "3 days ago"}
]"#;

type Routes = HashMap<&'static str, (u16, &'static str)>;

fn healthy_routes() -> Routes {
    HashMap::from([
        ("/api/health", (200, HEALTH)),
        ("/api/quality", (200, QUALITY)),
        ("/api/collection-status", (200, COLLECTION)),
        ("/api/alerts", (200, "[]")),
    ])
}

/// Serve `routes` until the test ends. Unknown paths get a 404.
async fn serve(routes: Routes) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/");
                let (status, body) = routes.get(path).copied().unwrap_or((404, "not found"));
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

fn source_for(addr: SocketAddr) -> HttpSource {
    HttpSource::builder()
        .endpoint(format!("http://{}/", addr))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_cycle_against_healthy_backend() {
    let addr = serve(healthy_routes()).await;
    let source = source_for(addr);

    let outcome = refresh_cycle(&source, Trigger::Initial).await;
    assert_eq!(outcome.failure_count(), 0);

    let mut state = DashboardState::new();
    let summary = state.apply(outcome, &Thresholds::default());
    assert_eq!(summary.updated.len(), 4);
    assert!(summary.failed.is_empty());

    let health = state.health.as_ref().unwrap();
    assert_eq!(
        health.bands(),
        [Severity::Nominal, Severity::Nominal, Severity::Nominal, Severity::Nominal]
    );
    assert_eq!(
        state.quality.unwrap().series(),
        [0.95, 0.88, 0.92, 0.85, 0.97, 0.94]
    );
    assert_eq!(state.collection.len(), 2);
    assert_eq!(state.collection[1].status.label(), "stale");
    assert_eq!(alerts_display(&state.alerts), AlertsDisplay::Placeholder);
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let mut routes = healthy_routes();
    routes.insert("/api/quality", (500, "boom"));
    let addr = serve(routes).await;

    let err = source_for(addr).fetch_quality().await.unwrap_err();
    assert!(matches!(err, FetchError::Http(ref msg) if msg.contains("500")));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mut routes = healthy_routes();
    routes.insert("/api/collection-status", (200, r#"[{"name": "broken"#));
    let addr = serve(routes).await;

    let err = source_for(addr).fetch_collection_status().await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn test_missing_endpoint_is_http_error() {
    let mut routes = healthy_routes();
    routes.remove("/api/alerts");
    let addr = serve(routes).await;

    let err = source_for(addr).fetch_alerts().await.unwrap_err();
    assert!(matches!(err, FetchError::Http(ref msg) if msg.contains("404")));
}

#[tokio::test]
async fn test_failed_source_keeps_previous_values() {
    let thresholds = Thresholds::default();
    let mut state = DashboardState::new();
    state.apply(
        refresh_cycle(&SampleSource::new(), Trigger::Initial).await,
        &thresholds,
    );
    let previous_quality = state.quality;

    let mut routes = healthy_routes();
    routes.insert("/api/quality", (503, "unavailable"));
    routes.insert("/api/health", (200, r#"{"overall_score": 55.0, "status": "critical",
        "system": {"cpu_percent": 90.0, "memory_percent": 40.0, "disk_percent": 75.0}}"#));
    let addr = serve(routes).await;

    let summary = state.apply(
        refresh_cycle(&source_for(addr), Trigger::Timer).await,
        &thresholds,
    );
    assert_eq!(summary.failed, vec![SourceKind::Quality]);

    // Quality untouched, everything else replaced
    assert_eq!(state.quality, previous_quality);
    let health = state.health.as_ref().unwrap();
    assert_eq!(health.overall_score, 55.0);
    assert_eq!(
        health.bands(),
        [Severity::Critical, Severity::Critical, Severity::Nominal, Severity::Warning]
    );
    assert_eq!(state.collection.len(), 2);
    assert!(state.alerts.is_empty());
    assert_eq!(state.history.len(), 2);
}

#[tokio::test]
async fn test_unreachable_backend_fails_every_source() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let outcome = refresh_cycle(&source_for(addr), Trigger::Manual).await;
    assert_eq!(outcome.failure_count(), 4);

    let mut state = DashboardState::new();
    let summary = state.apply(outcome, &Thresholds::default());
    assert_eq!(summary.failed.len(), SourceKind::ALL.len());
    assert!(state.health.is_none());
    assert!(state.last_updated().is_none());
}
