// tests/service_api.rs
//! The HTTP contract of the animation service.

mod common;

use common::{animation_request, hourly_timestamps, MemorySource, Reply};
use pretty_assertions::assert_eq;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use wms_animator::{service, PipelineConfig, ServiceConfig, WmsAnimator, GIF_CONTENT_TYPE};

const TILE_ENDPOINT: &str = "https://maps.example.org/wms";

struct RunningService {
    addr: SocketAddr,
    stop: Option<oneshot::Sender<()>>,
    server: tokio::task::JoinHandle<wms_animator::Result<()>>,
}

impl RunningService {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.server.await.unwrap().unwrap();
    }
}

async fn start(source: MemorySource, config: ServiceConfig) -> RunningService {
    let animator = WmsAnimator::new(Arc::new(source), PipelineConfig::default())
        .with_canvas_provider(Arc::new(common::BlankCanvases));
    let app = service::router(animator, &config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let server = tokio::spawn(service::serve_until(
        listener,
        app,
        async move {
            let _ = stopped.await;
        },
        Duration::from_secs(5),
    ));

    RunningService {
        addr,
        stop: Some(stop),
        server,
    }
}

async fn post(url: &str, body: String) -> reqwest::Response {
    reqwest::Client::new()
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .unwrap()
}

async fn message_of(response: reqwest::Response) -> String {
    let body: serde_json::Value = serde_json::from_slice(&response.bytes().await.unwrap()).unwrap();
    body["message"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn valid_request_returns_a_gif() {
    let running = start(MemorySource::default(), ServiceConfig::default()).await;

    let request = animation_request(TILE_ENDPOINT, hourly_timestamps(3));
    let response = post(&running.url("/wms"), serde_json::to_string(&request).unwrap()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], GIF_CONTENT_TYPE);
    let bytes = response.bytes().await.unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");

    running.shutdown().await;
}

#[tokio::test]
async fn route_honours_base_path() {
    let config = ServiceConfig {
        base_path: "/animate".to_string(),
        ..ServiceConfig::default()
    };
    let running = start(MemorySource::default(), config).await;
    let body = serde_json::to_string(&animation_request(TILE_ENDPOINT, hourly_timestamps(1))).unwrap();

    let response = post(&running.url("/animate/wms"), body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post(&running.url("/wms"), body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    running.shutdown().await;
}

#[tokio::test]
async fn unparsable_body_is_a_bad_request() {
    let running = start(MemorySource::default(), ServiceConfig::default()).await;

    let response = post(&running.url("/wms"), "{\"url\": ".to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(message_of(response).await.starts_with("Malformed request body"));

    running.shutdown().await;
}

#[tokio::test]
async fn empty_value_list_is_a_bad_request() {
    let running = start(MemorySource::default(), ServiceConfig::default()).await;

    let request = animation_request(TILE_ENDPOINT, Vec::new());
    let response = post(&running.url("/wms"), serde_json::to_string(&request).unwrap()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    running.shutdown().await;
}

#[tokio::test]
async fn non_timestamp_values_are_a_bad_request() {
    let running = start(MemorySource::default(), ServiceConfig::default()).await;

    let request = animation_request(TILE_ENDPOINT, vec!["850hPa".to_string()]);
    let response = post(&running.url("/wms"), serde_json::to_string(&request).unwrap()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(message_of(response).await.contains("850hPa"));

    running.shutdown().await;
}

#[tokio::test]
async fn upstream_failure_is_a_bad_gateway() {
    let values = hourly_timestamps(3);
    let source = MemorySource::default().reply(&values[1], Reply::Status(503));
    let running = start(source, ServiceConfig::default()).await;

    let request = animation_request(TILE_ENDPOINT, values);
    let response = post(&running.url("/wms"), serde_json::to_string(&request).unwrap()).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(message_of(response).await.contains("Failed to fetch tile"));

    running.shutdown().await;
}

#[tokio::test]
async fn slow_upstream_times_out_with_503() {
    let config = ServiceConfig {
        write_timeout: Duration::from_millis(100),
        ..ServiceConfig::default()
    };
    let running = start(MemorySource::with_delay(Duration::from_secs(2)), config).await;

    let request = animation_request(TILE_ENDPOINT, hourly_timestamps(2));
    let response = post(&running.url("/wms"), serde_json::to_string(&request).unwrap()).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(message_of(response).await, "request timed out");

    running.shutdown().await;
}
