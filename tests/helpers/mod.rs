//! Shared helpers: a wiremock stand-in for the video service and
//! request helpers that drive the router without a TCP listener.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use avatar_studio::app_state::AppState;
use avatar_studio::config::AppConfig;
use avatar_studio::routes;
use avatar_studio::services::heygen::HeyGenClient;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";

/// Replays a fixed list of JSON bodies, repeating the last one once exhausted.
pub struct Sequence {
    bodies: Vec<Value>,
    next: AtomicUsize,
}

impl Sequence {
    pub fn new(bodies: Vec<Value>) -> Self {
        assert!(!bodies.is_empty(), "sequence needs at least one body");
        Self {
            bodies,
            next: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _: &wiremock::Request) -> ResponseTemplate {
        let idx = self
            .next
            .fetch_add(1, Ordering::SeqCst)
            .min(self.bodies.len() - 1);
        ResponseTemplate::new(200).set_body_json(&self.bodies[idx])
    }
}

pub struct MockUpstream {
    pub server: MockServer,
}

impl MockUpstream {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> AppConfig {
        AppConfig::new(TEST_API_KEY, self.server.uri())
    }

    pub fn client(&self) -> Arc<HeyGenClient> {
        Arc::new(HeyGenClient::new(&self.config()).expect("client"))
    }

    pub async fn mount_generate(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/v2/video/generate"))
            .and(header("x-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_status_sequence(&self, video_id: &str, bodies: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/v1/video_status.get"))
            .and(query_param("video_id", video_id))
            .and(header("x-api-key", TEST_API_KEY))
            .respond_with(Sequence::new(bodies))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_status_raw(&self, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v1/video_status.get"))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_json(&self, http_method: &str, route: &str, body: Value) {
        Mock::given(method(http_method))
            .and(path(route))
            .and(header("x-api-key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Requests the mock server has seen on `route`.
    pub async fn requests_to(&self, route: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == route)
            .collect()
    }
}

pub fn status_body(status: &str) -> Value {
    json!({
        "code": 100,
        "message": "Success",
        "data": {
            "id": "vid_1",
            "status": status,
            "video_url": null,
            "error": null
        }
    })
}

pub fn completed_body(video_url: &str) -> Value {
    json!({
        "code": 100,
        "message": "Success",
        "data": {
            "id": "vid_1",
            "status": "completed",
            "video_url": video_url,
            "thumbnail_url": "https://x/t.jpg",
            "duration": 4.2,
            "error": null
        }
    })
}

/// Router wired exactly like the server binary, pointed at `config`.
pub fn build_test_app(config: &AppConfig) -> Router {
    let heygen = HeyGenClient::new(config).expect("client");
    let state = AppState::new(heygen, config);
    let prometheus = Arc::new(PrometheusBuilder::new().build_recorder().handle());
    routes::app(state, prometheus)
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}
