//! Local HTTP stand-ins for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use tokio::net::TcpListener;

/// A request the mock server received.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

type Responder = dyn Fn(&Method, &str) -> (StatusCode, String) + Send + Sync;

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Captured>>>,
    responder: Arc<Responder>,
}

/// A running mock server.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockServer {
    /// Start a server on an ephemeral port; `responder` maps method and path
    /// to a status and body.
    pub async fn start(
        responder: impl Fn(&Method, &str) -> (StatusCode, String) + Send + Sync + 'static,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: Arc::clone(&requests),
            responder: Arc::new(responder),
        };
        let router = Router::new().fallback(capture).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose path matches exactly.
    pub fn requests_to(&self, path: &str) -> Vec<Captured> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn capture(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    let response = (state.responder)(&method, &path);
    state.requests.lock().unwrap().push(Captured {
        method,
        path,
        query: uri.query().map(str::to_string),
        headers,
        body,
    });
    response
}

/// A base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
