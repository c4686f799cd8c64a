//! Axum app standing in for the OptiRoute REST backend

use axum::extract::{Multipart, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;

use optiroute_client::constants::defaults;

/// One multipart field the upload handler received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub contents: String,
}

/// A request the stub answered
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Upload {
        content_type: Option<String>,
        parts: Vec<RecordedPart>,
    },
    Results {
        job_id: String,
    },
}

type Reply = (StatusCode, Value);

#[derive(Clone)]
struct StubState {
    upload: Reply,
    results: Arc<HashMap<String, Reply>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Canned replies for the upload and results endpoints
#[derive(Debug, Default)]
pub struct HttpStubBuilder {
    upload: Option<Reply>,
    results: HashMap<String, Reply>,
}

impl HttpStubBuilder {
    pub fn upload(mut self, status: u16, body: Value) -> Self {
        self.upload = Some((status_code(status), body));
        self
    }

    pub fn results(mut self, job_id: &str, status: u16, body: Value) -> Self {
        self.results
            .insert(job_id.to_string(), (status_code(status), body));
        self
    }

    /// Bind an ephemeral port and serve until the test runtime shuts down
    pub async fn start(self) -> HttpStub {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            upload: self.upload.unwrap_or_else(not_found),
            results: Arc::new(self.results),
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route(defaults::UPLOAD_PATH, post(upload))
            .route(&format!("{}/:job_id", defaults::RESULTS_PATH), get(results))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server failed");
        });

        HttpStub { base_url, requests }
    }
}

#[derive(Clone)]
pub struct HttpStub {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl HttpStub {
    pub fn builder() -> HttpStubBuilder {
        HttpStubBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

async fn upload(
    State(state): State<StubState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let contents = field.text().await.unwrap_or_default();
        parts.push(RecordedPart {
            name,
            file_name,
            contents,
        });
    }

    state.requests.lock().push(RecordedRequest::Upload {
        content_type,
        parts,
    });

    let (status, body) = state.upload.clone();
    (status, Json(body))
}

async fn results(
    State(state): State<StubState>,
    Path(job_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().push(RecordedRequest::Results {
        job_id: job_id.clone(),
    });

    let (status, body) = state.results.get(&job_id).cloned().unwrap_or_else(not_found);
    (status, Json(body))
}

fn not_found() -> Reply {
    (StatusCode::NOT_FOUND, json!({"detail": "Not Found"}))
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap()
}
