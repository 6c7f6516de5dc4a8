//! In-process mock of the store backend for client integration tests.
//!
//! Every request is recorded (method, path, query, bearer header and the
//! decoded multipart or JSON body). Responses are configured per
//! `METHOD path`; unconfigured routes answer 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use atelier_client::store::MemoryTokenStore;
use atelier_client::{AdminApi, ClientConfig, Session};
use axum::body::to_bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    File { file_name: Option<String>, len: usize },
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub fields: Vec<(String, Field)>,
    pub json: Option<Value>,
}

impl Recorded {
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .filter_map(|(_, f)| match f {
                Field::Text(t) => Some(t.clone()),
                Field::File { .. } => None,
            })
            .collect()
    }

    pub fn files(&self, name: &str) -> Vec<Option<String>> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .filter_map(|(_, f)| match f {
                Field::File { file_name, .. } => Some(file_name.clone()),
                Field::Text(_) => None,
            })
            .collect()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockBackend {
    pub base_url: String,
    state: MockState,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Answer `method path` (path without the `/api` prefix) with a JSON body.
    pub fn on(&self, method: &str, path: &str, status: u16, body: Value) {
        self.on_raw(method, path, status, &body.to_string());
    }

    pub fn on_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.state.responses.lock().unwrap().insert(
            format!("{method} {path}"),
            (StatusCode::from_u16(status).unwrap(), body.to_string()),
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request was recorded")
    }

    /// A client pointed at this backend with an in-memory token store.
    pub fn client(&self, token: Option<&str>) -> (AdminApi, Session) {
        self.client_with(ClientConfig::new(&self.base_url), token)
    }

    pub fn client_with(&self, config: ClientConfig, token: Option<&str>) -> (AdminApi, Session) {
        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        let session = Session::new(Arc::new(store));
        let api = AdminApi::new(config, session.clone()).unwrap();
        (api, session)
    }
}

async fn handle(State(state): State<MockState>, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request
        .uri()
        .path()
        .trim_start_matches("/api")
        .to_string();
    let query = request.uri().query().map(str::to_string);
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut fields = Vec::new();
    let mut json = None;
    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.unwrap();
            let value = if file_name.is_some() {
                Field::File {
                    file_name,
                    len: data.len(),
                }
            } else {
                Field::Text(String::from_utf8_lossy(&data).into_owned())
            };
            fields.push((name, value));
        }
    } else {
        let bytes = to_bytes(request.into_body(), usize::MAX).await.unwrap();
        json = serde_json::from_slice(&bytes).ok();
    }

    let key = format!("{method} {path}");
    state.requests.lock().unwrap().push(Recorded {
        method,
        path,
        query,
        authorization,
        fields,
        json,
    });

    let (status, body) = state
        .responses
        .lock()
        .unwrap()
        .get(&key)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, r#"{"message":"no such route"}"#.to_string()));

    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}
