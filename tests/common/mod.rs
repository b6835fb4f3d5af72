//! Shared test fixtures: a throwaway backend and helpers for driving the app.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, State},
    http::{Request, Response, StatusCode, header},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const USER_ID: &str = "3b241101-e2bb-4255-8caf-4136c566a962";
pub const EMAIL: &str = "asha@example.com";
pub const PASSWORD: &str = "correct horse";

/// What the fake backend has been asked.
#[derive(Debug, Default)]
pub struct Recorded {
    pub questions: Vec<Value>,
    pub uploads: Vec<Vec<(String, String)>>,
}

async fn ask(State(rec): State<Arc<Mutex<Recorded>>>, Json(body): Json<Value>) -> impl IntoResponse {
    rec.lock().unwrap().questions.push(body.clone());
    let question = body["question"].as_str().unwrap_or_default();
    if question.contains("fail") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model offline").into_response();
    }
    if question.contains("structured") {
        return Json(json!({ "answer": { "total": 12 } })).into_response();
    }
    if question.contains("garbled") {
        return (StatusCode::OK, "not json").into_response();
    }
    Json(json!({ "answer": "12M" })).into_response()
}

async fn summaries(Json(body): Json<Value>) -> impl IntoResponse {
    if body["user_id"] != USER_ID {
        return Json(json!({ "summaries": [] }));
    }
    Json(json!({
        "summaries": [
            {
                "document_id": "d-1",
                "title": "Q3 Budget",
                "summary_text": "Quarterly spending plan",
                "department_id": "finance"
            },
            {
                "document_id": "d-2",
                "title": null,
                "summary_text": "Leave and salary guidelines",
                "department_id": "hr"
            }
        ]
    }))
}

async fn download(Json(body): Json<Value>) -> impl IntoResponse {
    let count = body["summaries"].as_array().map_or(0, Vec::len);
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        format!("%PDF-1.4 {count} summaries"),
    )
}

async fn translate(Json(body): Json<Value>) -> impl IntoResponse {
    let text = body["text"].as_str().unwrap_or_default();
    if text.is_empty() {
        return (StatusCode::BAD_REQUEST, "text is required").into_response();
    }
    Json(json!({ "translated_text": format!("[ml] {text}") })).into_response()
}

async fn upload(
    State(rec): State<Arc<Mutex<Recorded>>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = if name == "file" {
            field.file_name().unwrap_or_default().to_string()
        } else {
            field.text().await.unwrap()
        };
        fields.push((name, value));
    }
    rec.lock().unwrap().uploads.push(fields.clone());

    let get = |key: &str| {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    };
    if get("title") == "Duplicate report" {
        return Json(json!({
            "success": false,
            "errors": { "title": "A document with this title already exists" }
        }))
        .into_response();
    }
    if get("title") == "Orphan report" {
        return Json(json!({
            "success": false,
            "errors": { "uploaded_by": "Unknown uploader" },
            "message": "User not found"
        }))
        .into_response();
    }
    if get("title") == "Broken report" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "Storage is full" })),
        )
            .into_response();
    }
    Json(json!({ "success": true })).into_response()
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == EMAIL && body["password"] == PASSWORD {
        Json(json!({ "user_id": USER_ID, "name": "Asha" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "invalid credentials").into_response()
    }
}

async fn signup(Json(body): Json<Value>) -> impl IntoResponse {
    Json(json!({ "user_id": USER_ID, "name": body["name"] }))
}

/// Start a fake backend on an ephemeral port. Returns its base URL.
pub async fn spawn_backend() -> (String, Arc<Mutex<Recorded>>) {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let app = Router::new()
        .route("/rag/ask", post(ask))
        .route("/summary/summaries", post(summaries))
        .route("/summary/summaries/download", post(download))
        .route("/translate", post(translate))
        .route("/document/upload", post(upload))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .with_state(Arc::clone(&recorded));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), recorded)
}

/// Base URL where nothing is listening.
pub async fn dead_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Send one request through the router.
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` pairs from every Set-Cookie header.
pub fn set_cookies(response: &Response<Body>) -> Vec<(String, String)> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Browser-ish cookie jar for a sequence of requests.
#[derive(Debug, Default, Clone)]
pub struct Jar(pub Vec<(String, String)>);

impl Jar {
    pub fn absorb(&mut self, response: &Response<Body>) {
        for (name, value) in set_cookies(response) {
            self.0.retain(|(n, _)| *n != name);
            if !value.is_empty() {
                self.0.push((name, value));
            }
        }
    }

    pub fn header(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn with_cookies(builder: axum::http::request::Builder, jar: &Jar) -> axum::http::request::Builder {
    if jar.0.is_empty() {
        builder
    } else {
        builder.header(header::COOKIE, jar.header())
    }
}

pub fn get(uri: &str, jar: &Jar) -> Request<Body> {
    with_cookies(Request::get(uri), jar)
        .body(Body::empty())
        .unwrap()
}

pub fn form(uri: &str, jar: &Jar, body: &str, htmx: bool) -> Request<Body> {
    let mut builder = with_cookies(Request::post(uri), jar)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if htmx {
        builder = builder.header("hx-request", "true");
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub const BOUNDARY: &str = "docdesk-test-boundary";

/// Multipart body with text fields and at most one file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart(uri: &str, jar: &Jar, body: Vec<u8>, htmx: bool) -> Request<Body> {
    let mut builder = with_cookies(Request::post(uri), jar).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if htmx {
        builder = builder.header("hx-request", "true");
    }
    builder.body(Body::from(body)).unwrap()
}
