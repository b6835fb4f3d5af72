use axum::{Extension, Json, response::Html};
use serde_json::{Value, json};

use crate::auth::Identity;
use crate::ui::pages;

/// GET / - landing page.
pub async fn landing(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(pages::landing(&identity))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}
