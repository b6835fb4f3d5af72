use axum::{
    Extension, Form,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use super::{is_htmx, load_listing};
use crate::AppState;
use crate::auth::Identity;
use crate::ui::{Listing, pages};

const TRANSLATE_FAILED: &str = "Translation failed. Please try again.";
const DOWNLOAD_FAILED: &str = "Could not generate the PDF. Please try again.";

#[derive(Debug, Deserialize)]
pub struct TranslateForm {
    #[serde(default)]
    document_id: String,
    #[serde(default)]
    text: String,
}

/// GET /summaries
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Html<String> {
    let listing = load_listing(&state, &identity).await;
    Html(pages::summaries(&identity, &listing))
}

/// POST /summaries/translate
pub async fn translate(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    headers: HeaderMap,
    Form(form): Form<TranslateForm>,
) -> Html<String> {
    let translated = match state.backend.translate().text(&form.text).await {
        Ok(text) => {
            info!(name: "summaries.translated", document_id = %form.document_id, "Summary translated");
            Ok(text)
        }
        Err(e) => {
            warn!(name: "summaries.translate.failed", document_id = %form.document_id, error = %e, "Translation failed");
            Err(TRANSLATE_FAILED)
        }
    };
    let result = translated.as_deref().map_err(|e| *e);

    if is_htmx(&headers) {
        Html(pages::translation(result))
    } else {
        Html(pages::translation_page(&identity, result))
    }
}

/// POST /summaries/download
pub async fn download(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Response {
    if identity.user().is_none() {
        return Redirect::to("/login?next=/summaries").into_response();
    }
    let Listing::Loaded(summaries) = load_listing(&state, &identity).await else {
        return (StatusCode::BAD_GATEWAY, DOWNLOAD_FAILED).into_response();
    };

    match state.backend.summaries().download_pdf(&summaries).await {
        Ok(pdf) => (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_static(r#"attachment; filename="summaries.pdf""#),
                ),
            ],
            pdf,
        )
            .into_response(),
        Err(e) => {
            warn!(name: "summaries.download.failed", error = %e, "PDF download failed");
            (StatusCode::BAD_GATEWAY, DOWNLOAD_FAILED).into_response()
        }
    }
}
