//! Chat widget controls.
//!
//! Each handler updates the browser's widget and answers with the widget
//! fragment for htmx, or a redirect back to the dashboard otherwise.

use axum::{
    Form,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{browser_session, is_htmx};
use crate::AppState;
use crate::chat::{ChatWidget, Completion, SourceChoice, Submission, UploadRead, is_accepted_upload};
use crate::session::Session;
use crate::ui::widget_fragment;

#[derive(Debug, Deserialize)]
pub struct SourceForm {
    #[serde(default)]
    source_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    question: String,
}

fn respond(headers: &HeaderMap, jar: CookieJar, session: &Session) -> Response {
    if is_htmx(headers) {
        let html = widget_fragment(&session.widget_snapshot());
        (jar, Html(html)).into_response()
    } else {
        (jar, Redirect::to("/dashboard")).into_response()
    }
}

/// Apply a synchronous widget operation and respond.
fn update(
    state: &AppState,
    headers: &HeaderMap,
    jar: CookieJar,
    op: impl FnOnce(&mut ChatWidget),
) -> Response {
    let (jar, session) = browser_session(state, jar);
    session.with_widget(op);
    respond(headers, jar, &session)
}

/// GET /chat/widget
pub async fn widget(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = browser_session(&state, jar);
    (jar, Html(widget_fragment(&session.widget_snapshot())))
}

/// POST /chat/open
pub async fn open(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Response {
    update(&state, &headers, jar, ChatWidget::open)
}

/// POST /chat/close
pub async fn close(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Response {
    update(&state, &headers, jar, ChatWidget::close)
}

/// POST /chat/reset
pub async fn reset(State(state): State<AppState>, headers: HeaderMap, jar: CookieJar) -> Response {
    update(&state, &headers, jar, ChatWidget::reset)
}

/// POST /chat/source
pub async fn select_source(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<SourceForm>,
) -> Response {
    let (jar, session) = browser_session(&state, jar);
    match session.with_widget(|w| w.select_source(&form.source_id)) {
        Ok(SourceChoice::Selected(source)) => {
            info!(name: "chat.source.selected", session_id = %session.id(), source = %source.id, "Knowledge source selected");
        }
        Ok(SourceChoice::FilePickerRequested) => {
            debug!(name: "chat.source.file_picker", session_id = %session.id(), "Custom upload requested");
        }
        Err(e) => {
            warn!(name: "chat.source.unknown", session_id = %session.id(), error = %e, "Rejected source selection");
            return (jar, (StatusCode::BAD_REQUEST, e.to_string())).into_response();
        }
    }
    respond(&headers, jar, &session)
}

/// POST /chat/upload
pub async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response {
    let (jar, session) = browser_session(&state, jar);

    let mut picked = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let read = match field.bytes().await {
                    Ok(bytes) if is_accepted_upload(&filename) => {
                        UploadRead::Read { bytes: bytes.len() }
                    }
                    Ok(_) => UploadRead::Failed,
                    Err(e) => {
                        warn!(name: "chat.upload.read_failed", error = %e, "Could not read uploaded file");
                        UploadRead::Failed
                    }
                };
                picked = Some((filename, read));
                break;
            }
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                warn!(name: "chat.upload.invalid", error = %e, "Malformed upload body");
                return (jar, (StatusCode::BAD_REQUEST, "Invalid upload")).into_response();
            }
        }
    }

    match picked {
        Some((filename, read)) if !filename.is_empty() => {
            session.with_widget(|w| w.attach_upload(&filename, read));
        }
        _ => debug!(name: "chat.upload.empty", session_id = %session.id(), "No file in upload"),
    }
    respond(&headers, jar, &session)
}

/// POST /chat/ask
///
/// The widget lock is released while the answer is awaited.
pub async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<AskForm>,
) -> Response {
    let (jar, session) = browser_session(&state, jar);

    match session.with_widget(|w| w.begin_question(&form.question)) {
        Submission::Dispatch(pending) => {
            info!(
                name: "chat.question.dispatched",
                session_id = %session.id(),
                source = ?pending.source_id,
                "Question dispatched"
            );
            let outcome = state.answers.ask(&pending.to_request()).await;
            let completion = session.with_widget(|w| w.complete(pending.token, outcome));
            if completion == Completion::Stale {
                debug!(name: "chat.question.discarded", session_id = %session.id(), "Answer arrived after reset");
            }
        }
        Submission::Busy => {
            debug!(name: "chat.question.busy", session_id = %session.id(), "Question refused while awaiting");
        }
        Submission::SourceRequired | Submission::Empty => {}
    }
    respond(&headers, jar, &session)
}
