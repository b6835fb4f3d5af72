use axum::{
    Json,
    extract::State,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use super::browser_session;
use crate::AppState;
use crate::chat::{KnowledgeSource, Message, WidgetState, catalog};

/// JSON view of one browser's widget.
#[derive(Debug, Serialize)]
pub struct TranscriptView {
    pub session_id: String,
    pub state: WidgetState,
    pub selected_source: Option<KnowledgeSource>,
    pub show_source_picker: bool,
    pub typing: bool,
    pub messages: Vec<Message>,
}

/// GET /api/chat/transcript
pub async fn transcript(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = browser_session(&state, jar);
    let widget = session.widget_snapshot();
    let view = TranscriptView {
        session_id: session.id().to_string(),
        state: widget.state(),
        selected_source: widget.selected_source().cloned(),
        show_source_picker: widget.shows_source_picker(),
        typing: widget.is_typing(),
        messages: widget.transcript().to_vec(),
    };
    (jar, Json(view))
}

/// GET /api/chat/sources
pub async fn sources() -> Json<Vec<KnowledgeSource>> {
    Json(catalog())
}
