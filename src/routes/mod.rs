//! HTTP handlers.
//!
//! - [`pages`]: landing page and health check
//! - [`auth`]: login, signup and logout
//! - [`documents`]: dashboard and upload form
//! - [`summaries`]: summaries viewer, translation and PDF download
//! - [`chat`]: chat widget controls
//! - [`api`]: JSON views of the widget

pub mod api;
pub mod auth;
pub mod chat;
pub mod documents;
pub mod pages;
pub mod summaries;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use crate::AppState;
use crate::auth::Identity;
use crate::session::{SESSION_COOKIE, Session};
use crate::ui::Listing;

/// All application routes, without middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::landing))
        .route("/health", get(pages::health))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/dashboard", get(documents::dashboard))
        .route("/upload", get(documents::upload_page).post(documents::upload))
        .route("/summaries", get(summaries::list))
        .route("/summaries/translate", post(summaries::translate))
        .route("/summaries/download", post(summaries::download))
        .route("/chat/widget", get(chat::widget))
        .route("/chat/open", post(chat::open))
        .route("/chat/close", post(chat::close))
        .route("/chat/reset", post(chat::reset))
        .route("/chat/source", post(chat::select_source))
        .route("/chat/upload", post(chat::upload))
        .route("/chat/ask", post(chat::ask))
        .route("/api/chat/transcript", get(api::transcript))
        .route("/api/chat/sources", get(api::sources))
}

/// Whether the request came from htmx and expects a fragment.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Find this browser's session, starting a new one when the cookie is
/// missing or stale. The returned jar carries the cookie for new sessions.
pub(crate) fn browser_session(state: &AppState, jar: CookieJar) -> (CookieJar, Session) {
    let known = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let session = state.sessions.resolve(known.as_deref());
    if known.as_deref() == Some(session.id()) {
        return (jar, session);
    }

    let cookie = Cookie::build((SESSION_COOKIE, session.id().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.auth.secure_cookies)
        .build();
    (jar.add(cookie), session)
}

/// Fetch the signed-in user's summaries for a page.
pub(crate) async fn load_listing(state: &AppState, identity: &Identity) -> Listing {
    let Some(user) = identity.user() else {
        return Listing::SignedOut;
    };
    match state.backend.summaries().list(user).await {
        Ok(summaries) => Listing::Loaded(summaries),
        Err(e) => {
            warn!(name: "summaries.load.failed", user_id = %user.user_id(), error = %e, "Could not load summaries");
            Listing::Unavailable
        }
    }
}

/// Only same-site absolute paths are followed after login.
pub(crate) fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/dashboard",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/upload")), "/upload");
        assert_eq!(safe_next(Some("//evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("https://evil.example")), "/dashboard");
        assert_eq!(safe_next(None), "/dashboard");
    }
}
