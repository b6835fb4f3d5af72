use axum::{
    Extension, Form,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::warn;

use super::safe_next;
use crate::AppState;
use crate::auth::{Identity, auth_cookie, removal_cookie};
use crate::backend::{Credentials, Registration};
use crate::error::Error;
use crate::ui::pages;

const REJECTED: &str = "Invalid email or password.";
const SIGNUP_REJECTED: &str = "Could not create the account. Check your details and try again.";
const UNREACHABLE: &str = "Could not reach the server. Please try again.";

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// Map a failed login/signup to a status and a user-facing message.
fn failure(error: &Error, rejected: &'static str) -> (StatusCode, &'static str) {
    match error {
        Error::Api { status, .. } if (400..500).contains(status) => {
            (StatusCode::UNAUTHORIZED, rejected)
        }
        _ => (StatusCode::BAD_GATEWAY, UNREACHABLE),
    }
}

/// GET /login
pub async fn login_page(
    Extension(identity): Extension<Identity>,
    Query(query): Query<NextQuery>,
) -> Html<String> {
    Html(pages::login(
        &identity,
        "",
        safe_next(query.next.as_deref()),
        None,
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = safe_next(form.next.as_deref()).to_string();
    let credentials = Credentials {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    match state.auth.login(&credentials).await {
        Ok(issued) => {
            let jar = jar.add(auth_cookie(issued.token, state.config.auth.secure_cookies));
            (jar, Redirect::to(&next)).into_response()
        }
        Err(e) => {
            warn!(name: "auth.login.failed", error = %e, "Login failed");
            let (status, message) = failure(&e, REJECTED);
            let page = pages::login(&identity, &credentials.email, &next, Some(message));
            (status, Html(page)).into_response()
        }
    }
}

/// GET /signup
pub async fn signup_page(Extension(identity): Extension<Identity>) -> Html<String> {
    Html(pages::signup(&identity, "", "", None))
}

/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Response {
    let registration = Registration {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        password: form.password,
    };

    match state.auth.signup(&registration).await {
        Ok(issued) => {
            let jar = jar.add(auth_cookie(issued.token, state.config.auth.secure_cookies));
            (jar, Redirect::to("/dashboard")).into_response()
        }
        Err(e) => {
            warn!(name: "auth.signup.failed", error = %e, "Signup failed");
            let (status, message) = failure(&e, SIGNUP_REJECTED);
            let page = pages::signup(
                &identity,
                &registration.name,
                &registration.email,
                Some(message),
            );
            (status, Html(page)).into_response()
        }
    }
}

/// POST /logout
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.remove(removal_cookie()), Redirect::to("/"))
}
