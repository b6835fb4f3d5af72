use axum::{
    extract::{Request, State},
    http::{Method, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use super::claims::UserSession;
use crate::AppState;
use crate::error::{Error, Result};

/// Cookie holding the signed identity token.
pub const AUTH_COOKIE: &str = "docdesk_auth";

/// Identity attached to every request by [`identity_middleware`].
#[derive(Debug, Clone, Default)]
pub struct Identity(pub Option<UserSession>);

impl Identity {
    #[must_use]
    pub fn user(&self) -> Option<&UserSession> {
        self.0.as_ref()
    }

    pub fn require(&self) -> Result<&UserSession> {
        self.0.as_ref().ok_or(Error::MissingSession)
    }
}

/// Build the identity cookie for a token.
#[must_use]
pub fn auth_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie used to clear the identity.
#[must_use]
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    cookie
}

pub async fn identity_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    // 1. Read the token cookie, if any
    let token = jar.get(AUTH_COOKIE).map(|c| c.value().to_string());

    // 2. Verify and maybe renew
    let mut renewed = None;
    let mut stale = false;
    let identity = match token {
        None => Identity::default(),
        Some(token) => match state.auth.verify(&token) {
            Ok(session) => {
                if request.method() == Method::GET && state.auth.needs_renewal(&session) {
                    match state.auth.renew(&session) {
                        Ok(issued) => renewed = Some(issued.token),
                        Err(e) => warn!(name: "auth.renew.failed", error = %e, "Could not renew session"),
                    }
                }
                Identity(Some(session))
            }
            Err(Error::SessionExpired) => {
                debug!(name: "auth.session.expired", "Identity cookie expired");
                stale = true;
                Identity::default()
            }
            Err(e) => {
                warn!(name: "auth.token.invalid", error = %e, "Clearing invalid identity cookie");
                stale = true;
                Identity::default()
            }
        },
    };

    // 3. Attach the identity
    request.extensions_mut().insert(identity);
    let response = next.run(request).await;

    // Handlers that set the identity themselves (login, logout) win
    let sets_identity = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|value| {
            value
                .to_str()
                .is_ok_and(|v| v.split('=').next() == Some(AUTH_COOKIE))
        });
    if sets_identity {
        return response;
    }
    match renewed {
        Some(token) => {
            let jar = CookieJar::new().add(auth_cookie(token, state.config.auth.secure_cookies));
            (jar, response).into_response()
        }
        None if stale => (jar.remove(removal_cookie()), response).into_response(),
        None => response,
    }
}
