//! Login, signup and session renewal.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::info;

use super::claims::UserSession;
use super::token::SessionSigner;
use crate::backend::{AccountResponse, BackendClient, Credentials, Registration};
use crate::error::Result;

/// Source of truth for accounts.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AccountResponse>;
    async fn signup(&self, registration: &Registration) -> Result<AccountResponse>;
}

#[async_trait]
impl AuthProvider for BackendClient {
    async fn login(&self, credentials: &Credentials) -> Result<AccountResponse> {
        self.accounts().login(credentials).await
    }

    async fn signup(&self, registration: &Registration) -> Result<AccountResponse> {
        self.accounts().signup(registration).await
    }
}

/// A session together with its signed token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session: UserSession,
    pub token: String,
}

/// Turns account checks into signed, expiring sessions.
#[derive(Clone)]
pub struct Authenticator {
    provider: Arc<dyn AuthProvider>,
    signer: SessionSigner,
    ttl: Duration,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>, signer: SessionSigner, ttl: Duration) -> Self {
        Self {
            provider,
            signer,
            ttl,
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<IssuedSession> {
        let account = self.provider.login(credentials).await?;
        info!(name: "auth.login", user_id = %account.user_id, "User logged in");
        self.issue(account)
    }

    pub async fn signup(&self, registration: &Registration) -> Result<IssuedSession> {
        let account = self.provider.signup(registration).await?;
        info!(name: "auth.signup", user_id = %account.user_id, "User signed up");
        self.issue(account)
    }

    /// Check a token taken from a cookie.
    pub fn verify(&self, token: &str) -> Result<UserSession> {
        self.signer.verify(token)
    }

    /// Whether less than half of the validity window is left.
    #[must_use]
    pub fn needs_renewal(&self, session: &UserSession) -> bool {
        session.remaining_at(Utc::now()) < self.ttl / 2
    }

    /// Re-sign a still-valid session with a fresh expiry.
    pub fn renew(&self, session: &UserSession) -> Result<IssuedSession> {
        let session = session.renewed(self.ttl);
        let token = self.signer.sign(&session)?;
        Ok(IssuedSession { session, token })
    }

    fn issue(&self, account: AccountResponse) -> Result<IssuedSession> {
        let session = UserSession::new(account.user_id, account.name, self.ttl);
        let token = self.signer.sign(&session)?;
        Ok(IssuedSession { session, token })
    }
}
