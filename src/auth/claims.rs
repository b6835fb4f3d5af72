//! Identity claims and the user session they describe.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub sub: String, // User ID (Subject)
    pub name: Option<String>,
    pub iat: i64, // Issued at (UNIX timestamp)
    pub exp: i64, // Expiration time (UNIX timestamp)
}

/// An authenticated user, valid until `expires_at`.
///
/// Every identity-scoped backend call takes one of these explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    user_id: String,
    display_name: Option<String>,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl UserSession {
    #[must_use]
    pub fn new(user_id: impl Into<String>, display_name: Option<String>, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            user_id: user_id.into(),
            display_name,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Name for greetings; falls back to the user id.
    #[must_use]
    pub fn greeting_name(&self) -> &str {
        self.display_name().unwrap_or(&self.user_id)
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time left before expiry (zero once expired).
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }

    /// Same user, fresh validity window.
    #[must_use]
    pub fn renewed(&self, ttl: Duration) -> Self {
        Self::new(self.user_id.clone(), self.display_name.clone(), ttl)
    }

    pub(crate) fn to_claims(&self) -> SessionClaims {
        SessionClaims {
            sub: self.user_id.clone(),
            name: self.display_name.clone(),
            iat: self.issued_at.timestamp(),
            exp: self.expires_at.timestamp(),
        }
    }

    pub(crate) fn from_claims(claims: SessionClaims) -> Self {
        let issued_at = DateTime::from_timestamp(claims.iat, 0).unwrap_or_default();
        let expires_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_default();
        Self {
            user_id: claims.sub,
            display_name: claims.name,
            issued_at,
            expires_at,
        }
    }
}
