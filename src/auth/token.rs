//! Signing and verifying identity tokens.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::claims::{SessionClaims, UserSession};
use crate::error::{Error, Result};

/// HS256 signer for [`UserSession`] tokens.
#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSigner").finish_non_exhaustive()
    }
}

impl SessionSigner {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn sign(&self, session: &UserSession) -> Result<String> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &session.to_claims(),
            &self.encoding,
        )?)
    }

    /// Decode a token. Expired tokens yield [`Error::SessionExpired`].
    pub fn verify(&self, token: &str) -> Result<UserSession> {
        match decode::<SessionClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(UserSession::from_claims(data.claims)),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(Error::SessionExpired),
            Err(e) => Err(Error::Token(e)),
        }
    }
}
