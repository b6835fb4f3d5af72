//! User identity.
//!
//! Identity is an explicit [`UserSession`] value: it is signed into a cookie,
//! checked by [`identity_middleware`] on every request, renewed when more
//! than half of its lifetime has passed, and handed to every backend call
//! that needs a user.

pub mod claims;
pub mod middleware;
pub mod provider;
pub mod token;

pub use claims::{SessionClaims, UserSession};
pub use middleware::{AUTH_COOKIE, Identity, auth_cookie, identity_middleware, removal_cookie};
pub use provider::{AuthProvider, Authenticator, IssuedSession};
pub use token::SessionSigner;
