//! Browser session management.
//!
//! This module provides in-memory session storage for per-browser state
//! across requests. Sessions are identified by a UUID held in a cookie and
//! own that browser's chat widget.
//!
//! # Architecture
//!
//! - [`Session`]: Represents a single browser session
//! - [`SessionStore`]: Thread-safe store for all active sessions
//!
//! # Example
//!
//! ```rust
//! use docdesk::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! session.with_widget(|widget| widget.open());
//!
//! assert!(session.widget_snapshot().is_open());
//! ```

mod store;

pub use store::{Session, SessionStore};

/// Cookie holding the browser session id.
pub const SESSION_COOKIE: &str = "docdesk_sid";
