//! DocDesk
//!
//! A server-rendered document-management frontend over a remote document
//! backend: login and signup, a dashboard of document summaries, summary
//! translation and PDF download, document upload, and a floating chat
//! widget that asks questions against a chosen knowledge source.
//!
//! # Architecture
//!
//! - **Server**: Axum with htmx fragments; every form also works without JavaScript
//! - **Backend**: typed reqwest client for the answer, summary, translation,
//!   upload and account endpoints
//! - **Identity**: signed cookie carrying an explicit [`auth::UserSession`]
//! - **Chat**: per-browser [`chat::ChatWidget`] state machine held in memory
//!
//! # Modules
//!
//! - [`auth`]: identity sessions, tokens and the identity middleware
//! - [`backend`]: backend client and wire types
//! - [`chat`]: chat widget controller and knowledge sources
//! - [`documents`]: upload validation and dashboard filtering
//! - [`session`]: browser session store
//! - [`ui`]: HTML rendering
//! - [`routes`]: HTTP handlers

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod auth;
pub mod backend;
pub mod chat;
pub mod config;
pub mod documents;
pub mod error;
pub mod routes;
pub mod server;
pub mod session;
pub mod ui;

pub use error::{Error, Result};

use std::sync::Arc;

use auth::{AuthProvider, Authenticator, SessionSigner};
use backend::BackendClient;
use chat::AnswerBackend;
use config::AppConfig;
use session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Global configuration.
    pub config: Arc<AppConfig>,
    /// Client for summaries, translation and uploads.
    pub backend: BackendClient,
    /// Answers chat questions.
    pub answers: Arc<dyn AnswerBackend>,
    /// Issues and verifies identity cookies.
    pub auth: Arc<Authenticator>,
    /// Browser sessions owning the chat widgets.
    pub sessions: SessionStore,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend)
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State wired to the configured backend for every collaborator.
    pub fn new(config: Arc<AppConfig>) -> Result<Self> {
        let backend = BackendClient::new(&config.backend.base_url)
            .map_err(|e| Error::Config(format!("backend.base_url: {e}")))?;
        let answers: Arc<dyn AnswerBackend> = Arc::new(backend.clone());
        let accounts: Arc<dyn AuthProvider> = Arc::new(backend.clone());
        Ok(Self::with_parts(config, backend, answers, accounts))
    }

    /// State with explicit collaborators.
    #[must_use]
    pub fn with_parts(
        config: Arc<AppConfig>,
        backend: BackendClient,
        answers: Arc<dyn AnswerBackend>,
        accounts: Arc<dyn AuthProvider>,
    ) -> Self {
        let signer = SessionSigner::new(&config.auth.jwt_secret);
        let auth = Arc::new(Authenticator::new(
            accounts,
            signer,
            config.auth.session_ttl(),
        ));
        Self {
            config,
            backend,
            answers,
            auth,
            sessions: SessionStore::new(),
        }
    }
}
