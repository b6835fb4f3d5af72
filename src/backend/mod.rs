//! Client for the remote document backend.
//!
//! All durable state (documents, summaries, translations, answers) lives in
//! the backend. This module only speaks its HTTP API; nothing is cached.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::*;
