//! Server-rendered HTML.
//!
//! Pages are complete documents built around [`layout::html_shell`]; the chat
//! widget is a fragment that htmx swaps in place.
//!
//! # Structure
//!
//! - [`layout`]: page shell, banners and escaping
//! - [`pages`]: landing, auth, dashboard, summaries and upload pages
//! - [`chat`]: the floating chat widget

pub mod chat;
pub mod layout;
pub mod pages;

pub use chat::widget_fragment;
pub use layout::{Tone, escape, html_shell};
pub use pages::Listing;
