//! Embedded question-answering chat widget.
//!
//! # Architecture
//!
//! - [`ChatWidget`]: per-browser controller (state machine + transcript)
//! - [`AnswerBackend`]: seam to the RAG answer endpoint
//! - [`KnowledgeSource`]: the fixed source catalog and uploaded-file sources
//!
//! # Example
//!
//! ```rust
//! use docdesk::chat::{ChatWidget, Submission, WidgetState};
//!
//! let mut widget = ChatWidget::new();
//! widget.open();
//! widget.select_source("policy_manual").unwrap();
//! assert_eq!(widget.state(), WidgetState::Conversing);
//!
//! let Submission::Dispatch(pending) = widget.begin_question("What is the Q3 budget?") else {
//!     unreachable!();
//! };
//! assert_eq!(pending.source_id.as_deref(), Some("policy_manual"));
//! assert_eq!(widget.state(), WidgetState::Awaiting);
//! ```

mod message;
mod source;
mod widget;

pub use message::{Message, MessageBody, MessageId, Sender, render_answer};
pub use source::{
    ACCEPTED_UPLOAD_EXTENSIONS, CUSTOM_UPLOAD_ID, KnowledgeSource, UPLOADED_SOURCE_ID, catalog,
    find_source, is_accepted_upload,
};
pub use widget::{
    AnswerBackend, ChatWidget, Completion, FALLBACK_MESSAGE, PendingQuestion, RequestToken,
    SELECT_SOURCE_PROMPT, SourceChoice, Submission, UPLOAD_READ_ERROR, UploadRead, WidgetState,
};
