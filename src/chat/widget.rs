//! Chat widget controller.
//!
//! The controller is plain synchronous state. A question goes through two
//! steps so that callers never hold the widget across the network call:
//!
//! 1. [`ChatWidget::begin_question`] appends the user message and hands back a
//!    [`PendingQuestion`] carrying a [`RequestToken`].
//! 2. [`ChatWidget::complete`] appends the answer (or the fallback) if the
//!    token is still the outstanding one.
//!
//! [`ChatWidget::ask`] chains both steps for callers that own the widget.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::message::{Message, MessageId, Sender, render_answer};
use super::source::{KnowledgeSource, find_source};
use crate::backend::types::{AskRequest, AskResponse};
use crate::error::Result;

/// Bot message appended when a question cannot be answered.
pub const FALLBACK_MESSAGE: &str = "⚠️ Error connecting to server.";

/// Bot message appended when a question arrives before a source is chosen.
pub const SELECT_SOURCE_PROMPT: &str = "Please select a file source first to get started.";

/// Bot message appended when an uploaded file could not be read.
pub const UPLOAD_READ_ERROR: &str = "❌ Error reading the file. Please try again.";

/// Anything that can answer a question against a knowledge source.
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    async fn ask(&self, request: &AskRequest) -> Result<AskResponse>;
}

/// Observable widget state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    Closed,
    SourceSelection,
    Conversing,
    Awaiting,
}

impl WidgetState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::SourceSelection => "source_selection",
            Self::Conversing => "conversing",
            Self::Awaiting => "awaiting",
        }
    }
}

/// Identifies one dispatched question.
///
/// Tokens from before a reset never match again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
    message: MessageId,
}

/// A question that has been accepted and must now be sent.
#[derive(Debug, Clone)]
pub struct PendingQuestion {
    pub token: RequestToken,
    pub question: String,
    pub source_id: Option<String>,
}

impl PendingQuestion {
    /// Request body for the answer endpoint.
    #[must_use]
    pub fn to_request(&self) -> AskRequest {
        AskRequest {
            question: self.question.clone(),
            selected_file: self.source_id.clone(),
        }
    }
}

/// Result of submitting a question.
#[derive(Debug, Clone)]
pub enum Submission {
    /// Blank input; nothing happened.
    Empty,
    /// A request is already outstanding; nothing happened.
    Busy,
    /// No source selected; a prompt was appended and the picker re-shown.
    SourceRequired,
    /// The user message was appended; the question must be sent.
    Dispatch(PendingQuestion),
}

/// Result of completing a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Answered,
    Failed,
    /// The token was invalidated (reset) or already completed.
    Stale,
}

/// Result of choosing a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceChoice {
    Selected(KnowledgeSource),
    /// The custom upload entry: the caller should open a file picker.
    FilePickerRequested,
}

/// Outcome of reading a file picked for a custom upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRead {
    Read { bytes: usize },
    Failed,
}

/// State of one floating chat panel.
#[derive(Debug, Clone)]
pub struct ChatWidget {
    open: bool,
    transcript: Vec<Message>,
    selected: Option<KnowledgeSource>,
    show_source_picker: bool,
    typing: bool,
    pending: Option<RequestToken>,
    generation: u64,
    next_id: u64,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    #[must_use]
    pub fn new() -> Self {
        Self {
            open: false,
            transcript: Vec::new(),
            selected: None,
            show_source_picker: true,
            typing: false,
            pending: None,
            generation: 0,
            next_id: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> WidgetState {
        if !self.open {
            WidgetState::Closed
        } else if self.typing {
            WidgetState::Awaiting
        } else if self.show_source_picker {
            WidgetState::SourceSelection
        } else {
            WidgetState::Conversing
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    #[must_use]
    pub fn selected_source(&self) -> Option<&KnowledgeSource> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn shows_source_picker(&self) -> bool {
        self.show_source_picker
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Whether the question input accepts text.
    #[must_use]
    pub fn accepts_input(&self) -> bool {
        !self.typing && (self.selected.is_some() || self.show_source_picker)
    }

    pub fn open(&mut self) {
        self.open = true;
        if self.transcript.is_empty() {
            self.selected = None;
            self.show_source_picker = true;
        }
    }

    /// Hide the panel. Transcript, selection and any outstanding request
    /// are kept.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Choose a catalog entry by id.
    pub fn select_source(&mut self, source_id: &str) -> Result<SourceChoice> {
        let source = find_source(source_id)?;
        if source.is_upload_trigger() {
            return Ok(SourceChoice::FilePickerRequested);
        }

        self.show_source_picker = false;
        self.push(
            format!("Selected: {} - {}", source.name, source.description),
            Sender::User,
        );
        self.push(
            format!(
                "Great! I'm now ready to answer questions about the {}. What would you like to know?",
                source.name.to_lowercase()
            ),
            Sender::Bot,
        );
        self.selected = Some(source.clone());
        Ok(SourceChoice::Selected(source))
    }

    /// Scope the widget to a user-supplied file.
    ///
    /// The file contents stay local: nothing is forwarded to the backend yet,
    /// so answers still come from whatever the backend associates with
    /// `custom_uploaded`.
    pub fn attach_upload(&mut self, filename: &str, read: UploadRead) {
        self.selected = Some(KnowledgeSource::uploaded(filename));
        self.show_source_picker = false;
        self.push(format!("📄 Uploaded: {filename}"), Sender::User);

        match read {
            UploadRead::Read { bytes } => {
                warn!(
                    name: "chat.upload.not_forwarded",
                    file = %filename,
                    bytes,
                    "Custom upload accepted locally; contents are not sent to the backend"
                );
                self.push(
                    format!(
                        "File uploaded successfully! I can now answer questions about the content of \"{filename}\". What would you like to know?"
                    ),
                    Sender::Bot,
                );
            }
            UploadRead::Failed => {
                self.push(UPLOAD_READ_ERROR, Sender::Bot);
            }
        }
    }

    /// Accept a question for dispatch.
    pub fn begin_question(&mut self, text: &str) -> Submission {
        if text.trim().is_empty() {
            return Submission::Empty;
        }
        if self.pending.is_some() {
            return Submission::Busy;
        }
        if self.selected.is_none() && !self.show_source_picker {
            self.push(SELECT_SOURCE_PROMPT, Sender::Bot);
            self.show_source_picker = true;
            return Submission::SourceRequired;
        }

        let message = self.push(text, Sender::User);
        let token = RequestToken {
            generation: self.generation,
            message,
        };
        self.pending = Some(token);
        self.typing = true;

        Submission::Dispatch(PendingQuestion {
            token,
            question: text.to_string(),
            source_id: self.selected.as_ref().map(|s| s.id.clone()),
        })
    }

    /// Record the outcome of a dispatched question.
    pub fn complete(&mut self, token: RequestToken, outcome: Result<AskResponse>) -> Completion {
        if self.pending != Some(token) {
            debug!(
                name: "chat.response.stale",
                message_id = %token.message,
                "Discarding response for an invalidated request"
            );
            return Completion::Stale;
        }
        self.pending = None;
        self.typing = false;

        match outcome {
            Ok(response) => {
                self.push(render_answer(&response.answer), Sender::Bot);
                Completion::Answered
            }
            Err(e) => {
                warn!(name: "chat.ask.failed", error = %e, "Question could not be answered");
                self.push(FALLBACK_MESSAGE, Sender::Bot);
                Completion::Failed
            }
        }
    }

    /// Submit a question and wait for the answer.
    pub async fn ask<B>(&mut self, backend: &B, text: &str) -> Submission
    where
        B: AnswerBackend + ?Sized,
    {
        let submission = self.begin_question(text);
        if let Submission::Dispatch(pending) = &submission {
            let outcome = backend.ask(&pending.to_request()).await;
            self.complete(pending.token, outcome);
        }
        submission
    }

    /// Back to an empty transcript with the source picker showing.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.selected = None;
        self.show_source_picker = true;
        self.typing = false;
        self.pending = None;
        self.generation += 1;
        self.open = true;
    }

    fn push(&mut self, body: impl Into<super::message::MessageBody>, sender: Sender) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.transcript.push(Message::new(id, body, sender));
        id
    }
}
