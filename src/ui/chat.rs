//! Chat widget fragment.
//!
//! Every control is a plain form so the widget works without JavaScript;
//! with htmx present each form swaps the whole `#chat-widget` element.

use std::fmt::Write as _;

use super::layout::escape;
use crate::chat::{ACCEPTED_UPLOAD_EXTENSIONS, ChatWidget, Message, Sender, catalog};

/// Shown while an answer is outstanding.
pub const TYPING_LABEL: &str = "Gathering Info";

const SWAP: &str = r##"hx-target="#chat-widget" hx-swap="outerHTML""##;

fn accept_attr() -> String {
    ACCEPTED_UPLOAD_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn bubble(message: &Message) -> String {
    let side = match message.sender {
        Sender::User => "bubble bubble-user",
        Sender::Bot => "bubble bubble-bot",
    };
    format!(
        r#"<li class="{side}" id="{id}"><p>{text}</p><time datetime="{stamp}">{clock}</time></li>"#,
        id = message.id,
        text = escape(&message.text()),
        stamp = message.timestamp.to_rfc3339(),
        clock = message.clock_time(),
    )
}

fn source_picker() -> String {
    let mut out = String::from(
        r#"<div class="source-picker"><p class="muted">Choose what you want to ask about:</p>"#,
    );
    for source in catalog() {
        if source.is_upload_trigger() {
            let _ = write!(
                out,
                r#"<form method="post" action="/chat/upload" enctype="multipart/form-data" hx-post="/chat/upload" hx-encoding="multipart/form-data" {SWAP} class="source-option">
                    <label><strong>{name}</strong><span class="muted">{description}</span>
                        <input type="file" name="file" accept="{accept}" required>
                    </label>
                    <button type="submit">Upload</button>
                </form>"#,
                name = escape(&source.name),
                description = escape(&source.description),
                accept = accept_attr(),
            );
        } else {
            let _ = write!(
                out,
                r#"<form method="post" action="/chat/source" hx-post="/chat/source" {SWAP} class="source-option">
                    <input type="hidden" name="source_id" value="{id}">
                    <button type="submit"><strong>{name}</strong><span class="muted">{description}</span></button>
                </form>"#,
                id = escape(&source.id),
                name = escape(&source.name),
                description = escape(&source.description),
            );
        }
    }
    out.push_str("</div>");
    out
}

/// Render the widget in its current state.
#[must_use]
pub fn widget_fragment(widget: &ChatWidget) -> String {
    if !widget.is_open() {
        return format!(
            r#"<div id="chat-widget" class="chat-widget chat-closed">
    <form method="post" action="/chat/open" hx-post="/chat/open" {SWAP}>
        <button type="submit" class="chat-launcher" aria-label="Open assistant">💬</button>
    </form>
</div>"#
        );
    }

    let transcript: String = widget.transcript().iter().map(bubble).collect();
    let picker = if widget.shows_source_picker() {
        source_picker()
    } else {
        String::new()
    };
    let scope = widget.selected_source().map_or_else(String::new, |s| {
        format!(r#"<p class="chat-scope muted">Asking about: {}</p>"#, escape(&s.name))
    });
    let typing = if widget.is_typing() {
        format!(r#"<p class="typing">{TYPING_LABEL}…</p>"#)
    } else {
        String::new()
    };
    let disabled = if widget.accepts_input() { "" } else { " disabled" };

    format!(
        r##"<div id="chat-widget" class="chat-widget chat-open" data-state="{state}">
    <header class="chat-header">
        <h2>Document Assistant</h2>
        <div class="chat-actions">
            <form method="post" action="/chat/reset" hx-post="/chat/reset" {SWAP}><button type="submit" title="Start over">↺</button></form>
            <form method="post" action="/chat/close" hx-post="/chat/close" {SWAP}><button type="submit" title="Close">✕</button></form>
        </div>
    </header>
    {scope}
    <ol class="transcript">{transcript}</ol>
    {picker}
    {typing}
    <p class="typing htmx-indicator" id="chat-pending">{TYPING_LABEL}…</p>
    <form method="post" action="/chat/ask" hx-post="/chat/ask" hx-indicator="#chat-pending" hx-disabled-elt="find input, find button" {SWAP} class="chat-input">
        <input type="text" name="question" placeholder="Ask a question about your documents" autocomplete="off"{disabled}>
        <button type="submit"{disabled}>Send</button>
    </form>
</div>"##,
        state = widget.state().as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AskResponse;
    use crate::chat::{Submission, UploadRead};
    use serde_json::json;

    #[test]
    fn test_closed_widget_is_a_launcher() {
        let html = widget_fragment(&ChatWidget::new());
        assert!(html.contains("chat-closed"));
        assert!(html.contains(r#"action="/chat/open""#));
        assert!(!html.contains("transcript"));
    }

    #[test]
    fn test_open_widget_shows_picker() {
        let mut widget = ChatWidget::new();
        widget.open();
        let html = widget_fragment(&widget);
        assert!(html.contains(r#"data-state="source_selection""#));
        assert!(html.contains(r#"value="policy_manual""#));
        assert!(html.contains(r#"accept=".txt,.md,.json,.pdf,.docx""#));
        assert!(!html.contains(" disabled"));
    }

    #[test]
    fn test_transcript_is_escaped_and_ordered() {
        let mut widget = ChatWidget::new();
        widget.open();
        widget.select_source("technical_docs").unwrap();
        let Submission::Dispatch(pending) = widget.begin_question("<b>salary</b>?") else {
            panic!("expected dispatch");
        };

        let html = widget_fragment(&widget);
        assert!(html.contains("&lt;b&gt;salary&lt;/b&gt;?"));
        assert!(html.contains(r#"<p class="typing">Gathering Info…</p>"#));
        assert!(html.contains(" disabled"));
        assert!(!html.contains("source-picker"));

        widget.complete(
            pending.token,
            Ok(AskResponse {
                answer: json!("Grade pay"),
            }),
        );
        let html = widget_fragment(&widget);
        let selected = html.find("Selected: HR Document").unwrap();
        let answer = html.find("Grade pay").unwrap();
        assert!(selected < answer);
        assert!(!html.contains(r#"<p class="typing">"#));
    }

    #[test]
    fn test_uploaded_source_named_in_scope() {
        let mut widget = ChatWidget::new();
        widget.open();
        widget.attach_upload("notes.md", UploadRead::Read { bytes: 12 });
        let html = widget_fragment(&widget);
        assert!(html.contains("Asking about: notes.md"));
        assert!(html.contains("📄 Uploaded: notes.md"));
    }
}
