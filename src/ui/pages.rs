//! Full pages.

use std::fmt::Write as _;

use super::layout::{Tone, banner, escape, html_shell};
use crate::auth::Identity;
use crate::backend::Summary;
use crate::documents::{ALL_DEPARTMENTS, DocumentFilter, FieldErrors, UploadForm, departments};

/// Summaries as far as the page could load them.
#[derive(Debug, Clone)]
pub enum Listing {
    /// No identity; nothing was requested.
    SignedOut,
    /// The backend call failed.
    Unavailable,
    Loaded(Vec<Summary>),
}

const SIGN_IN_PROMPT: &str = "Log in to see your documents.";
const LOAD_FAILED: &str = "Could not load documents. Please try again later.";

pub fn landing(identity: &Identity) -> String {
    let cta = if identity.user().is_some() {
        r#"<a href="/dashboard" class="button button-primary">Open dashboard</a>"#
    } else {
        r#"<a href="/signup" class="button button-primary">Get started</a>
           <a href="/login" class="button">Log in</a>"#
    };
    let content = format!(
        r#"<section class="hero">
    <h1>Every document, one place</h1>
    <p class="lead">Browse summaries, translate them, upload new documents and ask questions across finance, HR and operations material.</p>
    <div class="hero-actions">{cta}</div>
</section>
<section class="features">
    <article class="card"><h3>Summaries</h3><p>Short summaries of every document, downloadable as PDF.</p></article>
    <article class="card"><h3>Translation</h3><p>Translate a summary into Malayalam with one click.</p></article>
    <article class="card"><h3>Assistant</h3><p>Ask questions against a chosen document collection.</p></article>
</section>"#
    );
    html_shell("Welcome", identity, &content)
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors.get(field).map_or_else(String::new, |msg| {
        format!(r#"<p class="field-error" id="{field}-error">{}</p>"#, escape(msg))
    })
}

/// Login form. `next` is carried through to the redirect after success.
pub fn login(identity: &Identity, email: &str, next: &str, error: Option<&str>) -> String {
    let notice = error.map_or_else(String::new, |e| banner(Tone::Error, e));
    let content = format!(
        r#"<section class="auth-card card">
    <h1>Log in</h1>
    {notice}
    <form method="post" action="/login" class="stack">
        <input type="hidden" name="next" value="{next}">
        <label>Email <input type="email" name="email" value="{email}" required></label>
        <label>Password <input type="password" name="password" required></label>
        <button type="submit" class="button button-primary">Log in</button>
    </form>
    <p class="muted">No account? <a href="/signup">Sign up</a></p>
</section>"#,
        next = escape(next),
        email = escape(email),
    );
    html_shell("Log in", identity, &content)
}

pub fn signup(identity: &Identity, name: &str, email: &str, error: Option<&str>) -> String {
    let notice = error.map_or_else(String::new, |e| banner(Tone::Error, e));
    let content = format!(
        r#"<section class="auth-card card">
    <h1>Create an account</h1>
    {notice}
    <form method="post" action="/signup" class="stack">
        <label>Name <input type="text" name="name" value="{name}" required></label>
        <label>Email <input type="email" name="email" value="{email}" required></label>
        <label>Password <input type="password" name="password" required></label>
        <button type="submit" class="button button-primary">Sign up</button>
    </form>
    <p class="muted">Already registered? <a href="/login">Log in</a></p>
</section>"#,
        name = escape(name),
        email = escape(email),
    );
    html_shell("Sign up", identity, &content)
}

fn document_card(summary: &Summary) -> String {
    format!(
        r#"<article class="card document">
    <header><span class="doc-icon">📄</span><h3>{title}</h3><span class="tag">{department}</span></header>
    <p>{text}</p>
</article>"#,
        title = escape(summary.display_title()),
        department = escape(&summary.department_id),
        text = escape(&summary.summary_text),
    )
}

fn filter_bar(filter: &DocumentFilter, summaries: &[Summary]) -> String {
    let mut options = String::new();
    let selected = |value: &str| {
        let current = if filter.department.is_empty() {
            ALL_DEPARTMENTS
        } else {
            filter.department.as_str()
        };
        if current == value { " selected" } else { "" }
    };
    let _ = write!(
        options,
        r#"<option value="{ALL_DEPARTMENTS}"{}>All</option>"#,
        selected(ALL_DEPARTMENTS)
    );
    for dept in departments(summaries) {
        let _ = write!(
            options,
            r#"<option value="{v}"{s}>{v}</option>"#,
            v = escape(&dept),
            s = selected(&dept)
        );
    }
    format!(
        r##"<form method="get" action="/dashboard" class="filter-bar" hx-get="/dashboard" hx-target="#app" hx-select="#app" hx-trigger="input changed delay:300ms from:input, change from:select" hx-push-url="true">
    <input type="search" name="q" value="{q}" placeholder="Search documents">
    <select name="department">{options}</select>
    <button type="submit" class="button">Filter</button>
</form>"##,
        q = escape(&filter.q),
    )
}

/// Dashboard: filtered documents plus the chat widget.
pub fn dashboard(
    identity: &Identity,
    listing: &Listing,
    filter: &DocumentFilter,
    widget: &str,
) -> String {
    let body = match listing {
        Listing::SignedOut => banner(Tone::Info, SIGN_IN_PROMPT),
        Listing::Unavailable => banner(Tone::Error, LOAD_FAILED),
        Listing::Loaded(summaries) => {
            let shown = filter.apply(summaries);
            let cards: String = if shown.is_empty() {
                r#"<p class="muted empty">No documents match your filters.</p>"#.to_string()
            } else {
                shown.into_iter().map(document_card).collect()
            };
            format!(
                r#"{bar}<div class="document-grid">{cards}</div>"#,
                bar = filter_bar(filter, summaries)
            )
        }
    };
    let greeting = identity.user().map_or_else(String::new, |u| {
        format!(r#"<p class="lead">Welcome back, {}.</p>"#, escape(u.greeting_name()))
    });
    let content = format!(
        r#"<section class="page-head"><h1>Documents</h1>{greeting}</section>
{body}
{widget}"#
    );
    html_shell("Dashboard", identity, &content)
}

fn summary_card(summary: &Summary) -> String {
    format!(
        r##"<article class="card summary" id="summary-{id}">
    <h3>{title}</h3>
    <p>{text}</p>
    <form method="post" action="/summaries/translate" hx-post="/summaries/translate" hx-target="#translation-{id}" hx-swap="innerHTML">
        <input type="hidden" name="document_id" value="{id}">
        <input type="hidden" name="text" value="{text}">
        <button type="submit" class="button">Translate</button>
    </form>
    <div class="translation" id="translation-{id}"></div>
</article>"##,
        id = escape(&summary.document_id),
        title = escape(summary.display_title()),
        text = escape(&summary.summary_text),
    )
}

pub fn summaries(identity: &Identity, listing: &Listing) -> String {
    let body = match listing {
        Listing::SignedOut => banner(Tone::Info, SIGN_IN_PROMPT),
        Listing::Unavailable => banner(Tone::Error, LOAD_FAILED),
        Listing::Loaded(list) if list.is_empty() => {
            r#"<p class="muted empty">No summaries yet.</p>"#.to_string()
        }
        Listing::Loaded(list) => {
            let cards: String = list.iter().map(summary_card).collect();
            format!(
                r#"<form method="post" action="/summaries/download" class="toolbar">
    <button type="submit" class="button">Download PDF</button>
</form>
<div class="summary-list">{cards}</div>"#
            )
        }
    };
    let content = format!(r#"<section class="page-head"><h1>Summaries</h1></section>{body}"#);
    html_shell("Summaries", identity, &content)
}

/// Result of translating one summary, swapped under its card.
pub fn translation(result: Result<&str, &str>) -> String {
    match result {
        Ok(text) => format!(r#"<p class="translated" lang="ml">{}</p>"#, escape(text)),
        Err(message) => banner(Tone::Error, message),
    }
}

/// Translation shown on its own page when htmx is not available.
pub fn translation_page(identity: &Identity, result: Result<&str, &str>) -> String {
    let content = format!(
        r#"<section class="page-head"><h1>Translation</h1></section>
<article class="card">{}</article>
<p><a href="/summaries">Back to summaries</a></p>"#,
        translation(result)
    );
    html_shell("Translation", identity, &content)
}

fn choice_options(values: &[&str], current: &str, placeholder: &str) -> String {
    let mut out = format!(r#"<option value="">{placeholder}</option>"#);
    for value in values {
        let selected = if *value == current { " selected" } else { "" };
        let mut label = value.to_string();
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        let _ = write!(out, r#"<option value="{value}"{selected}>{label}</option>"#);
    }
    out
}

/// Upload form, re-rendered with inline errors after a failed submit.
pub fn upload(
    identity: &Identity,
    form: &UploadForm,
    errors: &FieldErrors,
    notice: Option<(Tone, &str)>,
) -> String {
    let notice = notice.map_or_else(String::new, |(tone, text)| banner(tone, text));
    let content = format!(
        r#"<section class="page-head"><h1>Upload Document</h1></section>
{notice}
<form method="post" action="/upload" enctype="multipart/form-data" class="card stack upload-form">
    <label>Title <input type="text" name="title" value="{title}"></label>
    {title_error}
    <label>Type <select name="type">{types}</select></label>
    {type_error}
    <label>Language <select name="language">{languages}</select></label>
    {language_error}
    <label>File <input type="file" name="file"></label>
    {file_error}
    <button type="submit" class="button button-primary">Upload Document</button>
</form>"#,
        title = escape(&form.title),
        title_error = field_error(errors, "title"),
        types = choice_options(
            crate::documents::DOCUMENT_TYPES,
            &form.doc_type,
            "Select document type"
        ),
        type_error = field_error(errors, "type"),
        languages = choice_options(crate::documents::LANGUAGES, &form.language, "Select language"),
        language_error = field_error(errors, "language"),
        file_error = field_error(errors, "file"),
    );
    html_shell("Upload Document", identity, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, title: &str, dept: &str) -> Summary {
        Summary {
            document_id: id.into(),
            title: Some(title.into()),
            summary_text: format!("About {title}"),
            department_id: dept.into(),
        }
    }

    #[test]
    fn test_dashboard_filters_cards() {
        let listing = Listing::Loaded(vec![
            summary("1", "Budget", "finance"),
            summary("2", "Leave", "hr"),
        ]);
        let filter = DocumentFilter {
            q: String::new(),
            department: "hr".into(),
        };
        let html = dashboard(&Identity::default(), &listing, &filter, "<div id=\"chat-widget\"></div>");
        assert!(html.contains("<h3>Leave</h3>"));
        assert!(!html.contains("<h3>Budget</h3>"));
        assert!(html.contains(r#"<option value="hr" selected>hr</option>"#));
        assert!(html.contains(r#"id="chat-widget""#));
    }

    #[test]
    fn test_dashboard_banners() {
        let filter = DocumentFilter::default();
        let html = dashboard(&Identity::default(), &Listing::SignedOut, &filter, "");
        assert!(html.contains(SIGN_IN_PROMPT));
        let html = dashboard(&Identity::default(), &Listing::Unavailable, &filter, "");
        assert!(html.contains(LOAD_FAILED));
    }

    #[test]
    fn test_upload_shows_inline_errors_and_keeps_values() {
        let form = UploadForm {
            title: "ab".into(),
            doc_type: "handwritten".into(),
            language: String::new(),
        };
        let mut errors = FieldErrors::new();
        errors.insert("title".into(), "Title must be at least 3 characters long".into());
        let html = upload(&Identity::default(), &form, &errors, None);
        assert!(html.contains(r#"id="title-error">Title must be at least 3 characters long"#));
        assert!(html.contains(r#"<option value="handwritten" selected>Handwritten</option>"#));
        assert!(html.contains(r#"value="ab""#));
        assert!(!html.contains("language-error"));
    }

    #[test]
    fn test_summaries_page_has_translate_and_download() {
        let html = summaries(
            &Identity::default(),
            &Listing::Loaded(vec![summary("d-9", "Safety", "operations")]),
        );
        assert!(html.contains(r##"hx-target="#translation-d-9""##));
        assert!(html.contains(r#"action="/summaries/download""#));
        assert_eq!(translation(Ok("സുരക്ഷ")), r#"<p class="translated" lang="ml">സുരക്ഷ</p>"#);
    }
}
