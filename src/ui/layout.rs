//! Page shell and small shared pieces.

use crate::auth::Identity;

/// Escape text for HTML element content and quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Banner tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

impl Tone {
    fn class(self) -> &'static str {
        match self {
            Self::Info => "banner banner-info",
            Self::Success => "banner banner-success",
            Self::Error => "banner banner-error",
        }
    }
}

/// A one-line message above page content.
#[must_use]
pub fn banner(tone: Tone, text: &str) -> String {
    format!(
        r#"<div class="{}" role="status">{}</div>"#,
        tone.class(),
        escape(text)
    )
}

fn account_nav(identity: &Identity) -> String {
    match identity.user() {
        Some(user) => format!(
            r#"<span class="nav-greeting">Hi, {}</span>
                    <form method="post" action="/logout" class="inline">
                        <button type="submit" class="nav-link">Log out</button>
                    </form>"#,
            escape(user.greeting_name())
        ),
        None => r#"<a href="/login" class="nav-link">Log in</a>
                    <a href="/signup" class="nav-link nav-link-primary">Sign up</a>"#
            .to_string(),
    }
}

/// Full HTML document around `content`.
#[must_use]
pub fn html_shell(title: &str, identity: &Identity, content: &str) -> String {
    let title = escape(title);
    let account = account_nav(identity);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Document management for metro operations">
    <title>{title} - DocDesk</title>
    <script src="https://unpkg.com/htmx.org@2.0.8" defer></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <div id="app-shell">
        <header class="app-header">
            <div class="container header-row">
                <a href="/" class="brand">
                    <span class="brand-mark">D</span>
                    <span>DocDesk</span>
                </a>
                <nav class="nav" hx-boost="true">
                    <a href="/dashboard" class="nav-link">Dashboard</a>
                    <a href="/summaries" class="nav-link">Summaries</a>
                    <a href="/upload" class="nav-link">Upload</a>
                    {account}
                </nav>
            </div>
        </header>

        <main id="app" class="container">
            {content}
        </main>

        <footer class="app-footer">
            <p class="container muted">DocDesk document management</p>
        </footer>
    </div>
</body>
</html>"#
    )
}
