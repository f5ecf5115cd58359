//! Server-rendered HTML for every screen.
//!
//! Pages are plain `format!` templates. All user or backend supplied text
//! goes through [`escape_html`] before it is interpolated.

pub mod auth;
pub mod dashboard;
pub mod input;

use axum::response::Html;

/// Kind of banner shown at the top of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Inline banner replacing blocking alert dialogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn render(&self) -> String {
        let class = match self.kind {
            NoticeKind::Success => "notice notice-success",
            NoticeKind::Error => "notice notice-error",
        };
        let role = match self.kind {
            NoticeKind::Success => "status",
            NoticeKind::Error => "alert",
        };
        format!(
            r#"<div class="{class}" role="{role}">{}</div>"#,
            escape_html(&self.message)
        )
    }
}

pub fn render_notice(notice: Option<&Notice>) -> String {
    notice.map(Notice::render).unwrap_or_default()
}

pub fn escape_html(text: &str) -> String {
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

const STYLES: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; margin: 0; background: #f5f6f8; color: #222; }
nav { background: #1f2937; padding: 0.75rem 1.5rem; }
nav a { color: #fff; margin-right: 1rem; text-decoration: none; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.notice { padding: 0.75rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.notice-success { background: #e6f4ea; color: #1e6b34; }
.notice-error { background: #fdecea; color: #a12622; }
.password-strength { margin: 0.5rem 0; font-weight: bold; }
.char-counter-exceeded { color: #a12622; }
.resume-fit-score-percentage { font-size: 3rem; font-weight: bold; }
.feedback-filter-list li { margin: 0.25rem 0; }
"#;

/// Wraps a screen body in the shared document shell.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Resumatch</title>
<style>{STYLES}</style>
</head>
<body>
<nav><a href="/input">Input</a><a href="/dashboard">Dashboard</a><a href="/logout">Logout</a></nav>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape_html(title),
    ))
}

/// Minimal page used by [`crate::errors::AppError`].
pub fn error_page(title: &str, message: &str) -> Html<String> {
    page(
        title,
        &format!(
            "<h1>{}</h1>\n{}",
            escape_html(title),
            Notice::error(message).render()
        ),
    )
}
