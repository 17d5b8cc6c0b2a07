//! Server-side HTML rendering.
//!
//! Every page goes through [`layout::page`], which supplies the document shell,
//! the navbar and any pending flash messages. Interpolated text must pass
//! through [`escape`].

pub mod cars;
pub mod layout;

use axum::http::StatusCode;

/// Escape text for use in HTML element content and double- or single-quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>\n",
        status.as_u16(),
        escape(reason),
        escape(message)
    );
    layout::page(reason, &[], &body)
}
