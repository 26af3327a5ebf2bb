//! `${key}` templates for welcome text, photo captions and report messages.
//!
//! Substitution is safe: placeholders without a value stay in the output untouched.

use std::fmt;

/// Immutable template; each `apply` returns a new template with one key substituted.
#[derive(Debug, Clone)]
pub struct SimpleTemplate {
    tplt: String,
}

impl SimpleTemplate {
    pub fn new(s: &str) -> Self {
        Self { tplt: s.to_string() }
    }

    /// Replaces every `${key}` with `value`.
    pub fn apply<V: fmt::Display>(self, key: &str, value: V) -> Self {
        let pattern = format!("${{{}}}", key);
        Self {
            tplt: self.tplt.replace(&pattern, &value.to_string()),
        }
    }

    pub fn result(self) -> String {
        self.tplt
    }
}

/// Escapes text for Telegram HTML parse mode.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML link that mentions a user by id, showing `name`.
pub fn user_mention(user_id: i64, name: &str) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        user_id,
        html_escape(name)
    )
}
