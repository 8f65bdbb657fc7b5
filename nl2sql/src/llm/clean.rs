//! Cleanup of model output into a single SQL statement.

use std::sync::OnceLock;

use regex::Regex;

use crate::sql_scan::first_terminator;

/// First complete fenced block; an optional `sql`/`mysql` tag is dropped.
fn fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```(?i:mysql|sql)?[ \t]*\r?\n?(.*?)```").expect("fenced block regex")
    })
}

/// Upper-case statement keyword at the start of a line.
fn line_keyword() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(WITH|SELECT|INSERT|UPDATE|DELETE|SHOW|DESCRIBE|EXPLAIN)\b")
            .expect("line keyword regex")
    })
}

/// Lower-case statement keyword at the start of a line. Capitalised words ("With this...")
/// are prose, not SQL.
fn lower_line_keyword() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(with|select|insert|update|delete|show|describe|explain)\b")
            .expect("lower-case line keyword regex")
    })
}

/// Upper-case statement keyword anywhere (model wrote prose and SQL on one line).
fn inline_keyword() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(WITH|SELECT|INSERT|UPDATE|DELETE)\s").expect("inline keyword regex")
    })
}

fn strip_fences(text: &str) -> &str {
    if let Some(inner) = fenced_block().captures(text).and_then(|c| c.get(1)) {
        return inner.as_str();
    }
    // Truncated replies may open a fence without closing it (or the reverse).
    let mut s = text.trim();
    if s.starts_with("```") {
        s = s.find('\n').map_or("", |nl| &s[nl + 1..]);
    }
    s.trim_end().trim_end_matches("```")
}

fn strip_inline_backticks(text: &str) -> &str {
    let t = text.trim();
    if t.len() >= 2 && t.starts_with('`') && t.ends_with('`') && !t[1..t.len() - 1].contains('`')
    {
        &t[1..t.len() - 1]
    } else {
        t
    }
}

/// Turns raw model text into SQL.
///
/// 1. Keep the content of the first fenced block (```` ```sql ... ``` ````), if any.
/// 2. Unwrap a reply that is entirely wrapped in single backticks; backtick-quoted identifiers
///    inside the SQL are left alone.
/// 3. Drop prose before the first statement keyword (upper-case at a line start, then upper-case
///    inline, then lower-case at a line start) and keep the statement up to and including
///    its first `;` outside quotes and comments.
/// 4. Trim whitespace. Text with no recognisable statement is returned trimmed.
pub fn clean_sql_output(response_text: &str) -> String {
    let text = strip_inline_backticks(strip_fences(response_text));

    let start = line_keyword()
        .captures(text)
        .and_then(|c| c.get(1))
        .or_else(|| inline_keyword().captures(text).and_then(|c| c.get(1)))
        .or_else(|| lower_line_keyword().captures(text).and_then(|c| c.get(1)))
        .map(|m| m.start());

    match start {
        Some(start) => {
            let stmt = &text[start..];
            match first_terminator(stmt) {
                Some(end) => stmt[..=end].trim().to_string(),
                None => stmt.trim().to_string(),
            }
        }
        None => text.trim().to_string(),
    }
}
