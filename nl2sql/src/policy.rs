//! Statement policy applied before any SQL reaches the database.

pub use env_config::SqlPolicy;

use crate::error::Error;
use crate::sql_scan::{first_terminator, leading_keyword, skip_leading_trivia, words};

/// Statement keywords accepted under [`SqlPolicy::ReadOnly`].
pub const READ_KEYWORDS: &[&str] = &["SELECT", "WITH", "SHOW", "DESCRIBE", "DESC", "EXPLAIN"];

/// Keywords that can open the body of a `WITH` or `EXPLAIN` statement.
const BODY_KEYWORDS: &[&str] = &[
    "SELECT", "TABLE", "VALUES", "INSERT", "UPDATE", "DELETE", "REPLACE",
];

const WRITE_KEYWORDS: &[&str] = &["INSERT", "UPDATE", "DELETE", "REPLACE"];

/// Checks `sql` against `policy`. `Unrestricted` accepts everything, including empty text.
///
/// `ReadOnly` accepts exactly one statement (an optional trailing `;` and comments are fine)
/// whose first keyword is in [`READ_KEYWORDS`]. A `WITH` must lead into a `SELECT`, an
/// `EXPLAIN`/`DESCRIBE` must not wrap a write, and `INTO OUTFILE`/`INTO DUMPFILE` is refused.
pub fn check(policy: SqlPolicy, sql: &str) -> Result<(), Error> {
    if policy == SqlPolicy::Unrestricted {
        return Ok(());
    }

    let keyword = leading_keyword(sql);
    if keyword.is_empty() {
        return Err(Error::StatementRejected("no SQL statement".to_string()));
    }
    if !READ_KEYWORDS.contains(&keyword.as_str()) {
        return Err(Error::StatementRejected(format!(
            "{} statements are not allowed in read-only mode",
            keyword
        )));
    }
    let end = first_terminator(sql);
    if let Some(end) = end {
        if !skip_leading_trivia(&sql[end + 1..]).trim_start_matches(';').trim().is_empty() {
            return Err(Error::StatementRejected(
                "multiple statements are not allowed".to_string(),
            ));
        }
    }

    let stmt = end.map_or(sql, |end| &sql[..end]);
    let words = words(stmt);
    let body = body_keyword(&words);
    match keyword.as_str() {
        "WITH" if body != Some("SELECT") => {
            return Err(Error::StatementRejected(match body {
                Some(kw) => format!("WITH ... {} is not allowed in read-only mode", kw),
                None => "WITH clause without a SELECT".to_string(),
            }));
        }
        "EXPLAIN" | "DESCRIBE" | "DESC" => {
            if let Some(kw) = body.filter(|kw| WRITE_KEYWORDS.contains(kw)) {
                return Err(Error::StatementRejected(format!(
                    "{} {} is not allowed in read-only mode",
                    keyword, kw
                )));
            }
        }
        _ => {}
    }
    if words
        .windows(2)
        .any(|w| w[0].1 == "INTO" && matches!(w[1].1.as_str(), "OUTFILE" | "DUMPFILE"))
    {
        return Err(Error::StatementRejected(
            "SELECT ... INTO OUTFILE/DUMPFILE is not allowed in read-only mode".to_string(),
        ));
    }
    Ok(())
}

/// First top-level statement keyword after the leading one (skips CTE names and `AS`).
fn body_keyword(words: &[(usize, String)]) -> Option<&str> {
    words
        .iter()
        .skip(1)
        .filter(|(depth, _)| *depth == 0)
        .map(|(_, w)| w.as_str())
        .find(|w| BODY_KEYWORDS.contains(w))
}
