//! Prompt composition: user text + schema + fixed generation rules.

use std::fmt;

use crate::schema::SchemaDescription;

/// Fixed instructions placed before the schema in every prompt.
pub const GENERATION_RULES: &[&str] = &[
    "Use only the tables and columns listed in the schema below.",
    "Prefer JOINs over subqueries.",
    "Use GROUP BY for aggregations if needed.",
    "Filter and join on indexed columns where applicable.",
    "Avoid SELECT * unless explicitly requested; name the columns you need.",
    "Return ONLY the SQL query (no explanation, no markdown).",
];

/// The text sent to the model. Built once per request, never modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the model prompt. Pure: identical inputs give an identical prompt.
///
/// `user_text` is embedded verbatim, including when empty. Every table of `schema` appears.
pub fn compose_prompt(user_text: &str, schema: &SchemaDescription) -> Prompt {
    let mut out = String::from(
        "You are an SQL expert. Convert the following natural language query into an optimized MySQL query.\n",
    );
    for rule in GENERATION_RULES {
        out.push_str("- ");
        out.push_str(rule);
        out.push('\n');
    }
    out.push_str("\nDatabase Schema:\n");
    out.push_str(&schema.to_string());
    out.push_str("\n\nUser Query: ");
    out.push_str(user_text);
    out.push_str("\n\nSQL Query:\n");
    Prompt(out)
}
