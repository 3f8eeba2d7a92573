pub mod account;
pub mod error;
pub mod fragments;
pub mod graphql_types;
pub mod milestone;
pub mod project;
pub mod rate_limit;
pub mod repository;
pub mod scope_set;

pub use scope_set::{ComposeOptions, ScopeSet};

/// Quotes a value as a GraphQL string literal.
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Wraps a selection body in `head { body }`, dropping blank lines left by omitted fragments.
pub(crate) fn selection(head: &str, body: &str) -> String {
    let lines: Vec<&str> = body.lines().filter(|line| !line.trim().is_empty()).collect();
    format!("{} {{\n{}\n}}", head, lines.join("\n"))
}

/// Joins fragments in the given order, skipping empty ones.
pub(crate) fn join_fragments<I: IntoIterator<Item = String>>(fragments: I) -> String {
    fragments
        .into_iter()
        .filter(|fragment| !fragment.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
