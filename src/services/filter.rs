//! In-memory row filtering
//!
//! The backend has no search endpoint; the global text filter and the
//! domain filter controls both run over rows the screen already fetched.

use serde_json::Value;

/// Case-insensitive subsequence match: every character of `query` appears in
/// `haystack` in order. "alp" matches "Alpha", "mgn" matches "Morning", "xq"
/// does not match either.
pub fn fuzzy_matches(haystack: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let mut wanted = query.chars().flat_map(char::to_lowercase).peekable();
    for c in haystack.chars().flat_map(char::to_lowercase) {
        match wanted.peek() {
            Some(&w) if w == c => {
                wanted.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    wanted.peek().is_none()
}

/// Global text filter: keep rows where any string field fuzzy-matches the
/// query. Nested objects and arrays are searched too, so a row matches on a
/// populated child record the same way it matches on its own fields.
pub fn filter_rows(rows: Vec<Value>, query: &str) -> Vec<Value> {
    let query = query.trim();
    if query.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| value_matches(row, query))
        .collect()
}

fn value_matches(value: &Value, query: &str) -> bool {
    match value {
        Value::String(s) => fuzzy_matches(s, query),
        Value::Array(items) => items.iter().any(|v| value_matches(v, query)),
        Value::Object(fields) => fields.values().any(|v| value_matches(v, query)),
        _ => false,
    }
}

/// Domain filter: keep rows whose `field` equals `expected`, where an absent
/// or empty selection keeps everything.
pub fn retain_field(rows: Vec<Value>, field: &str, expected: Option<&str>) -> Vec<Value> {
    let expected = match expected {
        Some(e) if !e.is_empty() => e,
        _ => return rows,
    };
    rows.into_iter()
        .filter(|row| {
            row.get(field)
                .and_then(Value::as_str)
                .map(|v| v == expected)
                .unwrap_or(false)
        })
        .collect()
}
