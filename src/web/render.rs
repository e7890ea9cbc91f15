//! Tera template rendering

use anyhow::{Context, Result};
use std::collections::HashMap;
use tera::{Context as TeraContext, Tera, Value};

use crate::services::format::format_duration_seconds;

/// Template engine wrapper: loads every template under the configured
/// directory once at startup and registers the console's custom filters.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new(templates_dir: &str) -> Result<Self> {
        let glob = format!("{}/**/*.html", templates_dir.trim_end_matches('/'));
        let mut tera =
            Tera::new(&glob).with_context(|| format!("Failed to load templates from {}", glob))?;
        tera.register_filter("duration", duration_filter);
        Ok(Self { tera })
    }

    pub fn render(&self, template: &str, context: &TeraContext) -> tera::Result<String> {
        self.tera.render(template, context)
    }
}

/// `{{ step.duration | duration }}` renders seconds the way the mobile app
/// shows them.
fn duration_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let seconds = value
        .as_u64()
        .ok_or_else(|| tera::Error::msg("duration filter expects a non-negative number"))?;
    Ok(Value::String(format_duration_seconds(seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duration_filter_formats_seconds() {
        let out = duration_filter(&json!(90), &HashMap::new()).unwrap();
        assert_eq!(out, json!("1 min 30 sec"));
        assert!(duration_filter(&json!("ninety"), &HashMap::new()).is_err());
    }
}
