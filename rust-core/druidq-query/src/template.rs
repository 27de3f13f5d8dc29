// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! `{{name}}` placeholder substitution.
//!
//! Placeholders in query text are resolved against the declared parameters
//! first and the process environment second; a name found in neither is an
//! error. Substitution is a single left-to-right pass over the original text,
//! so substituted values are never scanned for further placeholders.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::{QueryError, Result};
use crate::Params;

const PLACEHOLDER_PATTERN: &str = r"\{\{([^}]+)\}\}";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PLACEHOLDER_PATTERN).expect("placeholder pattern is valid"))
}

/// Distinct placeholder names in `text`, in order of first appearance.
pub fn placeholder_names(text: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in placeholder_regex().captures_iter(text) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Resolve every placeholder in `text` using `params`, then the process
/// environment.
pub fn resolve(text: &str, params: Option<&Params>) -> Result<String> {
    resolve_with(text, params, |name| std::env::var(name).ok())
}

/// Resolve every placeholder in `text` using `params`, then `lookup`.
pub fn resolve_with<F>(text: &str, params: Option<&Params>, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut values: HashMap<&str, String> = HashMap::new();
    for name in placeholder_names(text) {
        let value = params
            .and_then(|p| p.get(name).cloned())
            .or_else(|| lookup(name))
            .ok_or_else(|| QueryError::UndefinedParameter(name.to_string()))?;
        values.insert(name, value);
    }

    if values.is_empty() {
        return Ok(text.to_string());
    }

    let resolved = placeholder_regex().replace_all(text, |caps: &Captures<'_>| {
        caps.get(1)
            .and_then(|m| values.get(m.as_str()))
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });
    Ok(resolved.into_owned())
}

/// Substitute declared parameters into a post-processing script.
///
/// Unlike [`resolve`], placeholders without a declared parameter are left in
/// place and the environment is not consulted.
pub fn apply_params(script: &str, params: Option<&Params>) -> String {
    let Some(params) = params.filter(|p| !p.is_empty()) else {
        return script.to_string();
    };

    placeholder_regex()
        .replace_all(script, |caps: &Captures<'_>| {
            caps.get(1)
                .and_then(|m| params.get(m.as_str()))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_single_placeholder() {
        assert_eq!(placeholder_names("SELECT * FROM {{table}}"), vec!["table"]);
    }

    #[test]
    fn test_multiple_placeholders_in_order() {
        assert_eq!(
            placeholder_names("SELECT {{col}} FROM {{table}} WHERE {{col}} > 0"),
            vec!["col", "table"]
        );
    }

    #[test]
    fn test_single_braces_are_not_placeholders() {
        assert!(placeholder_names("SELECT * FROM {table}").is_empty());
        assert!(placeholder_names("SELECT '{{}}'").is_empty());
    }

    #[test]
    fn test_params_take_precedence_over_env() {
        let out = resolve_with(
            "SELECT * FROM {{key}}",
            Some(&params(&[("key", "from_params")])),
            env(&[("key", "from_env")]),
        )
        .unwrap();
        assert_eq!(out, "SELECT * FROM from_params");
    }

    #[test]
    fn test_env_fallback() {
        let out = resolve_with("SELECT * FROM {{table_name}}", None, env(&[("table_name", "users")]))
            .unwrap();
        assert_eq!(out, "SELECT * FROM users");
    }

    #[test]
    fn test_undefined_placeholder_is_error() {
        let err = resolve_with("SELECT '{{missing}}'", Some(&Params::new()), env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "undefined parameter: missing");
    }

    #[test]
    fn test_repeated_placeholder_resolves_consistently() {
        let out = resolve_with(
            "SELECT '{{t}}' AS a, '{{t}}' AS b",
            Some(&params(&[("t", "x")])),
            env(&[]),
        )
        .unwrap();
        assert_eq!(out, "SELECT 'x' AS a, 'x' AS b");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let out = resolve_with(
            "SELECT '{{a}}'",
            Some(&params(&[("a", "{{b}}")])),
            env(&[]),
        )
        .unwrap();
        assert_eq!(out, "SELECT '{{b}}'");
    }

    #[test]
    fn test_text_without_placeholders_is_unchanged() {
        let text = "SELECT json_object('a', 1) -- {not a placeholder}";
        assert_eq!(resolve_with(text, None, env(&[])).unwrap(), text);
    }

    #[test]
    fn test_apply_params_to_script() {
        let script = apply_params("echo '{{token}}' {{HOME}}", Some(&params(&[("token", "abc123")])));
        assert_eq!(script, "echo 'abc123' {{HOME}}");
    }

    #[test]
    fn test_apply_params_without_mapping() {
        assert_eq!(apply_params("echo {{x}}", None), "echo {{x}}");
    }
}
