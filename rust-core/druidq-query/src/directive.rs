// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Comment directives embedded in query text.
//!
//! Directives are SQL line comments whose first word is a directive keyword:
//!
//! ```sql
//! -- @param token 7739-9592-01
//! -- @params {"table": "events", "limit": "10"}
//! -- @params {
//! --   "day": "2024-01-01"
//! -- }
//! -- @eval head -n 3
//! -- @eval-file ./summarise.sh
//! SELECT * FROM {{table}} WHERE token = '{{token}}' LIMIT {{limit}}
//! ```
//!
//! The keyword must be followed by whitespace, `=`, `:` or the end of the
//! line. The older `-- params = {...}`, `-- eval = ...` and
//! `-- eval-file = ...` spellings are also recognised, but only with an
//! explicit `=` or `:` so that ordinary comments mentioning those words are
//! left alone.
//!
//! Every recognised directive line is removed from the query text, whether or
//! not its payload parsed, so directives never reach the datastore.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::warn;

use crate::Params;

/// SQL line-comment marker.
pub const COMMENT_MARKER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Param,
    Params,
    Eval,
    EvalFile,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "param" => Some(Keyword::Param),
            "params" => Some(Keyword::Params),
            "eval" => Some(Keyword::Eval),
            "eval-file" => Some(Keyword::EvalFile),
            _ => None,
        }
    }
}

/// Everything the extractor found in one query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// Declared parameters. `None` when no parameter directive yielded a
    /// mapping, as distinct from a declared-but-empty block.
    pub params: Option<Params>,
    /// Inline post-processing script. Several `@eval` lines are joined with
    /// newlines in order.
    pub eval_inline: Option<String>,
    /// External post-processing script reference, unresolved. Last one wins.
    pub eval_file: Option<String>,
    /// The query text with all directive lines removed.
    pub query: String,
}

/// Scan `text` line by line, collecting directives and stripping them.
pub fn extract(text: &str) -> Directives {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut params: Option<Params> = None;
    let mut eval_lines: Vec<String> = Vec::new();
    let mut eval_file = None;

    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx];
        idx += 1;

        let Some((keyword, payload)) = parse_directive(line) else {
            kept.push(line);
            continue;
        };

        match keyword {
            Keyword::Param => match parse_param(payload) {
                Some((name, value)) => {
                    params.get_or_insert_with(Params::new).insert(name, value);
                }
                None => warn!(line = line.trim(), "Ignoring @param directive without a name"),
            },
            Keyword::Params => {
                let (block, consumed) = parse_params_block(payload, &lines[idx..]);
                idx += consumed;
                match block {
                    Some(block) => params.get_or_insert_with(Params::new).extend(block),
                    None => warn!(
                        line = line.trim(),
                        "Ignoring @params block that is not a valid JSON object"
                    ),
                }
            }
            Keyword::Eval => {
                let script = strip_quotes(payload.trim());
                if !script.is_empty() {
                    eval_lines.push(script.to_string());
                }
            }
            Keyword::EvalFile => {
                let reference = strip_quotes(payload.trim());
                if !reference.is_empty() {
                    eval_file = Some(reference.to_string());
                }
            }
        }
    }

    let eval_inline = if eval_lines.is_empty() {
        None
    } else {
        Some(eval_lines.join("\n"))
    };

    Directives {
        params,
        eval_inline,
        eval_file,
        query: kept.join("\n"),
    }
}

/// Recognise a directive line, returning its keyword and payload.
///
/// The payload is everything after the keyword's separator, with one
/// leading `=` or `:` removed.
fn parse_directive(line: &str) -> Option<(Keyword, &str)> {
    let body = line.trim().strip_prefix(COMMENT_MARKER)?.trim_start();

    let (word_src, annotated) = match body.strip_prefix('@') {
        Some(rest) => (rest, true),
        None => (body, false),
    };
    let word_len = word_src
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(word_src.len());
    let keyword = Keyword::from_word(&word_src[..word_len])?;
    let after = &word_src[word_len..];

    let payload = if annotated {
        // A bare `@params` may open a block on the following lines.
        if let Some(first) = after.chars().next() {
            if !(first.is_whitespace() || first == '=' || first == ':') {
                return None;
            }
        }
        after.trim_start()
    } else {
        // Bare keywords need an explicit assignment.
        let trimmed = after.trim_start();
        if !(trimmed.starts_with('=') || trimmed.starts_with(':')) {
            return None;
        }
        trimmed
    };

    let payload = payload
        .strip_prefix('=')
        .or_else(|| payload.strip_prefix(':'))
        .unwrap_or(payload);
    Some((keyword, payload.trim_start()))
}

/// Parse `name value`, `name = value` or `name=value`.
fn parse_param(payload: &str) -> Option<(String, String)> {
    let payload = payload.trim();
    let name_end = payload
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(payload.len());
    let name = &payload[..name_end];
    if name.is_empty() {
        return None;
    }

    let rest = payload[name_end..].trim_start();
    let rest = rest.strip_prefix('=').unwrap_or(rest).trim();
    Some((name.to_string(), strip_quotes(rest).to_string()))
}

/// Accumulate a JSON parameter block starting with `first`, pulling in the
/// following comment lines until the buffer parses.
///
/// Returns the mapping (if the block ever parsed) and how many lines after
/// the directive line were consumed.
fn parse_params_block(first: &str, following: &[&str]) -> (Option<Params>, usize) {
    let mut buffer = first.trim().to_string();
    if let Some(params) = parse_json_params(&buffer) {
        return (Some(params), 0);
    }

    let mut consumed = 0;
    for line in following {
        let Some(content) = line.trim().strip_prefix(COMMENT_MARKER) else {
            break;
        };
        if parse_directive(line).is_some() {
            break;
        }

        consumed += 1;
        buffer.push(' ');
        buffer.push_str(content.trim());
        if let Some(params) = parse_json_params(&buffer) {
            return (Some(params), consumed);
        }
    }

    (None, consumed)
}

/// Parse a JSON object into a parameter mapping. Scalars become their text,
/// `null` becomes the empty string, nested values stay as compact JSON.
fn parse_json_params(text: &str) -> Option<Params> {
    let object: Map<String, Value> = serde_json::from_str(text).ok()?;
    Some(
        object
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect(),
    )
}

/// Remove one pair of matching surrounding quotes.
fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Resolve an `@eval-file` reference.
///
/// Relative references in file-backed queries are joined onto the query
/// file's directory and made absolute. Absolute references, and any
/// reference from an inline query, are returned unchanged.
pub fn resolve_script_path(reference: &str, query_source: Option<&Path>) -> PathBuf {
    let reference = Path::new(reference);
    let Some(source) = query_source else {
        return reference.to_path_buf();
    };
    if reference.is_absolute() {
        return reference.to_path_buf();
    }

    let base = source.parent().unwrap_or_else(|| Path::new(""));
    let joined = base.join(reference);
    std::path::absolute(&joined).unwrap_or(joined)
}
