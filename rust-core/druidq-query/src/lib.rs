// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! druidq query preparation.
//!
//! Turns command-line input into the exact SQL text sent to the datastore:
//!
//! 1. [`input`] decides whether the argument is query text or a file path.
//! 2. [`directive`] pulls `@param`, `@params`, `@eval` and `@eval-file`
//!    comment directives out of the text.
//! 3. [`template`] replaces `{{name}}` placeholders with parameter values or
//!    environment variables.
//!
//! [`script`] then picks the post-processing script, if any.

pub mod directive;
pub mod error;
pub mod input;
pub mod script;
pub mod template;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

pub use directive::{extract, resolve_script_path, Directives};
pub use error::{QueryError, Result};
pub use input::{looks_like_query, InputMode, QueryInput};
pub use script::ScriptSource;
pub use template::{apply_params, placeholder_names, resolve, resolve_with};

/// Parameter name → textual value.
pub type Params = BTreeMap<String, String>;

/// A query ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    /// Final SQL: directives stripped, placeholders resolved.
    pub sql: String,
    /// Parameters declared in the query, if any.
    pub params: Option<Params>,
    /// Inline script from `@eval`, with parameters substituted.
    pub eval_inline: Option<String>,
    /// Script file from `@eval-file`, resolved against the query file.
    pub eval_file: Option<PathBuf>,
    /// File the query was read from.
    pub source: Option<PathBuf>,
}

impl PreparedQuery {
    /// Prepare `input`, resolving unknown placeholders from the environment.
    pub fn prepare(input: &QueryInput) -> Result<Self> {
        Self::prepare_with(input, |name| std::env::var(name).ok())
    }

    /// Prepare `input`, resolving unknown placeholders through `lookup`.
    pub fn prepare_with<F>(input: &QueryInput, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let directives = extract(&input.text);
        let sql = resolve_with(&directives.query, directives.params.as_ref(), lookup)?;

        let eval_inline = directives
            .eval_inline
            .map(|code| apply_params(&code, directives.params.as_ref()));
        let eval_file = directives
            .eval_file
            .map(|reference| resolve_script_path(&reference, input.source.as_deref()));

        debug!(
            params = directives.params.as_ref().map_or(0, |p| p.len()),
            has_eval = eval_inline.is_some(),
            has_eval_file = eval_file.is_some(),
            "Prepared query"
        );

        Ok(Self {
            sql,
            params: directives.params,
            eval_inline,
            eval_file,
            source: input.source.clone(),
        })
    }
}
