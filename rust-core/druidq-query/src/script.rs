// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! Post-processing script selection.
//!
//! A script can come from four places. The first one present wins:
//!
//! 1. `--eval` on the command line
//! 2. `--eval-file` on the command line
//! 3. an `@eval` directive in the query
//! 4. an `@eval-file` directive in the query
//!
//! Whatever the source, declared parameters are substituted into the script
//! text before it runs.

use std::fs;
use std::path::PathBuf;

use crate::error::{QueryError, Result};
use crate::template::apply_params;
use crate::{Params, PreparedQuery};

/// Where a post-processing script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Inline(String),
    File(PathBuf),
}

impl ScriptSource {
    /// Pick the highest-precedence script among command-line overrides and
    /// the query's own directives.
    pub fn select(
        cli_inline: Option<&str>,
        cli_file: Option<PathBuf>,
        query: &PreparedQuery,
    ) -> Option<Self> {
        if let Some(code) = cli_inline.filter(|c| !c.is_empty()) {
            return Some(ScriptSource::Inline(code.to_string()));
        }
        if let Some(path) = cli_file {
            return Some(ScriptSource::File(path));
        }
        if let Some(code) = &query.eval_inline {
            return Some(ScriptSource::Inline(code.clone()));
        }
        query.eval_file.clone().map(ScriptSource::File)
    }

    /// Load the script body and substitute `params` into it.
    pub fn load(&self, params: Option<&Params>) -> Result<String> {
        let code = match self {
            ScriptSource::Inline(code) => code.clone(),
            ScriptSource::File(path) => {
                fs::read_to_string(path).map_err(|source| QueryError::ScriptRead {
                    path: path.clone(),
                    source,
                })?
            }
        };
        Ok(apply_params(&code, params))
    }
}
