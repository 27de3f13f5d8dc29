// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//!
//! One `druidq` invocation: load, prepare, execute, print, post-process.

use std::io::{self, Write};
use std::time::Instant;

use druidq_cache::{CacheConfig, CachedExecutor, QueryCache};
use druidq_client::{ClientConfig, DruidClient};
use druidq_query::{PreparedQuery, QueryInput, ScriptSource};
use tracing::{debug, info};

use crate::cli::Cli;
use crate::error::CliError;
use crate::formatter::format_result;
use crate::hook::{PostProcessor, ShellHook};

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let input = QueryInput::load(&cli.query, cli.input_mode())?;
    let query = PreparedQuery::prepare(&input)?;

    let mut out = io::stdout().lock();

    if cli.verbose {
        writeln!(out, "In[query]:\n{}", query.sql)?;
        out.flush()?;
    }

    let executor = build_executor(cli)?;
    let start = Instant::now();
    let execution = executor
        .execute(&query.sql, cli.cache_policy())
        .map_err(CliError::Execute)?;
    info!(
        outcome = ?execution.outcome,
        rows = execution.table.num_rows(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Query finished"
    );

    if !cli.quiet {
        writeln!(out, "{}", format_result(&execution.table, cli.format))?;
    }

    let Some(script) = ScriptSource::select(cli.eval.as_deref(), cli.eval_file.clone(), &query)
    else {
        return Ok(());
    };
    let code = script.load(query.params.as_ref())?;

    if cli.verbose {
        writeln!(out, "\nIn[eval]:\n{code}")?;
    }
    // The script shares our stdout.
    out.flush()?;
    drop(out);

    ShellHook::new(cli.eval_format).run(&code, &execution.table, query.params.as_ref())?;
    Ok(())
}

fn build_executor(cli: &Cli) -> Result<CachedExecutor<DruidClient>, CliError> {
    let mut client_config = ClientConfig::from_env().map_err(CliError::Config)?;
    if let Some(url) = &cli.url {
        client_config = client_config.with_url(url.clone());
    }
    let client = DruidClient::new(&client_config).map_err(CliError::Config)?;

    let cache_config = match &cli.cache_dir {
        Some(dir) if !dir.as_os_str().is_empty() => CacheConfig::with_root(dir),
        _ => CacheConfig::from_env(),
    };

    let cache = QueryCache::parquet(cache_config);
    debug!(
        endpoint = client.endpoint(),
        cache = %cache.root().display(),
        "Executor ready"
    );
    Ok(CachedExecutor::new(client, cache))
}
