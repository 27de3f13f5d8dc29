// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for directive extraction and placeholder resolution

use std::collections::BTreeMap;

use druidq_query::{extract, resolve_with, Params};
use proptest::prelude::*;

/// Query lines that can never be comments or directives
fn arb_sql_line() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ,'()*=<>.]{0,40}"
}

/// Parameter names
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,10}"
}

/// Parameter values: JSON-safe, no braces
fn arb_value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _.:-]{0,16}"
}

fn arb_params() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(arb_name(), arb_value(), 0..6)
}

fn multi_line_block(params: &BTreeMap<String, String>) -> String {
    let mut lines = vec!["-- @params {".to_string()];
    let total = params.len();
    for (i, (name, value)) in params.iter().enumerate() {
        let comma = if i + 1 < total { "," } else { "" };
        lines.push(format!(
            "--   {}: {}{}",
            serde_json::to_string(name).unwrap(),
            serde_json::to_string(value).unwrap(),
            comma
        ));
    }
    lines.push("-- }".to_string());
    lines.join("\n")
}

proptest! {
    #[test]
    fn test_directive_free_text_is_unchanged(lines in prop::collection::vec(arb_sql_line(), 1..12)) {
        let text = lines.join("\n");
        let found = extract(&text);

        prop_assert_eq!(found.params, None);
        prop_assert_eq!(found.eval_inline, None);
        prop_assert_eq!(found.eval_file, None);
        prop_assert_eq!(found.query, text);
    }

    #[test]
    fn test_single_line_block_matches_declared_pairs(params in arb_params()) {
        let text = format!(
            "-- @params {}\nSELECT 1",
            serde_json::to_string(&params).unwrap()
        );
        let found = extract(&text);

        prop_assert_eq!(found.params, Some(params));
        prop_assert_eq!(found.query, "SELECT 1");
    }

    #[test]
    fn test_multi_line_block_matches_single_line(params in arb_params()) {
        let single = format!(
            "-- @params {}\nSELECT 1",
            serde_json::to_string(&params).unwrap()
        );
        let multi = format!("{}\nSELECT 1", multi_line_block(&params));

        let from_single = extract(&single);
        let from_multi = extract(&multi);

        prop_assert_eq!(&from_multi.params, &from_single.params);
        prop_assert_eq!(from_multi.query, from_single.query);
    }

    #[test]
    fn test_param_lines_round_trip(params in prop::collection::btree_map(arb_name(), "[A-Za-z0-9_.:-]{1,16}", 1..6)) {
        let mut text: String = params
            .iter()
            .map(|(name, value)| format!("-- @param {name} {value}\n"))
            .collect();
        text.push_str("SELECT 1");

        let found = extract(&text);
        prop_assert_eq!(found.params, Some(params));
        prop_assert_eq!(found.query, "SELECT 1");
    }

    #[test]
    fn test_params_win_over_environment(name in arb_name(), param in arb_value(), env_value in arb_value()) {
        let params: Params = [(name.clone(), param.clone())].into_iter().collect();
        let text = format!("SELECT '{{{{{name}}}}}'");
        let env_name = name.clone();

        let resolved = resolve_with(&text, Some(&params), move |n| {
            (n == env_name).then(|| env_value.clone())
        })
        .unwrap();

        prop_assert_eq!(resolved, format!("SELECT '{param}'"));
    }

    #[test]
    fn test_unknown_placeholder_always_fails(name in arb_name()) {
        let text = format!("SELECT {{{{{name}}}}} FROM t");
        let err = resolve_with(&text, None, |_| None).unwrap_err();
        prop_assert_eq!(err.to_string(), format!("undefined parameter: {name}"));
    }
}
