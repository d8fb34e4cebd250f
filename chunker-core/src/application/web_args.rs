// /////////////////////////////////////////////////////////////////////////////
// Chunker
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Web Argument Translation
//!
//! `GET /api/<path>?k=v&flag=on` and the interactive CLI both ultimately
//! build the same argv shape before it reaches a `Command`. This module is
//! the adapter-facing half of that: it turns a URL path and query string
//! into an argv-style vector, leaving the actual parsing (and validation)
//! to the same CLI parser the interactive shell uses. An HTTP server is an
//! external collaborator; this function is the one piece of its contract
//! this crate commits to.

/// Splits `path` on `/` into positional arguments, then appends each query
/// pair as a long option: `flag=on` becomes the bare flag `--flag`; any
/// other value becomes `--key value` as two arguments.
pub fn path_params_to_args(path: &str, query: &[(String, String)]) -> Vec<String> {
    let mut args: Vec<String> = path.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect();

    for (key, value) in query {
        if value == "on" {
            args.push(format!("--{key}"));
        } else {
            args.push(format!("--{key}"));
            args.push(value.clone());
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_web_args_scenario() {
        let args = path_params_to_args(
            "/some-command",
            &[("flag".to_string(), "on".to_string()), ("param".to_string(), "foo".to_string())],
        );
        assert_eq!(args, vec!["some-command", "--flag", "--param", "foo"]);
    }

    #[test]
    fn multi_segment_path_yields_multiple_positionals() {
        let args = path_params_to_args("/repo/heal", &[]);
        assert_eq!(args, vec!["repo", "heal"]);
    }

    #[test]
    fn leading_and_trailing_slashes_are_ignored() {
        let args = path_params_to_args("/list/", &[]);
        assert_eq!(args, vec!["list"]);
    }

    #[test]
    fn empty_path_yields_no_positionals() {
        let args = path_params_to_args("/", &[]);
        assert!(args.is_empty());
    }
}
