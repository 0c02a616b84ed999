// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Functional helpers for common rendering patterns

use super::coq_writer::render_to_string;
use crate::escape::escape_identifier;
use itertools::Itertools;

fn escaped<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|name| escape_identifier(name.as_ref())).collect()
}

/// Value of a variable tuple: `tt`, `x` or `(a, b)`.
pub fn var_tuple<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names = escaped(names);
    render_to_string(|w| w.tuple(names, "tt"))
}

/// Binding pattern for a variable tuple: `_`, `x` or `'(a, b)`.
pub fn var_pattern<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match escaped(names).as_slice() {
        [] => "_".to_string(),
        [single] => single.clone(),
        multiple => format!("'({})", multiple.iter().join(", ")),
    }
}

/// Pattern nested inside another quoted pattern: `_`, `x` or `(a, b)`.
pub fn nested_var_pattern<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match escaped(names).as_slice() {
        [] => "_".to_string(),
        [single] => single.clone(),
        multiple => format!("({})", multiple.iter().join(", ")),
    }
}

/// Writes `head (` + indented body + `) tail`, the shape used for every nested term.
pub fn parenthesized(head: &str, body: &str, tail: &str) -> String {
    render_to_string(|w| {
        w.line(&format!("{}(", head));
        w.indented(body);
        w.write(&format!("){}", tail));
    })
}
