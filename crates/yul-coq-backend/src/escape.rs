// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Centralized escaping utilities for Coq identifiers
//!
//! Every Yul name (variables, functions, parameters, objects) reaches the output
//! through [`escape_identifier`], so one source name always maps to one Coq name.

/// Coq keywords and vernacular commands that cannot be used as plain identifiers.
const RESERVED: &[&str] = &[
    // Term keywords
    "as", "at", "cofix", "else", "end", "exists", "exists2", "fix", "for", "forall", "fun",
    "if", "IF", "in", "let", "match", "mod", "return", "then", "using", "where", "with",
    // Wildcard and the unit value used for empty state tuples
    "_", "tt",
    // Sorts
    "Prop", "SProp", "Set", "Type",
    // Vernacular commands
    "Axiom", "Definition", "End", "Fixpoint", "Import", "Lemma", "Module", "Proof", "Qed",
    "Require", "Section", "Theorem",
];

/// Escape identifiers that conflict with Coq reserved words or contain characters
/// Coq does not accept in names. Coq identifiers cannot start with a quote, so a
/// leading `$` becomes `dollar'`.
pub fn escape_identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        return format!("{}_", name);
    }
    let escaped = name.replace('$', "'dollar'").replace('.', "'dot'");
    match escaped.strip_prefix('\'') {
        Some(rest) => rest.to_string(),
        None => escaped,
    }
}

/// Upper-case the first character and lower-case the rest (`erc20` → `Erc20`).
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

/// Make arbitrary text safe to embed inside a Coq comment.
pub fn escape_comment(text: &str) -> String {
    text.replace("(*", "( *")
        .replace("*)", "* )")
        .replace('"', "\"\"")
}
