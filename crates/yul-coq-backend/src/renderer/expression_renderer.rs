// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders Yul expressions in the monadic calling convention
//!
//! Calls use `f ~(| a, b |)`, with `f ~(||)` for zero arguments. An argument is
//! parenthesized iff it is not a literal or a bare identifier.

use crate::escape::{escape_comment, escape_identifier};
use itertools::Itertools;
use log::warn;
use yul_intermediate_format::{Expression, Literal, LiteralKind};

pub fn render_expression(expression: &Expression) -> String {
    match expression {
        Expression::FunctionCall { name, arguments } => {
            let name = escape_identifier(name);
            if arguments.is_empty() {
                format!("{} ~(||)", name)
            } else {
                format!(
                    "{} ~(| {} |)",
                    name,
                    arguments.iter().map(render_argument).join(", ")
                )
            }
        }
        Expression::Identifier(name) => escape_identifier(name),
        Expression::Literal(literal) => render_literal(literal),
        Expression::Invalid(invalid) => {
            warn!("{}", invalid);
            format!("(* {} *)", escape_comment(&invalid.to_string()))
        }
    }
}

fn render_argument(argument: &Expression) -> String {
    let rendered = render_expression(argument);
    if argument.is_atomic() {
        rendered
    } else {
        format!("({})", rendered)
    }
}

pub fn render_literal(literal: &Literal) -> String {
    match literal.kind {
        LiteralKind::Number => literal.value.clone(),
        LiteralKind::Bool => match literal.value.as_str() {
            "true" => "1".to_string(),
            "false" => "0".to_string(),
            other => other.to_string(),
        },
        LiteralKind::String => format!(
            "{} (* {} *)",
            literal.padded_hex(),
            escape_comment(&literal.value)
        ),
    }
}
