// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders Yul function definitions and top-level code to Coq definitions.

use super::coq_writer::CoqWriter;
use super::helpers::{nested_var_pattern, parenthesized, var_tuple};
use super::statement_renderer::lower_block;
use crate::escape::escape_identifier;
use itertools::Itertools;
use yul_intermediate_format::{Block, FunctionDefinition};

/// `unit`, `U256.t` or `(U256.t * U256.t * ...)` depending on the number of results.
pub fn result_type(arity: usize) -> String {
    match arity {
        0 => "unit".to_string(),
        1 => "U256.t".to_string(),
        _ => format!("({})", std::iter::repeat("U256.t").take(arity).join(" * ")),
    }
}

/// Render a function definition.
pub fn render_function(function: &FunctionDefinition, w: &mut CoqWriter) {
    w.write("Definition ");
    w.write(&escape_identifier(&function.name));
    for parameter in &function.parameters {
        write!(w, " ({} : U256.t)", escape_identifier(parameter));
    }
    write!(w, " : M.t {} :=", result_type(function.return_variables.len()));
    w.newline();

    w.indent();
    for result in &function.return_variables {
        write!(w, "let~ {} := [[ 0 ]] in", escape_identifier(result));
        w.newline();
    }
    render_discarding_completion(&function.body, w);
    write!(w, "M.pure {}.", var_tuple(&function.return_variables));
    w.newline();
    w.dedent();
}

/// Render the statements of a code block (functions excluded) as `body`.
pub fn render_body(block: &Block, w: &mut CoqWriter) {
    w.line("Definition body : M.t unit :=");
    w.indent();
    render_discarding_completion(block, w);
    w.line("M.pure tt.");
    w.dedent();
}

/// Run a block and rebind the names it updates, whatever the way it completed.
fn render_discarding_completion(block: &Block, w: &mut CoqWriter) {
    let lowered = lower_block(block);
    let head = format!("let~ '(_, {}) := ", nested_var_pattern(&lowered.updated));
    w.line(&parenthesized(&head, &lowered.text, " in"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::coq_writer::render_to_string;
    use yul_intermediate_format::{Expression, Statement};

    #[test]
    fn test_result_types() {
        assert_eq!(result_type(0), "unit");
        assert_eq!(result_type(1), "U256.t");
        assert_eq!(result_type(3), "(U256.t * U256.t * U256.t)");
    }

    #[test]
    fn test_function_with_parameters_and_result() {
        let function = FunctionDefinition {
            name: "double".to_string(),
            parameters: vec!["x".to_string()],
            return_variables: vec!["r".to_string()],
            body: Block::new(vec![Statement::Assignment {
                variables: vec!["r".to_string()],
                value: Expression::call(
                    "add",
                    vec![Expression::identifier("x"), Expression::identifier("x")],
                ),
            }]),
        };
        let text = render_to_string(|w| render_function(&function, w));
        assert_eq!(
            text,
            "Definition double (x : U256.t) : M.t U256.t :=\n\
             \x20 let~ r := [[ 0 ]] in\n\
             \x20 let~ '(_, r) := (\n\
             \x20   let~ r := [[ add ~(| x, x |) ]] in\n\
             \x20   M.pure (BlockUnit.Tt, r)\n\
             \x20 ) in\n\
             \x20 M.pure r.\n"
        );
    }

    #[test]
    fn test_body_definition() {
        let block = Block::new(vec![
            Statement::FunctionDefinition(FunctionDefinition {
                name: "f".to_string(),
                parameters: vec![],
                return_variables: vec![],
                body: Block::default(),
            }),
            Statement::Expression(Expression::call("f", vec![])),
        ]);
        let text = render_to_string(|w| render_body(&block, w));
        assert_eq!(
            text,
            "Definition body : M.t unit :=\n\
             \x20 let~ '(_, _) := (\n\
             \x20   do~ [[ f ~(||) ]] in\n\
             \x20   M.pure (BlockUnit.Tt, tt)\n\
             \x20 ) in\n\
             \x20 M.pure tt.\n"
        );
    }

    #[test]
    fn test_reserved_function_names_are_escaped() {
        let function = FunctionDefinition {
            name: "end".to_string(),
            parameters: vec!["mod".to_string()],
            return_variables: vec!["a".to_string(), "b".to_string()],
            body: Block::default(),
        };
        let text = render_to_string(|w| render_function(&function, w));
        assert!(text.starts_with("Definition end_ (mod_ : U256.t) : M.t (U256.t * U256.t) :=\n"));
        assert!(text.ends_with("  M.pure (a, b).\n"));
    }
}
