// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders proof skeletons relating compiled code to its shallow embedding.
//!
//! For each function and each code body we emit an `Ltac <name>_deps` tactic that
//! tries the lemmas already proved in the same code block, and a `compare_<name>`
//! lemma whose script follows the statement structure of the definition.

use super::coq_writer::CoqWriter;
use super::object_renderer::{CodeContext, CodeEmitter};
use super::statement_renderer::{
    default_case_marker, executable_statements, initializer_marker, malformed_marker,
};
use crate::escape::{capitalize, escape_comment, escape_identifier};
use itertools::Itertools;
use log::warn;
use yul_intermediate_format::{Block, CaseValue, FunctionDefinition, Statement};

/// Emits `compare_*` lemmas for a contract.
#[derive(Debug, Clone)]
pub struct ProofEmitter {
    /// Name of the Coq module holding the compiled code (`<name>.codes`) and prefix of
    /// the shallow embedding module (`<name>_shallow`)
    pub contract_name: String,
}

impl ProofEmitter {
    pub fn new(contract_name: &str) -> Self {
        Self {
            contract_name: contract_name.to_string(),
        }
    }

    fn code(&self, ctx: &CodeContext) -> String {
        format!(
            "{}{}.code",
            capitalize(&self.contract_name),
            if ctx.is_deployed { ".deployed" } else { "" }
        )
    }

    fn shallow_path(&self, ctx: &CodeContext, definition: &str) -> String {
        std::iter::once(format!("{}_shallow", self.contract_name))
            .chain(ctx.module_path.iter().cloned())
            .chain(std::iter::once(definition.to_string()))
            .join(".")
    }
}

impl CodeEmitter for ProofEmitter {
    fn emit_function(
        &self,
        ctx: &CodeContext,
        function: &FunctionDefinition,
        emitted: &[String],
        w: &mut CoqWriter,
    ) {
        let name = escape_identifier(&function.name);
        let parameters: Vec<String> = function
            .parameters
            .iter()
            .map(|parameter| escape_identifier(parameter))
            .collect();

        render_deps_tactic(&name, emitted, w);
        w.newline();

        w.write(&format!("Lemma compare_{} environment stack", name));
        if !parameters.is_empty() {
            w.write(&format!(" ({} : U256.t)", parameters.join(" ")));
        }
        w.line(" :");
        w.indent();
        w.line("let environment :=");
        w.indented(&format!(
            "environment <| Environment.code_name := {}.(Code.hex_name) |> in",
            self.code(ctx)
        ));
        w.line("let function :=");
        w.indented(&format!(
            "Codes.get_function {}.codes environment \"{}\" in",
            self.contract_name, function.name
        ));
        w.line(&format!(
            "Compare.t {}.codes environment stack stack",
            self.contract_name
        ));
        w.indent();
        w.line(&format!("(function [{}])", parameters.join("; ")));
        w.line(&format!(
            "({}).",
            std::iter::once(self.shallow_path(ctx, &name))
                .chain(parameters.iter().cloned())
                .join(" ")
        ));
        w.dedent();
        w.dedent();

        render_proof_script(&name, &function.body, w);
    }

    fn emit_body(&self, ctx: &CodeContext, body: &Block, emitted: &[String], w: &mut CoqWriter) {
        let code = self.code(ctx);

        render_deps_tactic("body", emitted, w);
        w.newline();

        w.line("Lemma compare_body environment stack :");
        w.indent();
        w.line("let environment :=");
        w.indented(&format!(
            "environment <| Environment.code_name := {}.(Code.hex_name) |> in",
            code
        ));
        w.line(&format!(
            "Compare.t {}.codes environment stack stack",
            self.contract_name
        ));
        w.indent();
        w.line(&format!("{}.(Code.body)", code));
        w.line(&format!("{}.", self.shallow_path(ctx, "body")));
        w.dedent();
        w.dedent();

        render_proof_script("body", body, w);
    }
}

fn render_deps_tactic(name: &str, emitted: &[String], w: &mut CoqWriter) {
    w.line(&format!("Ltac {}_deps :=", name));
    w.indent();
    if emitted.is_empty() {
        w.line("idtac.");
    } else {
        let alternatives = emitted
            .iter()
            .map(|function| format!("apply compare_{}", escape_identifier(function)))
            .join(" ||\n");
        w.line(&format!("{}.", alternatives));
    }
    w.dedent();
}

fn render_proof_script(name: &str, body: &Block, w: &mut CoqWriter) {
    w.line("Proof.");
    w.indent();
    w.line("(* entering function *)");
    w.line("Compare.Tactic.stack_primitives.");
    render_block_tactics(name, body, w);
    w.dedent();
    w.line("Qed.");
}

fn expression_tactic(name: &str) -> String {
    format!("Compare.Tactic.expression ltac:({}_deps).", name)
}

/// `eapply Compare.Let. { <inner> } Compare.Tactic.make_intro.`
fn render_let(w: &mut CoqWriter, inner: impl FnOnce(&mut CoqWriter)) {
    w.line("eapply Compare.Let. {");
    w.indent();
    inner(w);
    w.dedent();
    w.line("}");
    w.line("Compare.Tactic.make_intro.");
}

fn render_block_tactics(name: &str, block: &Block, w: &mut CoqWriter) {
    let statements = executable_statements(block);
    let count = statements.len();
    for (index, statement) in statements.into_iter().enumerate() {
        render_statement_tactics(name, statement, index + 1 == count, w);
    }
}

fn render_statement_tactics(name: &str, statement: &Statement, is_last: bool, w: &mut CoqWriter) {
    if let Some(invalid) = statement.invalid_expression() {
        w.line(&malformed_marker(statement, invalid));
        return;
    }
    match statement {
        Statement::FunctionDefinition(_) => {}
        Statement::VariableDeclaration { .. } | Statement::Assignment { .. } => {
            w.line("(* declaration/assignment *)");
            w.line("apply Compare.LetUnfold.");
            w.line("Compare.Tactic.stack_primitives.");
            w.line(&expression_tactic(name));
        }
        Statement::Expression(_) => render_let(w, |w| {
            w.line("(* expression statement *)");
            w.line(&expression_tactic(name));
        }),
        Statement::Block(block) => {
            w.line("(* block *)");
            render_let(w, |w| {
                w.line("Compare.Tactic.stack_primitives.");
                render_block_tactics(name, block, w);
            });
        }
        Statement::If { body, .. } => {
            w.line("(* block *)");
            render_let(w, |w| {
                w.line("Compare.Tactic.stack_primitives.");
                w.line("(* if *)");
                w.line(&expression_tactic(name));
                w.line("Compare.Tactic.open_if.");
                w.line("Compare.Tactic.stack_primitives.");
                render_block_tactics(name, body, w);
            });
        }
        Statement::Switch { cases, .. } => {
            w.line("(* block *)");
            render_let(w, |w| {
                w.line("Compare.Tactic.stack_primitives.");
                w.line("(* switch *)");
                w.line(&expression_tactic(name));
                for case in cases {
                    match &case.value {
                        CaseValue::Literal(_) => {}
                        CaseValue::Default => {
                            w.line(default_case_marker());
                            continue;
                        }
                        CaseValue::Invalid(invalid) => {
                            warn!("{}", invalid);
                            w.line(&format!("(* {} *)", escape_comment(&invalid.to_string())));
                            continue;
                        }
                    }
                    w.line("(* case *)");
                    w.line("Compare.Tactic.open_switch_case. {");
                    w.indent();
                    w.line("Compare.Tactic.stack_primitives.");
                    render_block_tactics(name, &case.body, w);
                    w.dedent();
                    w.line("}");
                }
                w.line("now apply Compare.Pure.");
            });
        }
        Statement::ForLoop {
            pre, post, body, ..
        } => {
            if let Some(marker) = initializer_marker(pre) {
                w.line(&marker);
            }
            w.line("(* for loop *)");
            render_let(w, |w| {
                w.line("Compare.Tactic.stack_primitives.");
                w.line("Compare.Tactic.open_for_loop.");
                w.line("{ (* condition *)");
                w.indented(&expression_tactic(name));
                w.line("}");
                for (label, block) in [("body", body), ("post", post)] {
                    w.line(&format!("{{ (* {} *)", label));
                    w.indent();
                    w.line("Compare.Tactic.stack_primitives.");
                    render_block_tactics(name, block, w);
                    w.dedent();
                    w.line("}");
                }
            });
        }
        Statement::Leave | Statement::Break | Statement::Continue if is_last => {
            w.line("now apply Compare.Pure.");
        }
        Statement::Leave | Statement::Break | Statement::Continue => {
            warn!("{} before the end of a block has no proof step", statement.node_type());
            w.line(&format!(
                "(* Unsupported: {} before the end of a block *)",
                statement.node_type()
            ));
        }
        Statement::Invalid(invalid) => {
            warn!("{}", invalid);
            w.line(&format!("(* {} *)", escape_comment(&invalid.to_string())));
        }
    }
}
