// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Lowers Yul blocks into sequenced, state-threaded Coq terms
//!
//! Every block evaluates to `M.pure (<completion tag>, <state tuple>)`, where the state
//! tuple holds the names the block mutates from enclosing scopes. Nested constructs
//! (blocks, `if`, `switch`, `for`) are bound with `let_state~`, which rebinds their
//! state and propagates any non-normal completion together with the enclosing block's
//! own state.

use super::coq_writer::render_to_string;
use super::expression_renderer::{render_expression, render_literal};
use super::helpers::{parenthesized, var_pattern, var_tuple};
use crate::escape::escape_comment;
use itertools::Itertools;
use log::warn;
use yul_intermediate_format::analysis::{ScopeFrame, VariableSet};
use yul_intermediate_format::{Block, Case, CaseValue, Expression, InvalidNode, Statement};

/// How control leaves a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Completion {
    #[default]
    Tt,
    Break,
    Continue,
    Leave,
}

impl Completion {
    pub fn tag(self) -> &'static str {
        match self {
            Completion::Tt => "BlockUnit.Tt",
            Completion::Break => "BlockUnit.Break",
            Completion::Continue => "BlockUnit.Continue",
            Completion::Leave => "BlockUnit.Leave",
        }
    }

    fn of(statement: &Statement) -> Option<Self> {
        match statement {
            Statement::Break => Some(Completion::Break),
            Statement::Continue => Some(Completion::Continue),
            Statement::Leave => Some(Completion::Leave),
            _ => None,
        }
    }
}

/// Result of lowering one block.
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredFragment {
    pub text: String,
    /// Names from enclosing scopes written by the block
    pub updated: VariableSet,
    pub completion: Completion,
}

/// A control construct returning `(completion, tuple of updated)`.
#[derive(Debug, Clone)]
struct NestedFragment {
    text: String,
    updated: VariableSet,
}

enum StatementFragment {
    Binding(String),
    Nested(NestedFragment),
}

/// Statements of a block that execute in place; function definitions are emitted at
/// the top level instead.
pub(super) fn executable_statements(block: &Block) -> Vec<&Statement> {
    block
        .statements
        .iter()
        .filter(|statement| !matches!(statement, Statement::FunctionDefinition(_)))
        .collect()
}

/// Inline marker for a statement dropped because one of its expressions is malformed.
pub(super) fn malformed_marker(statement: &Statement, invalid: &InvalidNode) -> String {
    warn!("{} not translated: {}", statement.node_type(), invalid);
    format!("(* {} *)", escape_comment(&invalid.to_string()))
}

/// Inline marker for a non-empty for-loop initializer, which is ignored.
pub(super) fn initializer_marker(pre: &Block) -> Option<String> {
    if pre.statements.is_empty() {
        return None;
    }
    warn!(
        "for-loop initializer with {} statement(s) is not supported",
        pre.statements.len()
    );
    Some(format!(
        "(* Unsupported: for-loop initializer must be empty, ignored: {} *)",
        pre.statements.iter().map(Statement::node_type).join(", ")
    ))
}

/// Inline marker for an explicit `default` case; only the synthetic fallback runs.
pub(super) fn default_case_marker() -> &'static str {
    warn!("explicit `default` case of a switch is not translated");
    "(* Unsupported: explicit default case is not translated *)"
}

/// Lower a block. A trailing `leave`/`break`/`continue` becomes the completion tag;
/// function definitions are skipped.
pub fn lower_block(block: &Block) -> LoweredFragment {
    let executable = executable_statements(block);
    let (statements, completion) = match executable.split_last() {
        Some((last, rest)) => match Completion::of(last) {
            Some(completion) => (rest, completion),
            None => (executable.as_slice(), Completion::Tt),
        },
        None => (executable.as_slice(), Completion::Tt),
    };

    let mut frame = ScopeFrame::new();
    let fragments: Vec<StatementFragment> = statements
        .iter()
        .filter_map(|statement| lower_statement(statement, &mut frame))
        .collect();
    let updated = frame.finish();

    let text = render_to_string(|w| {
        for fragment in &fragments {
            match fragment {
                StatementFragment::Binding(text) => w.line(text),
                StatementFragment::Nested(nested) => w.line(&bind_state(nested, &updated)),
            }
        }
        write!(w, "M.pure ({}, {})", completion.tag(), var_tuple(&updated));
    });

    LoweredFragment {
        text,
        updated,
        completion,
    }
}

fn lower_statement(statement: &Statement, frame: &mut ScopeFrame) -> Option<StatementFragment> {
    if let Some(invalid) = statement.invalid_expression() {
        return Some(StatementFragment::Binding(malformed_marker(statement, invalid)));
    }
    let fragment = match statement {
        Statement::FunctionDefinition(_) => return None,
        Statement::VariableDeclaration { variables, value } => {
            frame.declare(variables);
            StatementFragment::Binding(render_binding(variables, value.as_ref()))
        }
        Statement::Assignment { variables, value } => {
            frame.assign(variables);
            StatementFragment::Binding(render_binding(variables, Some(value)))
        }
        Statement::Expression(expression) => {
            StatementFragment::Binding(format!("do~ [[ {} ]] in", render_expression(expression)))
        }
        Statement::Block(block) => {
            let lowered = lower_block(block);
            nested(
                frame,
                NestedFragment {
                    text: lowered.text,
                    updated: lowered.updated,
                },
            )
        }
        Statement::If { condition, body } => nested(frame, lower_if(condition, body)),
        Statement::Switch { expression, cases } => nested(frame, lower_switch(expression, cases)),
        Statement::ForLoop {
            pre,
            condition,
            post,
            body,
        } => nested(frame, lower_for(pre, condition, post, body)),
        Statement::Leave | Statement::Break | Statement::Continue => {
            let keyword = match statement {
                Statement::Leave => "leave",
                Statement::Break => "break",
                _ => "continue",
            };
            warn!("`{}` before the end of a block is not supported", keyword);
            StatementFragment::Binding(format!(
                "(* Unsupported: `{}` is only supported as the last statement of a block *)",
                keyword
            ))
        }
        Statement::Invalid(invalid) => {
            warn!("{}", invalid);
            StatementFragment::Binding(format!("(* {} *)", escape_comment(&invalid.to_string())))
        }
    };
    Some(fragment)
}

fn nested(frame: &mut ScopeFrame, fragment: NestedFragment) -> StatementFragment {
    frame.assign(&fragment.updated);
    StatementFragment::Nested(fragment)
}

fn render_binding(variables: &[String], value: Option<&Expression>) -> String {
    let value = match value {
        Some(value) => render_expression(value),
        None => match variables.len() {
            1 => "0".to_string(),
            count => var_tuple(std::iter::repeat("0").take(count)),
        },
    };
    format!("let~ {} := [[ {} ]] in", var_pattern(variables), value)
}

/// Re-express a construct returning the `from` state tuple as one returning `onto`.
/// Names of `onto` the construct never touches keep their prior value.
pub fn lift_state(text: &str, from: &VariableSet, onto: &VariableSet) -> String {
    if from == onto {
        return text.to_string();
    }
    let head = format!(
        "Shallow.lift_state_update (fun {} => {}) ",
        var_pattern(from),
        var_tuple(onto)
    );
    parenthesized(&head, text, "")
}

/// `let_state~` binding of a nested construct inside a block whose own externally
/// visible state is `parent`.
fn bind_state(nested: &NestedFragment, parent: &VariableSet) -> String {
    let expected: VariableSet = parent.union(&nested.updated).cloned().collect();
    parenthesized(
        &format!("let_state~ {} := ", var_pattern(&expected)),
        &lift_state(&nested.text, &nested.updated, &expected),
        &format!(" default~ {} in", var_tuple(parent)),
    )
}

fn lower_if(condition: &Expression, body: &Block) -> NestedFragment {
    let lowered = lower_block(body);
    let text = render_to_string(|w| {
        w.line(&format!("Shallow.if_ [[ {} ]]", render_expression(condition)));
        w.indent();
        w.line(&parenthesized("", &lowered.text, ""));
        write!(w, "(M.pure (BlockUnit.Tt, {}))", var_tuple(&lowered.updated));
        w.dedent();
    });
    NestedFragment {
        text,
        updated: lowered.updated,
    }
}

fn lower_switch(expression: &Expression, cases: &[Case]) -> NestedFragment {
    let mut notes = Vec::new();
    let mut branches = Vec::new();
    for case in cases {
        match &case.value {
            CaseValue::Literal(literal) => {
                branches.push((render_literal(literal), lower_block(&case.body)));
            }
            CaseValue::Default => notes.push(default_case_marker().to_string()),
            CaseValue::Invalid(invalid) => {
                warn!("{}", invalid);
                notes.push(format!("(* {} *)", escape_comment(&invalid.to_string())));
            }
        }
    }

    let updated: VariableSet = branches
        .iter()
        .flat_map(|(_, branch)| branch.updated.iter().cloned())
        .collect();

    let text = render_to_string(|w| {
        for note in &notes {
            w.line(note);
        }
        w.line(&format!("let~ δ := [[ {} ]] in", render_expression(expression)));
        for (value, branch) in &branches {
            w.write(&parenthesized(
                &format!("if δ =? {} then ", value),
                &lift_state(&branch.text, &branch.updated, &updated),
                " else ",
            ));
        }
        write!(w, "M.pure (BlockUnit.Tt, {})", var_tuple(&updated));
    });
    NestedFragment { text, updated }
}

fn lower_for(pre: &Block, condition: &Expression, post: &Block, body: &Block) -> NestedFragment {
    let body = lower_block(body);
    let post = lower_block(post);
    let updated: VariableSet = body.updated.union(&post.updated).cloned().collect();
    let pattern = var_pattern(&updated);

    let text = render_to_string(|w| {
        if let Some(marker) = initializer_marker(pre) {
            w.line(&marker);
        }
        w.line(&format!("Shallow.for_ {}", var_tuple(&updated)));
        w.indent();
        w.line(&format!(
            "(fun {} => [[ {} ]])",
            pattern,
            render_expression(condition)
        ));
        for (index, lowered) in [&body, &post].into_iter().enumerate() {
            w.write(&parenthesized(
                &format!("(fun {} => ", pattern),
                &lift_state(&lowered.text, &lowered.updated, &updated),
                ")",
            ));
            if index == 0 {
                w.newline();
            }
        }
        w.dedent();
    });
    NestedFragment { text, updated }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yul_intermediate_format::{FunctionDefinition, Literal, LiteralKind};

    fn declare(name: &str, value: &str) -> Statement {
        Statement::VariableDeclaration {
            variables: vec![name.to_string()],
            value: Some(Expression::number(value)),
        }
    }

    fn assign(name: &str, value: &str) -> Statement {
        Statement::Assignment {
            variables: vec![name.to_string()],
            value: Expression::number(value),
        }
    }

    fn set(names: &[&str]) -> VariableSet {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_local_declarations_do_not_escape() {
        let block = Block::new(vec![declare("a", "1"), declare("b", "2")]);
        let lowered = lower_block(&block);
        assert!(lowered.updated.is_empty());
        assert_eq!(lowered.completion, Completion::Tt);
        assert_eq!(
            lowered.text,
            "let~ a := [[ 1 ]] in\nlet~ b := [[ 2 ]] in\nM.pure (BlockUnit.Tt, tt)"
        );
    }

    #[test]
    fn test_if_with_matching_sets_needs_no_lift() {
        let block = Block::new(vec![
            assign("x", "0"),
            Statement::If {
                condition: Expression::identifier("cond"),
                body: Block::new(vec![assign("x", "1")]),
            },
        ]);
        let lowered = lower_block(&block);
        assert_eq!(lowered.updated, set(&["x"]));
        assert!(!lowered.text.contains("lift_state_update"));
        assert!(lowered.text.contains("let_state~ x := ("));
        assert!(lowered.text.contains("Shallow.if_ [[ cond ]]"));
        // the false path carries the prior value through
        assert!(lowered.text.contains("(M.pure (BlockUnit.Tt, x))"));
        assert!(lowered.text.contains(") default~ x in"));
        assert!(lowered.text.ends_with("M.pure (BlockUnit.Tt, x)"));
    }

    #[test]
    fn test_nested_block_is_lifted_onto_parent_state() {
        let block = Block::new(vec![
            declare("y", "0"),
            assign("x", "1"),
            Statement::Block(Block::new(vec![assign("y", "2")])),
        ]);
        let lowered = lower_block(&block);
        assert_eq!(lowered.updated, set(&["x"]));
        assert!(lowered
            .text
            .contains("let_state~ '(x, y) := (\n  Shallow.lift_state_update (fun y => (x, y)) ("));
        assert!(lowered.text.contains(") default~ x in"));
    }

    #[test]
    fn test_trailing_break_sets_completion() {
        let block = Block::new(vec![assign("x", "1"), Statement::Break]);
        let lowered = lower_block(&block);
        assert_eq!(lowered.completion, Completion::Break);
        assert!(lowered.text.ends_with("M.pure (BlockUnit.Break, x)"));
        assert!(!lowered.text.contains("Unsupported"));
    }

    #[test]
    fn test_leave_before_the_end_is_diagnosed() {
        let block = Block::new(vec![Statement::Leave, assign("x", "1")]);
        let lowered = lower_block(&block);
        assert_eq!(lowered.completion, Completion::Tt);
        assert!(lowered.text.starts_with(
            "(* Unsupported: `leave` is only supported as the last statement of a block *)"
        ));
    }

    #[test]
    fn test_statement_order_is_preserved() {
        let block = Block::new(vec![
            Statement::Expression(Expression::call("first", vec![])),
            assign("x", "1"),
            Statement::Expression(Expression::call("second", vec![])),
        ]);
        let text = lower_block(&block).text;
        let first = text.find("first").unwrap();
        let assignment = text.find("let~ x").unwrap();
        let second = text.find("second").unwrap();
        assert!(first < assignment && assignment < second);
    }

    #[test]
    fn test_declared_and_updated_are_disjoint() {
        let block = Block::new(vec![
            declare("a", "0"),
            assign("a", "1"),
            Statement::If {
                condition: Expression::identifier("c"),
                body: Block::new(vec![assign("a", "2"), assign("b", "3")]),
            },
        ]);
        let lowered = lower_block(&block);
        assert_eq!(lowered.updated, set(&["b"]));
    }

    #[test]
    fn test_uninitialised_declarations_are_zero() {
        let block = Block::new(vec![
            Statement::VariableDeclaration {
                variables: vec!["a".to_string()],
                value: None,
            },
            Statement::VariableDeclaration {
                variables: vec!["b".to_string(), "c".to_string()],
                value: None,
            },
        ]);
        let text = lower_block(&block).text;
        assert!(text.contains("let~ a := [[ 0 ]] in"));
        assert!(text.contains("let~ '(b, c) := [[ (0, 0) ]] in"));
    }

    #[test]
    fn test_switch_unions_case_updates() {
        let block = Block::new(vec![Statement::Switch {
            expression: Expression::identifier("selector"),
            cases: vec![
                Case {
                    value: CaseValue::Literal(Literal::string("a")),
                    body: Block::new(vec![assign("x", "1")]),
                },
                Case {
                    value: CaseValue::Literal(Literal {
                        kind: LiteralKind::Number,
                        value: "2".to_string(),
                        hex_value: None,
                    }),
                    body: Block::new(vec![assign("y", "1")]),
                },
                Case {
                    value: CaseValue::Default,
                    body: Block::new(vec![assign("z", "1")]),
                },
            ],
        }]);
        let lowered = lower_block(&block);
        // the explicit default case is left to the synthetic fallback
        assert_eq!(lowered.updated, set(&["x", "y"]));
        assert!(lowered
            .text
            .contains("(* Unsupported: explicit default case is not translated *)"));
        assert!(lowered.text.contains("let~ δ := [[ selector ]] in"));
        assert!(lowered.text.contains("if δ =? 2 then ("));
        assert!(lowered
            .text
            .contains("Shallow.lift_state_update (fun x => (x, y))"));
        assert!(lowered.text.contains(") else M.pure (BlockUnit.Tt, (x, y))"));
    }

    #[test]
    fn test_for_loop_threads_body_and_post() {
        let block = Block::new(vec![Statement::ForLoop {
            pre: Block::default(),
            condition: Expression::call("lt", vec![Expression::identifier("i"), Expression::number("10")]),
            post: Block::new(vec![Statement::Assignment {
                variables: vec!["i".to_string()],
                value: Expression::call("add", vec![Expression::identifier("i"), Expression::number("1")]),
            }]),
            body: Block::new(vec![assign("total", "1"), Statement::Continue]),
        }]);
        let lowered = lower_block(&block);
        assert_eq!(lowered.updated, set(&["i", "total"]));
        assert!(lowered.text.contains("Shallow.for_ (i, total)"));
        assert!(lowered
            .text
            .contains("(fun '(i, total) => [[ lt ~(| i, 10 |) ]])"));
        assert!(lowered.text.contains("M.pure (BlockUnit.Continue, total)"));
        assert!(!lowered.text.contains("Unsupported"));
    }

    #[test]
    fn test_for_loop_with_initializer_is_diagnosed() {
        let block = Block::new(vec![Statement::ForLoop {
            pre: Block::new(vec![declare("i", "0")]),
            condition: Expression::identifier("go"),
            post: Block::default(),
            body: Block::default(),
        }]);
        let text = lower_block(&block).text;
        assert!(text.contains(
            "(* Unsupported: for-loop initializer must be empty, ignored: YulVariableDeclaration *)"
        ));
        assert!(text.contains("Shallow.for_ tt"));
    }

    #[test]
    fn test_functions_and_invalid_nodes() {
        let block = Block::new(vec![
            Statement::FunctionDefinition(FunctionDefinition {
                name: "f".to_string(),
                parameters: vec![],
                return_variables: vec![],
                body: Block::default(),
            }),
            Statement::Invalid(InvalidNode::UnknownKind {
                node_type: "YulFancy".to_string(),
            }),
        ]);
        let text = lower_block(&block).text;
        assert_eq!(
            text,
            "(* Unsupported node type: YulFancy *)\nM.pure (BlockUnit.Tt, tt)"
        );
    }

    fn missing_name() -> Expression {
        Expression::Invalid(InvalidNode::MissingField {
            node_type: "YulFunctionCall".to_string(),
            field: "functionName",
        })
    }

    #[test]
    fn test_malformed_expressions_drop_their_statement() {
        let block = Block::new(vec![
            Statement::Expression(Expression::call(
                "mstore",
                vec![Expression::number("0"), missing_name()],
            )),
            Statement::If {
                condition: missing_name(),
                body: Block::new(vec![assign("x", "1")]),
            },
            Statement::ForLoop {
                pre: Block::default(),
                condition: Expression::call("lt", vec![missing_name()]),
                post: Block::default(),
                body: Block::default(),
            },
            assign("y", "2"),
        ]);
        let lowered = lower_block(&block);
        assert!(!lowered.text.contains("[[ (*"));
        assert!(!lowered.text.contains("((*"));
        assert_eq!(
            lowered
                .text
                .matches("(* Malformed YulFunctionCall: missing field 'functionName' *)\n")
                .count(),
            3
        );
        // the dropped `if` no longer contributes its update
        assert_eq!(lowered.updated, set(&["y"]));
        assert!(lowered.text.contains("let~ y := [[ 2 ]] in"));
    }

    #[test]
    fn test_trailing_leave_ignores_function_definitions() {
        let block = Block::new(vec![
            Statement::Leave,
            Statement::FunctionDefinition(FunctionDefinition {
                name: "f".to_string(),
                parameters: vec![],
                return_variables: vec![],
                body: Block::default(),
            }),
        ]);
        let lowered = lower_block(&block);
        assert_eq!(lowered.completion, Completion::Leave);
        assert_eq!(lowered.text, "M.pure (BlockUnit.Leave, tt)");
    }
}
