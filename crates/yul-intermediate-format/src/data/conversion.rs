// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Conversion from the compiler's JSON AST into [`Object`] trees
//!
//! Only document-level problems (invalid JSON, a root that is not a `YulObject`) are
//! errors. Every problem below the root is recovered locally and recorded as an
//! [`InvalidNode`] in place of the offending node.

use super::nodes::{
    Block, Case, CaseValue, Code, Expression, FunctionDefinition, InvalidNode, Literal,
    LiteralKind, Object, Statement, SubObject,
};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;

type Converted<T> = std::result::Result<T, InvalidNode>;

/// Parse a JSON document holding one `YulObject`.
pub fn parse_object(text: &str) -> Result<Object> {
    let value: Value = serde_json::from_str(text).context("input is not a valid JSON document")?;
    object_from_json(&value)
}

/// Convert the root `YulObject` of an already parsed document.
pub fn object_from_json(value: &Value) -> Result<Object> {
    match node_type(value) {
        Some("YulObject") => {}
        Some(other) => bail!("unsupported top-level node type: {}", other),
        None => bail!("top-level value is not a Yul AST node"),
    }
    convert_object(value).map_err(|invalid| anyhow!("invalid top-level object: {}", invalid))
}

fn node_type(value: &Value) -> Option<&str> {
    value.get("nodeType").and_then(Value::as_str)
}

fn kind_of(value: &Value) -> Converted<&str> {
    node_type(value).ok_or_else(|| InvalidNode::NotANode {
        found: summarize(value),
    })
}

/// Short rendering of a non-node value for diagnostics.
fn summarize(value: &Value) -> String {
    let text = value.to_string();
    match text.char_indices().nth(40) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}

fn field<'a>(value: &'a Value, node_type: &str, field: &'static str) -> Converted<&'a Value> {
    value
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| missing(node_type, field))
}

fn missing(node_type: &str, field: &'static str) -> InvalidNode {
    InvalidNode::MissingField {
        node_type: node_type.to_string(),
        field,
    }
}

fn string_field(value: &Value, node_type: &str, name: &'static str) -> Converted<String> {
    field(value, node_type, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| missing(node_type, name))
}

fn array_field<'a>(value: &'a Value, node_type: &str, name: &'static str) -> Converted<&'a [Value]> {
    field(value, node_type, name)?
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| missing(node_type, name))
}

/// Arrays the compiler omits when empty.
fn optional_array<'a>(value: &'a Value, node_type: &str, name: &'static str) -> Converted<&'a [Value]> {
    match value.get(name) {
        None | Some(Value::Null) => Ok(&[]),
        Some(_) => array_field(value, node_type, name),
    }
}

/// Names of typed names (`YulTypedName`) or identifiers (`YulIdentifier`).
fn names(items: &[Value]) -> Converted<Vec<String>> {
    items
        .iter()
        .map(|item| {
            let kind = node_type(item).unwrap_or("YulTypedName");
            string_field(item, kind, "name")
        })
        .collect()
}

fn convert_object(value: &Value) -> Converted<Object> {
    let kind = kind_of(value)?;
    let name = string_field(value, kind, "name")?;
    let code = convert_code(field(value, kind, "code")?);
    let sub_objects = optional_array(value, kind, "subObjects")?
        .iter()
        .map(convert_sub_object)
        .collect();
    Ok(Object {
        name,
        code,
        sub_objects,
    })
}

fn convert_sub_object(value: &Value) -> SubObject {
    match node_type(value) {
        Some("YulObject") => match convert_object(value) {
            Ok(object) => SubObject::Object(object),
            Err(invalid) => SubObject::Invalid(invalid),
        },
        Some("YulData") => SubObject::Data {
            name: value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        Some(other) => SubObject::Invalid(InvalidNode::UnknownKind {
            node_type: other.to_string(),
        }),
        None => SubObject::Invalid(InvalidNode::NotANode {
            found: summarize(value),
        }),
    }
}

fn convert_code(value: &Value) -> Code {
    let converted = kind_of(value).and_then(|kind| match kind {
        "YulCode" => convert_block(field(value, kind, "block")?),
        other => Err(InvalidNode::UnknownKind {
            node_type: other.to_string(),
        }),
    });
    match converted {
        Ok(block) => Code::Block(block),
        Err(invalid) => Code::Invalid(invalid),
    }
}

fn convert_block(value: &Value) -> Converted<Block> {
    let kind = kind_of(value)?;
    if kind != "YulBlock" {
        return Err(InvalidNode::UnknownKind {
            node_type: kind.to_string(),
        });
    }
    let statements = optional_array(value, kind, "statements")?
        .iter()
        .map(statement_from_json)
        .collect();
    Ok(Block { statements })
}

/// Convert one statement, degrading to [`Statement::Invalid`] on failure.
pub(crate) fn statement_from_json(value: &Value) -> Statement {
    convert_statement(value).unwrap_or_else(Statement::Invalid)
}

fn convert_statement(value: &Value) -> Converted<Statement> {
    let kind = kind_of(value)?;
    let statement = match kind {
        "YulBlock" => Statement::Block(convert_block(value)?),
        "YulVariableDeclaration" => Statement::VariableDeclaration {
            variables: names(array_field(value, kind, "variables")?)?,
            value: value
                .get("value")
                .filter(|v| !v.is_null())
                .map(expression_from_json),
        },
        "YulAssignment" => Statement::Assignment {
            variables: names(array_field(value, kind, "variableNames")?)?,
            value: expression_from_json(field(value, kind, "value")?),
        },
        "YulExpressionStatement" => {
            Statement::Expression(expression_from_json(field(value, kind, "expression")?))
        }
        "YulIf" => Statement::If {
            condition: expression_from_json(field(value, kind, "condition")?),
            body: convert_block(field(value, kind, "body")?)?,
        },
        "YulSwitch" => Statement::Switch {
            expression: expression_from_json(field(value, kind, "expression")?),
            cases: optional_array(value, kind, "cases")?
                .iter()
                .map(convert_case)
                .collect::<Converted<_>>()?,
        },
        "YulForLoop" => Statement::ForLoop {
            pre: convert_block(field(value, kind, "pre")?)?,
            condition: expression_from_json(field(value, kind, "condition")?),
            post: convert_block(field(value, kind, "post")?)?,
            body: convert_block(field(value, kind, "body")?)?,
        },
        "YulFunctionDefinition" => Statement::FunctionDefinition(FunctionDefinition {
            name: string_field(value, kind, "name")?,
            parameters: names(optional_array(value, kind, "parameters")?)?,
            return_variables: names(optional_array(value, kind, "returnVariables")?)?,
            body: convert_block(field(value, kind, "body")?)?,
        }),
        "YulLeave" => Statement::Leave,
        "YulBreak" => Statement::Break,
        "YulContinue" => Statement::Continue,
        other => {
            return Err(InvalidNode::UnknownKind {
                node_type: other.to_string(),
            })
        }
    };
    Ok(statement)
}

fn convert_case(value: &Value) -> Converted<Case> {
    let kind = kind_of(value)?;
    let case_value = match field(value, kind, "value")? {
        Value::String(tag) if tag == "default" => CaseValue::Default,
        literal => match expression_from_json(literal) {
            Expression::Literal(literal) => CaseValue::Literal(literal),
            Expression::Invalid(invalid) => CaseValue::Invalid(invalid),
            _ => CaseValue::Invalid(missing(kind, "value")),
        },
    };
    Ok(Case {
        value: case_value,
        body: convert_block(field(value, kind, "body")?)?,
    })
}

/// Convert one expression, degrading to [`Expression::Invalid`] on failure.
pub(crate) fn expression_from_json(value: &Value) -> Expression {
    convert_expression(value).unwrap_or_else(Expression::Invalid)
}

fn convert_expression(value: &Value) -> Converted<Expression> {
    let kind = kind_of(value)?;
    match kind {
        "YulFunctionCall" => {
            let function_name = field(value, kind, "functionName")?;
            Ok(Expression::FunctionCall {
                name: string_field(function_name, "YulIdentifier", "name")
                    .map_err(|_| missing(kind, "functionName"))?,
                arguments: optional_array(value, kind, "arguments")?
                    .iter()
                    .map(expression_from_json)
                    .collect(),
            })
        }
        "YulIdentifier" => Ok(Expression::Identifier(string_field(value, kind, "name")?)),
        "YulLiteral" => convert_literal(value, kind).map(Expression::Literal),
        other => Err(InvalidNode::UnknownKind {
            node_type: other.to_string(),
        }),
    }
}

fn convert_literal(value: &Value, kind: &str) -> Converted<Literal> {
    let literal_kind = match string_field(value, kind, "kind")?.as_str() {
        "number" => LiteralKind::Number,
        "bool" => LiteralKind::Bool,
        "string" => LiteralKind::String,
        other => {
            return Err(InvalidNode::UnknownKind {
                node_type: format!("{} of kind {}", kind, other),
            })
        }
    };
    let text = value.get("value").and_then(Value::as_str).map(str::to_string);
    let hex_value = value.get("hexValue").and_then(Value::as_str).map(str::to_string);
    match (text, hex_value) {
        (None, None) => Err(missing(kind, "value")),
        (Some(text), hex_value) => Ok(Literal {
            kind: literal_kind,
            value: text,
            hex_value,
        }),
        (None, Some(hex_value)) if literal_kind == LiteralKind::String => Ok(Literal {
            kind: literal_kind,
            value: String::new(),
            hex_value: Some(hex_value),
        }),
        (None, Some(_)) => Err(missing(kind, "value")),
    }
}
