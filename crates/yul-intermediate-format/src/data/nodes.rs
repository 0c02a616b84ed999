// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Yul AST node definitions
//!
//! The node kinds form a closed set: every construct the translator understands has
//! its own variant, and anything else is carried as an [`InvalidNode`] marker so that
//! one unknown construct degrades a single statement instead of the whole document.

use std::fmt;

/// A Yul object: one code unit plus nested deployable sub-units.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub code: Code,
    pub sub_objects: Vec<SubObject>,
}

/// Children of an object, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum SubObject {
    Object(Object),
    /// Raw data section; carries no executable semantics.
    Data { name: String },
    Invalid(InvalidNode),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Code {
    Block(Block),
    Invalid(InvalidNode),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub parameters: Vec<String>,
    pub return_variables: Vec<String>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Block),
    /// `let a, b := value`; `value` is absent for zero-initialised declarations
    VariableDeclaration {
        variables: Vec<String>,
        value: Option<Expression>,
    },
    Assignment {
        variables: Vec<String>,
        value: Expression,
    },
    Expression(Expression),
    If {
        condition: Expression,
        body: Block,
    },
    Switch {
        expression: Expression,
        cases: Vec<Case>,
    },
    ForLoop {
        pre: Block,
        condition: Expression,
        post: Block,
        body: Block,
    },
    FunctionDefinition(FunctionDefinition),
    Leave,
    Break,
    Continue,
    Invalid(InvalidNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub value: CaseValue,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseValue {
    Literal(Literal),
    Default,
    Invalid(InvalidNode),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    FunctionCall {
        name: String,
        arguments: Vec<Expression>,
    },
    Identifier(String),
    Literal(Literal),
    Invalid(InvalidNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Number,
    Bool,
    String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Source text of the literal (decimal/hex number, `true`/`false`, or string contents)
    pub value: String,
    /// Hex encoding of the raw bytes, present for string literals
    pub hex_value: Option<String>,
}

/// A node that could not be turned into one of the closed set of kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidNode {
    /// `nodeType` names a kind outside the closed set
    UnknownKind { node_type: String },
    /// A field required for the kind is absent or has the wrong shape
    MissingField {
        node_type: String,
        field: &'static str,
    },
    /// The JSON value is not an object with a `nodeType`
    NotANode { found: String },
}

impl fmt::Display for InvalidNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidNode::UnknownKind { node_type } => {
                write!(f, "Unsupported node type: {}", node_type)
            }
            InvalidNode::MissingField { node_type, field } => {
                write!(f, "Malformed {}: missing field '{}'", node_type, field)
            }
            InvalidNode::NotANode { found } => write!(f, "Unsupported node: {}", found),
        }
    }
}

impl Statement {
    /// The Yul `nodeType` tag this statement was read from.
    pub fn node_type(&self) -> &str {
        match self {
            Statement::Block(_) => "YulBlock",
            Statement::VariableDeclaration { .. } => "YulVariableDeclaration",
            Statement::Assignment { .. } => "YulAssignment",
            Statement::Expression(_) => "YulExpressionStatement",
            Statement::If { .. } => "YulIf",
            Statement::Switch { .. } => "YulSwitch",
            Statement::ForLoop { .. } => "YulForLoop",
            Statement::FunctionDefinition(_) => "YulFunctionDefinition",
            Statement::Leave => "YulLeave",
            Statement::Break => "YulBreak",
            Statement::Continue => "YulContinue",
            Statement::Invalid(_) => "invalid",
        }
    }

    /// First malformed node among the expressions this statement evaluates itself.
    /// Nested blocks are not searched; they report their own statements.
    pub fn invalid_expression(&self) -> Option<&InvalidNode> {
        match self {
            Statement::VariableDeclaration { value, .. } => {
                value.as_ref().and_then(Expression::invalid_node)
            }
            Statement::Assignment { value, .. } => value.invalid_node(),
            Statement::Expression(expression) => expression.invalid_node(),
            Statement::If { condition, .. } => condition.invalid_node(),
            Statement::Switch { expression, .. } => expression.invalid_node(),
            Statement::ForLoop { condition, .. } => condition.invalid_node(),
            _ => None,
        }
    }
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Function definitions appearing directly in this block, in source order.
    pub fn function_definitions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::FunctionDefinition(function) => Some(function),
            _ => None,
        })
    }
}

impl Expression {
    pub fn call(name: &str, arguments: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.to_string(),
            arguments,
        }
    }

    pub fn identifier(name: &str) -> Self {
        Expression::Identifier(name.to_string())
    }

    pub fn number(value: &str) -> Self {
        Expression::Literal(Literal {
            kind: LiteralKind::Number,
            value: value.to_string(),
            hex_value: None,
        })
    }

    /// First malformed node in this expression, arguments included.
    pub fn invalid_node(&self) -> Option<&InvalidNode> {
        match self {
            Expression::Invalid(invalid) => Some(invalid),
            Expression::FunctionCall { arguments, .. } => {
                arguments.iter().find_map(Expression::invalid_node)
            }
            Expression::Identifier(_) | Expression::Literal(_) => None,
        }
    }

    /// Literals and bare identifiers never need parentheses in argument position
    pub fn is_atomic(&self) -> bool {
        matches!(self, Expression::Identifier(_) | Expression::Literal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_name() -> InvalidNode {
        InvalidNode::MissingField {
            node_type: "YulFunctionCall".to_string(),
            field: "functionName",
        }
    }

    #[test]
    fn test_invalid_argument_is_found() {
        let expression = Expression::call(
            "mstore",
            vec![Expression::number("0"), Expression::Invalid(missing_name())],
        );
        assert_eq!(expression.invalid_node(), Some(&missing_name()));
        assert_eq!(
            Statement::Expression(expression).invalid_expression(),
            Some(&missing_name())
        );
    }

    #[test]
    fn test_nested_blocks_are_not_searched() {
        let statement = Statement::If {
            condition: Expression::identifier("c"),
            body: Block::new(vec![Statement::Expression(Expression::Invalid(missing_name()))]),
        };
        assert_eq!(statement.invalid_expression(), None);
    }
}
