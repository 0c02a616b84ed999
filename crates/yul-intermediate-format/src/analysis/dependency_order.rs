// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Topological sorting of sibling functions by call dependencies
//!
//! Call graphs among Yul helpers may be cyclic (mutually recursive helpers exist in
//! practice). Cycles are reported alongside the order instead of failing the sort.

use crate::data::nodes::{Block, Expression, FunctionDefinition, Statement};
use itertools::Itertools;
use log::warn;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{depth_first_search, DfsEvent};
use std::collections::{BTreeMap, BTreeSet};

/// Caller → callees, for one code block. Callees need not be defined locally:
/// builtins and unresolved names become leaf nodes.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

/// Best-effort definition order plus every back-edge cycle met on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOrder {
    pub order: Vec<String>,
    pub cycles: Vec<Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_functions<'a, I>(functions: I) -> Self
    where
        I: IntoIterator<Item = &'a FunctionDefinition>,
    {
        let mut graph = Self::new();
        for function in functions {
            graph.add_function(&function.name, called_functions(function));
        }
        graph
    }

    pub fn add_function(&mut self, name: &str, callees: BTreeSet<String>) {
        self.edges.entry(name.to_string()).or_default().extend(callees);
    }

    /// Post-order DFS over all nodes in name order: callees precede callers,
    /// cycles aside.
    pub fn order(&self) -> DependencyOrder {
        let mut graph = DiGraphMap::<&str, ()>::new();
        let mut nodes = BTreeSet::new();
        for (caller, callees) in &self.edges {
            graph.add_node(caller.as_str());
            nodes.insert(caller.as_str());
            for callee in callees {
                graph.add_edge(caller.as_str(), callee.as_str(), ());
                nodes.insert(callee.as_str());
            }
        }

        let mut result = DependencyOrder::default();
        let mut path: Vec<&str> = Vec::new();
        depth_first_search(&graph, nodes.iter().copied(), |event| match event {
            DfsEvent::Discover(node, _) => path.push(node),
            DfsEvent::BackEdge(_, target) => {
                let start = path.iter().rposition(|&n| n == target).unwrap_or(0);
                let cycle: Vec<String> = path[start..]
                    .iter()
                    .chain(std::iter::once(&target))
                    .map(|n| n.to_string())
                    .collect();
                result.cycles.push(cycle);
            }
            DfsEvent::Finish(node, _) => {
                path.pop();
                result.order.push(node.to_string());
            }
            DfsEvent::TreeEdge(..) | DfsEvent::CrossForwardEdge(..) => {}
        });

        for message in result.cycle_warnings() {
            warn!("{}", message);
        }
        result
    }
}

impl DependencyOrder {
    /// One human-readable diagnostic per detected back-edge.
    pub fn cycle_warnings(&self) -> Vec<String> {
        self.cycles
            .iter()
            .map(|cycle| format!("dependency cycle detected: {}", cycle.iter().join(" -> ")))
            .collect()
    }
}

/// Names of every function called anywhere in the body, sorted.
pub fn called_functions(function: &FunctionDefinition) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    collect_block(&function.body, &mut names);
    names
}

fn collect_block(block: &Block, names: &mut BTreeSet<String>) {
    for statement in &block.statements {
        collect_statement(statement, names);
    }
}

fn collect_statement(statement: &Statement, names: &mut BTreeSet<String>) {
    match statement {
        Statement::Block(block) => collect_block(block, names),
        Statement::VariableDeclaration { value, .. } => {
            if let Some(value) = value {
                collect_expression(value, names);
            }
        }
        Statement::Assignment { value, .. } => collect_expression(value, names),
        Statement::Expression(expression) => collect_expression(expression, names),
        Statement::If { condition, body } => {
            collect_expression(condition, names);
            collect_block(body, names);
        }
        Statement::Switch { expression, cases } => {
            collect_expression(expression, names);
            for case in cases {
                collect_block(&case.body, names);
            }
        }
        Statement::ForLoop {
            pre,
            condition,
            post,
            body,
        } => {
            collect_block(pre, names);
            collect_expression(condition, names);
            collect_block(post, names);
            collect_block(body, names);
        }
        Statement::FunctionDefinition(function) => collect_block(&function.body, names),
        Statement::Leave | Statement::Break | Statement::Continue | Statement::Invalid(_) => {}
    }
}

fn collect_expression(expression: &Expression, names: &mut BTreeSet<String>) {
    if let Expression::FunctionCall { name, arguments } = expression {
        names.insert(name.clone());
        for argument in arguments {
            collect_expression(argument, names);
        }
    }
}

/// Reorder `functions` to follow `order`; functions missing from it keep their
/// relative order at the end.
pub fn order_functions<'a>(
    order: &[String],
    functions: impl IntoIterator<Item = &'a FunctionDefinition>,
) -> Vec<&'a FunctionDefinition> {
    let position: BTreeMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(index, name)| (name.as_str(), index))
        .collect();
    functions
        .into_iter()
        .sorted_by_key(|function| {
            position
                .get(function.name.as_str())
                .copied()
                .unwrap_or(order.len())
        })
        .collect()
}
