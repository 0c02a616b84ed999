// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Analyses over the Yul AST run before lowering

mod dependency_order;
mod scope;

pub use dependency_order::{called_functions, order_functions, DependencyGraph, DependencyOrder};
pub use scope::{ScopeFrame, VariableSet};
