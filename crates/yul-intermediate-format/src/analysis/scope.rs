// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Per-block mutation tracking
//!
//! A frame lives exactly as long as the lowering of one block. Names declared in the
//! block vanish with it, so only mutations of names coming from enclosing scopes are
//! reported to the caller.

use std::collections::BTreeSet;

/// Ordered so that state tuples render identically across runs.
pub type VariableSet = BTreeSet<String>;

#[derive(Debug, Clone, Default)]
pub struct ScopeFrame {
    declared: VariableSet,
    updated: VariableSet,
}

impl ScopeFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record names introduced by a variable declaration.
    pub fn declare<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            self.updated.remove(name);
            self.declared.insert(name.to_string());
        }
    }

    /// Record names written by an assignment or by a nested construct.
    /// Names already local to this block are not tracked.
    pub fn assign<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref();
            if !self.declared.contains(name) {
                self.updated.insert(name.to_string());
            }
        }
    }

    /// Externally visible mutations; disjoint from the declared names.
    pub fn finish(self) -> VariableSet {
        let ScopeFrame { declared, updated } = self;
        updated.difference(&declared).cloned().collect()
    }
}
