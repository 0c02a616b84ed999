// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Yul Intermediate Format
//!
//! In-memory model of the Yul AST emitted by the Solidity compiler, together with the
//! analyses the Coq backend needs before lowering: call-dependency ordering of sibling
//! functions and per-block mutation tracking. This crate does NOT generate Coq -
//! that responsibility belongs to `yul-coq-backend`.

pub mod analysis;
mod data;

// AST nodes (from data/nodes.rs)
pub use data::nodes::{
    Block, Case, CaseValue, Code, Expression, FunctionDefinition, InvalidNode, Literal,
    LiteralKind, Object, Statement, SubObject,
};

// JSON conversion (from data/conversion.rs)
pub use data::conversion::{object_from_json, parse_object};

// Literal encodings (from data/literals.rs)
pub use data::literals::{decode_padded_string, pad_string_literal, WORD_SIZE};
