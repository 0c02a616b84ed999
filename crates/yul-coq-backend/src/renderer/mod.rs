// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Coq renderer for Yul objects.
//!
//! Statement lowering produces the shallow embedding text; the object renderer walks
//! the object tree once and delegates each code block to the emitter of the selected
//! output mode.

mod coq_writer;
mod expression_renderer;
mod function_renderer;
mod helpers;
mod object_renderer;
mod proof_renderer;
mod statement_renderer;

pub use coq_writer::CoqWriter;
pub use expression_renderer::render_expression;
pub use object_renderer::{render_object, CodeContext, CodeEmitter, ShallowEmitter};
pub use proof_renderer::ProofEmitter;
pub use statement_renderer::{lower_block, Completion, LoweredFragment};
