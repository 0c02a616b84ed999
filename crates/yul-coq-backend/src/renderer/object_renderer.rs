// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Renders a Yul object tree to nested Coq modules.
//!
//! The traversal is shared by both output modes: it mirrors objects into modules,
//! orders the functions of each code block by call dependencies and hands every
//! function and code body to a [`CodeEmitter`].

use super::coq_writer::CoqWriter;
use super::function_renderer::{render_body, render_function};
use crate::escape::{escape_comment, escape_identifier};
use log::{debug, warn};
use yul_intermediate_format::analysis::{order_functions, DependencyGraph};
use yul_intermediate_format::{Block, Code, FunctionDefinition, Object, SubObject};

/// Where a code block sits in the object tree.
#[derive(Debug, Clone, Copy)]
pub struct CodeContext<'a> {
    /// Escaped module names from the root object down to the current one
    pub module_path: &'a [String],
    /// True for code of any object nested under the root
    pub is_deployed: bool,
}

/// Output mode specific rendering of the definitions in one code block.
pub trait CodeEmitter {
    /// `emitted` lists the functions of the same block already rendered, in order.
    fn emit_function(
        &self,
        ctx: &CodeContext,
        function: &FunctionDefinition,
        emitted: &[String],
        w: &mut CoqWriter,
    );

    /// The statements of the block itself, after all of its functions.
    fn emit_body(&self, ctx: &CodeContext, body: &Block, emitted: &[String], w: &mut CoqWriter);
}

/// Emits the executable shallow embedding.
#[derive(Debug, Default)]
pub struct ShallowEmitter;

impl CodeEmitter for ShallowEmitter {
    fn emit_function(
        &self,
        _ctx: &CodeContext,
        function: &FunctionDefinition,
        _emitted: &[String],
        w: &mut CoqWriter,
    ) {
        render_function(function, w);
    }

    fn emit_body(&self, _ctx: &CodeContext, body: &Block, _emitted: &[String], w: &mut CoqWriter) {
        render_body(body, w);
    }
}

/// Render `object` and all of its sub-objects.
pub fn render_object(object: &Object, emitter: &dyn CodeEmitter, w: &mut CoqWriter) {
    let mut module_path = Vec::new();
    render_object_at(object, emitter, &mut module_path, false, w);
}

fn render_object_at(
    object: &Object,
    emitter: &dyn CodeEmitter,
    module_path: &mut Vec<String>,
    is_deployed: bool,
    w: &mut CoqWriter,
) {
    let name = escape_identifier(&object.name);
    debug!("rendering object {}", object.name);
    module_path.push(name.clone());

    w.line(&format!("Module {}.", name));
    w.indent();
    match &object.code {
        Code::Block(block) => {
            let ctx = CodeContext {
                module_path: module_path.as_slice(),
                is_deployed,
            };
            render_code(block, emitter, &ctx, w);
        }
        Code::Invalid(invalid) => {
            warn!("object {}: {}", object.name, invalid);
            w.line(&format!("(* {} *)", escape_comment(&invalid.to_string())));
        }
    }
    for sub_object in &object.sub_objects {
        w.newline();
        match sub_object {
            SubObject::Object(child) => render_object_at(child, emitter, module_path, true, w),
            SubObject::Data { name } => {
                warn!("data object {} is not translated", name);
                w.line("(* Data object not expected *)");
            }
            SubObject::Invalid(invalid) => {
                warn!("object {}: {}", object.name, invalid);
                w.line(&format!("(* {} *)", escape_comment(&invalid.to_string())));
            }
        }
    }
    w.dedent();
    w.line(&format!("End {}.", name));

    module_path.pop();
}

fn render_code(block: &Block, emitter: &dyn CodeEmitter, ctx: &CodeContext, w: &mut CoqWriter) {
    let dependencies = DependencyGraph::from_functions(block.function_definitions()).order();
    for warning in dependencies.cycle_warnings() {
        w.line(&format!("(* Warning: {} *)", escape_comment(&warning)));
    }

    let mut emitted = Vec::new();
    for function in order_functions(&dependencies.order, block.function_definitions()) {
        debug!("rendering function {}", function.name);
        emitter.emit_function(ctx, function, &emitted, w);
        w.newline();
        emitted.push(function.name.clone());
    }
    emitter.emit_body(ctx, block, &emitted, w);
}
