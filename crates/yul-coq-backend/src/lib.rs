// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Coq backend for Yul
//!
//! Translates a Yul object (as produced by the Solidity compiler's JSON AST output)
//! into either a shallow embedding in Coq or the matching proof skeletons.

pub mod escape;
pub mod options;
mod prelude;
mod renderer;

use anyhow::Context;
use log::info;
use std::path::Path;
use yul_intermediate_format::{parse_object, Object};

pub use options::{EmitMode, Options};
pub use prelude::TOOL_COMMENT;
pub use renderer::{
    lower_block, render_expression, render_object, CodeContext, CodeEmitter, Completion,
    CoqWriter, LoweredFragment, ProofEmitter, ShallowEmitter,
};

/// Render a whole Coq file for `object`. `input` names the source the object was read
/// from; it provides default contract and import names.
pub fn translate_object(object: &Object, options: &Options, input: &Path) -> String {
    let mut writer = CoqWriter::new();
    prelude::render_prelude(options, &options.import_path_for(input), &mut writer);
    match options.mode {
        EmitMode::Shallow => render_object(object, &ShallowEmitter, &mut writer),
        EmitMode::Proof => {
            let emitter = ProofEmitter::new(&options.contract_name_for(input));
            render_object(object, &emitter, &mut writer)
        }
    }
    writer.into_inner()
}

/// Read a JSON Yul AST from `input` and translate it.
pub fn translate_file(input: &Path, options: &Options) -> anyhow::Result<String> {
    info!("translating {} ({:?} mode)", input.display(), options.mode);
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read `{}`", input.display()))?;
    let object = parse_object(&text)
        .with_context(|| format!("failed to load Yul AST from `{}`", input.display()))?;
    Ok(translate_object(&object, options, input))
}
