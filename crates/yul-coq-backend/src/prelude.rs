// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Fixed header of every generated file.

use crate::options::{EmitMode, Options};
use crate::renderer::CoqWriter;

pub const TOOL_COMMENT: &str = "(* Generated by coq-of-yul *)";

/// Tool comment, library imports and, in proof mode, the contract and its shallow
/// embedding, followed by a blank line.
pub fn render_prelude(options: &Options, import_path: &str, w: &mut CoqWriter) {
    w.line(TOOL_COMMENT);
    for library in &options.library_imports {
        w.line(&format!("Require Import {}.", library));
    }
    if options.mode == EmitMode::Proof {
        w.line(&format!("Require Import {}.", import_path));
        w.line(&format!("Require Import {}_shallow.", import_path));
        w.newline();
    }
    w.line(&format!("Import {}.", options.environment_import()));
    w.newline();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(options: &Options, import_path: &str) -> String {
        let mut writer = CoqWriter::new();
        render_prelude(options, import_path, &mut writer);
        writer.into_inner()
    }

    #[test]
    fn test_shallow_prelude() {
        let text = render(&Options::default(), "unused");
        assert_eq!(
            text,
            "(* Generated by coq-of-yul *)\n\
             Require Import CoqOfSolidity.CoqOfSolidity.\n\
             Require Import CoqOfSolidity.simulations.CoqOfSolidity.\n\
             Import Stdlib.\n\
             \n"
        );
    }

    #[test]
    fn test_proof_prelude() {
        let options = Options {
            mode: EmitMode::Proof,
            ..Options::default()
        };
        let text = render(&options, "test.erc20");
        assert!(text.ends_with(
            "Require Import test.erc20.\nRequire Import test.erc20_shallow.\n\nImport Run.\n\n"
        ));
    }
}
