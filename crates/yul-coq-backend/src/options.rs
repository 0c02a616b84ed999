// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which Coq file to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmitMode {
    /// Executable shallow embedding of the Yul code
    #[default]
    Shallow,
    /// Lemmas comparing the compiled code with its shallow embedding
    Proof,
}

/// Represents options provided to the tool. Options are configured via a toml
/// source; the command line flags override them.
///
/// NOTE: any fields carrying structured data must appear at the end for making
/// toml printing work. When changing this config, use `coq-of-yul --print-config` to
/// verify this works.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Output mode.
    pub mode: EmitMode,
    /// Verbosity level for logging.
    pub verbosity_level: LevelFilter,
    /// File to write the Coq output to; standard output when absent.
    pub output_path: Option<String>,
    /// Contract name used by proof skeletons; defaults to the input file stem.
    pub contract_name: Option<String>,
    /// Coq path of the contract and of its shallow embedding (`<path>_shallow`);
    /// defaults to the input path without extension, `/` replaced by `.`.
    pub import_path: Option<String>,
    /// Module opened after the imports; `Stdlib` in shallow mode, `Run` in proof mode.
    pub environment_import: Option<String>,
    /// Libraries required at the top of every generated file.
    pub library_imports: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: EmitMode::Shallow,
            verbosity_level: LevelFilter::Info,
            output_path: None,
            contract_name: None,
            import_path: None,
            environment_import: None,
            library_imports: vec![
                "CoqOfSolidity.CoqOfSolidity".to_string(),
                "CoqOfSolidity.simulations.CoqOfSolidity".to_string(),
            ],
        }
    }
}

impl Options {
    /// Read options from a toml file. Missing fields take their default value.
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config `{}`", path.display()))
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn contract_name_for(&self, input: &Path) -> String {
        match &self.contract_name {
            Some(name) => name.clone(),
            None => input
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn import_path_for(&self, input: &Path) -> String {
        match &self.import_path {
            Some(path) => path.clone(),
            None => input
                .with_extension("")
                .to_string_lossy()
                .replace('/', "."),
        }
    }

    pub fn environment_import(&self) -> &str {
        match (&self.environment_import, self.mode) {
            (Some(module), _) => module.as_str(),
            (None, EmitMode::Shallow) => "Stdlib",
            (None, EmitMode::Proof) => "Run",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_input_path() {
        let options = Options::default();
        let input = Path::new("coq/CoqOfSolidity/test/erc20.json");
        assert_eq!(options.contract_name_for(input), "erc20");
        assert_eq!(options.import_path_for(input), "coq.CoqOfSolidity.test.erc20");
        assert_eq!(options.environment_import(), "Stdlib");
    }

    #[test]
    fn test_explicit_values_win() {
        let options = Options {
            mode: EmitMode::Proof,
            contract_name: Some("token".to_string()),
            import_path: Some("Token.Path".to_string()),
            ..Options::default()
        };
        let input = Path::new("erc20.json");
        assert_eq!(options.contract_name_for(input), "token");
        assert_eq!(options.import_path_for(input), "Token.Path");
        assert_eq!(options.environment_import(), "Run");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode = \"proof\"\nverbosity_level = \"debug\"\ncontract_name = \"c\"").unwrap();
        let options = Options::from_toml_file(file.path()).unwrap();
        assert_eq!(options.mode, EmitMode::Proof);
        assert_eq!(options.verbosity_level, LevelFilter::Debug);
        assert_eq!(options.library_imports, Options::default().library_imports);

        let printed = options.to_toml().unwrap();
        assert_eq!(toml::from_str::<Options>(&printed).unwrap(), options);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "moode = \"proof\"").unwrap();
        assert!(Options::from_toml_file(file.path()).is_err());
    }
}
