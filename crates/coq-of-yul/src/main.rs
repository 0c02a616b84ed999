// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use anyhow::{anyhow, Context};
use clap::Parser;
use colored::Colorize;
use log::{debug, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};
use std::path::PathBuf;
use yul_coq_backend::{translate_file, EmitMode, Options};

#[derive(Parser)]
#[clap(
    name = env!("CARGO_BIN_NAME"),
    about = "Translates the JSON AST of a Yul object into Coq: either a shallow embedding of its code or proof skeletons comparing the compiled code with that embedding",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// JSON file holding the Yul AST of a compiled contract
    #[clap(required_unless_present = "print_config")]
    pub input: Option<PathBuf>,

    /// Output mode
    #[clap(long, short = 'm', value_enum)]
    pub mode: Option<EmitMode>,

    /// Write the Coq output to this file instead of standard output
    #[clap(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// TOML file with options; command line flags take precedence
    #[clap(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Contract name referenced by proof skeletons (default: input file stem)
    #[clap(long)]
    pub contract_name: Option<String>,

    /// Coq import path of the contract (default: input path without extension)
    #[clap(long)]
    pub import_path: Option<String>,

    /// Log every step of the translation
    #[clap(long, short = 'v')]
    pub verbose: bool,

    /// Print the effective options as TOML and exit
    #[clap(long)]
    pub print_config: bool,
}

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap();

    let args = Args::parse();

    if let Err(err) = run(args) {
        let err = format!("{:?}", err);
        eprintln!("{}", err.bold().red());
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let options = options_from_args(&args)?;
    if args.print_config {
        print!("{}", options.to_toml()?);
        return Ok(());
    }

    TermLogger::init(
        options.verbosity_level,
        Config::default(),
        TerminalMode::Stderr,
    )
    .context("failed to initialize logging")?;
    debug!("coq-of-yul version {}", env!("CARGO_PKG_VERSION"));

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("no input file given"))?;
    let output = translate_file(input, &options)?;

    match &options.output_path {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write `{}`", path))?,
        None => print!("{}", output),
    }
    Ok(())
}

fn options_from_args(args: &Args) -> anyhow::Result<Options> {
    let mut options = match &args.config {
        Some(path) => Options::from_toml_file(path)?,
        None => Options::default(),
    };
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(output) = &args.output {
        options.output_path = Some(output.to_string_lossy().to_string());
    }
    if let Some(name) = &args.contract_name {
        options.contract_name = Some(name.clone());
    }
    if let Some(path) = &args.import_path {
        options.import_path = Some(path.clone());
    }
    if args.verbose {
        options.verbosity_level = LevelFilter::Trace;
    }
    Ok(options)
}
