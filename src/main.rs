use std::error::Error;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::Parser;

use cflat::codegen;
use cflat::sema::{resolver, typecheck};
use cflat::syntax::parser::Parser as SourceParser;

/// Compile a cflat source file to SPIM/MIPS assembly.
#[derive(Debug, Parser)]
#[command(name = "cflat", version)]
struct Args {
    /// Source file to compile
    input: PathBuf,

    /// Where to write the generated assembly
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let src = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let asm = drive(&src)?;

    fs::write(&args.output, asm)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}

fn print_errors(errors: &[impl Error]) {
    errors.iter().for_each(|e| eprintln!("{}", e));
}

fn drive(src: &str) -> anyhow::Result<String> {
    let program = SourceParser::parse(src).map_err(|errors| {
        print_errors(&errors);
        anyhow!("parsing failed")
    })?;

    let (resolution, errors) = resolver::resolve(&program);
    if !errors.is_empty() {
        print_errors(&errors);
        return Err(anyhow!("name analysis found {} error(s)", errors.len()));
    }

    let (types, errors) = typecheck::check(&program, &resolution);
    if !errors.is_empty() {
        print_errors(&errors);
        return Err(anyhow!("type checking found {} error(s)", errors.len()));
    }

    Ok(codegen::generate(&program, &resolution, &types))
}
