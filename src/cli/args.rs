use std::path::PathBuf;

use clap::Parser;

/// Convert a Bril program to SSA form.
///
/// Reads a `{"functions": [...]}` JSON program from `INPUT` (or stdin
/// when omitted or `-`), runs SSA construction over every function, and
/// writes the transformed program as JSON to stdout (or `--output`).
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the input program, or `-`/omitted for stdin.
    pub input: Option<PathBuf>,

    /// Write the transformed program here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Skip re-checking phi well-formedness after renaming.
    #[arg(long)]
    pub no_validate: bool,

    /// Continue past a function that fails SSA construction, emitting it
    /// unchanged and reporting the error, instead of aborting the run.
    #[arg(long)]
    pub keep_going: bool,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,

    /// Increase log verbosity; repeatable (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
