//! Command-line driver for the SSA construction pipeline.
//!
//! Deliberately thin: this is just enough of a driver to slot into
//! a `bril2json | bril-ssa | brili` pipeline, not a benchmark suite.

mod args;
mod runner;

pub use args::Cli;
