use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::SsaConfig;
use crate::ir::Program;
use crate::ssa::construct_ssa_with;

use super::args::Cli;

impl Cli {
    /// Run the configured conversion. Returns an error only for I/O or
    /// JSON-shape failures at the boundary, or a per-function structural
    /// error when `--keep-going` is not set.
    pub fn run(&self) -> Result<()> {
        let input = self.read_input()?;
        let mut program: Program =
            serde_json::from_str(&input).context("input is not a valid Bril program")?;

        let config = SsaConfig {
            validate: !self.no_validate,
        };

        let mut failures = Vec::new();
        for function in &mut program.functions {
            if let Err(err) = construct_ssa_with(function, &config) {
                tracing::error!(function = %function.name, error = %err, "ssa construction failed");
                if self.keep_going {
                    failures.push((function.name.clone(), err));
                    continue;
                }
                return Err(err).with_context(|| format!("function `{}`", function.name));
            }
        }

        self.write_output(&program)?;

        if !failures.is_empty() {
            anyhow::bail!(
                "{} of {} functions failed SSA construction",
                failures.len(),
                program.functions.len()
            );
        }
        Ok(())
    }

    fn read_input(&self) -> Result<String> {
        match self.input.as_deref() {
            None => read_stdin(),
            Some(path) if path == Path::new("-") => read_stdin(),
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading input program from {}", path.display())),
        }
    }

    fn write_output(&self, program: &Program) -> Result<()> {
        let rendered = if self.compact {
            serde_json::to_string(program)
        } else {
            serde_json::to_string_pretty(program)
        }
        .context("serializing transformed program")?;

        match &self.output {
            Some(path) => std::fs::write(path, rendered)
                .with_context(|| format!("writing output to {}", path.display())),
            None => {
                println!("{rendered}");
                Ok(())
            }
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("reading program from stdin")?;
    Ok(buf)
}
