//! SSA construction pipeline: components D-G,
//! orchestrated over the CFG and dominator data components B and C build.

pub mod defs;
pub mod linearize;
pub mod phi;
pub mod rename;

use crate::cfg::build_cfg;
use crate::config::SsaConfig;
use crate::dominators::analyze as analyze_dominators;
use crate::errors::{SsaError, SsaInvariantError, SsaResult};
use crate::ir::{Function, Program};

/// Convert one function's body into SSA form in place: CFG construction,
/// dominator analysis, φ-insertion, renaming, linearization.
pub fn construct_ssa(function: &mut Function) -> SsaResult<()> {
    construct_ssa_with(function, &SsaConfig::default())
}

/// Same as [`construct_ssa`], with an explicit [`SsaConfig`] controlling
/// whether post-condition invariants are re-checked.
pub fn construct_ssa_with(function: &mut Function, config: &SsaConfig) -> SsaResult<()> {
    tracing::debug!(function = %function.name, "constructing ssa");

    let mut cfg = build_cfg(function)?;
    let dominators = analyze_dominators(&cfg)?;
    let defs = defs::scan(&cfg)?;

    phi::insert_phis(&mut cfg, &dominators, &defs);
    rename::rename(&mut cfg, &dominators, &defs, &mut function.args);

    if config.validate {
        validate(&cfg)?;
    }

    function.instrs = linearize::linearize(&cfg);
    Ok(())
}

/// Convenience wrapper running [`construct_ssa`] over every function in a
/// whole program.
pub fn construct_ssa_program(program: &mut Program) -> SsaResult<()> {
    construct_ssa_program_with(program, &SsaConfig::default())
}

pub fn construct_ssa_program_with(program: &mut Program, config: &SsaConfig) -> SsaResult<()> {
    for function in &mut program.functions {
        construct_ssa_with(function, config)?;
    }
    Ok(())
}

/// Re-check the structural invariants every phi must satisfy: its
/// `args`/`labels` length matches its block's predecessor count and the
/// label set matches the predecessor set exactly.
fn validate(cfg: &crate::cfg::Cfg) -> Result<(), SsaError> {
    for label in cfg.order() {
        let block = cfg.block(&label);
        let preds: std::collections::HashSet<String> = block.preds.clone();
        for phi in block.phis() {
            let dest = phi.dest().unwrap_or_default().to_string();
            let args = phi.args();
            let labels = phi.labels();
            if args.len() != labels.len() || args.len() != preds.len() {
                return Err(SsaInvariantError::PhiArityMismatch {
                    block: label.clone(),
                    dest,
                    args: args.len(),
                    labels: labels.len(),
                }
                .into());
            }
            let label_set: std::collections::HashSet<String> = labels.iter().cloned().collect();
            if label_set != preds {
                return Err(SsaInvariantError::PhiLabelMismatch {
                    block: label.clone(),
                    dest,
                    labels: labels.to_vec(),
                    preds: preds.into_iter().collect(),
                }
                .into());
            }
        }
    }
    Ok(())
}
