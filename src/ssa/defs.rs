//! Definition scan.
//!
//! Grounded in the same walk-and-classify shape as `cfg.rs`'s block
//! partitioning: a single linear pass per block, accumulating into two
//! maps rather than mutating instructions.

use std::collections::{HashMap, HashSet};

use crate::cfg::Cfg;
use crate::errors::SsaInvariantError;
use crate::ir::ValueType;

/// Where a variable is defined, and the declared type every definition of
/// it must agree on.
#[derive(Debug, Clone)]
pub struct DefInfo {
    pub blocks: HashSet<String>,
    pub ty: ValueType,
}

/// `variable -> DefInfo`, plus the set of "global" names: variables used
/// in some block before being killed there.
#[derive(Debug, Clone, Default)]
pub struct Defs {
    pub defs: HashMap<String, DefInfo>,
    pub global_names: HashSet<String>,
}

/// Walk every block in insertion order, recording kill sets and flagging
/// operands referenced before a local kill as global names.
pub fn scan(cfg: &Cfg) -> Result<Defs, SsaInvariantError> {
    let mut defs: HashMap<String, DefInfo> = HashMap::new();
    let mut global_names: HashSet<String> = HashSet::new();

    for label in cfg.order() {
        let block = cfg.block(&label);
        let mut killed_here: HashSet<&str> = HashSet::new();

        for instr in &block.instrs {
            if let Some(args) = non_phi_args(instr) {
                for arg in args {
                    if !killed_here.contains(arg.as_str()) {
                        global_names.insert(arg.clone());
                    }
                }
            }

            if let (Some(dest), Some(ty)) = (instr.dest(), instr.declared_type()) {
                match defs.get_mut(dest) {
                    Some(entry) => {
                        if entry.ty != ty {
                            return Err(SsaInvariantError::InconsistentDef {
                                var: dest.to_string(),
                                first: entry.ty.as_str(),
                                second: ty.as_str(),
                            });
                        }
                        entry.blocks.insert(label.clone());
                    }
                    None => {
                        defs.insert(
                            dest.to_string(),
                            DefInfo {
                                blocks: [label.clone()].into_iter().collect(),
                                ty,
                            },
                        );
                    }
                }
                killed_here.insert(dest);
            }
        }
    }

    tracing::debug!(globals = global_names.len(), vars = defs.len(), "scanned definitions");
    Ok(Defs { defs, global_names })
}

/// Operands of a non-phi `ValueOp`/`EffectOp`. Phis are excluded: their
/// `args` are filled in by the renamer per predecessor, not read here.
fn non_phi_args(instr: &crate::ir::Instruction) -> Option<&[String]> {
    if instr.is_phi() {
        return None;
    }
    match instr {
        crate::ir::Instruction::ValueOp { args, .. } | crate::ir::Instruction::EffectOp { args, .. } => {
            Some(args)
        }
        _ => None,
    }
}
