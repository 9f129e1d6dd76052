//! φ-insertion.
//!
//! A worklist per global name, driven by the dominance frontiers computed
//! in `dominators.rs`. Insertion is idempotent per `(block, variable)`
//! pair — the "already has a phi for `v`?" check below is what makes the
//! worklist terminate.

use std::collections::{HashSet, VecDeque};

use crate::cfg::{BasicBlock, Cfg};
use crate::dominators::Dominators;
use crate::ir::{Instruction, Operator, ValueType};
use crate::ssa::defs::Defs;

/// For every global name, insert empty phis at each block in its
/// iterated dominance frontier until the worklist is dry.
pub fn insert_phis(cfg: &mut Cfg, dominators: &Dominators, defs: &Defs) {
    let mut names: Vec<&String> = defs.global_names.iter().collect();
    names.sort();

    for name in names {
        let Some(info) = defs.defs.get(name) else {
            // A global name with no recorded definition (e.g. a function
            // argument, or a name never assigned) needs no phi: there is
            // nothing to merge.
            continue;
        };

        let mut worklist: VecDeque<String> = info.blocks.iter().cloned().collect();
        let mut queued: HashSet<String> = worklist.iter().cloned().collect();

        while let Some(b) = worklist.pop_front() {
            let frontier = dominators.df.get(&b).cloned().unwrap_or_default();
            for f in frontier {
                let block = cfg.block_mut(&f);
                if !has_phi_for(block, name) {
                    insert_phi(block, name.clone(), info.ty);
                    if queued.insert(f.clone()) {
                        worklist.push_back(f);
                    }
                }
            }
        }
    }

    tracing::debug!("phi insertion complete");
}

fn has_phi_for(block: &BasicBlock, dest: &str) -> bool {
    block.phis().any(|i| i.dest() == Some(dest))
}

/// Insert an empty phi for `dest`, keeping the block's phi prefix sorted
/// by destination name.
fn insert_phi(block: &mut BasicBlock, dest: String, ty: ValueType) {
    let phi = Instruction::ValueOp {
        op: Operator::Phi,
        dest,
        ty,
        args: Vec::new(),
        funcs: Vec::new(),
        labels: Vec::new(),
    };
    let insert_at = block
        .instrs
        .iter()
        .position(|i| !i.is_phi() || i.dest() > phi.dest())
        .unwrap_or(0);
    block.instrs.insert(insert_at, phi);
}
