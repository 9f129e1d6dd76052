//! Linearization.
//!
//! Flattens the mutated CFG back into the flat, label-prefixed
//! instruction stream the external IR writer expects. This is the last
//! stage to touch the CFG; callers should treat it as consumed once
//! this runs.

use crate::cfg::Cfg;
use crate::ir::Instruction;

/// Emit, in CFG insertion order, a `Label` for each block followed by its
/// instruction sequence (phis first, by the insertion invariant §4.5
/// maintains).
pub fn linearize(cfg: &Cfg) -> Vec<Instruction> {
    let mut out = Vec::new();
    for label in cfg.order() {
        let block = cfg.block(&label);
        out.push(Instruction::Label { label: label.clone() });
        out.extend(block.instrs.iter().cloned());
    }
    out
}
