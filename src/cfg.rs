//! Control-flow graph construction.
//!
//! Blocks are keyed by label rather than a numeric id, and the block map
//! must iterate in instruction-stream order (so the first block is always
//! the entry unless it was itself a branch target) — an `IndexMap`
//! guarantees that and a `HashMap` does not.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::errors::CfgError;
use crate::ir::{Function, Instruction, Operator};

/// A maximal straight-line instruction sequence ending in a terminator.
/// The block's own label is not stored in `instrs` (it is the block's key
/// in [`Cfg::blocks`]).
#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub label: String,
    pub instrs: Vec<Instruction>,
    pub preds: HashSet<String>,
    pub succs: HashSet<String>,
}

impl BasicBlock {
    fn new(label: String) -> Self {
        Self {
            label,
            instrs: Vec::new(),
            preds: HashSet::new(),
            succs: HashSet::new(),
        }
    }

    /// Non-phi instructions, in order. Phis are always a prefix of
    /// `instrs` (the insertion invariant phi.rs maintains), so everything
    /// after the first non-phi is itself a non-phi instruction.
    pub fn body(&self) -> impl Iterator<Item = &Instruction> {
        self.instrs.iter().filter(|i| !i.is_phi())
    }

    pub fn phis(&self) -> impl Iterator<Item = &Instruction> {
        self.instrs.iter().filter(|i| i.is_phi())
    }

    pub fn phis_mut(&mut self) -> impl Iterator<Item = &mut Instruction> {
        self.instrs.iter_mut().filter(|i| i.is_phi())
    }

    fn terminator(&self) -> Option<&Instruction> {
        self.instrs.last().filter(|i| i.is_terminator())
    }
}

/// The control-flow graph for one function. Block iteration order equals
/// instruction-stream order.
#[derive(Debug, Clone)]
pub struct Cfg {
    pub blocks: IndexMap<String, BasicBlock>,
    pub entry: String,
}

impl Cfg {
    pub fn block(&self, label: &str) -> &BasicBlock {
        self.blocks
            .get(label)
            .unwrap_or_else(|| panic!("internal error: unknown block `{label}`"))
    }

    pub fn block_mut(&mut self, label: &str) -> &mut BasicBlock {
        self.blocks
            .get_mut(label)
            .unwrap_or_else(|| panic!("internal error: unknown block `{label}`"))
    }

    /// Blocks in insertion (= instruction-stream) order.
    pub fn order(&self) -> Vec<String> {
        self.blocks.keys().cloned().collect()
    }
}

/// Build the CFG for a function: partition into blocks, patch missing
/// terminators, apply the entry-fixup rule, and wire predecessor/successor
/// edges.
pub fn build_cfg(function: &Function) -> Result<Cfg, CfgError> {
    let mut blocks = partition_into_blocks(&function.instrs);
    patch_terminators(&mut blocks);
    let entry = fixup_entry(&mut blocks);

    let mut cfg = Cfg {
        blocks: IndexMap::new(),
        entry,
    };
    for block in blocks {
        cfg.blocks.insert(block.label.clone(), block);
    }

    wire_edges(&mut cfg)?;
    tracing::debug!(blocks = cfg.blocks.len(), entry = %cfg.entry, "built cfg");
    Ok(cfg)
}

/// Smallest positive integer `k` such that `format!("{prefix}{k}")` is not
/// already a block label. Used both for fresh block names (`b{k}`,
/// `fresh{k}`) and, by the renamer, for fresh variable versions.
fn fresh_name(prefix: &str, taken: &HashSet<String>) -> String {
    let mut k = 1usize;
    loop {
        let candidate = format!("{prefix}{k}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        k += 1;
    }
}

fn partition_into_blocks(instrs: &[Instruction]) -> Vec<BasicBlock> {
    let mut blocks = Vec::new();
    let mut taken_labels: HashSet<String> = instrs
        .iter()
        .filter_map(|i| match i {
            Instruction::Label { label } => Some(label.clone()),
            _ => None,
        })
        .collect();

    let mut current: Option<BasicBlock> = None;

    let mut push_current = |blocks: &mut Vec<BasicBlock>, current: &mut Option<BasicBlock>| {
        if let Some(block) = current.take() {
            blocks.push(block);
        }
    };

    for instr in instrs {
        match instr {
            Instruction::Label { label } => {
                push_current(&mut blocks, &mut current);
                current = Some(BasicBlock::new(label.clone()));
            }
            other => {
                if current.is_none() {
                    let name = fresh_name("b", &taken_labels);
                    taken_labels.insert(name.clone());
                    current = Some(BasicBlock::new(name));
                }
                let block = current.as_mut().unwrap();
                block.instrs.push(other.clone());
                if other.is_terminator() {
                    push_current(&mut blocks, &mut current);
                }
            }
        }
    }
    push_current(&mut blocks, &mut current);
    blocks
}

/// Append a `ret` to the last block if it lacks a terminator, or a `jmp`
/// to the next block in insertion order otherwise.
fn patch_terminators(blocks: &mut [BasicBlock]) {
    let n = blocks.len();
    for i in 0..n {
        if blocks[i].terminator().is_some() {
            continue;
        }
        if i + 1 == n {
            blocks[i].instrs.push(Instruction::EffectOp {
                op: Operator::Ret,
                args: Vec::new(),
                funcs: Vec::new(),
                labels: Vec::new(),
            });
        } else {
            let next_label = blocks[i + 1].label.clone();
            blocks[i].instrs.push(Instruction::EffectOp {
                op: Operator::Jmp,
                args: Vec::new(),
                funcs: Vec::new(),
                labels: vec![next_label],
            });
        }
    }
}

/// If the first block is itself a branch target, prepend a fresh empty
/// block and reseat it as entry, so the entry is guaranteed to have no
/// predecessors.
fn fixup_entry(blocks: &mut Vec<BasicBlock>) -> String {
    let Some(first) = blocks.first() else {
        return String::new();
    };
    let first_label = first.label.clone();

    let is_target = blocks.iter().any(|b| b.label != first_label && b.labels_reference(&first_label));
    if !is_target {
        return first_label;
    }

    let taken: HashSet<String> = blocks.iter().map(|b| b.label.clone()).collect();
    let fresh_label = fresh_name("fresh", &taken);
    let mut fresh_block = BasicBlock::new(fresh_label.clone());
    fresh_block.instrs.push(Instruction::EffectOp {
        op: Operator::Jmp,
        args: Vec::new(),
        funcs: Vec::new(),
        labels: vec![first_label],
    });
    blocks.insert(0, fresh_block);
    fresh_label
}

impl BasicBlock {
    fn labels_reference(&self, label: &str) -> bool {
        self.instrs
            .last()
            .map(|i| i.labels().iter().any(|l| l == label))
            .unwrap_or(false)
    }
}

fn wire_edges(cfg: &mut Cfg) -> Result<(), CfgError> {
    let mut edges: Vec<(String, String)> = Vec::new();
    for block in cfg.blocks.values() {
        let Some(terminator) = block.terminator() else {
            return Err(CfgError::NoTerminator {
                block: block.label.clone(),
            });
        };
        if !matches!(terminator, Instruction::EffectOp { op, .. } if op.is_block_terminator()) {
            return Err(CfgError::BrokenTerminator {
                block: block.label.clone(),
            });
        }
        let op = match terminator {
            Instruction::EffectOp { op, .. } => *op,
            _ => unreachable!(),
        };
        if matches!(op, Operator::Jmp | Operator::Br) {
            let targets = terminator.labels();
            if targets.is_empty() {
                return Err(CfgError::MissingBranchLabels {
                    block: block.label.clone(),
                    op: op.as_str(),
                });
            }
            for target in targets {
                if !cfg.blocks.contains_key(target) {
                    return Err(CfgError::UnknownBranchTarget {
                        block: block.label.clone(),
                        target: target.clone(),
                    });
                }
                edges.push((block.label.clone(), target.clone()));
            }
        }
    }

    for (from, to) in edges {
        cfg.blocks.get_mut(&from).unwrap().succs.insert(to.clone());
        cfg.blocks.get_mut(&to).unwrap().preds.insert(from);
    }
    Ok(())
}
