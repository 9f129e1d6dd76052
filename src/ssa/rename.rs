//! Variable renaming.
//!
//! Uses a recursive dominator-tree walk with snapshot/restore scoping
//! rather than a push-count-and-pop scheme: snapshotting is simpler to
//! get right and this crate has no performance requirement that would
//! justify the leaner alternative.

use std::collections::{HashMap, HashSet};

use crate::cfg::Cfg;
use crate::config::{UNDEFINED_SUFFIX, VERSION_SEPARATOR};
use crate::dominators::Dominators;
use crate::ir::{Arg, Instruction};
use crate::ssa::defs::Defs;

/// The prefix before the last `VERSION_SEPARATOR`, or the whole name if
/// it contains none. `"x.2"` strips to `"x"`; `"x"` strips to `"x"`.
pub fn strip_version(name: &str) -> &str {
    match name.rfind(VERSION_SEPARATOR) {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Smallest positive `k` such that `"{base}{VERSION_SEPARATOR}{k}"` is not
/// already in `names`. Mints it into `names` before returning.
fn mint(base: &str, names: &mut HashSet<String>) -> String {
    let mut k = 1usize;
    loop {
        let candidate = format!("{base}{VERSION_SEPARATOR}{k}");
        if names.insert(candidate.clone()) {
            return candidate;
        }
        k += 1;
    }
}

/// Rename arguments and every block's instructions in place, by a
/// dominator-tree descent from `cfg.entry`.
pub fn rename(cfg: &mut Cfg, dominators: &Dominators, defs: &Defs, args: &mut [Arg]) {
    let mut names = collect_existing_names(cfg, args);
    let mut stacks: HashMap<String, Vec<String>> = HashMap::new();

    for arg in args.iter_mut() {
        let base = arg.name.clone();
        let fresh = mint(&base, &mut names);
        stacks.entry(base).or_default().push(fresh.clone());
        arg.name = fresh;
    }

    walk(&cfg.entry.clone(), cfg, dominators, defs, &mut stacks, &mut names);
    tracing::debug!("renaming complete");
}

fn collect_existing_names(cfg: &Cfg, args: &[Arg]) -> HashSet<String> {
    let mut names: HashSet<String> = args.iter().map(|a| a.name.clone()).collect();
    for block in cfg.blocks.values() {
        for instr in &block.instrs {
            if let Some(d) = instr.dest() {
                names.insert(d.to_string());
            }
            for a in instr.args() {
                names.insert(a.clone());
            }
        }
    }
    names
}

fn walk(
    label: &str,
    cfg: &mut Cfg,
    dominators: &Dominators,
    defs: &Defs,
    stacks: &mut HashMap<String, Vec<String>>,
    names: &mut HashSet<String>,
) {
    let snapshot = stacks.clone();

    rename_phi_dests(cfg.block_mut(label), stacks, names);
    rename_body(cfg.block_mut(label), defs, stacks, names);
    fill_successor_phis(label, cfg, stacks);

    for child in dominators.children_of(label).to_vec() {
        walk(&child, cfg, dominators, defs, stacks, names);
    }

    *stacks = snapshot;
}

fn rename_phi_dests(block: &mut crate::cfg::BasicBlock, stacks: &mut HashMap<String, Vec<String>>, names: &mut HashSet<String>) {
    for phi in block.phis_mut() {
        let dest = phi.dest().expect("phi always has a destination").to_string();
        let base = strip_version(&dest).to_string();
        let fresh = mint(&base, names);
        stacks.entry(base).or_default().push(fresh.clone());
        *phi.dest_mut().unwrap() = fresh;
    }
}

fn rename_body(
    block: &mut crate::cfg::BasicBlock,
    defs: &Defs,
    stacks: &mut HashMap<String, Vec<String>>,
    names: &mut HashSet<String>,
) {
    let mut local_defs: HashSet<String> = HashSet::new();

    for instr in block.instrs.iter_mut().filter(|i| !i.is_phi()) {
        if let Some(operands) = instr.args_mut() {
            for op in operands.iter_mut() {
                let base = strip_version(op);
                if let Some(stack) = stacks.get(base) {
                    if let Some(top) = stack.last() {
                        *op = top.clone();
                    }
                }
            }
        }

        if let Some(dest) = instr.dest() {
            let d = dest.to_string();
            let should_rename = defs.global_names.contains(&d)
                || local_defs.contains(&d)
                || !d.contains(VERSION_SEPARATOR);
            local_defs.insert(d.clone());

            if should_rename {
                let base = strip_version(&d).to_string();
                let fresh = mint(&base, names);
                stacks.entry(base).or_default().push(fresh.clone());
                *instr.dest_mut().unwrap() = fresh;
            }
        }
    }
}

/// Append this block's renamed value and label to every phi in every
/// successor, in a fixed (label-sorted) successor order so `args` and
/// `labels` stay paired.
fn fill_successor_phis(label: &str, cfg: &mut Cfg, stacks: &HashMap<String, Vec<String>>) {
    let mut succs: Vec<String> = cfg.block(label).succs.iter().cloned().collect();
    succs.sort();

    for succ in succs {
        for phi in cfg.block_mut(&succ).phis_mut() {
            let v = strip_version(phi.dest().expect("phi always has a destination")).to_string();
            let value = match stacks.get(&v).and_then(|s| s.last()) {
                Some(top) => top.clone(),
                None => format!("{v}{VERSION_SEPARATOR}{UNDEFINED_SUFFIX}"),
            };
            if let Instruction::ValueOp { args, labels, .. } = phi {
                args.push(value);
                labels.push(label.to_string());
            }
        }
    }
}
