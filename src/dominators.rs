//! Dominator analysis.
//!
//! Computes dominator sets by fixed-point iteration, then derives
//! immediate dominators, dominance frontiers, and the dominator tree
//! from that fixed point.

use std::collections::{HashMap, HashSet};

use crate::cfg::Cfg;
use crate::errors::SsaInvariantError;

#[derive(Debug, Clone)]
pub struct Dominators {
    /// `dom[b]`: every block (including `b`) that dominates `b`.
    pub dom: HashMap<String, HashSet<String>>,
    /// `idom[b]`: absent only for the entry.
    pub idom: HashMap<String, String>,
    /// Dominance frontier.
    pub df: HashMap<String, HashSet<String>>,
    /// Dominator-tree children, sorted by label for deterministic descent.
    pub children: HashMap<String, Vec<String>>,
}

impl Dominators {
    pub fn idom_of(&self, block: &str) -> Option<&str> {
        self.idom.get(block).map(String::as_str)
    }

    pub fn children_of(&self, block: &str) -> &[String] {
        self.children.get(block).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Compute dominator sets, immediate dominators, dominance frontiers and
/// the dominator tree for `cfg`.
pub fn analyze(cfg: &Cfg) -> Result<Dominators, SsaInvariantError> {
    let dom = compute_dominator_sets(cfg);
    let idom = compute_idoms(cfg, &dom)?;
    let df = compute_frontiers(cfg, &idom);
    let children = build_tree(&idom);

    tracing::debug!(blocks = dom.len(), "computed dominator sets");
    Ok(Dominators { dom, idom, df, children })
}

fn compute_dominator_sets(cfg: &Cfg) -> HashMap<String, HashSet<String>> {
    let all_blocks: HashSet<String> = cfg.blocks.keys().cloned().collect();
    let mut dom: HashMap<String, HashSet<String>> = HashMap::new();

    dom.insert(cfg.entry.clone(), [cfg.entry.clone()].into_iter().collect());
    for label in &all_blocks {
        if label != &cfg.entry {
            dom.insert(label.clone(), all_blocks.clone());
        }
    }

    let mut changed = true;
    while changed {
        changed = false;
        for label in cfg.blocks.keys() {
            if label == &cfg.entry {
                continue;
            }
            let block = cfg.block(label);
            let mut new_dom: Option<HashSet<String>> = None;
            for pred in &block.preds {
                let pred_dom = &dom[pred];
                new_dom = Some(match new_dom {
                    None => pred_dom.clone(),
                    Some(acc) => acc.intersection(pred_dom).cloned().collect(),
                });
            }
            let mut new_dom = new_dom.unwrap_or_default();
            new_dom.insert(label.clone());

            if dom.get(label) != Some(&new_dom) {
                dom.insert(label.clone(), new_dom);
                changed = true;
            }
        }
    }
    dom
}

/// The immediate dominator of `b` is the member of `dom[b] \ {b}` with the
/// largest dominator set. A tie is a structural defect in a
/// well-formed CFG.
fn compute_idoms(
    cfg: &Cfg,
    dom: &HashMap<String, HashSet<String>>,
) -> Result<HashMap<String, String>, SsaInvariantError> {
    let mut idom = HashMap::new();
    for label in cfg.blocks.keys() {
        if label == &cfg.entry {
            continue;
        }
        let candidates: Vec<&String> = dom[label].iter().filter(|d| *d != label).collect();
        let mut best: Option<(&String, usize)> = None;
        for cand in candidates {
            let size = dom[cand].len();
            match best {
                None => best = Some((cand, size)),
                Some((_, best_size)) if size > best_size => best = Some((cand, size)),
                Some((best_label, best_size)) if size == best_size && cand != best_label => {
                    return Err(SsaInvariantError::DuplicateDefinition {
                        name: format!(
                            "ambiguous immediate dominator for `{label}`: `{cand}` and `{best_label}` tie"
                        ),
                    });
                }
                _ => {}
            }
        }
        if let Some((cand, _)) = best {
            idom.insert(label.clone(), cand.clone());
        }
    }
    Ok(idom)
}

fn compute_frontiers(cfg: &Cfg, idom: &HashMap<String, String>) -> HashMap<String, HashSet<String>> {
    let mut df: HashMap<String, HashSet<String>> = cfg.blocks.keys().map(|l| (l.clone(), HashSet::new())).collect();

    for (label, block) in &cfg.blocks {
        if block.preds.len() < 2 {
            continue;
        }
        for pred in &block.preds {
            let mut cur = pred.clone();
            loop {
                if Some(&cur) == idom.get(label) {
                    break;
                }
                df.get_mut(&cur).unwrap().insert(label.clone());
                match idom.get(&cur) {
                    Some(next) => cur = next.clone(),
                    None => break,
                }
            }
        }
    }
    df
}

fn build_tree(idom: &HashMap<String, String>) -> HashMap<String, Vec<String>> {
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    for (label, parent) in idom {
        children.entry(parent.clone()).or_default().push(label.clone());
    }
    for kids in children.values_mut() {
        kids.sort();
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::build_cfg;
    use crate::ir::{Function, Instruction, Literal, Operator, ValueType};

    fn jmp(to: &str) -> Instruction {
        Instruction::EffectOp { op: Operator::Jmp, args: vec![], funcs: vec![], labels: vec![to.into()] }
    }
    fn br(cond: &str, t: &str, f: &str) -> Instruction {
        Instruction::EffectOp { op: Operator::Br, args: vec![cond.into()], funcs: vec![], labels: vec![t.into(), f.into()] }
    }
    fn label(l: &str) -> Instruction {
        Instruction::Label { label: l.into() }
    }
    fn const_bool(dest: &str) -> Instruction {
        Instruction::Const { dest: dest.into(), ty: ValueType::Bool, value: Literal::Bool(true) }
    }

    fn diamond() -> Function {
        Function {
            name: "main".into(),
            args: vec![],
            ret_type: None,
            instrs: vec![
                const_bool("c"),
                br("c", "b1", "b2"),
                label("b1"),
                jmp("b3"),
                label("b2"),
                jmp("b3"),
                label("b3"),
                Instruction::EffectOp { op: Operator::Ret, args: vec![], funcs: vec![], labels: vec![] },
            ],
        }
    }

    #[test]
    fn diamond_join_is_dominated_only_by_entry_and_itself() {
        let cfg = build_cfg(&diamond()).unwrap();
        let dominators = analyze(&cfg).unwrap();
        let entry = cfg.entry.clone();
        assert_eq!(dominators.idom_of("b3"), Some(entry.as_str()));
        assert!(dominators.dom["b3"].contains("b3"));
        assert!(dominators.dom["b3"].contains(&entry));
        assert_eq!(dominators.dom["b3"].len(), 2);
    }

    #[test]
    fn diamond_frontier_of_branches_is_the_join_block() {
        let cfg = build_cfg(&diamond()).unwrap();
        let dominators = analyze(&cfg).unwrap();
        assert_eq!(dominators.df["b1"], ["b3".to_string()].into_iter().collect());
        assert_eq!(dominators.df["b2"], ["b3".to_string()].into_iter().collect());
    }

    #[test]
    fn loop_header_frontier_includes_itself() {
        // b0 -> b1; b1 -> (b2, b3); b2 -> b1 (back edge); b3 -> ret
        let f = Function {
            name: "main".into(),
            args: vec![],
            ret_type: None,
            instrs: vec![
                label("b0"),
                jmp("b1"),
                label("b1"),
                const_bool("c"),
                br("c", "b2", "b3"),
                label("b2"),
                jmp("b1"),
                label("b3"),
                Instruction::EffectOp { op: Operator::Ret, args: vec![], funcs: vec![], labels: vec![] },
            ],
        };
        let cfg = build_cfg(&f).unwrap();
        let dominators = analyze(&cfg).unwrap();
        assert!(dominators.df["b2"].contains("b1"));
        assert_eq!(dominators.idom_of("b1"), Some("b0"));
    }

    #[test]
    fn dominator_tree_children_are_sorted_by_label() {
        let cfg = build_cfg(&diamond()).unwrap();
        let dominators = analyze(&cfg).unwrap();
        let entry = cfg.entry.clone();
        let kids = dominators.children_of(&entry);
        assert!(kids.windows(2).all(|w| w[0] <= w[1]));
    }
}
