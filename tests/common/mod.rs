//! Shared builder helpers and invariant checks for the integration suite.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use bril_ssa::{Arg, Function, Instruction, Literal, Operator, Program, ValueType};

pub fn label(l: &str) -> Instruction {
    Instruction::Label { label: l.into() }
}

pub fn const_int(dest: &str, v: i64) -> Instruction {
    Instruction::Const { dest: dest.into(), ty: ValueType::Int, value: Literal::Int(v) }
}

pub fn const_bool(dest: &str, v: bool) -> Instruction {
    Instruction::Const { dest: dest.into(), ty: ValueType::Bool, value: Literal::Bool(v) }
}

pub fn binop(op: Operator, dest: &str, a: &str, b: &str) -> Instruction {
    Instruction::ValueOp {
        op,
        dest: dest.into(),
        ty: ValueType::Int,
        args: vec![a.into(), b.into()],
        funcs: vec![],
        labels: vec![],
    }
}

pub fn print(arg: &str) -> Instruction {
    Instruction::EffectOp { op: Operator::Print, args: vec![arg.into()], funcs: vec![], labels: vec![] }
}

pub fn jmp(to: &str) -> Instruction {
    Instruction::EffectOp { op: Operator::Jmp, args: vec![], funcs: vec![], labels: vec![to.into()] }
}

pub fn br(cond: &str, t: &str, f: &str) -> Instruction {
    Instruction::EffectOp {
        op: Operator::Br,
        args: vec![cond.into()],
        funcs: vec![],
        labels: vec![t.into(), f.into()],
    }
}

pub fn ret() -> Instruction {
    Instruction::EffectOp { op: Operator::Ret, args: vec![], funcs: vec![], labels: vec![] }
}

pub fn func(name: &str, args: Vec<Arg>, instrs: Vec<Instruction>) -> Function {
    Function { name: name.into(), args, ret_type: None, instrs }
}

pub fn program(functions: Vec<Function>) -> Program {
    Program { functions }
}

/// Testable property 1: every destination name is assigned
/// by exactly one instruction, across every block, in every function.
pub fn assert_unique_definitions(program: &Program) {
    for function in &program.functions {
        let mut seen: HashSet<&str> = HashSet::new();
        for instr in &function.instrs {
            if let Some(dest) = instr.dest() {
                assert!(
                    seen.insert(dest),
                    "function `{}` assigns `{}` more than once",
                    function.name,
                    dest
                );
            }
        }
    }
}

/// Testable property 2: every phi's `args`/`labels` arity
/// matches its block's predecessor count, and the label set equals the
/// predecessor label set.
pub fn assert_phi_well_formed(function: &Function) {
    let preds = predecessors_by_label(function);
    let mut current_block: Option<&str> = None;

    for instr in &function.instrs {
        if let Instruction::Label { label } = instr {
            current_block = Some(label);
            continue;
        }
        if !instr.is_phi() {
            continue;
        }
        let block = current_block.expect("phi outside any block");
        let want: HashSet<String> = preds.get(block).cloned().unwrap_or_default();
        assert_eq!(instr.args().len(), instr.labels().len(), "phi arity mismatch in {block}");
        assert_eq!(instr.args().len(), want.len(), "phi/predecessor count mismatch in {block}");
        let got: HashSet<String> = instr.labels().iter().cloned().collect();
        assert_eq!(got, want, "phi label set mismatch in {block}");
    }
}

fn predecessors_by_label(function: &Function) -> HashMap<String, HashSet<String>> {
    let mut blocks: Vec<(String, Vec<&Instruction>)> = Vec::new();
    for instr in &function.instrs {
        match instr {
            Instruction::Label { label } => blocks.push((label.clone(), Vec::new())),
            other => blocks.last_mut().expect("instruction before first label").1.push(other),
        }
    }

    let mut preds: HashMap<String, HashSet<String>> = HashMap::new();
    for (label, instrs) in &blocks {
        if let Some(term) = instrs.last() {
            for target in term.labels() {
                preds.entry(target.clone()).or_default().insert(label.clone());
            }
        }
    }
    preds
}

pub fn find_phi_for<'a>(function: &'a Function, var: &str) -> Option<&'a Instruction> {
    function.instrs.iter().find(|i| {
        i.is_phi() && i.dest().map(bril_ssa::ssa::rename::strip_version) == Some(var)
    })
}
