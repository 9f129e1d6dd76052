//! Closed operator and value-type taxonomy for the Bril subset this crate
//! accepts as input.
//!
//! The source language (see `original_source/src/instruction/*.py` in the
//! retrieval pack this crate was distilled from) models operators and types
//! as an open, dynamically-registered enum. A Rust crate has no use for that
//! indirection: the set of operators SSA construction needs to reason about
//! is closed, so it is expressed directly as an enum with derived
//! properties instead of a runtime registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared value type of a constant or a `ValueOp` destination.
///
/// `Unknown` and `Undefined` are never written by a user program; `Unknown`
/// is rejected at parse time (see [`Operator::from_str`] callers) and
/// `Undefined` is reserved for the synthesized `.UNDEFINED` phi operand
/// markers the renamer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Int,
    Bool,
    /// Sentinel for a declared type that could not be resolved. Never
    /// legal on a user-visible definition.
    Unknown,
}

impl ValueType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "int" => Some(ValueType::Int),
            "bool" => Some(ValueType::Bool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Bool => "bool",
            ValueType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The closed set of operators this crate understands, grounded in
/// `original_source/src/instruction/{const,compute,control,trivial,ssa}.py`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Const,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Not,
    And,
    Or,
    Jmp,
    Br,
    Call,
    Ret,
    Id,
    Print,
    Nop,
    Phi,
}

impl Operator {
    pub fn from_str(s: &str) -> Option<Self> {
        use Operator::*;
        Some(match s {
            "const" => Const,
            "add" => Add,
            "sub" => Sub,
            "mul" => Mul,
            "div" => Div,
            "eq" => Eq,
            "lt" => Lt,
            "gt" => Gt,
            "le" => Le,
            "ge" => Ge,
            "not" => Not,
            "and" => And,
            "or" => Or,
            "jmp" => Jmp,
            "br" => Br,
            "call" => Call,
            "ret" => Ret,
            "id" => Id,
            "print" => Print,
            "nop" => Nop,
            "phi" => Phi,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        use Operator::*;
        match self {
            Const => "const",
            Add => "add",
            Sub => "sub",
            Mul => "mul",
            Div => "div",
            Eq => "eq",
            Lt => "lt",
            Gt => "gt",
            Le => "le",
            Ge => "ge",
            Not => "not",
            And => "and",
            Or => "or",
            Jmp => "jmp",
            Br => "br",
            Call => "call",
            Ret => "ret",
            Id => "id",
            Print => "print",
            Nop => "nop",
            Phi => "phi",
        }
    }

    /// jmp, br, ret — the three operators that end a basic block.
    pub fn is_block_terminator(&self) -> bool {
        matches!(self, Operator::Jmp | Operator::Br | Operator::Ret)
    }

    /// All control-flow operators plus `print` have a side effect; this is
    /// the property `EffectOp` construction requires of its operator.
    pub fn has_side_effect(&self) -> bool {
        matches!(
            self,
            Operator::Jmp
                | Operator::Br
                | Operator::Call
                | Operator::Ret
                | Operator::Print
        )
    }

    /// Fixed argument count, when the operator has one.
    pub fn nargs(&self) -> Option<usize> {
        use Operator::*;
        match self {
            Add | Sub | Mul | Div | Eq | Lt | Gt | Le | Ge | And | Or => Some(2),
            Not => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
