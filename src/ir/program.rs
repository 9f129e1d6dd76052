//! Top-level program model: the `{"functions": [...]}` envelope and the
//! per-function `args`/`type`/`instrs` record.

use serde::{Deserialize, Serialize};

use crate::ir::instruction::Instruction;
use crate::ir::types::ValueType;

/// A function argument. Renamed in place by [`crate::ssa::construct_ssa`]
/// since arguments are definitions reaching the entry block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Arg>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ret_type: Option<ValueType>,
    pub instrs: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Function>,
}
