//! # bril-ssa
//!
//! Converts a function in a small JSON-based three-address IR ("Bril")
//! into Static Single Assignment (SSA) form.
//!
//! ## Pipeline
//!
//! ```text
//! Function.instrs -> CFG -> Dominators -> phi-insertion -> renaming -> Function.instrs
//!                      (B)      (C)           (D, E)          (F)          (G)
//! ```
//!
//! Control-flow-graph construction ([`cfg`]) and dominator analysis
//! ([`dominators`]) feed the [`ssa`] module, which scans definitions,
//! inserts phi nodes at dominance frontiers, renames every variable to a
//! unique SSA version, and flattens the result back into a label-prefixed
//! instruction stream.
//!
//! ## Quick start
//!
//! ```rust
//! use bril_ssa::ir::{Function, Instruction, Literal, Operator, ValueType};
//! use bril_ssa::construct_ssa;
//!
//! let mut function = Function {
//!     name: "main".into(),
//!     args: vec![],
//!     ret_type: None,
//!     instrs: vec![
//!         Instruction::Const { dest: "x".into(), ty: ValueType::Int, value: Literal::Int(1) },
//!         Instruction::ValueOp {
//!             op: Operator::Add,
//!             dest: "y".into(),
//!             ty: ValueType::Int,
//!             args: vec!["x".into(), "x".into()],
//!             funcs: vec![],
//!             labels: vec![],
//!         },
//!     ],
//! };
//!
//! construct_ssa(&mut function).unwrap();
//! assert_eq!(function.instrs[1].dest(), Some("x.1"));
//! ```

pub mod cfg;
pub mod config;
pub mod dominators;
pub mod errors;
pub mod ir;
pub mod ssa;
pub mod cli;

pub use cfg::{BasicBlock, Cfg};
pub use config::SsaConfig;
pub use dominators::Dominators;
pub use errors::{SsaError, SsaResult};
pub use ir::{Arg, Function, Instruction, Literal, Operator, Program, ValueType};
pub use ssa::{construct_ssa, construct_ssa_program, construct_ssa_program_with, construct_ssa_with};
