//! Error types for the SSA construction pipeline.
//!
//! One variant family per pipeline stage (IR parsing, CFG construction,
//! SSA invariants), aggregated into [`SsaError`] via `#[from]`.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type SsaResult<T> = Result<T, SsaError>;

/// Top-level error returned by [`crate::construct_ssa`] and friends.
#[derive(Error, Debug)]
pub enum SsaError {
    #[error("malformed instruction: {0}")]
    Ir(#[from] IrError),

    #[error("control-flow graph error: {0}")]
    Cfg(#[from] CfgError),

    #[error("SSA invariant violated: {0}")]
    Invariant(#[from] SsaInvariantError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while parsing or validating a raw instruction record
///.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("instruction is missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` has the wrong type, expected {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unknown operator `{op}`")]
    UnknownOperator { op: String },

    #[error("unknown type `{ty}`")]
    UnknownType { ty: String },

    #[error("literal value {value} does not match declared type {ty}")]
    LiteralTypeMismatch { value: String, ty: &'static str },

    #[error("operator `{op}` is not a valid EffectOp (no side effect)")]
    NotAnEffect { op: &'static str },
}

/// Structural CFG defects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CfgError {
    #[error("block `{block}` ends in terminator `{op}` with no branch labels")]
    MissingBranchLabels { block: String, op: &'static str },

    #[error("block `{block}` branches to unknown label `{target}`")]
    UnknownBranchTarget { block: String, target: String },

    #[error("block `{block}` has no terminator after patching")]
    NoTerminator { block: String },

    #[error("last instruction of block `{block}` is not a terminating EffectOp")]
    BrokenTerminator { block: String },
}

/// Post-condition violations caught when [`crate::config::SsaConfig::validate`]
/// is enabled, plus the lazily-detected `InconsistentDef`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SsaInvariantError {
    #[error(
        "variable `{var}` is declared with two different types ({first} and {second})"
    )]
    InconsistentDef {
        var: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("phi for `{dest}` in block `{block}` has {args} args but {labels} labels")]
    PhiArityMismatch {
        block: String,
        dest: String,
        args: usize,
        labels: usize,
    },

    #[error(
        "phi for `{dest}` in block `{block}` has labels {labels:?}, expected predecessors {preds:?}"
    )]
    PhiLabelMismatch {
        block: String,
        dest: String,
        labels: Vec<String>,
        preds: Vec<String>,
    },

    #[error("destination `{name}` is defined more than once after renaming")]
    DuplicateDefinition { name: String },
}
