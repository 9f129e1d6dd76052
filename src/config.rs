//! Configuration for the SSA construction pipeline.
//!
//! Kept deliberately small: this crate builds minimal (not pruned) SSA
//! and runs no optimization passes, leaving little for a config surface
//! to toggle. A serde-(de)serializable struct with a `Default` impl,
//! scaled down to the knobs this crate actually has.

use serde::{Deserialize, Serialize};

/// The separator between an original variable name and its SSA version
/// number. Significant: [`crate::ssa::rename::strip_version`] splits on
/// the *last* occurrence of this character.
pub const VERSION_SEPARATOR: char = '.';

/// Suffix appended to a variable name to form the sentinel phi operand
/// used when no definition reaches a predecessor.
pub const UNDEFINED_SUFFIX: &str = "UNDEFINED";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsaConfig {
    /// Re-check structural SSA invariants (phi arity, unique definition)
    /// after renaming completes. Off by default in release use, useful
    /// during development and in the test suite.
    pub validate: bool,
}

impl Default for SsaConfig {
    fn default() -> Self {
        Self { validate: true }
    }
}
