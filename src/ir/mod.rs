//! IR value model: instructions, operators,
//! value types, and the function/program envelope they sit in.

pub mod instruction;
pub mod program;
pub mod types;

pub use instruction::{Instruction, Literal};
pub use program::{Arg, Function, Program};
pub use types::{Operator, ValueType};
