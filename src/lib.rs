//! This crate provides a toolchain for deterministic multi-tape Turing machines.
//! It includes modules for reading and writing machine definitions, validating them,
//! executing them directly, and compiling two-tape machines into equivalent one-tape machines.

pub mod analyzer;
pub mod compiler;
pub mod encoder;
pub mod fresh;
pub mod identifier;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod program;
pub mod programs;
pub mod symbols;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the validation entry points from the analyzer module.
pub use analyzer::{analyze, unreachable_states, AnalysisError};
/// Re-exports the two-tape to one-tape compiler.
pub use compiler::{compile, compile_with};
/// Re-exports the `encode` function from the encoder module.
pub use encoder::encode;
/// Re-exports the fresh-name generator.
pub use fresh::FreshNames;
/// Re-exports the validated identifier type.
pub use identifier::Identifier;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the machine model.
pub use program::{Program, Transition};
/// Re-exports `ProgramManager` and `PROGRAMS` from the programs module.
pub use programs::{ProgramManager, PROGRAMS};
/// Re-exports the types describing directions and execution outcomes.
pub use types::{
    Direction, Halt, Rejection, Step, TuringMachineError, Verdict, MAX_PROGRAM_SIZE,
};
