//! This module defines the shared data types used throughout the toolchain: reserved
//! identifiers, head moves, execution outcomes, and the crate-wide error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::identifier::Identifier;
use crate::Rule;

/// The blank letter. Every unwritten cell of every tape holds it.
pub const BLANK: &str = "_";
/// The state every execution starts in.
pub const START_STATE: &str = "(start)";
/// The single accepting state. No transition may leave it.
pub const ACCEPT_STATE: &str = "(accept)";
/// The single rejecting state. No transition may leave it.
pub const REJECT_STATE: &str = "(reject)";
/// Number of random characters inside a freshly minted identifier.
pub const FRESH_NAME_LENGTH: usize = 16;
/// The maximum allowed size for a definition file in bytes.
pub const MAX_PROGRAM_SIZE: usize = 1 << 24; // 16MB

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// All three moves, in a fixed order.
    pub const ALL: [Direction; 3] = [Direction::Left, Direction::Right, Direction::Stay];

    /// The one-character form used in definition files.
    pub fn symbol(self) -> char {
        match self {
            Direction::Left => '<',
            Direction::Right => '>',
            Direction::Stay => '-',
        }
    }

    /// Parses the one-character form used in definition files.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Direction::Left),
            ">" => Some(Direction::Right),
            "-" => Some(Direction::Stay),
            _ => None,
        }
    }
}

/// Represents the outcome of a Turing Machine execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a step (or hit its step bound) and can continue.
    Continue,
    /// The machine has halted.
    Halt(Halt),
}

impl Step {
    /// Collapses the step into the externally observable verdict.
    pub fn verdict(&self) -> Verdict {
        match self {
            Step::Continue => Verdict::Running,
            Step::Halt(Halt::Accept) => Verdict::Accept,
            Step::Halt(Halt::Reject(_)) => Verdict::Reject,
        }
    }
}

/// How a machine halted.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// The accept state was reached.
    Accept,
    /// The machine rejected, for the given reason.
    Reject(Rejection),
}

/// Why a machine rejected. Only diagnostics differ between the variants; the verdict is the same.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The reject state was reached.
    #[error("Reached the reject state")]
    RejectState,
    /// No transition is defined for the current state and letters.
    #[error("No transition from state {state} reading {}", display_letters(.letters))]
    NoTransition {
        state: Identifier,
        letters: Vec<Identifier>,
    },
    /// A head tried to move left from the first cell of its tape.
    #[error("Head {} falls off the left end of its tape", .tape + 1)]
    FellOff { tape: usize },
}

fn display_letters(letters: &[Identifier]) -> String {
    letters
        .iter()
        .map(Identifier::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The externally observable result of an execution, optionally bounded in steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accept,
    Reject,
    /// The step bound was reached before the machine halted.
    Running,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Accept => "ACCEPT",
            Verdict::Reject => "REJECT",
            Verdict::Running => "RUNNING",
        })
    }
}

/// Represents various errors that can occur while defining, loading, or running machines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// Indicates an error during the parsing of a definition file.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a machine that violates the model's invariants.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// Indicates an input word that is not a sequence of input letters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}
