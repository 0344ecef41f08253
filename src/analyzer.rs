//! This module checks programs against the machine model's invariants and reports
//! non-fatal findings such as states that can never be reached.

use std::collections::HashSet;

use crate::identifier::Identifier;
use crate::program::Program;
use crate::types::TuringMachineError;

/// Represents the ways a program can violate the machine model.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// A machine needs at least one tape.
    NoTapes,
    /// The input alphabet is empty.
    EmptyInputAlphabet,
    /// The blank letter appears in the input alphabet.
    BlankInInputAlphabet,
    /// A transition leaves the accept or reject state.
    TerminalSource(Identifier),
    /// A transition's read, write or move tuple does not have one entry per tape.
    ArityMismatch {
        state: Identifier,
        read: Vec<Identifier>,
        expected: usize,
    },
    /// Two transitions share the same state and read letters.
    Nondeterministic {
        state: Identifier,
        read: Vec<Identifier>,
    },
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        let message = match error {
            AnalysisError::NoTapes => "A machine needs at least one tape".to_string(),
            AnalysisError::EmptyInputAlphabet => "The input alphabet is empty".to_string(),
            AnalysisError::BlankInInputAlphabet => {
                "The blank letter \"_\" is not allowed in the input alphabet".to_string()
            }
            AnalysisError::TerminalSource(state) => {
                format!("No transition can start in the \"{state}\" state")
            }
            AnalysisError::ArityMismatch {
                state,
                read,
                expected,
            } => format!(
                "Transition from {state} reading {} does not have {expected} letters and moves",
                join(&read)
            ),
            AnalysisError::Nondeterministic { state, read } => format!(
                "The machine is not deterministic: two transitions from {state} reading {}",
                join(&read)
            ),
        };
        TuringMachineError::ValidationError(message)
    }
}

fn join(letters: &[Identifier]) -> String {
    letters
        .iter()
        .map(Identifier::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks a `Program` against the machine model.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` describing the first violation otherwise.
pub fn analyze(program: &Program) -> Result<(), TuringMachineError> {
    [
        check_tapes,
        check_input_alphabet,
        check_terminal_sources,
        check_arity,
        check_determinism,
    ]
    .iter()
    .try_for_each(|check| check(program))
    .map_err(Into::into)
}

fn check_tapes(program: &Program) -> Result<(), AnalysisError> {
    if program.tapes() == 0 {
        return Err(AnalysisError::NoTapes);
    }

    Ok(())
}

fn check_input_alphabet(program: &Program) -> Result<(), AnalysisError> {
    let alphabet = program.input_alphabet();
    if alphabet.is_empty() {
        return Err(AnalysisError::EmptyInputAlphabet);
    }
    if alphabet.iter().any(Identifier::is_blank) {
        return Err(AnalysisError::BlankInInputAlphabet);
    }

    Ok(())
}

fn check_terminal_sources(program: &Program) -> Result<(), AnalysisError> {
    program
        .rules()
        .keys()
        .find(|state| state.is_terminal())
        .map_or(Ok(()), |state| {
            Err(AnalysisError::TerminalSource(state.clone()))
        })
}

fn check_arity(program: &Program) -> Result<(), AnalysisError> {
    let tapes = program.tapes();
    for (state, transition) in program.transitions() {
        if transition.read.len() != tapes
            || transition.write.len() != tapes
            || transition.directions.len() != tapes
        {
            return Err(AnalysisError::ArityMismatch {
                state: state.clone(),
                read: transition.read.clone(),
                expected: tapes,
            });
        }
    }

    Ok(())
}

/// Relies on each state's transitions being sorted by the letters they read.
fn check_determinism(program: &Program) -> Result<(), AnalysisError> {
    for (state, group) in program.rules() {
        if let Some(pair) = group.windows(2).find(|pair| pair[0].read == pair[1].read) {
            return Err(AnalysisError::Nondeterministic {
                state: state.clone(),
                read: pair[0].read.clone(),
            });
        }
    }

    Ok(())
}

/// Lists states with outgoing transitions that no run from the start state can enter.
///
/// Such states are legal but usually point at a typo in a definition.
pub fn unreachable_states(program: &Program) -> Vec<Identifier> {
    let mut visited = HashSet::new();
    let mut queue = vec![Identifier::start()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state.clone()) {
            continue;
        }

        if let Some(transitions) = program.rules().get(&state) {
            for transition in transitions {
                if !visited.contains(&transition.next_state) {
                    queue.push(transition.next_state.clone());
                }
            }
        }
    }

    // Keys of a BTreeMap, so already sorted.
    program
        .rules()
        .keys()
        .filter(|state| !visited.contains(*state))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_valid_program() {
        let program = parse(
            "num-tapes: 1\n\
             input-alphabet: a\n\
             (start) a (accept) a -\n",
        )
        .unwrap();
        assert!(analyze(&program).is_ok());
        assert!(unreachable_states(&program).is_empty());
    }

    #[test]
    fn test_unreachable_states() {
        let program = parse(
            "num-tapes: 1\n\
             input-alphabet: a\n\
             (start) a (q) a >\n\
             (q) _ (accept) _ -\n\
             (orphan) a (start) a -\n\
             (island) a (orphan) a -\n",
        )
        .unwrap();

        let names: Vec<_> = unreachable_states(&program)
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["(island)", "(orphan)"]);
    }

    #[test]
    fn test_error_messages() {
        let error: TuringMachineError = AnalysisError::BlankInInputAlphabet.into();
        assert_eq!(
            error.to_string(),
            "Program validation error: The blank letter \"_\" is not allowed in the input alphabet"
        );

        let error: TuringMachineError =
            AnalysisError::TerminalSource(Identifier::reject()).into();
        assert_eq!(
            error.to_string(),
            "Program validation error: No transition can start in the \"(reject)\" state"
        );
    }
}
