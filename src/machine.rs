//! This module defines the `TuringMachine` struct, which runs a [`Program`] directly on k tapes.
//! It handles the machine's state, tape growth, head movements, and halting.

use std::collections::HashMap;
use std::fmt;

use crate::identifier::Identifier;
use crate::program::Program;
use crate::symbols::{Symbol, SymbolTable};
use crate::types::{Direction, Halt, Rejection, Step, TuringMachineError};

/// A transition with every identifier interned.
struct Rule {
    next_state: Symbol,
    write: Vec<Symbol>,
    directions: Vec<Direction>,
}

/// A running multi-tape Turing Machine.
///
/// Tapes only grow to the right: a head moving past the last cell finds a fresh blank there,
/// while a head moving left from the first cell makes the machine reject.
pub struct TuringMachine {
    symbols: SymbolTable,
    rules: HashMap<(Symbol, Vec<Symbol>), Rule>,
    input: Vec<Symbol>,
    blank: Symbol,
    start: Symbol,
    accept: Symbol,
    reject: Symbol,
    state: Symbol,
    tapes: Vec<Vec<Symbol>>,
    heads: Vec<usize>,
    step_count: usize,
    halt: Option<Halt>,
}

impl TuringMachine {
    /// Creates a machine for `program` with `input` written on the first tape.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `input` is not a sequence of the program's input letters.
    pub fn new(program: &Program, input: &str) -> Result<Self, TuringMachineError> {
        let letters = program.encode_input(input);
        if letters.is_empty() && !input.is_empty() {
            return Err(TuringMachineError::InvalidInput(format!(
                "\"{input}\" is not a sequence of input letters"
            )));
        }

        let mut symbols = SymbolTable::new();
        let blank = symbols.intern(&Identifier::blank());
        let start = symbols.intern(&Identifier::start());
        let accept = symbols.intern(&Identifier::accept());
        let reject = symbols.intern(&Identifier::reject());

        let mut rules = HashMap::with_capacity(program.len());
        for (state, transition) in program.transitions() {
            let key = (
                symbols.intern(state),
                transition.read.iter().map(|l| symbols.intern(l)).collect(),
            );
            let rule = Rule {
                next_state: symbols.intern(&transition.next_state),
                write: transition.write.iter().map(|l| symbols.intern(l)).collect(),
                directions: transition.directions.clone(),
            };
            rules.insert(key, rule);
        }

        let input = letters.iter().map(|l| symbols.intern(l)).collect();

        let mut machine = Self {
            symbols,
            rules,
            input,
            blank,
            start,
            accept,
            reject,
            state: start,
            tapes: vec![Vec::new(); program.tapes()],
            heads: vec![0; program.tapes()],
            step_count: 0,
            halt: None,
        };
        machine.reset();

        Ok(machine)
    }

    /// Executes a single step.
    ///
    /// All moves are checked before anything is written, so a step that makes a head fall off
    /// its tape leaves every tape untouched.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the machine moved to a non-terminal state.
    /// * `Step::Halt(_)` if this step (or an earlier one) halted the machine.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = &self.halt {
            return Step::Halt(halt.clone());
        }

        let key = (self.state, self.current_symbols());
        let Some(rule) = self.rules.get(&key) else {
            let rejection = Rejection::NoTransition {
                state: self.symbols.resolve(self.state).clone(),
                letters: key.1.iter().map(|&s| self.symbols.resolve(s).clone()).collect(),
            };
            return self.halt_with(Halt::Reject(rejection));
        };

        if let Some(tape) = self
            .heads
            .iter()
            .zip(&rule.directions)
            .position(|(&head, &direction)| head == 0 && direction == Direction::Left)
        {
            return self.halt_with(Halt::Reject(Rejection::FellOff { tape }));
        }

        for (i, tape) in self.tapes.iter_mut().enumerate() {
            tape[self.heads[i]] = rule.write[i];

            match rule.directions[i] {
                Direction::Left => self.heads[i] -= 1,
                Direction::Right => {
                    self.heads[i] += 1;
                    if self.heads[i] >= tape.len() {
                        tape.push(self.blank);
                    }
                }
                Direction::Stay => {}
            }
        }

        self.state = rule.next_state;
        self.step_count += 1;

        if self.state == self.accept {
            self.halt_with(Halt::Accept)
        } else if self.state == self.reject {
            self.halt_with(Halt::Reject(Rejection::RejectState))
        } else {
            Step::Continue
        }
    }

    /// Runs until the machine halts or `max_steps` steps have been executed.
    ///
    /// Without a bound this never returns for a machine that does not halt.
    /// `Step::Continue` means the bound was reached first.
    pub fn run(&mut self, max_steps: Option<usize>) -> Step {
        loop {
            if max_steps.is_some_and(|max| self.step_count >= max) && self.halt.is_none() {
                return Step::Continue;
            }

            match self.step() {
                Step::Continue => continue,
                halt => return halt,
            }
        }
    }

    fn halt_with(&mut self, halt: Halt) -> Step {
        self.halt = Some(halt.clone());
        Step::Halt(halt)
    }

    fn current_symbols(&self) -> Vec<Symbol> {
        self.heads
            .iter()
            .zip(&self.tapes)
            .map(|(&head, tape)| tape[head])
            .collect()
    }

    /// Returns the current state.
    pub fn state(&self) -> &Identifier {
        self.symbols.resolve(self.state)
    }

    /// Resets the machine to its initial configuration.
    pub fn reset(&mut self) {
        self.state = self.start;
        for (i, tape) in self.tapes.iter_mut().enumerate() {
            tape.clear();
            if i == 0 {
                tape.extend_from_slice(&self.input);
            }
            if tape.is_empty() {
                tape.push(self.blank);
            }
        }
        self.heads.fill(0);
        self.step_count = 0;
        self.halt = None;
    }

    /// Returns the total number of steps executed.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Whether the machine has halted.
    pub fn is_halted(&self) -> bool {
        self.halt.is_some()
    }

    /// How the machine halted, if it has.
    pub fn halt(&self) -> Option<&Halt> {
        self.halt.as_ref()
    }

    /// Returns the head positions for all tapes.
    pub fn heads(&self) -> &[usize] {
        &self.heads
    }

    /// Number of tapes.
    pub fn tape_count(&self) -> usize {
        self.tapes.len()
    }

    /// The materialized content of tape `index`.
    pub fn tape(&self, index: usize) -> Vec<&Identifier> {
        self.tapes[index]
            .iter()
            .map(|&s| self.symbols.resolve(s))
            .collect()
    }

    /// Returns the letters currently under each head.
    pub fn symbols(&self) -> Vec<&Identifier> {
        self.current_symbols()
            .into_iter()
            .map(|s| self.symbols.resolve(s))
            .collect()
    }
}

impl fmt::Display for TuringMachine {
    /// Renders the state and every tape, with carets under the cell each head is on.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State: {}", self.state())?;
        for (i, tape) in self.tapes.iter().enumerate() {
            let prefix = format!("Tape {}: ", i + 1);
            let mut line = prefix.clone();
            let (mut before, mut after) = (prefix.len(), prefix.len());

            for (pos, &symbol) in tape.iter().enumerate() {
                if pos == self.heads[i] {
                    before = line.len();
                }
                line.push_str(self.symbols.resolve(symbol).as_str());
                if pos == self.heads[i] {
                    after = line.len();
                }
            }

            writeln!(f, "{line}")?;
            writeln!(f, "{}{}", " ".repeat(before), "^".repeat(after - before))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::types::Verdict;

    fn even_a() -> Program {
        parse(
            "num-tapes: 1\n\
             input-alphabet: A B\n\
             (start) A (odd) A >\n\
             (start) B (start) B >\n\
             (start) _ (accept) _ -\n\
             (odd) A (start) A >\n\
             (odd) B (odd) B >\n\
             (odd) _ (reject) _ -\n",
        )
        .unwrap()
    }

    fn two_tape() -> Program {
        parse(
            "num-tapes: 2\n\
             input-alphabet: a b\n\
             (start) a _ (copy) b x > >\n\
             (copy) _ _ (accept) y z - <\n\
             (copy) b _ (start) b _ - <\n",
        )
        .unwrap()
    }

    fn names(letters: Vec<&Identifier>) -> Vec<String> {
        letters.into_iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_machine_creation() {
        let machine = TuringMachine::new(&two_tape(), "ab").unwrap();

        assert_eq!(machine.state().as_str(), "(start)");
        assert_eq!(names(machine.tape(0)), vec!["a", "b"]);
        assert_eq!(names(machine.tape(1)), vec!["_"]);
        assert_eq!(machine.heads(), &[0, 0]);
        assert_eq!(machine.step_count(), 0);
        assert_eq!(names(machine.symbols()), vec!["a", "_"]);
    }

    #[test]
    fn test_empty_input_is_one_blank() {
        let machine = TuringMachine::new(&even_a(), "").unwrap();
        assert_eq!(names(machine.tape(0)), vec!["_"]);
    }

    #[test]
    fn test_invalid_input() {
        let result = TuringMachine::new(&even_a(), "AC");
        assert!(matches!(result, Err(TuringMachineError::InvalidInput(_))));
    }

    #[test]
    fn test_single_step() {
        let mut machine = TuringMachine::new(&two_tape(), "a").unwrap();

        assert_eq!(machine.step(), Step::Continue);
        assert_eq!(machine.state().as_str(), "(copy)");
        assert_eq!(names(machine.tape(0)), vec!["b", "_"]);
        assert_eq!(names(machine.tape(1)), vec!["x", "_"]);
        assert_eq!(machine.heads(), &[1, 1]);
        assert_eq!(machine.step_count(), 1);
    }

    #[test]
    fn test_accept() {
        let mut machine = TuringMachine::new(&two_tape(), "a").unwrap();
        machine.step();

        assert_eq!(machine.step(), Step::Halt(Halt::Accept));
        assert!(machine.is_halted());
        assert_eq!(machine.heads(), &[1, 0]);
        // Halted machines stay halted.
        assert_eq!(machine.step(), Step::Halt(Halt::Accept));
        assert_eq!(machine.step_count(), 2);
    }

    #[test]
    fn test_no_transition_rejects() {
        let mut machine = TuringMachine::new(&two_tape(), "b").unwrap();

        match machine.step() {
            Step::Halt(Halt::Reject(Rejection::NoTransition { state, letters })) => {
                assert_eq!(state.as_str(), "(start)");
                assert_eq!(names(letters.iter().collect()), vec!["b", "_"]);
            }
            other => panic!("Expected a missing transition, but got {:?}", other),
        }
    }

    #[test]
    fn test_falling_off_rejects_without_writing() {
        let program = parse(
            "num-tapes: 2\n\
             input-alphabet: a\n\
             (start) a _ (start) X Y > <\n",
        )
        .unwrap();
        let mut machine = TuringMachine::new(&program, "a").unwrap();

        assert_eq!(
            machine.step(),
            Step::Halt(Halt::Reject(Rejection::FellOff { tape: 1 }))
        );
        assert_eq!(names(machine.tape(0)), vec!["a"]);
        assert_eq!(names(machine.tape(1)), vec!["_"]);
        assert_eq!(machine.step_count(), 0);
    }

    #[test]
    fn test_reject_state() {
        let mut machine = TuringMachine::new(&even_a(), "A").unwrap();
        assert_eq!(
            machine.run(None),
            Step::Halt(Halt::Reject(Rejection::RejectState))
        );
    }

    #[test]
    fn test_run_even_a() {
        for (input, expected) in [
            ("", Verdict::Accept),
            ("A", Verdict::Reject),
            ("AA", Verdict::Accept),
            ("AB", Verdict::Reject),
            ("BAB", Verdict::Reject),
            ("BAAB", Verdict::Accept),
            ("AAA", Verdict::Reject),
        ] {
            let mut machine = TuringMachine::new(&even_a(), input).unwrap();
            assert_eq!(machine.run(None).verdict(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_run_with_bound() {
        let program = parse(
            "num-tapes: 1\n\
             input-alphabet: a\n\
             (start) a (start) a -\n",
        )
        .unwrap();
        let mut machine = TuringMachine::new(&program, "a").unwrap();

        assert_eq!(machine.run(Some(50)), Step::Continue);
        assert_eq!(machine.step_count(), 50);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_reset() {
        let mut machine = TuringMachine::new(&two_tape(), "a").unwrap();
        machine.run(None);
        assert!(machine.is_halted());

        machine.reset();
        assert_eq!(machine.state().as_str(), "(start)");
        assert_eq!(names(machine.tape(0)), vec!["a"]);
        assert_eq!(names(machine.tape(1)), vec!["_"]);
        assert_eq!(machine.heads(), &[0, 0]);
        assert_eq!(machine.step_count(), 0);
        assert!(!machine.is_halted());
    }

    #[test]
    fn test_display_configuration() {
        let mut machine = TuringMachine::new(&two_tape(), "ab").unwrap();
        machine.step();

        let rendered = machine.to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "State: (copy)");
        assert_eq!(lines[1], "Tape 1: bb");
        assert_eq!(lines[2], "         ^");
        assert_eq!(lines[3], "Tape 2: x_");
        assert_eq!(lines[4], "         ^");
    }
}
