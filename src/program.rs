//! The formal machine model: a validated, immutable description of a deterministic k-tape
//! Turing machine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::analyzer::analyze;
use crate::identifier::{self, Identifier};
use crate::types::{Direction, TuringMachineError};

/// A single transition rule, keyed in a [`Program`] by the state it leaves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    /// The letters that must be under the heads, one per tape.
    pub read: Vec<Identifier>,
    /// The letters written under the heads, one per tape.
    pub write: Vec<Identifier>,
    /// The move of each head after writing.
    pub directions: Vec<Direction>,
    /// The state the machine enters.
    pub next_state: Identifier,
}

/// A deterministic k-tape Turing machine.
///
/// Start, accept and reject states are the reserved identifiers `(start)`, `(accept)` and
/// `(reject)`; the blank letter is `_`. A missing transition means reject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Definition", into = "Definition")]
pub struct Program {
    tapes: usize,
    input_alphabet: BTreeSet<Identifier>,
    /// Transitions grouped by source state, each group sorted by the letters read.
    rules: BTreeMap<Identifier, Vec<Transition>>,
}

impl Program {
    /// Builds and validates a machine.
    ///
    /// # Errors
    ///
    /// `ValidationError` if `tapes` is zero, the input alphabet is empty or contains the blank,
    /// a transition leaves the accept or reject state, a transition has the wrong arity, or
    /// two transitions share a state and read letters.
    pub fn new(
        tapes: usize,
        input_alphabet: impl IntoIterator<Item = Identifier>,
        transitions: impl IntoIterator<Item = (Identifier, Transition)>,
    ) -> Result<Self, TuringMachineError> {
        let mut rules: BTreeMap<Identifier, Vec<Transition>> = BTreeMap::new();
        for (state, transition) in transitions {
            rules.entry(state).or_default().push(transition);
        }
        for group in rules.values_mut() {
            group.sort_by(|a, b| a.read.cmp(&b.read));
        }

        let program = Self {
            tapes,
            input_alphabet: input_alphabet.into_iter().collect(),
            rules,
        };

        analyze(&program)?;

        Ok(program)
    }

    /// Number of tapes.
    pub fn tapes(&self) -> usize {
        self.tapes
    }

    pub fn input_alphabet(&self) -> &BTreeSet<Identifier> {
        &self.input_alphabet
    }

    /// Transitions grouped by the state they leave.
    pub fn rules(&self) -> &BTreeMap<Identifier, Vec<Transition>> {
        &self.rules
    }

    /// Every transition together with the state it leaves, in a deterministic order.
    pub fn transitions(&self) -> impl Iterator<Item = (&Identifier, &Transition)> {
        self.rules
            .iter()
            .flat_map(|(state, group)| group.iter().map(move |t| (state, t)))
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The transition taken from `state` with `read` under the heads, if any.
    pub fn transition(&self, state: &Identifier, read: &[Identifier]) -> Option<&Transition> {
        let group = self.rules.get(state)?;
        group
            .binary_search_by(|t| t.read.as_slice().cmp(read))
            .ok()
            .map(|i| &group[i])
    }

    /// The input alphabet, the blank, and every letter read or written by a transition.
    pub fn working_alphabet(&self) -> BTreeSet<Identifier> {
        let mut letters = self.input_alphabet.clone();
        letters.insert(Identifier::blank());
        for (_, transition) in self.transitions() {
            letters.extend(transition.read.iter().cloned());
            letters.extend(transition.write.iter().cloned());
        }
        letters
    }

    /// Start, accept, reject, and every state a transition leaves or enters.
    pub fn states(&self) -> BTreeSet<Identifier> {
        let mut states = BTreeSet::from([
            Identifier::start(),
            Identifier::accept(),
            Identifier::reject(),
        ]);
        for (state, transition) in self.transitions() {
            states.insert(state.clone());
            states.insert(transition.next_state.clone());
        }
        states
    }

    /// Every identifier the machine uses, letters and states alike.
    pub fn identifiers(&self) -> BTreeSet<Identifier> {
        let mut identifiers = self.working_alphabet();
        identifiers.extend(self.states());
        identifiers
    }

    /// Splits `input` into input letters.
    ///
    /// Returns an empty vector for empty input, but also when `input` is not a sequence of
    /// identifiers or uses a letter outside the input alphabet. Callers tell the two apart by
    /// checking whether `input` was empty.
    pub fn encode_input(&self, input: &str) -> Vec<Identifier> {
        let mut letters = Vec::new();
        let mut pos = 0;

        while pos < input.len() {
            let Some(end) = identifier::scan(input, pos) else {
                return Vec::new();
            };
            let letter = &input[pos..end];
            match self.input_alphabet.get(letter) {
                Some(letter) => letters.push(letter.clone()),
                None => return Vec::new(),
            }
            pos = end;
        }

        letters
    }

    /// The same machine over `tapes` tapes. The added tapes stay blank and never move.
    pub fn widen(&self, tapes: usize) -> Result<Self, TuringMachineError> {
        if tapes < self.tapes {
            return Err(TuringMachineError::ValidationError(format!(
                "Cannot narrow a {}-tape program to {} tapes",
                self.tapes, tapes
            )));
        }

        let extra = tapes - self.tapes;
        let transitions = self.transitions().map(|(state, t)| {
            let mut t = t.clone();
            t.read.extend(std::iter::repeat(Identifier::blank()).take(extra));
            t.write.extend(std::iter::repeat(Identifier::blank()).take(extra));
            t.directions
                .extend(std::iter::repeat(Direction::Stay).take(extra));
            (state.clone(), t)
        });

        Program::new(tapes, self.input_alphabet.iter().cloned(), transitions)
    }
}

/// The flat, serializable shape of a [`Program`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    pub num_tapes: usize,
    pub input_alphabet: Vec<Identifier>,
    pub transitions: Vec<StateTransition>,
}

/// A [`Transition`] together with the state it leaves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub state: Identifier,
    #[serde(flatten)]
    pub transition: Transition,
}

impl From<Program> for Definition {
    fn from(program: Program) -> Self {
        let transitions = program
            .transitions()
            .map(|(state, transition)| StateTransition {
                state: state.clone(),
                transition: transition.clone(),
            })
            .collect();

        Definition {
            num_tapes: program.tapes,
            input_alphabet: program.input_alphabet.into_iter().collect(),
            transitions,
        }
    }
}

impl TryFrom<Definition> for Program {
    type Error = TuringMachineError;

    fn try_from(definition: Definition) -> Result<Self, Self::Error> {
        Program::new(
            definition.num_tapes,
            definition.input_alphabet,
            definition
                .transitions
                .into_iter()
                .map(|t| (t.state, t.transition)),
        )
    }
}
