//! Compiles a two-tape machine into a one-tape machine that accepts, rejects, or runs forever
//! on exactly the same inputs.
//!
//! The compiled machine keeps both tapes on one strip: tape 1's cells, a sentinel, then tape
//! 2's cells. Every cell is tagged `Plain` or `Head`, and each segment has exactly one `Head`,
//! marking where that tape's head is. One step of the source machine becomes one sweep:
//!
//! 1. on tape 1's head, pick the source transition using the tape 2 letter carried in the
//!    state, and leave a `Pending` cell holding the new letter and the move still to make;
//! 2. walk right to tape 2's head, write its new letter and move it, tagging the new cell
//!    (growing the strip when it moves past the end, rejecting when it crosses the sentinel);
//! 3. walk left back to the `Pending` cell, apply tape 1's move and tag the new cell.
//!
//! When tape 1 grows onto the sentinel, the sentinel and all of tape 2 are shifted one cell to
//! the right first. Tape 1's left edge is the strip's own left edge, so falling off it rejects
//! in both machines.

pub mod layout;
mod naming;

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::fresh::FreshNames;
use crate::identifier::Identifier;
use crate::program::{Program, Transition};
use crate::types::{Direction, TuringMachineError};

use layout::{Cell, Phase};
use naming::Naming;

/// Compiles `program` with fresh names drawn from an entropy-seeded generator.
///
/// See [`compile_with`].
pub fn compile(program: &Program) -> Result<Program, TuringMachineError> {
    compile_with(program, &mut FreshNames::from_entropy())
}

/// Compiles a one- or two-tape `program` into an equivalent one-tape program.
///
/// `fresh` supplies the names of the new letters and states; a generator with a fixed seed
/// gives the same output every time. One-tape programs are widened to two tapes first.
///
/// # Errors
///
/// `ValidationError` if `program` has more than two tapes.
pub fn compile_with(
    program: &Program,
    fresh: &mut FreshNames,
) -> Result<Program, TuringMachineError> {
    let widened;
    let source = match program.tapes() {
        2 => program,
        1 => {
            widened = program.widen(2)?;
            &widened
        }
        tapes => {
            return Err(TuringMachineError::ValidationError(format!(
                "Only one- and two-tape programs can be compiled, found {tapes} tapes"
            )))
        }
    };

    fresh.reserve(&source.identifiers());
    let naming = Naming::new(fresh);

    let transitions = Compiler::new(source)
        .instructions()
        .into_iter()
        .map(|instruction| {
            (
                naming.phase(&instruction.phase),
                Transition {
                    read: vec![naming.cell(&instruction.read)],
                    write: vec![naming.cell(&instruction.write)],
                    directions: vec![instruction.direction],
                    next_state: naming.phase(&instruction.next),
                },
            )
        });

    Program::new(1, source.input_alphabet().iter().cloned(), transitions)
}

/// One transition of the compiled machine, before naming.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Instruction {
    phase: Phase,
    read: Cell,
    next: Phase,
    write: Cell,
    direction: Direction,
}

struct Compiler<'a> {
    program: &'a Program,
    alphabet: BTreeSet<Identifier>,
    /// Source transitions by state and the letter under tape 2's head.
    index: HashMap<(&'a Identifier, &'a Identifier), Vec<&'a Transition>>,
    /// Every (letter, move) a `Pending` cell can hold.
    pending: BTreeSet<(Identifier, Direction)>,
}

impl<'a> Compiler<'a> {
    fn new(program: &'a Program) -> Self {
        let mut index: HashMap<_, Vec<_>> = HashMap::new();
        let mut pending = BTreeSet::new();

        for (state, transition) in program.transitions() {
            index
                .entry((state, &transition.read[1]))
                .or_default()
                .push(transition);
            pending.insert((transition.write[0].clone(), transition.directions[0]));
        }

        Self {
            program,
            alphabet: program.working_alphabet(),
            index,
            pending,
        }
    }

    /// Every instruction of every phase reachable from `Phase::Start`.
    fn instructions(&self) -> Vec<Instruction> {
        let mut visited = HashSet::new();
        let mut queue = vec![Phase::Start];
        let mut instructions = Vec::new();

        while let Some(phase) = queue.pop() {
            if visited.contains(&phase) {
                continue;
            }

            for instruction in self.expand(&phase) {
                if !visited.contains(&instruction.next) {
                    queue.push(instruction.next.clone());
                }
                instructions.push(instruction);
            }

            visited.insert(phase);
        }

        instructions
    }

    /// The instructions leaving `phase`.
    fn expand(&self, phase: &Phase) -> Vec<Instruction> {
        let blank = Identifier::blank();
        let input = self.program.input_alphabet();
        let letters = &self.alphabet;

        let mut instructions = Vec::new();
        let mut emit = |read: Cell, next: Phase, write: Cell, direction: Direction| {
            instructions.push(Instruction {
                phase: phase.clone(),
                read,
                next,
                write,
                direction,
            })
        };

        match phase {
            Phase::Start => {
                for a in input.iter().chain([&blank]) {
                    emit(
                        Cell::Raw(a.clone()),
                        Phase::Tag,
                        Cell::Head(a.clone()),
                        Direction::Right,
                    );
                }
            }

            Phase::Tag => {
                for a in input {
                    emit(
                        Cell::Raw(a.clone()),
                        Phase::Tag,
                        Cell::Plain(a.clone()),
                        Direction::Right,
                    );
                }
                emit(
                    Cell::Raw(blank.clone()),
                    Phase::PlaceHead,
                    Cell::Sentinel,
                    Direction::Right,
                );
            }

            Phase::PlaceHead => emit(
                Cell::Raw(blank.clone()),
                Phase::Rewind,
                Cell::Head(blank.clone()),
                Direction::Left,
            ),

            Phase::Rewind => {
                emit(Cell::Sentinel, Phase::Rewind, Cell::Sentinel, Direction::Left);
                for a in input {
                    emit(
                        Cell::Plain(a.clone()),
                        Phase::Rewind,
                        Cell::Plain(a.clone()),
                        Direction::Left,
                    );
                }
                for a in input.iter().chain([&blank]) {
                    emit(
                        Cell::Head(a.clone()),
                        Phase::enter(&Identifier::start(), &blank),
                        Cell::Head(a.clone()),
                        Direction::Stay,
                    );
                }
            }

            Phase::Resolve { state, under } => {
                let transitions = self.index.get(&(state, under)).into_iter().flatten();
                for transition in transitions {
                    let next_state = &transition.next_state;
                    let (read, write, move1, move2) = (
                        &transition.read[0],
                        &transition.write,
                        transition.directions[0],
                        transition.directions[1],
                    );

                    // Nothing left to simulate, unless tape 2 might still fall off.
                    if next_state.is_terminal() && move2 != Direction::Left {
                        emit(
                            Cell::Head(read.clone()),
                            Phase::enter(next_state, &write[1]),
                            Cell::Plain(write[0].clone()),
                            move1,
                        );
                    } else {
                        emit(
                            Cell::Head(read.clone()),
                            Phase::Seek {
                                state: next_state.clone(),
                                write: write[1].clone(),
                                direction: move2,
                            },
                            Cell::Pending(write[0].clone(), move1),
                            Direction::Right,
                        );
                    }
                }
            }

            Phase::Seek {
                state,
                write,
                direction,
            } => {
                for x in letters {
                    emit(
                        Cell::Plain(x.clone()),
                        phase.clone(),
                        Cell::Plain(x.clone()),
                        Direction::Right,
                    );
                }
                emit(Cell::Sentinel, phase.clone(), Cell::Sentinel, Direction::Right);

                for x in letters {
                    match direction {
                        Direction::Stay => emit(
                            Cell::Head(x.clone()),
                            Phase::Return {
                                state: state.clone(),
                                under: write.clone(),
                            },
                            Cell::Head(write.clone()),
                            Direction::Left,
                        ),
                        _ => emit(
                            Cell::Head(x.clone()),
                            Phase::Land {
                                state: state.clone(),
                            },
                            Cell::Plain(write.clone()),
                            *direction,
                        ),
                    }
                }
            }

            Phase::Land { state } => {
                for x in letters {
                    emit(
                        Cell::Plain(x.clone()),
                        Phase::Return {
                            state: state.clone(),
                            under: x.clone(),
                        },
                        Cell::Head(x.clone()),
                        Direction::Left,
                    );
                }
                // Moved right past the end of the strip: tape 2 grows.
                emit(
                    Cell::Raw(blank.clone()),
                    Phase::Return {
                        state: state.clone(),
                        under: blank.clone(),
                    },
                    Cell::Head(blank.clone()),
                    Direction::Left,
                );
                // Moved left onto the sentinel: tape 2 fell off.
                emit(Cell::Sentinel, Phase::Reject, Cell::Sentinel, Direction::Stay);
            }

            Phase::Return { state, under } => {
                for x in letters {
                    for cell in [Cell::Plain(x.clone()), Cell::Head(x.clone())] {
                        emit(cell.clone(), phase.clone(), cell, Direction::Left);
                    }
                }
                emit(Cell::Sentinel, phase.clone(), Cell::Sentinel, Direction::Left);

                for (letter, direction) in &self.pending {
                    let read = Cell::Pending(letter.clone(), *direction);
                    if state.is_terminal() {
                        emit(
                            read,
                            Phase::enter(state, under),
                            Cell::Plain(letter.clone()),
                            *direction,
                        );
                    } else if *direction == Direction::Stay {
                        emit(
                            read,
                            Phase::enter(state, under),
                            Cell::Head(letter.clone()),
                            Direction::Stay,
                        );
                    } else {
                        emit(
                            read,
                            Phase::Settle {
                                state: state.clone(),
                                under: under.clone(),
                            },
                            Cell::Plain(letter.clone()),
                            *direction,
                        );
                    }
                }
            }

            Phase::Settle { state, under } => {
                for x in letters {
                    emit(
                        Cell::Plain(x.clone()),
                        Phase::enter(state, under),
                        Cell::Head(x.clone()),
                        Direction::Stay,
                    );
                }
                // Moved right onto the sentinel: tape 1 grows, tape 2 shifts right.
                emit(
                    Cell::Sentinel,
                    Phase::Carry {
                        state: state.clone(),
                        under: under.clone(),
                        carried: Cell::Sentinel,
                    },
                    Cell::Head(blank.clone()),
                    Direction::Right,
                );
            }

            Phase::Carry {
                state,
                under,
                carried,
            } => {
                for x in letters {
                    for cell in [Cell::Plain(x.clone()), Cell::Head(x.clone())] {
                        emit(
                            cell.clone(),
                            Phase::Carry {
                                state: state.clone(),
                                under: under.clone(),
                                carried: cell,
                            },
                            carried.clone(),
                            Direction::Right,
                        );
                    }
                }
                emit(
                    Cell::Raw(blank.clone()),
                    Phase::Back {
                        state: state.clone(),
                        under: under.clone(),
                    },
                    carried.clone(),
                    Direction::Left,
                );
            }

            Phase::Back { state, under } => {
                for x in letters {
                    for cell in [Cell::Plain(x.clone()), Cell::Head(x.clone())] {
                        emit(cell.clone(), phase.clone(), cell, Direction::Left);
                    }
                }
                // The new tape 1 head sits right before the sentinel.
                emit(
                    Cell::Sentinel,
                    Phase::enter(state, under),
                    Cell::Sentinel,
                    Direction::Left,
                );
            }

            Phase::Accept | Phase::Reject => {}
        }

        instructions
    }
}
