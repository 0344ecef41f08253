//! The cells and control phases of the compiled one-tape machine, as plain values.

use crate::identifier::Identifier;
use crate::types::Direction;

/// The content of one cell of the compiled machine's strip.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cell {
    /// An untagged letter: the input before startup tags it, and the blanks past the strip's end.
    Raw(Identifier),
    /// A segment cell that no head is on.
    Plain(Identifier),
    /// The cell a head is on, one per segment.
    Head(Identifier),
    /// Tape 1's head cell after its new letter is written but before its move is applied.
    Pending(Identifier, Direction),
    /// Separates tape 1's segment from tape 2's.
    Sentinel,
}

/// A state of the compiled machine.
///
/// `state` is always a state of the source machine and `under` the letter under tape 2's head,
/// which the phases carry around so tape 1's head never has to visit tape 2's.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Startup: tag cell 0 as tape 1's head.
    Start,
    /// Startup: tag the rest of the input, then write the sentinel.
    Tag,
    /// Startup: write tape 2's head on the cell after the sentinel.
    PlaceHead,
    /// Startup: walk back to cell 0.
    Rewind,
    /// On tape 1's head: pick the source transition.
    Resolve { state: Identifier, under: Identifier },
    /// Moving right to tape 2's head, to write `write` there and move it by `direction`.
    Seek {
        state: Identifier,
        write: Identifier,
        direction: Direction,
    },
    /// Just moved tape 2's head: tag the cell landed on.
    Land { state: Identifier },
    /// Moving left back to the pending cell.
    Return { state: Identifier, under: Identifier },
    /// Just moved tape 1's head: tag the cell landed on.
    Settle { state: Identifier, under: Identifier },
    /// Tape 1 grew over the sentinel: shifting everything right of it by one cell.
    Carry {
        state: Identifier,
        under: Identifier,
        carried: Cell,
    },
    /// Shift done: moving left to tape 1's head.
    Back { state: Identifier, under: Identifier },
    Accept,
    Reject,
}

impl Phase {
    /// The phase entered when the source machine enters `state`.
    pub fn enter(state: &Identifier, under: &Identifier) -> Phase {
        if *state == Identifier::accept() {
            Phase::Accept
        } else if *state == Identifier::reject() {
            Phase::Reject
        } else {
            Phase::Resolve {
                state: state.clone(),
                under: under.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter() {
        let a = Identifier::new("a").unwrap();
        assert_eq!(Phase::enter(&Identifier::accept(), &a), Phase::Accept);
        assert_eq!(Phase::enter(&Identifier::reject(), &a), Phase::Reject);
        assert_eq!(
            Phase::enter(&Identifier::start(), &a),
            Phase::Resolve {
                state: Identifier::start(),
                under: a,
            }
        );
    }
}
