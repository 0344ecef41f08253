//! Turns compiled cells and phases into identifiers.
//!
//! Every compilation mints its own tokens: one separator, the sentinel, a tag per kind of
//! cell and a marker per phase. A composite name always starts with one of those tokens and
//! has a fixed number of parts after it, so two different cells (or phases) never share a
//! name, and since no token occurs inside a source identifier, no compiled name clashes with a
//! source letter either.

use crate::fresh::FreshNames;
use crate::identifier::Identifier;
use crate::types::Direction;

use super::layout::{Cell, Phase};

pub struct Naming {
    separator: Identifier,
    sentinel: Identifier,
    plain: Identifier,
    head: Identifier,
    pending: Identifier,
    tag: Identifier,
    place_head: Identifier,
    rewind: Identifier,
    resolve: Identifier,
    seek: Identifier,
    land: Identifier,
    ret: Identifier,
    settle: Identifier,
    carry: Identifier,
    back: Identifier,
    directions: [Identifier; 3],
}

impl Naming {
    /// Mints every token from `fresh`, which must already know the source's identifiers.
    pub fn new(fresh: &mut FreshNames) -> Self {
        Self {
            separator: fresh.generate(),
            sentinel: fresh.generate(),
            plain: fresh.generate(),
            head: fresh.generate(),
            pending: fresh.generate(),
            tag: fresh.generate(),
            place_head: fresh.generate(),
            rewind: fresh.generate(),
            resolve: fresh.generate(),
            seek: fresh.generate(),
            land: fresh.generate(),
            ret: fresh.generate(),
            settle: fresh.generate(),
            carry: fresh.generate(),
            back: fresh.generate(),
            // Only ever used after a token, where a bare letter cannot be confused with anything.
            directions: ["L", "R", "S"].map(|d| Identifier::from_checked(d.to_string())),
        }
    }

    pub fn cell(&self, cell: &Cell) -> Identifier {
        match cell {
            Cell::Raw(letter) => letter.clone(),
            Cell::Plain(letter) => self.compose(&self.plain, [letter]),
            Cell::Head(letter) => self.compose(&self.head, [letter]),
            Cell::Pending(letter, direction) => {
                self.compose(&self.pending, [letter, self.direction(*direction)])
            }
            Cell::Sentinel => self.sentinel.clone(),
        }
    }

    pub fn phase(&self, phase: &Phase) -> Identifier {
        match phase {
            Phase::Start => Identifier::start(),
            Phase::Accept => Identifier::accept(),
            Phase::Reject => Identifier::reject(),
            Phase::Tag => self.tag.clone(),
            Phase::PlaceHead => self.place_head.clone(),
            Phase::Rewind => self.rewind.clone(),
            Phase::Resolve { state, under } => self.compose(&self.resolve, [state, under]),
            Phase::Seek {
                state,
                write,
                direction,
            } => self.compose(&self.seek, [state, write, self.direction(*direction)]),
            Phase::Land { state } => self.compose(&self.land, [state]),
            Phase::Return { state, under } => self.compose(&self.ret, [state, under]),
            Phase::Settle { state, under } => self.compose(&self.settle, [state, under]),
            Phase::Carry {
                state,
                under,
                carried,
            } => {
                let carried = self.cell(carried);
                self.compose(&self.carry, [state, under, &carried])
            }
            Phase::Back { state, under } => self.compose(&self.back, [state, under]),
        }
    }

    fn direction(&self, direction: Direction) -> &Identifier {
        match direction {
            Direction::Left => &self.directions[0],
            Direction::Right => &self.directions[1],
            Direction::Stay => &self.directions[2],
        }
    }

    fn compose<'a>(
        &'a self,
        marker: &'a Identifier,
        parts: impl IntoIterator<Item = &'a Identifier>,
    ) -> Identifier {
        Identifier::compose(
            &self.separator,
            std::iter::once(marker).chain(parts),
        )
    }
}
