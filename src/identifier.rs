//! Identifiers name every letter and every state.
//!
//! An identifier is either a single allowed character (`A-Z`, `a-z`, `0-9`, `_`, `-`) or a
//! non-empty sequence of identifiers surrounded by parentheses, for example `a`, `(start)`,
//! or `((ab)-(c(d)))`.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::types::{TuringMachineError, ACCEPT_STATE, BLANK, REJECT_STATE, START_STATE};

/// A string that satisfies the identifier grammar.
///
/// The only ways to obtain one are [`Identifier::new`], which validates, and
/// [`Identifier::compose`], which builds a composite out of existing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validates `name` against the identifier grammar.
    pub fn new(name: impl Into<String>) -> Result<Self, TuringMachineError> {
        let name = name.into();
        if is_identifier(&name) {
            Ok(Self(name))
        } else {
            Err(TuringMachineError::ValidationError(format!(
                "Invalid identifier \"{name}\""
            )))
        }
    }

    /// Builds `((p1)SEP(p2)SEP...(pn))`.
    ///
    /// `separator` must already be an identifier (it is parenthesized), so the result is one too.
    /// For a separator that occurs in none of the parts, distinct part lists give distinct names.
    pub fn compose<'a>(
        separator: &Identifier,
        parts: impl IntoIterator<Item = &'a Identifier>,
    ) -> Self {
        let mut name = String::from("(");
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                name.push_str(&separator.0);
            }
            name.push('(');
            name.push_str(&part.0);
            name.push(')');
        }
        name.push(')');
        Self(name)
    }

    /// Wraps a string the caller has already checked.
    pub(crate) fn from_checked(name: String) -> Self {
        debug_assert!(is_identifier(&name));
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn blank() -> Self {
        Self(BLANK.to_string())
    }

    pub fn start() -> Self {
        Self(START_STATE.to_string())
    }

    pub fn accept() -> Self {
        Self(ACCEPT_STATE.to_string())
    }

    pub fn reject() -> Self {
        Self(REJECT_STATE.to_string())
    }

    pub fn is_blank(&self) -> bool {
        self.0 == BLANK
    }

    /// True for the accept and reject states.
    pub fn is_terminal(&self) -> bool {
        self.0 == ACCEPT_STATE || self.0 == REJECT_STATE
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = TuringMachineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

impl TryFrom<&str> for Identifier {
    type Error = TuringMachineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Identifier::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

/// Whether `c` may stand alone as an atomic identifier.
pub fn is_valid_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'-'
}

/// Returns the end offset of the identifier that starts at byte offset `start`, if any.
///
/// Runs in time linear in the identifier's length and does not recurse on nesting depth.
pub fn scan(input: &str, start: usize) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = start;

    while let Some(&c) = bytes.get(pos) {
        pos += 1;
        match c {
            b'(' => depth += 1,
            // `()` is not an identifier: a group must hold at least one identifier.
            b')' if depth > 0 && bytes[pos - 2] != b'(' => depth -= 1,
            c if is_valid_char(c) => {}
            _ => return None,
        }

        if depth == 0 {
            return Some(pos);
        }
    }

    None
}

/// Checks whether the whole of `input` is exactly one identifier.
pub fn is_identifier(input: &str) -> bool {
    scan(input, 0) == Some(input.len())
}
