//! Fresh-name generation.
//!
//! A [`FreshNames`] instance mints identifiers that collide neither with any identifier it has
//! been told about nor with anything it minted before. Each compilation owns its own instance,
//! so there is no process-wide state and a fixed seed gives reproducible output.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use crate::identifier::Identifier;
use crate::types::FRESH_NAME_LENGTH;

pub struct FreshNames {
    rng: StdRng,
    used: HashSet<String>,
}

impl FreshNames {
    /// A generator with a fixed seed. Same seed and same reservations give the same names.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            used: HashSet::new(),
        }
    }

    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            used: HashSet::new(),
        }
    }

    /// Records identifiers that minted names must avoid.
    pub fn reserve<'a>(&mut self, identifiers: impl IntoIterator<Item = &'a Identifier>) {
        self.used
            .extend(identifiers.into_iter().map(|id| id.as_str().to_string()));
    }

    /// Whether `name` was reserved or minted by this generator.
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Mints a new identifier of the form `(xxxxxxxxxxxxxxxx)`.
    ///
    /// A candidate is discarded if it equals or occurs inside any used identifier, so a name
    /// built around it can never be mistaken for one that already exists.
    pub fn generate(&mut self) -> Identifier {
        loop {
            let body: String = (&mut self.rng)
                .sample_iter(&Alphanumeric)
                .take(FRESH_NAME_LENGTH)
                .map(char::from)
                .collect();
            let candidate = format!("({body})");

            if self.used.iter().any(|used| used.contains(&candidate)) {
                continue;
            }

            self.used.insert(candidate.clone());
            return Identifier::from_checked(candidate);
        }
    }
}
