//! Interning of identifiers into small integers, so the executor compares and hashes numbers
//! instead of strings.

use std::collections::HashMap;

use crate::identifier::Identifier;

/// An interned identifier. Only meaningful together with the table that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    ids: HashMap<Identifier, Symbol>,
    names: Vec<Identifier>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the symbol for `identifier`, allocating the next one on first sight.
    pub fn intern(&mut self, identifier: &Identifier) -> Symbol {
        if let Some(&symbol) = self.ids.get(identifier) {
            return symbol;
        }

        let symbol = Symbol(self.names.len() as u32);
        self.ids.insert(identifier.clone(), symbol);
        self.names.push(identifier.clone());
        symbol
    }

    pub fn get(&self, identifier: &Identifier) -> Option<Symbol> {
        self.ids.get(identifier).copied()
    }

    /// The identifier behind `symbol`.
    pub fn resolve(&self, symbol: Symbol) -> &Identifier {
        &self.names[symbol.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
