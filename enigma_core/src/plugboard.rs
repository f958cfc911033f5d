//! Plug leads and the symmetric plugboard substitution.

use std::collections::HashMap;

use crate::alphabet::SymbolAlphabet;
use crate::error::EnigmaError;

pub const MAX_PLUG_LEADS: usize = 10;

/// An undirected pairing of two distinct alphabet symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlugLead {
    first: char,
    second: char,
}

impl PlugLead {
    pub fn new(alphabet: &SymbolAlphabet, first: char, second: char) -> Result<Self, EnigmaError> {
        if first == second {
            return Err(EnigmaError::InvalidPair {
                first,
                second,
                reason: "a lead cannot connect a symbol to itself",
            });
        }
        for symbol in [first, second] {
            if !alphabet.contains(symbol) {
                return Err(EnigmaError::InvalidPair {
                    first,
                    second,
                    reason: "symbol outside the alphabet",
                });
            }
        }
        Ok(Self { first, second })
    }

    /// Parses a two-symbol pair string such as `"AB"`.
    pub fn parse(alphabet: &SymbolAlphabet, pair: &str) -> Result<Self, EnigmaError> {
        let mut chars = pair.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => Self::new(alphabet, first, second),
            _ => Err(EnigmaError::MalformedPair {
                pair: pair.to_string(),
            }),
        }
    }

    pub fn symbols(&self) -> (char, char) {
        (self.first, self.second)
    }

    pub fn encode(&self, symbol: char) -> char {
        if symbol == self.first {
            self.second
        } else if symbol == self.second {
            self.first
        } else {
            symbol
        }
    }
}

/// Up to [`MAX_PLUG_LEADS`] disjoint leads. Both directions of every lead are
/// stored, so the map is always a symmetric involution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plugboard {
    connections: HashMap<char, char>,
}

impl Plugboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lead_count(&self) -> usize {
        self.connections.len() / 2
    }

    pub fn is_wired(&self, symbol: char) -> bool {
        self.connections.contains_key(&symbol)
    }

    pub fn add(&mut self, lead: PlugLead) -> Result<(), EnigmaError> {
        if self.lead_count() >= MAX_PLUG_LEADS {
            return Err(EnigmaError::PlugboardFull {
                max: MAX_PLUG_LEADS,
            });
        }
        let (first, second) = lead.symbols();
        for symbol in [first, second] {
            if self.is_wired(symbol) {
                return Err(EnigmaError::ConnectionConflict { symbol });
            }
        }
        self.connections.insert(first, second);
        self.connections.insert(second, first);
        Ok(())
    }

    /// Removes a lead; the exact pair must currently be plugged in.
    pub fn remove(&mut self, lead: PlugLead) -> Result<(), EnigmaError> {
        let (first, second) = lead.symbols();
        if self.connections.get(&first) != Some(&second) {
            return Err(EnigmaError::LeadNotFound { first, second });
        }
        self.connections.remove(&first);
        self.connections.remove(&second);
        Ok(())
    }

    pub fn encode(&self, symbol: char) -> char {
        self.connections.get(&symbol).copied().unwrap_or(symbol)
    }

    /// Plugged pairs with the smaller symbol first, sorted.
    pub fn pairs(&self) -> Vec<(char, char)> {
        let mut pairs: Vec<_> = self
            .connections
            .iter()
            .filter(|(a, b)| a < b)
            .map(|(&a, &b)| (a, b))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}
