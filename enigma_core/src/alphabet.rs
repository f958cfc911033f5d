//! Ordered symbol sets the engine encodes over.
//!
//! Every offset the rotors apply is taken modulo the alphabet size, so the
//! same engine drives the 26-letter classic machine and larger alphabets.

use std::collections::HashMap;

use crate::error::EnigmaError;

pub const CLASSIC_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Letters, digits and punctuation; 94 symbols so generated reflectors pair
/// every contact.
pub const EXTENDED_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz1234567890 *,.()[]#@+-=_\\/'^%$£!?<>:;`“”|~";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolAlphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl SymbolAlphabet {
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Result<Self, EnigmaError> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        if symbols.len() < 2 {
            return Err(EnigmaError::AlphabetTooSmall {
                found: symbols.len(),
            });
        }
        let mut index = HashMap::with_capacity(symbols.len());
        for (idx, &symbol) in symbols.iter().enumerate() {
            if index.insert(symbol, idx).is_some() {
                return Err(EnigmaError::DuplicateSymbol { symbol });
            }
        }
        Ok(Self { symbols, index })
    }

    pub fn classic() -> Self {
        Self::from_static(CLASSIC_SYMBOLS)
    }

    pub fn extended() -> Self {
        Self::from_static(EXTENDED_SYMBOLS)
    }

    fn from_static(symbols: &'static str) -> Self {
        let symbols: Vec<char> = symbols.chars().collect();
        let index = symbols
            .iter()
            .enumerate()
            .map(|(idx, &symbol)| (symbol, idx))
            .collect();
        Self { symbols, index }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    pub fn index_of(&self, symbol: char) -> Result<usize, EnigmaError> {
        self.index
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::InvalidSymbol { symbol })
    }

    /// Symbol at `index`, wrapping modulo the alphabet size.
    pub fn symbol_at(&self, index: usize) -> char {
        self.symbols[index % self.symbols.len()]
    }

    /// Converts a whole text up front; the first foreign symbol fails the call.
    pub fn indices_of(&self, text: &str) -> Result<Vec<usize>, EnigmaError> {
        text.chars().map(|symbol| self.index_of(symbol)).collect()
    }

    /// Reduces a possibly negative offset into `0..len`.
    pub(crate) fn wrap(&self, value: isize) -> usize {
        value.rem_euclid(self.symbols.len() as isize) as usize
    }
}
