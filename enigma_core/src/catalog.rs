//! Named rotor and reflector wirings.
//!
//! A catalog is built once and handed to every assembly call. The classic
//! catalog carries the historical wirings over `A..Z`; generated catalogs
//! shuffle fresh wirings over any alphabet from an injectable RNG.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::alphabet::SymbolAlphabet;
use crate::error::EnigmaError;
use crate::rng::derive_catalog_rng;
use crate::rotor::{Reflector, Rotor, is_involution, parse_wiring};

pub const ROTOR_NAMES: [&str; 7] = ["I", "II", "III", "IV", "V", "Beta", "Gamma"];
pub const REFLECTOR_NAMES: [&str; 3] = ["A", "B", "C"];
const NOTCHLESS_ROTORS: [&str; 2] = ["Beta", "Gamma"];
const MAX_WIRING_DRAWS: usize = 4096;

const CLASSIC_ENTRIES: [(&str, &str, Option<char>, ComponentKind); 10] = [
    ("I", "EKMFLGDQVZNTOWYHXUSPAIBRCJ", Some('Q'), ComponentKind::Rotor),
    ("II", "AJDKSIRUXBLHWTMCQGZNPYFVOE", Some('E'), ComponentKind::Rotor),
    ("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", Some('V'), ComponentKind::Rotor),
    ("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", Some('J'), ComponentKind::Rotor),
    ("V", "VZBRGITYUPSDNHLXAWMJQOFECK", Some('Z'), ComponentKind::Rotor),
    ("Beta", "LEYJVCNIXWPBQMDRTAKZGFUHOS", None, ComponentKind::Rotor),
    ("Gamma", "FSOKANUERHMBTIYCWLQPZXVGJD", None, ComponentKind::Rotor),
    ("A", "EJMZALYXVBWFCRQUONTSPIKHGD", None, ComponentKind::Reflector),
    ("B", "YRUHQSLDPXNGOKMIEBFZCWVJAT", None, ComponentKind::Reflector),
    ("C", "FVPJIAOYEDRZXWGCTKUQSBNMHL", None, ComponentKind::Reflector),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Rotor,
    Reflector,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub wiring: String,
    pub notch: Option<char>,
    pub kind: ComponentKind,
}

impl CatalogEntry {
    pub fn rotor(wiring: impl Into<String>, notch: Option<char>) -> Self {
        Self {
            wiring: wiring.into(),
            notch,
            kind: ComponentKind::Rotor,
        }
    }

    pub fn reflector(wiring: impl Into<String>) -> Self {
        Self {
            wiring: wiring.into(),
            notch: None,
            kind: ComponentKind::Reflector,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotorCatalog {
    alphabet: Arc<SymbolAlphabet>,
    entries: BTreeMap<String, CatalogEntry>,
}

impl RotorCatalog {
    /// An empty catalog over `alphabet`; fill it with [`RotorCatalog::with_entry`].
    pub fn empty(alphabet: Arc<SymbolAlphabet>) -> Self {
        Self {
            alphabet,
            entries: BTreeMap::new(),
        }
    }

    pub fn classic() -> Self {
        let entries = CLASSIC_ENTRIES
            .iter()
            .map(|&(name, wiring, notch, kind)| {
                let entry = CatalogEntry {
                    wiring: wiring.to_string(),
                    notch,
                    kind,
                };
                (name.to_string(), entry)
            })
            .collect();
        Self {
            alphabet: Arc::new(SymbolAlphabet::classic()),
            entries,
        }
    }

    /// Random wirings under the classic names. Rotors I..V get a random
    /// notch; Beta and Gamma stay notchless. No two wirings repeat.
    ///
    /// Fails with [`EnigmaError::CatalogExhausted`] when the alphabet is too
    /// small to guarantee enough distinct reflector pairings.
    pub fn generated<R: Rng + ?Sized>(
        alphabet: Arc<SymbolAlphabet>,
        rng: &mut R,
    ) -> Result<Self, EnigmaError> {
        let symbols = alphabet.symbols().to_vec();
        let needed = ROTOR_NAMES.len() + REFLECTOR_NAMES.len();
        let exhausted = EnigmaError::CatalogExhausted {
            symbols: symbols.len(),
            needed,
        };
        // Rotor wirings may land on pairings too, so every entry counts.
        if full_pairing_count(symbols.len()) < needed {
            return Err(exhausted);
        }
        let mut seen = HashSet::new();
        let mut entries = BTreeMap::new();
        for name in ROTOR_NAMES {
            let wiring = draw_unique(&mut seen, || {
                let mut shuffled = symbols.clone();
                shuffled.shuffle(&mut *rng);
                shuffled.into_iter().collect()
            })
            .ok_or_else(|| exhausted.clone())?;
            let notch = if NOTCHLESS_ROTORS.contains(&name) {
                None
            } else {
                symbols.choose(rng).copied()
            };
            entries.insert(name.to_string(), CatalogEntry::rotor(wiring, notch));
        }
        for name in REFLECTOR_NAMES {
            let wiring = draw_unique(&mut seen, || random_pairing(&symbols, &mut *rng))
                .ok_or_else(|| exhausted.clone())?;
            entries.insert(name.to_string(), CatalogEntry::reflector(wiring));
        }
        debug!(
            "generated catalog over {} symbols with {} entries",
            alphabet.len(),
            entries.len()
        );
        Ok(Self { alphabet, entries })
    }

    /// Generated catalog that is reproducible from `seed`.
    pub fn from_seed(alphabet: Arc<SymbolAlphabet>, seed: &[u8]) -> Result<Self, EnigmaError> {
        let mut rng = derive_catalog_rng(seed, b"rotor-box");
        Self::generated(alphabet, &mut rng)
    }

    /// Adds a custom entry after checking its wiring against the alphabet.
    pub fn with_entry(
        mut self,
        name: impl Into<String>,
        entry: CatalogEntry,
    ) -> Result<Self, EnigmaError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(EnigmaError::DuplicateCatalogEntry { name });
        }
        let wiring = parse_wiring(&name, &self.alphabet, &entry.wiring)?;
        if let Some(notch) = entry.notch {
            self.alphabet.index_of(notch)?;
        }
        if entry.kind == ComponentKind::Reflector && !is_involution(&wiring) {
            return Err(EnigmaError::InvalidReflector { name });
        }
        self.entries.insert(name, entry);
        Ok(self)
    }

    pub fn alphabet(&self) -> &Arc<SymbolAlphabet> {
        &self.alphabet
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> + '_ {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn rotor_names(&self) -> Vec<&str> {
        self.names_of(ComponentKind::Rotor)
    }

    pub fn reflector_names(&self) -> Vec<&str> {
        self.names_of(ComponentKind::Reflector)
    }

    fn names_of(&self, kind: ComponentKind) -> Vec<&str> {
        self.entries()
            .filter(|(_, entry)| entry.kind == kind)
            .map(|(name, _)| name)
            .collect()
    }

    /// A fresh rotor at position 0, ring setting 0.
    pub fn rotor(&self, name: &str) -> Result<Rotor, EnigmaError> {
        match self.entries.get(name) {
            Some(entry) if entry.kind == ComponentKind::Rotor => {
                Rotor::new(name, self.alphabet.clone(), &entry.wiring, entry.notch)
            }
            _ => Err(EnigmaError::UnknownRotor {
                name: name.to_string(),
            }),
        }
    }

    pub fn reflector(&self, name: &str) -> Result<Reflector, EnigmaError> {
        match self.entries.get(name) {
            Some(entry) if entry.kind == ComponentKind::Reflector => {
                Reflector::new(name, self.alphabet.clone(), &entry.wiring)
            }
            _ => Err(EnigmaError::UnknownReflector {
                name: name.to_string(),
            }),
        }
    }
}

fn draw_unique(
    seen: &mut HashSet<String>,
    mut draw: impl FnMut() -> String,
) -> Option<String> {
    (0..MAX_WIRING_DRAWS).find_map(|_| {
        let wiring = draw();
        seen.insert(wiring.clone()).then_some(wiring)
    })
}

/// Number of pairings that leave at most one symbol unpaired.
fn full_pairing_count(symbols: usize) -> usize {
    let mut factor = if symbols % 2 == 0 {
        symbols.saturating_sub(1)
    } else {
        symbols
    };
    let mut count = 1usize;
    while factor > 1 {
        count = count.saturating_mul(factor);
        factor -= 2;
    }
    count
}

/// Pairs shuffled symbols two by two; an odd alphabet leaves one symbol
/// reflecting onto itself.
fn random_pairing<R: Rng + ?Sized>(symbols: &[char], rng: &mut R) -> String {
    let mut order: Vec<usize> = (0..symbols.len()).collect();
    order.shuffle(rng);
    let mut wiring = symbols.to_vec();
    for pair in order.chunks_exact(2) {
        wiring[pair[0]] = symbols[pair[1]];
        wiring[pair[1]] = symbols[pair[0]];
    }
    wiring.into_iter().collect()
}
