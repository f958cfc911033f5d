//! Rotors and reflectors.
//!
//! A rotor is a fixed permutation of the alphabet plus two offsets: the
//! visible `position`, which advances while encoding, and the `ring_setting`,
//! which shifts the wiring against the position and never changes once the
//! machine is assembled. The signal crosses each rotor twice per symbol, once
//! in each direction, and both directions use the same offset so that
//! [`Rotor::encode_left_to_right`] undoes [`Rotor::encode_right_to_left`].
//!
//! A [`Reflector`] reuses the rotor substitution with both offsets fixed at
//! zero and no way to rotate.

use std::sync::Arc;

use crate::alphabet::SymbolAlphabet;
use crate::error::EnigmaError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    alphabet: Arc<SymbolAlphabet>,
    wiring: Vec<usize>,
    inverse: Vec<usize>,
    notch: Option<usize>,
    position: usize,
    ring_setting: usize,
}

impl Rotor {
    /// Builds a rotor at position 0 with ring setting 0.
    ///
    /// `wiring` lists, for each alphabet index, the symbol that pin is wired
    /// to. It must be a permutation of the alphabet.
    pub fn new(
        name: impl Into<String>,
        alphabet: Arc<SymbolAlphabet>,
        wiring: &str,
        notch: Option<char>,
    ) -> Result<Self, EnigmaError> {
        let name = name.into();
        let wiring = parse_wiring(&name, &alphabet, wiring)?;
        let notch = notch.map(|symbol| alphabet.index_of(symbol)).transpose()?;
        let mut inverse = vec![0; wiring.len()];
        for (pin, &contact) in wiring.iter().enumerate() {
            inverse[contact] = pin;
        }
        Ok(Self {
            name,
            alphabet,
            wiring,
            inverse,
            notch,
            position: 0,
            ring_setting: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alphabet(&self) -> &Arc<SymbolAlphabet> {
        &self.alphabet
    }

    pub fn wiring(&self) -> String {
        self.wiring
            .iter()
            .map(|&idx| self.alphabet.symbol_at(idx))
            .collect()
    }

    pub fn notch(&self) -> Option<char> {
        self.notch.map(|idx| self.alphabet.symbol_at(idx))
    }

    pub fn position(&self) -> char {
        self.alphabet.symbol_at(self.position)
    }

    pub fn set_position(&mut self, symbol: char) -> Result<(), EnigmaError> {
        self.position = self.alphabet.index_of(symbol)?;
        Ok(())
    }

    /// Zero-based ring setting.
    pub fn ring_setting(&self) -> usize {
        self.ring_setting
    }

    pub fn set_ring_setting(&mut self, ring_setting: usize) -> Result<(), EnigmaError> {
        if ring_setting >= self.alphabet.len() {
            return Err(EnigmaError::RingSettingOutOfRange {
                value: ring_setting + 1,
                max: self.alphabet.len(),
            });
        }
        self.ring_setting = ring_setting;
        Ok(())
    }

    fn offset(&self) -> isize {
        self.position as isize - self.ring_setting as isize
    }

    /// Signal travelling from the keyboard side towards the reflector.
    pub fn encode_index_right_to_left(&self, index: usize) -> usize {
        let offset = self.offset();
        let pin = self.alphabet.wrap(index as isize + offset);
        let contact = self.wiring[pin];
        self.alphabet.wrap(contact as isize - offset)
    }

    /// Signal returning from the reflector; inverse of the other direction
    /// for the same offset.
    pub fn encode_index_left_to_right(&self, index: usize) -> usize {
        let offset = self.offset();
        let contact = self.alphabet.wrap(index as isize + offset);
        let pin = self.inverse[contact];
        self.alphabet.wrap(pin as isize - offset)
    }

    pub fn encode_right_to_left(&self, symbol: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.index_of(symbol)?;
        Ok(self
            .alphabet
            .symbol_at(self.encode_index_right_to_left(index)))
    }

    pub fn encode_left_to_right(&self, symbol: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.index_of(symbol)?;
        Ok(self
            .alphabet
            .symbol_at(self.encode_index_left_to_right(index)))
    }

    /// Advances one step and reports whether the rotor sat on its notch
    /// before moving, i.e. whether the next slower rotor must step too.
    pub fn rotate(&mut self) -> bool {
        let was_on_notch = self.notch == Some(self.position);
        self.position = (self.position + 1) % self.alphabet.len();
        was_on_notch
    }
}

/// A non-rotating rotor whose wiring pairs contacts symmetrically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reflector {
    rotor: Rotor,
}

impl Reflector {
    pub fn new(
        name: impl Into<String>,
        alphabet: Arc<SymbolAlphabet>,
        wiring: &str,
    ) -> Result<Self, EnigmaError> {
        let rotor = Rotor::new(name, alphabet, wiring, None)?;
        if !is_involution(&rotor.wiring) {
            return Err(EnigmaError::InvalidReflector {
                name: rotor.name.clone(),
            });
        }
        Ok(Self { rotor })
    }

    pub fn name(&self) -> &str {
        self.rotor.name()
    }

    pub fn alphabet(&self) -> &Arc<SymbolAlphabet> {
        self.rotor.alphabet()
    }

    pub fn wiring(&self) -> String {
        self.rotor.wiring()
    }

    /// Each wire as `(lower, higher)` by alphabet index, in alphabet order.
    /// A contact reflecting onto itself carries no wire.
    pub fn wire_pairs(&self) -> Vec<(char, char)> {
        let alphabet = self.alphabet();
        self.rotor
            .wiring
            .iter()
            .enumerate()
            .filter(|&(idx, &target)| idx < target)
            .map(|(idx, &target)| (alphabet.symbol_at(idx), alphabet.symbol_at(target)))
            .collect()
    }

    /// Returns a copy with each `(a, b)` in `connections` wired together.
    ///
    /// Connections are applied in order over the current wiring. The result
    /// must still pair every contact symmetrically, so swapping wires means
    /// reconnecting all four of their ends.
    pub fn rewired(&self, connections: &[(char, char)]) -> Result<Self, EnigmaError> {
        let alphabet = self.alphabet();
        let mut wiring = self.rotor.wiring.clone();
        for &(first, second) in connections {
            let a = alphabet.index_of(first)?;
            let b = alphabet.index_of(second)?;
            if a == b {
                return Err(EnigmaError::InvalidPair {
                    first,
                    second,
                    reason: "a reflector contact cannot be wired to itself",
                });
            }
            wiring[a] = b;
            wiring[b] = a;
        }
        let wiring: String = wiring.iter().map(|&idx| alphabet.symbol_at(idx)).collect();
        Self::new(self.name(), alphabet.clone(), &wiring)
    }

    pub fn encode_index(&self, index: usize) -> usize {
        self.rotor.encode_index_right_to_left(index)
    }

    pub fn encode_right_to_left(&self, symbol: char) -> Result<char, EnigmaError> {
        self.rotor.encode_right_to_left(symbol)
    }
}

/// Resolves a wiring string into alphabet indices, checking it is a bijection.
pub(crate) fn parse_wiring(
    name: &str,
    alphabet: &SymbolAlphabet,
    wiring: &str,
) -> Result<Vec<usize>, EnigmaError> {
    let invalid = |reason: String| EnigmaError::InvalidWiring {
        name: name.to_string(),
        reason,
    };
    let mut seen = vec![false; alphabet.len()];
    let mut indices = Vec::with_capacity(alphabet.len());
    for symbol in wiring.chars() {
        let idx = alphabet
            .index_of(symbol)
            .map_err(|_| invalid(format!("{symbol:?} is not in the alphabet")))?;
        if seen[idx] {
            return Err(invalid(format!("{symbol:?} appears twice")));
        }
        seen[idx] = true;
        indices.push(idx);
    }
    if indices.len() != alphabet.len() {
        return Err(invalid(format!(
            "expected {} symbols, found {}",
            alphabet.len(),
            indices.len()
        )));
    }
    Ok(indices)
}

pub(crate) fn is_involution(wiring: &[usize]) -> bool {
    wiring
        .iter()
        .enumerate()
        .all(|(idx, &target)| wiring[target] == idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ROTOR_I: &str = "EKMFLGDQVZNTOWYHXUSPAIBRCJ";
    const REFLECTOR_B: &str = "YRUHQSLDPXNGOKMIEBFZCWVJAT";

    fn rotor_i() -> Rotor {
        Rotor::new("I", Arc::new(SymbolAlphabet::classic()), ROTOR_I, Some('Q')).unwrap()
    }

    #[test]
    fn rotor_i_at_rest() {
        let rotor = rotor_i();
        assert_eq!(rotor.encode_right_to_left('A').unwrap(), 'E');
        assert_eq!(rotor.encode_left_to_right('A').unwrap(), 'U');
    }

    #[test]
    fn position_shifts_substitution() {
        let mut rotor = rotor_i();
        rotor.set_position('B').unwrap();
        assert_eq!(rotor.encode_right_to_left('A').unwrap(), 'J');
    }

    #[test]
    fn ring_setting_shifts_substitution() {
        let mut rotor = rotor_i();
        rotor.set_ring_setting(1).unwrap();
        assert_eq!(rotor.encode_right_to_left('A').unwrap(), 'K');
    }

    #[test]
    fn rotate_reports_notch_before_moving() {
        let mut rotor = rotor_i();
        rotor.set_position('P').unwrap();
        assert!(!rotor.rotate());
        assert_eq!(rotor.position(), 'Q');
        assert!(rotor.rotate());
        assert_eq!(rotor.position(), 'R');
        assert!(!rotor.rotate());
    }

    #[test]
    fn rotate_wraps_to_first_symbol() {
        let mut rotor = rotor_i();
        rotor.set_position('Z').unwrap();
        assert!(!rotor.rotate());
        assert_eq!(rotor.position(), 'A');
    }

    #[test]
    fn rotor_without_notch_never_reports_turnover() {
        let alphabet = Arc::new(SymbolAlphabet::classic());
        let mut beta = Rotor::new("Beta", alphabet, "LEYJVCNIXWPBQMDRTAKZGFUHOS", None).unwrap();
        for _ in 0..26 {
            assert!(!beta.rotate());
        }
        assert_eq!(beta.position(), 'A');
    }

    #[test]
    fn invalid_wirings_rejected() {
        let alphabet = Arc::new(SymbolAlphabet::classic());
        assert!(matches!(
            Rotor::new("short", alphabet.clone(), "ABC", None),
            Err(EnigmaError::InvalidWiring { .. })
        ));
        assert!(matches!(
            Rotor::new("dup", alphabet.clone(), "AACDEFGHIJKLMNOPQRSTUVWXYZ", None),
            Err(EnigmaError::InvalidWiring { .. })
        ));
        assert!(matches!(
            Rotor::new("foreign", alphabet.clone(), "aBCDEFGHIJKLMNOPQRSTUVWXYZ", None),
            Err(EnigmaError::InvalidWiring { .. })
        ));
        assert!(matches!(
            Rotor::new("notch", alphabet, ROTOR_I, Some('!')),
            Err(EnigmaError::InvalidSymbol { symbol: '!' })
        ));
    }

    #[test]
    fn ring_setting_bounds() {
        let mut rotor = rotor_i();
        assert!(rotor.set_ring_setting(25).is_ok());
        assert_eq!(
            rotor.set_ring_setting(26),
            Err(EnigmaError::RingSettingOutOfRange { value: 27, max: 26 })
        );
    }

    #[test]
    fn reflector_requires_symmetric_pairs() {
        let alphabet = Arc::new(SymbolAlphabet::classic());
        let reflector = Reflector::new("B", alphabet.clone(), REFLECTOR_B).unwrap();
        assert_eq!(reflector.encode_right_to_left('A').unwrap(), 'Y');
        assert_eq!(reflector.encode_right_to_left('Y').unwrap(), 'A');
        assert_eq!(
            Reflector::new("I", alphabet, ROTOR_I),
            Err(EnigmaError::InvalidReflector {
                name: "I".to_string()
            })
        );
    }

    #[test]
    fn reflector_wire_pairs_cover_every_contact() {
        let alphabet = Arc::new(SymbolAlphabet::classic());
        let reflector = Reflector::new("B", alphabet, REFLECTOR_B).unwrap();
        let pairs = reflector.wire_pairs();
        assert_eq!(pairs.len(), 13);
        assert_eq!(&pairs[..3], &[('A', 'Y'), ('B', 'R'), ('C', 'U')]);
    }

    #[test]
    fn rewiring_swaps_whole_wires() {
        let alphabet = Arc::new(SymbolAlphabet::classic());
        let reflector = Reflector::new("B", alphabet, REFLECTOR_B).unwrap();
        let crossed = reflector.rewired(&[('A', 'B'), ('Y', 'R')]).unwrap();
        assert_eq!(crossed.name(), "B");
        assert_eq!(crossed.encode_right_to_left('A').unwrap(), 'B');
        assert_eq!(crossed.encode_right_to_left('R').unwrap(), 'Y');
        assert_eq!(crossed.encode_right_to_left('C').unwrap(), 'U');
        assert_eq!(reflector.encode_right_to_left('A').unwrap(), 'Y');

        assert_eq!(
            reflector.rewired(&[('A', 'B')]),
            Err(EnigmaError::InvalidReflector {
                name: "B".to_string()
            })
        );
        assert!(matches!(
            reflector.rewired(&[('A', 'A')]),
            Err(EnigmaError::InvalidPair { .. })
        ));
        assert_eq!(
            reflector.rewired(&[('A', '1')]),
            Err(EnigmaError::InvalidSymbol { symbol: '1' })
        );
    }

    proptest! {
        #[test]
        fn directions_are_mutual_inverses(
            position in 0usize..26,
            ring in 0usize..26,
            symbol in 0usize..26,
        ) {
            let alphabet = SymbolAlphabet::classic();
            let mut rotor = rotor_i();
            rotor.set_position(alphabet.symbol_at(position)).unwrap();
            rotor.set_ring_setting(ring).unwrap();
            let forward = rotor.encode_index_right_to_left(symbol);
            prop_assert_eq!(rotor.encode_index_left_to_right(forward), symbol);
            let backward = rotor.encode_index_left_to_right(symbol);
            prop_assert_eq!(rotor.encode_index_right_to_left(backward), symbol);
        }
    }
}
