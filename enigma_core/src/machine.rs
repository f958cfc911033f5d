//! The assembled machine: rotor stepping and the per-symbol signal path.
//!
//! Before each symbol the rightmost rotor steps, and every rotor that steps
//! off its notch carries the one to its left. The signal then runs
//! plugboard, rotors right to left, reflector, rotors left to right, and the
//! plugboard again.

use std::sync::Arc;

use log::debug;

use crate::alphabet::SymbolAlphabet;
use crate::error::EnigmaError;
use crate::plugboard::Plugboard;
use crate::rotor::{Reflector, Rotor};

/// Rotor stack, reflector and plugboard wired into one encoder.
///
/// Rotors are ordered leftmost (slowest) to rightmost (fastest). All mutable
/// state lives in the rotor positions, which advance once per encoded symbol.
#[derive(Clone, Debug)]
pub struct EnigmaMachine {
    alphabet: Arc<SymbolAlphabet>,
    rotors: Vec<Rotor>,
    reflector: Reflector,
    plugboard: Plugboard,
}

impl EnigmaMachine {
    pub fn new(
        alphabet: Arc<SymbolAlphabet>,
        rotors: Vec<Rotor>,
        reflector: Reflector,
        plugboard: Plugboard,
    ) -> Result<Self, EnigmaError> {
        if rotors.is_empty() {
            return Err(EnigmaError::NoRotors);
        }
        let sizes = rotors
            .iter()
            .map(|rotor| rotor.alphabet().len())
            .chain(std::iter::once(reflector.alphabet().len()));
        for found in sizes {
            if found != alphabet.len() {
                return Err(EnigmaError::AlphabetMismatch {
                    expected: alphabet.len(),
                    found,
                });
            }
        }
        Ok(Self {
            alphabet,
            rotors,
            reflector,
            plugboard,
        })
    }

    pub fn alphabet(&self) -> &Arc<SymbolAlphabet> {
        &self.alphabet
    }

    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    pub fn reflector(&self) -> &Reflector {
        &self.reflector
    }

    pub fn plugboard(&self) -> &Plugboard {
        &self.plugboard
    }

    /// Current rotor positions, leftmost first.
    pub fn positions(&self) -> Vec<char> {
        self.rotors.iter().map(Rotor::position).collect()
    }

    /// Encodes `text` symbol by symbol. Decoding is the same call on a
    /// machine reset to the starting state.
    ///
    /// The whole input is validated before any rotor moves, so a foreign
    /// symbol leaves the machine untouched.
    pub fn encode(&mut self, text: &str) -> Result<String, EnigmaError> {
        let symbols: Vec<char> = text.chars().collect();
        for &symbol in &symbols {
            self.alphabet.index_of(self.plugboard.encode(symbol))?;
        }
        let mut output = String::with_capacity(text.len());
        for symbol in symbols {
            output.push(self.encode_symbol(symbol)?);
        }
        debug!(
            "encoded {} symbols, positions now {:?}",
            output.chars().count(),
            self.positions()
        );
        Ok(output)
    }

    pub fn encode_symbol(&mut self, symbol: char) -> Result<char, EnigmaError> {
        let plugged = self.plugboard.encode(symbol);
        let mut index = self.alphabet.index_of(plugged)?;
        self.step();
        for rotor in self.rotors.iter().rev() {
            index = rotor.encode_index_right_to_left(index);
        }
        index = self.reflector.encode_index(index);
        for rotor in &self.rotors {
            index = rotor.encode_index_left_to_right(index);
        }
        Ok(self.plugboard.encode(self.alphabet.symbol_at(index)))
    }

    /// The rightmost rotor always turns; each rotor that leaves its notch
    /// carries the next one to its left.
    fn step(&mut self) {
        for rotor in self.rotors.iter_mut().rev() {
            if !rotor.rotate() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugboard::PlugLead;
    use proptest::prelude::*;

    const ROTOR_I: &str = "EKMFLGDQVZNTOWYHXUSPAIBRCJ";
    const ROTOR_II: &str = "AJDKSIRUXBLHWTMCQGZNPYFVOE";
    const ROTOR_III: &str = "BDFHJLCPRTXVZNYEIWGAKMUSQO";
    const REFLECTOR_B: &str = "YRUHQSLDPXNGOKMIEBFZCWVJAT";

    fn machine(rings: [usize; 3], positions: &str, pairs: &[&str]) -> EnigmaMachine {
        let alphabet = Arc::new(SymbolAlphabet::classic());
        let wirings = [(ROTOR_I, 'Q'), (ROTOR_II, 'E'), (ROTOR_III, 'V')];
        let rotors = wirings
            .iter()
            .zip(rings)
            .zip(positions.chars())
            .enumerate()
            .map(|(idx, (((wiring, notch), ring), position))| {
                let mut rotor =
                    Rotor::new(format!("r{idx}"), alphabet.clone(), wiring, Some(*notch)).unwrap();
                rotor.set_ring_setting(ring).unwrap();
                rotor.set_position(position).unwrap();
                rotor
            })
            .collect();
        let reflector = Reflector::new("B", alphabet.clone(), REFLECTOR_B).unwrap();
        let mut plugboard = Plugboard::new();
        for pair in pairs {
            plugboard
                .add(PlugLead::parse(&alphabet, pair).unwrap())
                .unwrap();
        }
        EnigmaMachine::new(alphabet, rotors, reflector, plugboard).unwrap()
    }

    #[test]
    fn every_rotor_on_its_notch_steps_together() {
        let mut enigma = machine([0, 0, 0], "QEV", &[]);
        let first = enigma.encode("X").unwrap();
        assert_eq!(enigma.positions(), vec!['R', 'F', 'W']);
        let rest = enigma.encode("XXYZ").unwrap();
        assert_eq!(format!("{first}{rest}"), "YUILP");
    }

    #[test]
    fn middle_rotor_steps_only_when_right_rotor_leaves_notch() {
        let mut enigma = machine([0, 0, 0], "ADU", &[]);
        enigma.encode("A").unwrap();
        assert_eq!(enigma.positions(), vec!['A', 'D', 'V']);
        enigma.encode("A").unwrap();
        assert_eq!(enigma.positions(), vec!['A', 'E', 'W']);
        enigma.encode("A").unwrap();
        assert_eq!(enigma.positions(), vec!['A', 'E', 'X']);
    }

    #[test]
    fn ring_settings_reference_vector() {
        let mut enigma = machine([0, 1, 2], "AAZ", &[]);
        assert_eq!(enigma.encode("AAABBBCCC").unwrap(), "KGGCSAETS");
    }

    #[test]
    fn maximal_ring_and_position_reference_vector() {
        let mut enigma = machine([25, 25, 25], "ZZZ", &[]);
        assert_eq!(enigma.encode("AAABBBCCC").unwrap(), "BDZCSYAJZ");
    }

    #[test]
    fn plugboard_reference_vector() {
        let pairs = ["HL", "MO", "AJ", "CX", "BZ", "SR", "NI", "YW", "DG", "PK"];
        let mut enigma = machine([0, 0, 0], "AAA", &pairs);
        assert_eq!(enigma.encode("HELLOWORLD").unwrap(), "KHTPLZMFTW");
    }

    #[test]
    fn decoding_restores_plaintext() {
        let mut encoder = machine([25, 25, 25], "ZZZ", &[]);
        let ciphertext = encoder.encode("TESTWORD").unwrap();
        let mut decoder = machine([25, 25, 25], "ZZZ", &[]);
        assert_eq!(decoder.encode(&ciphertext).unwrap(), "TESTWORD");
    }

    #[test]
    fn invalid_symbol_aborts_without_stepping() {
        let mut enigma = machine([0, 0, 0], "AAA", &[]);
        assert_eq!(
            enigma.encode("AB!C"),
            Err(EnigmaError::InvalidSymbol { symbol: '!' })
        );
        assert_eq!(enigma.positions(), vec!['A', 'A', 'A']);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut enigma = machine([0, 0, 0], "AAA", &[]);
        assert_eq!(enigma.encode("").unwrap(), "");
        assert_eq!(enigma.positions(), vec!['A', 'A', 'A']);
    }

    #[test]
    fn no_symbol_encodes_to_itself() {
        let mut enigma = machine([0, 0, 0], "AAA", &["AB", "CD"]);
        let plaintext = "A".repeat(200);
        let ciphertext = enigma.encode(&plaintext).unwrap();
        assert!(ciphertext.chars().all(|symbol| symbol != 'A'));
    }

    #[test]
    fn rejects_empty_rotor_stack_and_mixed_alphabets() {
        let classic = Arc::new(SymbolAlphabet::classic());
        let reflector = Reflector::new("B", classic.clone(), REFLECTOR_B).unwrap();
        assert!(matches!(
            EnigmaMachine::new(classic.clone(), Vec::new(), reflector.clone(), Plugboard::new()),
            Err(EnigmaError::NoRotors)
        ));
        let small = Arc::new(SymbolAlphabet::new("ABCD".chars()).unwrap());
        let rotor = Rotor::new("tiny", small, "BCDA", None).unwrap();
        assert!(matches!(
            EnigmaMachine::new(classic, vec![rotor], reflector, Plugboard::new()),
            Err(EnigmaError::AlphabetMismatch {
                expected: 26,
                found: 4
            })
        ));
    }

    proptest! {
        #[test]
        fn session_is_self_inverse(
            rings in prop::array::uniform3(0usize..26),
            positions in "[A-Z]{3}",
            plaintext in "[A-Z]{0,120}",
        ) {
            let pairs = ["QW", "ER", "TY"];
            let mut encoder = machine(rings, &positions, &pairs);
            let ciphertext = encoder.encode(&plaintext).unwrap();
            prop_assert_eq!(ciphertext.chars().count(), plaintext.chars().count());
            let mut decoder = machine(rings, &positions, &pairs);
            prop_assert_eq!(decoder.encode(&ciphertext).unwrap(), plaintext);
        }
    }
}
