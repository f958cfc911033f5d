use thiserror::Error;

/// Errors raised by the cipher engine and its assembly helpers.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EnigmaError {
    #[error("invalid plug pair {first:?}-{second:?}: {reason}")]
    InvalidPair {
        first: char,
        second: char,
        reason: &'static str,
    },

    #[error("plug pair {pair:?} must name exactly two symbols")]
    MalformedPair { pair: String },

    #[error("plugboard already holds {max} leads")]
    PlugboardFull { max: usize },

    #[error("symbol {symbol:?} is already wired on the plugboard")]
    ConnectionConflict { symbol: char },

    #[error("plug lead {first:?}-{second:?} is not on the plugboard")]
    LeadNotFound { first: char, second: char },

    #[error("symbol {symbol:?} is not part of the alphabet")]
    InvalidSymbol { symbol: char },

    #[error("alphabet contains {symbol:?} more than once")]
    DuplicateSymbol { symbol: char },

    #[error("alphabet needs at least 2 symbols, found {found}")]
    AlphabetTooSmall { found: usize },

    #[error("wiring for {name} is not a permutation of the alphabet: {reason}")]
    InvalidWiring { name: String, reason: String },

    #[error("reflector {name} does not pair its contacts symmetrically")]
    InvalidReflector { name: String },

    #[error("unknown rotor {name}")]
    UnknownRotor { name: String },

    #[error("unknown reflector {name}")]
    UnknownReflector { name: String },

    #[error("catalog already contains an entry named {name}")]
    DuplicateCatalogEntry { name: String },

    #[error("an alphabet of {symbols} symbols cannot supply {needed} distinct wirings")]
    CatalogExhausted { symbols: usize, needed: usize },

    #[error("component alphabet size {found} does not match machine alphabet size {expected}")]
    AlphabetMismatch { expected: usize, found: usize },

    #[error("setting counts differ: {rotors} rotors, {rings} ring settings, {positions} positions")]
    SettingsMismatch {
        rotors: usize,
        rings: usize,
        positions: usize,
    },

    #[error("ring setting {value} outside 1..={max}")]
    RingSettingOutOfRange { value: usize, max: usize },

    #[error("cannot parse {field} token {token:?}")]
    InvalidSettingToken { field: &'static str, token: String },

    #[error("machine needs at least one rotor")]
    NoRotors,
}
