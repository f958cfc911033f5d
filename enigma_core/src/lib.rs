//! Rotor cipher engine reproducing the Enigma signal path over any ordered
//! symbol alphabet.
//!
//! Each symbol passes plugboard → stepping → rotors right to left →
//! reflector → rotors left to right → plugboard. Encoding is its own
//! inverse: a machine reset to the same starting state decodes its output.
//!
//! ```
//! use enigma_core::{MachineSettings, RotorCatalog, assemble};
//!
//! let catalog = RotorCatalog::classic();
//! let settings = MachineSettings::parse("I II III", "B", "01 02 03", "A A Z", &["HL"]).unwrap();
//! let mut machine = assemble(&catalog, &settings).unwrap().into_machine();
//! let ciphertext = machine.encode("ATTACKATDAWN").unwrap();
//!
//! let mut machine = assemble(&catalog, &settings).unwrap().into_machine();
//! assert_eq!(machine.encode(&ciphertext).unwrap(), "ATTACKATDAWN");
//! ```

pub mod alphabet;
pub mod assembly;
pub mod catalog;
pub mod error;
pub mod machine;
pub mod plugboard;
pub mod rng;
pub mod rotor;
pub mod search;
pub mod settings;

pub use crate::alphabet::{CLASSIC_SYMBOLS, EXTENDED_SYMBOLS, SymbolAlphabet};
pub use crate::assembly::{Assembly, PlugDiagnostic, assemble, assemble_from_file};
pub use crate::catalog::{
    CatalogEntry, ComponentKind, REFLECTOR_NAMES, ROTOR_NAMES, RotorCatalog,
};
pub use crate::error::EnigmaError;
pub use crate::machine::EnigmaMachine;
pub use crate::plugboard::{MAX_PLUG_LEADS, PlugLead, Plugboard};
pub use crate::rng::derive_catalog_rng;
pub use crate::rotor::{Reflector, Rotor};
pub use crate::search::{CribMatch, SearchSpace, crib_search, crossed_wire_rewirings};
pub use crate::settings::{
    MachineSettings, SETTINGS_VERSION, SettingsError, load_settings, save_settings,
    settings_from_str,
};
