//! Machine configuration: the human-readable form and its JSON file format.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EnigmaError;

pub const SETTINGS_VERSION: u16 = 1;

/// Everything needed to assemble a machine from a catalog.
///
/// Ring settings are 1-based as written on the machine; assembly converts
/// them to 0-based offsets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSettings {
    pub rotors: Vec<String>,
    pub reflector: String,
    pub ring_settings: Vec<usize>,
    pub positions: Vec<char>,
    #[serde(default)]
    pub plugboard: Vec<String>,
    /// Reflector contacts rewired on top of the catalog wiring, as pairs
    /// like `"AP"`. Each pair's old partners are left for other pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reflector_rewiring: Vec<String>,
}

impl MachineSettings {
    /// Parses the operator notation, e.g. rotors `"I II III"`, rings
    /// `"01 02 03"`, positions `"A A Z"` and pairs like `"AB"`.
    pub fn parse<S: AsRef<str>>(
        rotors: &str,
        reflector: &str,
        ring_settings: &str,
        positions: &str,
        plugboard: &[S],
    ) -> Result<Self, EnigmaError> {
        let rotors = rotors.split_whitespace().map(str::to_string).collect();
        let ring_settings = ring_settings
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<usize>()
                    .map_err(|_| EnigmaError::InvalidSettingToken {
                        field: "ring setting",
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let positions = positions
            .split_whitespace()
            .map(|token| {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(symbol), None) => Ok(symbol),
                    _ => Err(EnigmaError::InvalidSettingToken {
                        field: "position",
                        token: token.to_string(),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            rotors,
            reflector: reflector.trim().to_string(),
            ring_settings,
            positions,
            plugboard: plugboard
                .iter()
                .map(|pair| pair.as_ref().to_string())
                .collect(),
            reflector_rewiring: Vec::new(),
        })
    }

    /// Every rotor needs exactly one ring setting and one position.
    pub fn check_counts(&self) -> Result<(), EnigmaError> {
        let rotors = self.rotors.len();
        if rotors != self.ring_settings.len() || rotors != self.positions.len() {
            return Err(EnigmaError::SettingsMismatch {
                rotors,
                rings: self.ring_settings.len(),
                positions: self.positions.len(),
            });
        }
        Ok(())
    }

    pub fn with_reflector(mut self, reflector: impl Into<String>) -> Self {
        self.reflector = reflector.into();
        self
    }

    pub fn with_positions(mut self, positions: Vec<char>) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_ring_settings(mut self, ring_settings: Vec<usize>) -> Self {
        self.ring_settings = ring_settings;
        self
    }

    pub fn with_rotors(mut self, rotors: Vec<String>) -> Self {
        self.rotors = rotors;
        self
    }

    pub fn with_plugboard(mut self, plugboard: Vec<String>) -> Self {
        self.plugboard = plugboard;
        self
    }

    pub fn with_reflector_rewiring(mut self, pairs: Vec<String>) -> Self {
        self.reflector_rewiring = pairs;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    version: u16,
    settings: MachineSettings,
}

#[derive(Debug)]
pub enum SettingsError {
    Enigma(EnigmaError),
    Io(std::io::Error),
    Serde(serde_json::Error),
    VersionMismatch { expected: u16, found: u16 },
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enigma(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "settings I/O failed: {err}"),
            Self::Serde(err) => write!(f, "settings JSON invalid: {err}"),
            Self::VersionMismatch { expected, found } => write!(
                f,
                "settings version mismatch: expected {expected}, found {found}"
            ),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<EnigmaError> for SettingsError {
    fn from(value: EnigmaError) -> Self {
        Self::Enigma(value)
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Writes a versioned settings document as pretty JSON.
pub fn save_settings(path: &Path, settings: &MachineSettings) -> Result<(), SettingsError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let document = SettingsFile {
        version: SETTINGS_VERSION,
        settings: settings.clone(),
    };
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads settings from a JSON string, accepting either the versioned
/// document or a bare settings object.
pub fn settings_from_str(text: &str) -> Result<MachineSettings, SettingsError> {
    if let Ok(document) = serde_json::from_str::<SettingsFile>(text) {
        if document.version != SETTINGS_VERSION {
            return Err(SettingsError::VersionMismatch {
                expected: SETTINGS_VERSION,
                found: document.version,
            });
        }
        return Ok(document.settings);
    }
    Ok(serde_json::from_str(text)?)
}

pub fn load_settings(path: &Path) -> Result<MachineSettings, SettingsError> {
    settings_from_str(&fs::read_to_string(path)?)
}
