//! Builds machines from a catalog and [`MachineSettings`].
//!
//! Rotor, reflector, ring and position problems abort assembly. Plug pairs
//! are applied best-effort: each rejected pair is reported and the rest are
//! still plugged in.

use std::path::Path;

use log::debug;

use crate::catalog::RotorCatalog;
use crate::error::EnigmaError;
use crate::machine::EnigmaMachine;
use crate::plugboard::{PlugLead, Plugboard};
use crate::settings::{MachineSettings, SettingsError, load_settings};

/// A plug pair that could not be applied, with the reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlugDiagnostic {
    pub pair: String,
    pub error: EnigmaError,
}

#[derive(Clone, Debug)]
pub struct Assembly {
    pub machine: EnigmaMachine,
    pub applied_pairs: Vec<String>,
    pub diagnostics: Vec<PlugDiagnostic>,
}

impl Assembly {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_machine(self) -> EnigmaMachine {
        self.machine
    }
}

pub fn assemble(
    catalog: &RotorCatalog,
    settings: &MachineSettings,
) -> Result<Assembly, EnigmaError> {
    settings.check_counts()?;
    let alphabet = catalog.alphabet();
    let mut rotors = Vec::with_capacity(settings.rotors.len());
    for ((name, &ring), &position) in settings
        .rotors
        .iter()
        .zip(&settings.ring_settings)
        .zip(&settings.positions)
    {
        if ring == 0 || ring > alphabet.len() {
            return Err(EnigmaError::RingSettingOutOfRange {
                value: ring,
                max: alphabet.len(),
            });
        }
        let mut rotor = catalog.rotor(name)?;
        rotor.set_ring_setting(ring - 1)?;
        rotor.set_position(position)?;
        rotors.push(rotor);
    }
    let mut reflector = catalog.reflector(&settings.reflector)?;
    if !settings.reflector_rewiring.is_empty() {
        let connections = settings
            .reflector_rewiring
            .iter()
            .map(|pair| split_pair(pair))
            .collect::<Result<Vec<_>, _>>()?;
        reflector = reflector.rewired(&connections)?;
    }

    let mut plugboard = Plugboard::new();
    let mut applied_pairs = Vec::new();
    let mut diagnostics = Vec::new();
    for pair in &settings.plugboard {
        let outcome = PlugLead::parse(alphabet, pair).and_then(|lead| plugboard.add(lead));
        match outcome {
            Ok(()) => applied_pairs.push(pair.clone()),
            Err(error) => {
                debug!("skipping plug pair {pair:?}: {error}");
                diagnostics.push(PlugDiagnostic {
                    pair: pair.clone(),
                    error,
                });
            }
        }
    }

    let machine = EnigmaMachine::new(alphabet.clone(), rotors, reflector, plugboard)?;
    debug!(
        "assembled rotors={:?} reflector={} positions={:?} leads={} rejected={}",
        settings.rotors,
        settings.reflector,
        machine.positions(),
        applied_pairs.len(),
        diagnostics.len()
    );
    Ok(Assembly {
        machine,
        applied_pairs,
        diagnostics,
    })
}

fn split_pair(pair: &str) -> Result<(char, char), EnigmaError> {
    let mut chars = pair.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), Some(second), None) => Ok((first, second)),
        _ => Err(EnigmaError::MalformedPair {
            pair: pair.to_string(),
        }),
    }
}

/// Loads settings from `path` and assembles them against `catalog`.
pub fn assemble_from_file(catalog: &RotorCatalog, path: &Path) -> Result<Assembly, SettingsError> {
    let settings = load_settings(path)?;
    Ok(assemble(catalog, &settings)?)
}
