//! Known-plaintext (crib) search over families of machine settings.
//!
//! A [`SearchSpace`] starts from fixed base settings and lists which parts
//! are unknown. Candidates are enumerated lazily as a mixed-radix counter
//! over those unknowns, and [`crib_search`] decodes the ciphertext under each
//! one, keeping every decode that contains a crib.

use log::debug;

use crate::alphabet::SymbolAlphabet;
use crate::assembly::assemble;
use crate::catalog::RotorCatalog;
use crate::error::EnigmaError;
use crate::settings::MachineSettings;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CribMatch {
    pub settings: MachineSettings,
    pub plaintext: String,
}

#[derive(Clone, Debug)]
enum Axis {
    Rotor(usize, Vec<String>),
    Reflector(Vec<String>),
    ReflectorVariant(Vec<(String, Vec<String>)>),
    Ring(usize, Vec<usize>),
    Position(usize, Vec<char>),
    Partner(char, Vec<char>),
}

impl Axis {
    fn len(&self) -> usize {
        match self {
            Axis::Rotor(_, names) | Axis::Reflector(names) => names.len(),
            Axis::ReflectorVariant(variants) => variants.len(),
            Axis::Ring(_, rings) => rings.len(),
            Axis::Position(_, symbols) | Axis::Partner(_, symbols) => symbols.len(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchSpace {
    base: MachineSettings,
    reflectors: Option<Vec<String>>,
    reflector_variants: Option<Vec<(String, Vec<String>)>>,
    rotor_choices: Option<Vec<String>>,
    ring_choices: Option<Vec<usize>>,
    sweep_positions: bool,
    unknown_partners: Vec<char>,
}

impl SearchSpace {
    /// Fails when the base settings do not give every rotor one ring
    /// setting and one position.
    pub fn new(base: MachineSettings) -> Result<Self, EnigmaError> {
        base.check_counts()?;
        Ok(Self {
            base,
            reflectors: None,
            reflector_variants: None,
            rotor_choices: None,
            ring_choices: None,
            sweep_positions: false,
            unknown_partners: Vec::new(),
        })
    }

    pub fn with_reflectors<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.reflectors = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Every rotor slot may hold any of `names`; repeats are allowed.
    pub fn with_rotor_choices<S: Into<String>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.rotor_choices = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Every rotor slot may take any of the 1-based `rings`.
    pub fn with_ring_choices(mut self, rings: impl IntoIterator<Item = usize>) -> Self {
        self.ring_choices = Some(rings.into_iter().collect());
        self
    }

    /// Tries every alphabet symbol as the starting position of every rotor.
    pub fn sweeping_positions(mut self) -> Self {
        self.sweep_positions = true;
        self
    }

    /// Tries every reflector in play with two pairs of its wires crossed,
    /// see [`crossed_wire_rewirings`]. The reflectors are the ones given to
    /// [`SearchSpace::with_reflectors`], or the base reflector.
    pub fn crossing_reflector_wires(
        mut self,
        catalog: &RotorCatalog,
    ) -> Result<Self, EnigmaError> {
        let names = self
            .reflectors
            .take()
            .unwrap_or_else(|| vec![self.base.reflector.clone()]);
        let mut variants = Vec::new();
        for name in names {
            let reflector = catalog.reflector(&name)?;
            for rewiring in crossed_wire_rewirings(&reflector.wire_pairs()) {
                let pairs: Vec<String> =
                    rewiring.iter().map(|&(a, b)| format!("{a}{b}")).collect();
                variants.push((name.clone(), pairs));
            }
        }
        debug!("crossing reflector wires: {} variants", variants.len());
        self.reflector_variants = Some(variants);
        Ok(self)
    }

    /// `symbol` is plugged to an unknown partner. Partners are drawn from
    /// symbols not already on the base plugboard and never shared.
    pub fn with_unknown_partner(mut self, symbol: char) -> Self {
        self.unknown_partners.push(symbol);
        self
    }

    fn axes(&self, alphabet: &SymbolAlphabet) -> Vec<Axis> {
        let slots = self.base.rotors.len();
        let mut axes = Vec::new();
        if let Some(names) = &self.rotor_choices {
            axes.extend((0..slots).map(|slot| Axis::Rotor(slot, names.clone())));
        }
        if let Some(variants) = &self.reflector_variants {
            axes.push(Axis::ReflectorVariant(variants.clone()));
        } else if let Some(names) = &self.reflectors {
            axes.push(Axis::Reflector(names.clone()));
        }
        if let Some(rings) = &self.ring_choices {
            axes.extend((0..slots).map(|slot| Axis::Ring(slot, rings.clone())));
        }
        if self.sweep_positions {
            let symbols = alphabet.symbols().to_vec();
            axes.extend((0..slots).map(|slot| Axis::Position(slot, symbols.clone())));
        }
        if !self.unknown_partners.is_empty() {
            let wired: Vec<char> = self.base.plugboard.iter().flat_map(|p| p.chars()).collect();
            let free: Vec<char> = alphabet
                .symbols()
                .iter()
                .copied()
                .filter(|s| !wired.contains(s) && !self.unknown_partners.contains(s))
                .collect();
            axes.extend(
                self.unknown_partners
                    .iter()
                    .map(|&symbol| Axis::Partner(symbol, free.clone())),
            );
        }
        axes
    }

    /// Number of raw candidates, before discarding shared partners.
    pub fn size(&self, alphabet: &SymbolAlphabet) -> usize {
        self.axes(alphabet).iter().map(Axis::len).product()
    }

    pub fn candidates<'a>(
        &'a self,
        alphabet: &SymbolAlphabet,
    ) -> impl Iterator<Item = MachineSettings> + use<'a> {
        let axes = self.axes(alphabet);
        let total = axes.iter().map(Axis::len).product::<usize>();
        (0..total).filter_map(move |counter| self.decode(&axes, counter))
    }

    fn decode(&self, axes: &[Axis], mut counter: usize) -> Option<MachineSettings> {
        let mut settings = self.base.clone();
        let mut partners = Vec::new();
        for axis in axes {
            let digit = counter % axis.len();
            counter /= axis.len();
            match axis {
                Axis::Rotor(slot, names) => settings.rotors[*slot] = names[digit].clone(),
                Axis::Reflector(names) => settings.reflector = names[digit].clone(),
                Axis::ReflectorVariant(variants) => {
                    let (name, pairs) = &variants[digit];
                    settings.reflector = name.clone();
                    settings.reflector_rewiring = pairs.clone();
                }
                Axis::Ring(slot, rings) => settings.ring_settings[*slot] = rings[digit],
                Axis::Position(slot, symbols) => settings.positions[*slot] = symbols[digit],
                Axis::Partner(symbol, symbols) => {
                    let partner = symbols[digit];
                    if partners.contains(&partner) {
                        return None;
                    }
                    partners.push(partner);
                    settings.plugboard.push(format!("{symbol}{partner}"));
                }
            }
        }
        Some(settings)
    }
}

/// Every way to pick four wires from `pairs`, split them into two groups of
/// two, and cross the wires within each group.
///
/// Crossing wires `(a1, a2)` and `(b1, b2)` reconnects them either as
/// `a1-b1, a2-b2` or as `a1-b2, a2-b1`, so each choice of four wires yields
/// three groupings times four crossings.
pub fn crossed_wire_rewirings(pairs: &[(char, char)]) -> Vec<Vec<(char, char)>> {
    let n = pairs.len();
    let mut rewirings = Vec::new();
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                for l in k + 1..n {
                    for [p, q, x, y] in [[i, j, k, l], [i, k, j, l], [i, l, j, k]] {
                        for first in cross(pairs[p], pairs[q]) {
                            for second in cross(pairs[x], pairs[y]) {
                                rewirings.push([first, second].concat());
                            }
                        }
                    }
                }
            }
        }
    }
    rewirings
}

fn cross((a1, a2): (char, char), (b1, b2): (char, char)) -> [[(char, char); 2]; 2] {
    [[(a1, b1), (a2, b2)], [(a1, b2), (a2, b1)]]
}

/// Decodes `ciphertext` under every candidate and keeps the decodes that
/// contain any of `cribs`. Candidates that fail to assemble, or whose plug
/// pairs are rejected, are skipped.
pub fn crib_search<I, S>(
    catalog: &RotorCatalog,
    ciphertext: &str,
    cribs: &[S],
    candidates: I,
) -> Vec<CribMatch>
where
    I: IntoIterator<Item = MachineSettings>,
    S: AsRef<str>,
{
    let mut matches = Vec::new();
    let mut tried = 0usize;
    for settings in candidates {
        tried += 1;
        let assembly = match assemble(catalog, &settings) {
            Ok(assembly) if assembly.is_clean() => assembly,
            _ => continue,
        };
        let mut machine = assembly.into_machine();
        let Ok(plaintext) = machine.encode(ciphertext) else {
            continue;
        };
        if cribs.iter().any(|crib| plaintext.contains(crib.as_ref())) {
            debug!(
                "crib hit rotors={:?} reflector={} rings={:?} positions={:?}",
                settings.rotors, settings.reflector, settings.ring_settings, settings.positions
            );
            matches.push(CribMatch {
                settings,
                plaintext,
            });
        }
    }
    debug!("crib search tried {tried} candidates, {} hits", matches.len());
    matches
}
