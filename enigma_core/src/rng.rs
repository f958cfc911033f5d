//! Deterministic RNG derivation for generated catalogs.
//!
//! A catalog seed is hashed with BLAKE3 under a fixed label and fed into
//! `ChaCha20Rng`, so two processes given the same seed build identical
//! rotor boxes. Callers wanting fresh wirings can pass any other `Rng`.

use blake3::Hasher;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;

/// Deterministic RNG derived from caller seed material and a label.
pub fn derive_catalog_rng(seed: &[u8], label: &[u8]) -> ChaCha20Rng {
    let mut hasher = Hasher::new();
    hasher.update(b"enigma::catalog");
    hasher.update(seed);
    hasher.update(label);
    let digest = hasher.finalize();
    let mut seed_material = [0u8; 32];
    seed_material.copy_from_slice(&digest.as_bytes()[..32]);
    ChaCha20Rng::from_seed(seed_material)
}
