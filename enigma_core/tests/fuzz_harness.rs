use std::sync::Arc;

use enigma_core::{MachineSettings, RotorCatalog, SymbolAlphabet, assemble};
use rand::Rng;
use rand::seq::SliceRandom;

fn extended_settings(positions: Vec<char>, pairs: Vec<String>) -> MachineSettings {
    MachineSettings {
        rotors: vec!["Beta".into(), "IV".into(), "I".into()],
        reflector: "B".into(),
        ring_settings: vec![5, 94, 40],
        positions,
        plugboard: pairs,
        reflector_rewiring: Vec::new(),
    }
}

#[test]
fn extended_alphabet_roundtrip() {
    let alphabet = Arc::new(SymbolAlphabet::extended());
    let catalog = RotorCatalog::from_seed(alphabet.clone(), b"fuzz-catalog").unwrap();
    let settings = extended_settings(
        vec!['q', '£', '7'],
        vec!["a!".into(), "Z ".into(), "“”".into()],
    );
    let plaintext = "Meet me at 10:30, bring the \"plans\" & 5% of £200!";
    let plaintext: String = plaintext.chars().filter(|c| alphabet.contains(*c)).collect();
    let mut encoder = assemble(&catalog, &settings).unwrap().into_machine();
    let ciphertext = encoder.encode(&plaintext).unwrap();
    assert_ne!(ciphertext, plaintext);
    let mut decoder = assemble(&catalog, &settings).unwrap().into_machine();
    assert_eq!(decoder.encode(&ciphertext).unwrap(), plaintext);
}

#[test]
#[ignore]
fn fuzz_random_roundtrip() {
    let alphabet = Arc::new(SymbolAlphabet::extended());
    let catalog = RotorCatalog::generated(alphabet.clone(), &mut rand::thread_rng()).unwrap();
    let mut rng = rand::thread_rng();
    for _ in 0..64 {
        let positions: Vec<char> = (0..3)
            .map(|_| *alphabet.symbols().choose(&mut rng).unwrap())
            .collect();
        let mut shuffled = alphabet.symbols().to_vec();
        shuffled.shuffle(&mut rng);
        let pairs: Vec<String> = shuffled
            .chunks_exact(2)
            .take(10)
            .map(|pair| pair.iter().collect::<String>())
            .collect();
        let settings = extended_settings(positions, pairs);
        let len = rng.gen_range(0..256);
        let msg: String = (0..len)
            .map(|_| *alphabet.symbols().choose(&mut rng).unwrap())
            .collect();
        let mut encoder = assemble(&catalog, &settings).unwrap().into_machine();
        let ciphertext = encoder.encode(&msg).unwrap();
        let mut decoder = assemble(&catalog, &settings).unwrap().into_machine();
        assert_eq!(decoder.encode(&ciphertext).unwrap(), msg);
    }
}
