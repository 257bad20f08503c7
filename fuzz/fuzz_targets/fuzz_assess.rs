//! Fuzz target: `Engine::assess` on arbitrary readings.
//!
//! Any bit pattern (NaN, infinities, subnormals) is a valid reading. The
//! engine must never panic and must keep the score on [0, 100].
//!
//! cargo fuzz run fuzz_assess

#![no_main]

use std::sync::OnceLock;

use compost_fuzzy::{Engine, Reading};
use libfuzzer_sys::fuzz_target;

static ENGINE: OnceLock<Engine> = OnceLock::new();

fn word(data: &[u8], i: usize) -> f32 {
    let mut b = [0u8; 4];
    for (k, slot) in b.iter_mut().enumerate() {
        *slot = data.get(i * 4 + k).copied().unwrap_or(0);
    }
    f32::from_le_bytes(b)
}

fuzz_target!(|data: &[u8]| {
    let engine = ENGINE.get_or_init(|| Engine::builtin().expect("bundled table builds"));
    let reading = Reading::new(word(data, 0), word(data, 1), word(data, 2), word(data, 3));
    let a = engine.assess(&reading);
    assert!((0.0..=100.0).contains(&a.score), "score {} out of range", a.score);
    let ev = engine.evaluate(&reading);
    assert_eq!(ev.assessment.label, a.label);
});
