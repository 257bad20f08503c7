//! Fuzz target: rule-table decoding and engine construction.
//!
//! Arbitrary bytes go through both decoders. Whatever decodes must either
//! be rejected by `Engine::new` or produce an engine whose output stays in
//! range for a fixed reading.
//!
//! cargo fuzz run fuzz_rule_table

#![no_main]

use compost_fuzzy::{Engine, EngineConfig, Reading};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let decoded = [EngineConfig::from_json_slice(data), EngineConfig::from_postcard(data)];
    for config in decoded.into_iter().flatten() {
        if let Ok(engine) = Engine::new(&config) {
            let a = engine.assess(&Reading::new(45.0, 46.0, 7.0, 1.5));
            assert!((0.0..=100.0).contains(&a.score), "score out of range");
        }
    }
});
