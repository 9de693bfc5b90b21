#![no_main]

use bej_wire::RealValue;
use libfuzzer_sys::fuzz_target;

// Fuzz target: decomposed-real value parsing.
//
// Catches bugs in:
// - Sub-field length chaining
// - Sign extension of the whole and exponent parts
// - Truncated trailing fields
fuzz_target!(|data: &[u8]| {
    let _ = RealValue::read_from(data);
});
