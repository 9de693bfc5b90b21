#![no_main]

use bej_dictionary::{Dictionary, property_head_offset};
use libfuzzer_sys::fuzz_target;

// Fuzz target: dictionary parsing and property lookup.
//
// Input format:
//   bytes 0..4: sequence number to look up
//   bytes 4..:  dictionary blob
//
// Catches bugs in:
// - Header/record bounds checking
// - Entry-count vs blob-size disagreement
// - Name-offset/name-length string pool access
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let sequence = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let Ok(dict) = Dictionary::new(&data[4..]) else {
        return;
    };
    if let Ok(record) = dict.find_property(property_head_offset(), sequence) {
        let _ = dict.property_name(&record);
    }
});
