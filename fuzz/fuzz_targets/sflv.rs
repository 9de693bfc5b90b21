#![no_main]

use bej_wire::SflvTuple;
use libfuzzer_sys::fuzz_target;

// Fuzz target: SFLV tuple envelope parsing.
//
// Catches bugs in:
// - Offset arithmetic across the S/F/L fields
// - Value-length overflow and truncation
// - Format-byte nibble handling
fuzz_target!(|data: &[u8]| {
    if let Ok(tuple) = SflvTuple::read_at(data, 0) {
        assert!(tuple.value_end_offset <= data.len());
        assert_eq!(tuple.value(data).len(), tuple.value_length);
        let _ = tuple.format.principal_type();
        let _ = tuple.first_nested_tuple_offset(data);
    }
});
