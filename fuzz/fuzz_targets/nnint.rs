#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: nnint decoding.
//
// Catches bugs in:
// - Width-byte bounds checking
// - Truncated value bytes
// - Little-endian accumulation overflow
fuzz_target!(|data: &[u8]| {
    if let Ok((value, consumed)) = bej_wire::nnint::decode_nnint(data) {
        assert!(consumed <= data.len());
        assert_eq!(bej_wire::nnint::nnint_len(data).unwrap(), consumed);
        let _ = value;
    }
});
